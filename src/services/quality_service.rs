// src/services/quality_service.rs

use serde_json::Value;
use uuid::Uuid;

use crate::{common::error::AppError, db::QualityRepository, models::quality::QualityControl};

#[derive(Clone)]
pub struct QualityService {
    repo: QualityRepository,
}

impl QualityService {
    pub fn new(repo: QualityRepository) -> Self {
        Self { repo }
    }

    pub async fn create_control(
        &self,
        order_id: Option<Uuid>,
        lot_number: &str,
        control_type: &str,
        parameters: &Value,
        results: &Value,
        is_compliant: bool,
        tested_by: Uuid,
    ) -> Result<QualityControl, AppError> {
        self.repo
            .insert_control(
                order_id,
                lot_number,
                control_type,
                parameters,
                results,
                is_compliant,
                tested_by,
            )
            .await
    }

    pub async fn list_controls(&self) -> Result<Vec<QualityControl>, AppError> {
        self.repo.list_controls().await
    }

    pub async fn get_control(&self, id: Uuid) -> Result<QualityControl, AppError> {
        self.repo
            .find_control(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Controle de qualidade não encontrado.".into()))
    }
}
