// src/db/quality_repo.rs

use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::quality::QualityControl;

#[derive(Clone)]
pub struct QualityRepository {
    pool: PgPool,
}

impl QualityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_control(
        &self,
        order_id: Option<Uuid>,
        lot_number: &str,
        control_type: &str,
        parameters: &Value,
        results: &Value,
        is_compliant: bool,
        tested_by: Uuid,
    ) -> Result<QualityControl, AppError> {
        let control = sqlx::query_as::<_, QualityControl>(
            r#"
            INSERT INTO quality_controls
                (order_id, lot_number, control_type, parameters, results, is_compliant, tested_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(lot_number)
        .bind(control_type)
        .bind(Json(parameters))
        .bind(Json(results))
        .bind(is_compliant)
        .bind(tested_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(control)
    }

    pub async fn list_controls(&self) -> Result<Vec<QualityControl>, AppError> {
        let controls = sqlx::query_as::<_, QualityControl>(
            "SELECT * FROM quality_controls ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(controls)
    }

    pub async fn find_control(&self, id: Uuid) -> Result<Option<QualityControl>, AppError> {
        let control =
            sqlx::query_as::<_, QualityControl>("SELECT * FROM quality_controls WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(control)
    }
}
