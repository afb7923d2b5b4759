// src/services/sales_service.rs

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{common::error::AppError, db::SalesRepository, models::sales::Quote};

fn next_quote_number() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("COT-{}", id[..8].to_uppercase())
}

#[derive(Clone)]
pub struct SalesService {
    repo: SalesRepository,
}

impl SalesService {
    pub fn new(repo: SalesRepository) -> Self {
        Self { repo }
    }

    pub async fn create_quote(
        &self,
        customer_name: &str,
        total_amount: Decimal,
        notes: Option<&str>,
        created_by: Uuid,
    ) -> Result<Quote, AppError> {
        self.repo
            .insert_quote(&next_quote_number(), customer_name, total_amount, notes, created_by)
            .await
    }

    pub async fn list_quotes(&self, status: Option<&str>) -> Result<Vec<Quote>, AppError> {
        self.repo.list_quotes(status).await
    }

    pub async fn get_quote(&self, id: Uuid) -> Result<Quote, AppError> {
        self.repo
            .find_quote(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cotação não encontrada.".into()))
    }
}
