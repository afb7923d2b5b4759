// src/models/sales.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Cotação comercial: entidade governada pelo workflow de aprovação
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: Uuid,

    #[schema(example = "COT-2026-0107")]
    pub quote_number: String,

    #[schema(example = "Fazenda Boa Vista")]
    pub customer_name: String,

    #[schema(example = "18500.00")]
    pub total_amount: Decimal,

    #[schema(example = "draft")]
    pub status: String,

    pub notes: Option<String>,

    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuotePayload {
    #[validate(length(min = 1, message = "O nome do cliente é obrigatório."))]
    pub customer_name: String,

    pub total_amount: Decimal,

    pub notes: Option<String>,
}
