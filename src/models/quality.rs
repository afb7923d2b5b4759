// src/models/quality.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Controle de qualidade: entidade governada pelo workflow de aprovação
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QualityControl {
    pub id: Uuid,

    // Ordem de produção de origem (opcional: controles avulsos existem)
    pub order_id: Option<Uuid>,

    #[schema(example = "LOTE-2026-031")]
    pub lot_number: String,

    #[schema(example = "microbiological")]
    pub control_type: String,

    // Parâmetros medidos e resultados, livres por tipo de controle
    #[schema(value_type = Object)]
    pub parameters: Value,

    #[schema(value_type = Object)]
    pub results: Value,

    pub is_compliant: bool,

    #[schema(example = "pending")]
    pub status: String,

    pub tested_by: Option<Uuid>,
    pub tested_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateQualityControlPayload {
    pub order_id: Option<Uuid>,

    #[validate(length(min = 1, message = "O número do lote é obrigatório."))]
    pub lot_number: String,

    #[validate(length(min = 1, message = "O tipo de controle é obrigatório."))]
    pub control_type: String,

    #[serde(default)]
    #[schema(value_type = Object)]
    pub parameters: Value,

    #[serde(default)]
    #[schema(value_type = Object)]
    pub results: Value,

    pub is_compliant: bool,
}
