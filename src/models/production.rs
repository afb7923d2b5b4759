// src/models/production.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Ordem de produção: entidade governada pelo workflow de aprovação
// (o sink escreve 'approved'/'rejected' no campo status)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductionOrder {
    pub id: Uuid,

    #[schema(example = "OP-2026-0042")]
    pub order_number: String,

    #[schema(example = "Ração bovina 25kg")]
    pub product_name: String,

    #[schema(example = "1500.000")]
    pub quantity_planned: Decimal,

    pub scheduled_date: Option<NaiveDate>,

    #[schema(example = "planned")]
    pub status: String,

    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductionOrderPayload {
    #[validate(length(min = 1, message = "O nome do produto é obrigatório."))]
    pub product_name: String,

    pub quantity_planned: Decimal,

    pub scheduled_date: Option<NaiveDate>,
}

// ---
// Fórmulas de produção (criação transacional: fórmula + ingredientes)
// ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Formula {
    pub id: Uuid,

    #[schema(example = "Ração bovina 25kg")]
    pub product_name: String,

    #[schema(example = "Fórmula de inverno")]
    pub name: String,

    #[schema(example = "v2")]
    pub version: String,

    pub is_active: bool,

    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormulaIngredient {
    pub id: Uuid,
    pub formula_id: Uuid,

    #[schema(example = "Milho moído")]
    pub raw_material: String,

    #[schema(example = "62.500")]
    pub percentage: Decimal,

    #[schema(example = "15.625")]
    pub quantity_kg: Decimal,
}

// Fórmula completa (com a lista de ingredientes)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormulaDetail {
    #[serde(flatten)]
    pub formula: Formula,

    pub ingredients: Vec<FormulaIngredient>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFormulaIngredient {
    pub raw_material: String,
    pub percentage: Decimal,
    pub quantity_kg: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFormulaPayload {
    #[validate(length(min = 1, message = "O nome do produto é obrigatório."))]
    pub product_name: String,

    #[validate(length(min = 1, message = "O nome da fórmula é obrigatório."))]
    pub name: String,

    #[validate(length(min = 1, message = "A versão é obrigatória."))]
    pub version: String,

    #[serde(default = "default_active")]
    pub is_active: bool,

    #[validate(length(min = 1, message = "A fórmula precisa de ao menos um ingrediente."))]
    pub ingredients: Vec<CreateFormulaIngredient>,
}

fn default_active() -> bool {
    true
}
