// src/models/entities.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Entidade organizacional (agropole, site, unidade...). A hierarquia é
// uma auto-referência via parent_id.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrgEntity {
    pub id: Uuid,

    #[schema(example = "Agropole de Kindia")]
    pub name: String,

    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    #[schema(example = "site")]
    pub kind: String,

    pub parent_id: Option<Uuid>,

    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Subárvore (até três níveis, como a tela de mapa consome)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntityTree {
    #[serde(flatten)]
    pub entity: OrgEntity,

    #[schema(no_recursion)]
    pub children: Vec<EntityTree>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntityPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "O tipo é obrigatório."))]
    pub kind: String,

    pub parent_id: Option<Uuid>,

    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

// Atualização parcial: só os campos presentes são alterados
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntityPayload {
    pub name: Option<String>,

    #[serde(rename = "type")]
    pub kind: Option<String>,

    pub parent_id: Option<Uuid>,

    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}
