// src/handlers/entities.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    common::response::{ApiMessage, ApiResponse},
    config::AppState,
    models::entities::{CreateEntityPayload, EntityTree, OrgEntity, UpdateEntityPayload},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct EntityFilter {
    // Ex: agropole, site, unit
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

// POST /api/v1/entities
#[utoipa::path(
    post,
    path = "/api/v1/entities",
    tag = "Entities",
    request_body = CreateEntityPayload,
    responses(
        (status = 201, description = "Entidade criada", body = OrgEntity),
        (status = 400, description = "Entidade pai inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_entity(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateEntityPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let entity = app_state.entity_service.create_entity(&payload).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(entity))))
}

// GET /api/v1/entities
#[utoipa::path(
    get,
    path = "/api/v1/entities",
    tag = "Entities",
    params(EntityFilter),
    responses((status = 200, description = "Entidades organizacionais", body = [OrgEntity])),
    security(("api_jwt" = []))
)]
pub async fn list_entities(
    State(app_state): State<AppState>,
    Query(filter): Query<EntityFilter>,
) -> Result<impl IntoResponse, AppError> {
    let entities = app_state.entity_service.list_entities(filter.kind.as_deref()).await?;

    Ok(Json(ApiResponse::new(entities)))
}

// GET /api/v1/entities/{id}/tree
#[utoipa::path(
    get,
    path = "/api/v1/entities/{id}/tree",
    tag = "Entities",
    params(("id" = Uuid, Path, description = "ID da entidade raiz")),
    responses(
        (status = 200, description = "Subárvore de três níveis", body = EntityTree),
        (status = 404, description = "Entidade não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_entity_tree(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let tree = app_state.entity_service.get_entity_tree(id).await?;

    Ok(Json(ApiResponse::new(tree)))
}

// PUT /api/v1/entities/{id}
#[utoipa::path(
    put,
    path = "/api/v1/entities/{id}",
    tag = "Entities",
    params(("id" = Uuid, Path, description = "ID da entidade")),
    request_body = UpdateEntityPayload,
    responses(
        (status = 200, description = "Entidade atualizada", body = OrgEntity),
        (status = 404, description = "Entidade não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_entity(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEntityPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let entity = app_state.entity_service.update_entity(id, &payload).await?;

    Ok(Json(ApiResponse::new(entity)))
}

// DELETE /api/v1/entities/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/entities/{id}",
    tag = "Entities",
    params(("id" = Uuid, Path, description = "ID da entidade")),
    responses(
        (status = 200, description = "Entidade removida"),
        (status = 409, description = "Entidade ainda tem filhos")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_entity(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.entity_service.delete_entity(id).await?;

    Ok(Json(ApiMessage::new("Entidade removida com sucesso.")))
}
