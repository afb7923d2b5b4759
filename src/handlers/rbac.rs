// src/handlers/rbac.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    common::response::{ApiMessage, ApiResponse},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    middleware::rbac::{PermRolesCreate, PermRolesUpdate, RequireAdmin, RequirePermission},
    models::rbac::{CreateRolePayload, Permission, Role, UpdateRolePayload},
};

// GET /api/v1/rbac/permissions
// As permissões efetivas do usuário logado (super-cargos recebem o
// catálogo inteiro)
#[utoipa::path(
    get,
    path = "/api/v1/rbac/permissions",
    tag = "RBAC",
    responses((status = 200, description = "Permissões efetivas do usuário", body = [Permission])),
    security(("api_jwt" = []))
)]
pub async fn get_my_permissions(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let permissions = app_state.rbac_service.get_user_permissions(user.id).await?;

    Ok(Json(ApiResponse::new(permissions)))
}

// GET /api/v1/rbac/roles
#[utoipa::path(
    get,
    path = "/api/v1/rbac/roles",
    tag = "RBAC",
    responses((status = 200, description = "Todos os cargos", body = [Role])),
    security(("api_jwt" = []))
)]
pub async fn get_all_roles(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<impl IntoResponse, AppError> {
    let roles = app_state.rbac_service.get_all_roles().await?;

    Ok(Json(ApiResponse::new(roles)))
}

// POST /api/v1/rbac/roles
#[utoipa::path(
    post,
    path = "/api/v1/rbac/roles",
    tag = "RBAC",
    request_body = CreateRolePayload,
    responses(
        (status = 201, description = "Cargo criado", body = Role),
        (status = 409, description = "Nome de cargo já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_role(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    _guard: RequirePermission<PermRolesCreate>,
    Json(payload): Json<CreateRolePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let role = app_state
        .rbac_service
        .create_role(&payload.name, payload.description.as_deref(), &payload.permissions)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(role))))
}

// PUT /api/v1/rbac/roles/{id}
// Substituição integral de nome/descrição/permissões
#[utoipa::path(
    put,
    path = "/api/v1/rbac/roles/{id}",
    tag = "RBAC",
    params(("id" = Uuid, Path, description = "ID do cargo")),
    request_body = UpdateRolePayload,
    responses(
        (status = 200, description = "Cargo atualizado", body = Role),
        (status = 404, description = "Cargo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_role(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    _guard: RequirePermission<PermRolesUpdate>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRolePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let role = app_state
        .rbac_service
        .update_role(id, &payload.name, payload.description.as_deref(), &payload.permissions)
        .await?;

    Ok(Json(ApiResponse::new(role)))
}

// POST /api/v1/rbac/roles/initialize
// Semeadura idempotente dos cargos padrão (reexecutável no deploy)
#[utoipa::path(
    post,
    path = "/api/v1/rbac/roles/initialize",
    tag = "RBAC",
    responses((status = 200, description = "Cargos padrão semeados")),
    security(("api_jwt" = []))
)]
pub async fn initialize_roles(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<impl IntoResponse, AppError> {
    let created = app_state.rbac_service.initialize_default_roles().await?;

    Ok(Json(ApiMessage::new(format!(
        "Cargos inicializados com sucesso ({} criados).",
        created.len()
    ))))
}
