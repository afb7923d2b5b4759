// src/handlers/quality.rs

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
    common::response::ApiResponse,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::quality::{CreateQualityControlPayload, QualityControl},
};

// POST /api/v1/quality/controls
#[utoipa::path(
    post,
    path = "/api/v1/quality/controls",
    tag = "Quality",
    request_body = CreateQualityControlPayload,
    responses((status = 201, description = "Controle registrado com status 'pending'", body = QualityControl)),
    security(("api_jwt" = []))
)]
pub async fn create_control(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateQualityControlPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let control = app_state
        .quality_service
        .create_control(
            payload.order_id,
            &payload.lot_number,
            &payload.control_type,
            &payload.parameters,
            &payload.results,
            payload.is_compliant,
            user.id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(control))))
}

// GET /api/v1/quality/controls
#[utoipa::path(
    get,
    path = "/api/v1/quality/controls",
    tag = "Quality",
    responses((status = 200, description = "Controles de qualidade", body = [QualityControl])),
    security(("api_jwt" = []))
)]
pub async fn list_controls(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let controls = app_state.quality_service.list_controls().await?;

    Ok(Json(ApiResponse::new(controls)))
}

// GET /api/v1/quality/controls/{id}
#[utoipa::path(
    get,
    path = "/api/v1/quality/controls/{id}",
    tag = "Quality",
    params(("id" = Uuid, Path, description = "ID do controle")),
    responses(
        (status = 200, description = "Controle de qualidade", body = QualityControl),
        (status = 404, description = "Controle não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_control(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let control = app_state.quality_service.get_control(id).await?;

    Ok(Json(ApiResponse::new(control)))
}
