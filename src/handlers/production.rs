// src/handlers/production.rs

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
    common::response::ApiResponse,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::production::{
        CreateFormulaPayload, CreateProductionOrderPayload, FormulaDetail, ProductionOrder,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct OrderFilter {
    // Ex: planned, approved, rejected
    pub status: Option<String>,
}

// POST /api/v1/production/orders
#[utoipa::path(
    post,
    path = "/api/v1/production/orders",
    tag = "Production",
    request_body = CreateProductionOrderPayload,
    responses((status = 201, description = "Ordem criada com status 'planned'", body = ProductionOrder)),
    security(("api_jwt" = []))
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateProductionOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let order = app_state
        .production_service
        .create_order(
            &payload.product_name,
            payload.quantity_planned,
            payload.scheduled_date,
            user.id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(order))))
}

// GET /api/v1/production/orders
#[utoipa::path(
    get,
    path = "/api/v1/production/orders",
    tag = "Production",
    params(OrderFilter),
    responses((status = 200, description = "Ordens de produção", body = [ProductionOrder])),
    security(("api_jwt" = []))
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    Query(filter): Query<OrderFilter>,
) -> Result<impl IntoResponse, AppError> {
    let orders = app_state.production_service.list_orders(filter.status.as_deref()).await?;

    Ok(Json(ApiResponse::new(orders)))
}

// GET /api/v1/production/orders/{id}
#[utoipa::path(
    get,
    path = "/api/v1/production/orders/{id}",
    tag = "Production",
    params(("id" = Uuid, Path, description = "ID da ordem")),
    responses(
        (status = 200, description = "Ordem de produção", body = ProductionOrder),
        (status = 404, description = "Ordem não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_order(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state.production_service.get_order(id).await?;

    Ok(Json(ApiResponse::new(order)))
}

// POST /api/v1/production/formulas
// A única escrita multi-comando do módulo: fórmula + ingredientes na
// mesma transação
#[utoipa::path(
    post,
    path = "/api/v1/production/formulas",
    tag = "Production",
    request_body = CreateFormulaPayload,
    responses((status = 201, description = "Fórmula criada com os ingredientes", body = FormulaDetail)),
    security(("api_jwt" = []))
)]
pub async fn create_formula(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateFormulaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let formula = app_state
        .production_service
        .create_formula(
            &payload.product_name,
            &payload.name,
            &payload.version,
            payload.is_active,
            &payload.ingredients,
            user.id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(formula))))
}

// GET /api/v1/production/formulas
#[utoipa::path(
    get,
    path = "/api/v1/production/formulas",
    tag = "Production",
    responses((status = 200, description = "Fórmulas com ingredientes", body = [FormulaDetail])),
    security(("api_jwt" = []))
)]
pub async fn list_formulas(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let formulas = app_state.production_service.list_formulas().await?;

    Ok(Json(ApiResponse::new(formulas)))
}
