// src/handlers/sales.rs

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
    models::sales::{CreateQuotePayload, Quote},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct QuoteFilter {
    // Ex: draft, approved, rejected
    pub status: Option<String>,
}

// POST /api/v1/sales/quotes
#[utoipa::path(
    post,
    path = "/api/v1/sales/quotes",
    tag = "Sales",
    request_body = CreateQuotePayload,
    responses((status = 201, description = "Cotação criada com status 'draft'", body = Quote)),
    security(("api_jwt" = []))
)]
pub async fn create_quote(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateQuotePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let quote = app_state
        .sales_service
        .create_quote(
            &payload.customer_name,
            payload.total_amount,
            payload.notes.as_deref(),
            user.id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(quote))))
}

// GET /api/v1/sales/quotes
#[utoipa::path(
    get,
    path = "/api/v1/sales/quotes",
    tag = "Sales",
    params(QuoteFilter),
    responses((status = 200, description = "Cotações", body = [Quote])),
    security(("api_jwt" = []))
)]
pub async fn list_quotes(
    State(app_state): State<AppState>,
    Query(filter): Query<QuoteFilter>,
) -> Result<impl IntoResponse, AppError> {
    let quotes = app_state.sales_service.list_quotes(filter.status.as_deref()).await?;

    Ok(Json(ApiResponse::new(quotes)))
}

// GET /api/v1/sales/quotes/{id}
#[utoipa::path(
    get,
    path = "/api/v1/sales/quotes/{id}",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID da cotação")),
    responses(
        (status = 200, description = "Cotação", body = Quote),
        (status = 404, description = "Cotação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_quote(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let quote = app_state.sales_service.get_quote(id).await?;

    Ok(Json(ApiResponse::new(quote)))
}
