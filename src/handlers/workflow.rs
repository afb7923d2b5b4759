// src/handlers/workflow.rs

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
    middleware::rbac::{
        PermProductionApprove, PermProductionCreate, PermSettingsUpdate, RequirePermission,
    },
    models::workflow::{
        ApproveStepPayload, CreateWorkflowPayload, EntityType, RejectStepPayload, StepOutcome,
        SubmissionOutcome, SubmitForApprovalPayload, ValidationDetail, Workflow,
    },
};

// POST /api/v1/workflows
#[utoipa::path(
    post,
    path = "/api/v1/workflows",
    tag = "Workflows",
    request_body = CreateWorkflowPayload,
    responses((status = 201, description = "Workflow criado (ativo)", body = Workflow)),
    security(("api_jwt" = []))
)]
pub async fn create_workflow(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermSettingsUpdate>,
    Json(payload): Json<CreateWorkflowPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let workflow = app_state
        .workflow_service
        .create_workflow(&payload.name, payload.entity_type, payload.steps)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(workflow))))
}

// GET /api/v1/workflows/{entity_type}
// O workflow ativo mais recente do tipo (os mais antigos estão mortos)
#[utoipa::path(
    get,
    path = "/api/v1/workflows/{entity_type}",
    tag = "Workflows",
    params(("entity_type" = String, Path, description = "production_order | quote | quality_control")),
    responses(
        (status = 200, description = "Workflow ativo do tipo", body = Workflow),
        (status = 404, description = "Nenhum workflow ativo para o tipo")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_workflow(
    State(app_state): State<AppState>,
    Path(entity_type): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    // Tipo desconhecido na URL é erro do chamador, não de configuração
    let entity_type: EntityType = entity_type
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Tipo de entidade inválido: {entity_type}")))?;

    let workflow = app_state
        .workflow_service
        .get_workflow_for_entity(entity_type)
        .await?
        .ok_or_else(|| AppError::NotFound("Workflow não encontrado.".into()))?;

    Ok(Json(ApiResponse::new(workflow)))
}

// POST /api/v1/workflows/submit
#[utoipa::path(
    post,
    path = "/api/v1/workflows/submit",
    tag = "Workflows",
    request_body = SubmitForApprovalPayload,
    responses(
        (status = 200, description = "Validação aberta, ou aprovação direta quando não há workflow", body = SubmissionOutcome),
        (status = 409, description = "Já existe validação pendente para a entidade")
    ),
    security(("api_jwt" = []))
)]
pub async fn submit_for_approval(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequirePermission<PermProductionCreate>,
    Json(payload): Json<SubmitForApprovalPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let outcome = app_state
        .workflow_service
        .submit_for_approval(payload.entity_id, payload.entity_type, user.id)
        .await?;

    Ok(Json(ApiResponse::new(outcome)))
}

// POST /api/v1/workflows/{validation_id}/approve/{step_id}
#[utoipa::path(
    post,
    path = "/api/v1/workflows/{validation_id}/approve/{step_id}",
    tag = "Workflows",
    params(
        ("validation_id" = Uuid, Path, description = "ID da validação"),
        ("step_id" = Uuid, Path, description = "ID da etapa corrente")
    ),
    request_body = ApproveStepPayload,
    responses(
        (status = 200, description = "Etapa aprovada: pendente com próxima etapa, ou aprovação final", body = StepOutcome),
        (status = 404, description = "Validação, workflow ou etapa inexistente"),
        (status = 409, description = "Etapa fora de sequência ou validação já finalizada")
    ),
    security(("api_jwt" = []))
)]
pub async fn approve_step(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequirePermission<PermProductionApprove>,
    Path((validation_id, step_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ApproveStepPayload>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = app_state
        .workflow_service
        .approve_step(validation_id, step_id, user.id, payload.comments.as_deref())
        .await?;

    Ok(Json(ApiResponse::new(outcome)))
}

// POST /api/v1/workflows/{validation_id}/reject/{step_id}
#[utoipa::path(
    post,
    path = "/api/v1/workflows/{validation_id}/reject/{step_id}",
    tag = "Workflows",
    params(
        ("validation_id" = Uuid, Path, description = "ID da validação"),
        ("step_id" = Uuid, Path, description = "ID da etapa")
    ),
    request_body = RejectStepPayload,
    responses(
        (status = 200, description = "Validação rejeitada (terminal)"),
        (status = 400, description = "Razão do rejeito ausente"),
        (status = 409, description = "Validação já finalizada")
    ),
    security(("api_jwt" = []))
)]
pub async fn reject_step(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequirePermission<PermProductionApprove>,
    Path((validation_id, step_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<RejectStepPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state
        .workflow_service
        .reject_step(validation_id, step_id, user.id, &payload.reason)
        .await?;

    Ok(Json(ApiMessage::new("Etapa rejeitada com sucesso.")))
}

// GET /api/v1/workflows/validations/{validation_id}
// Acompanhamento: a validação + a trilha de auditoria das aprovações
#[utoipa::path(
    get,
    path = "/api/v1/workflows/validations/{validation_id}",
    tag = "Workflows",
    params(("validation_id" = Uuid, Path, description = "ID da validação")),
    responses(
        (status = 200, description = "Validação e histórico de aprovações", body = ValidationDetail),
        (status = 404, description = "Validação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_validation(
    State(app_state): State<AppState>,
    Path(validation_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.workflow_service.get_validation(validation_id).await?;

    Ok(Json(ApiResponse::new(detail)))
}
