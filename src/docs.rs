// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- RBAC ---
        handlers::rbac::get_my_permissions,
        handlers::rbac::get_all_roles,
        handlers::rbac::create_role,
        handlers::rbac::update_role,
        handlers::rbac::initialize_roles,

        // --- Workflows ---
        handlers::workflow::create_workflow,
        handlers::workflow::get_workflow,
        handlers::workflow::submit_for_approval,
        handlers::workflow::approve_step,
        handlers::workflow::reject_step,
        handlers::workflow::get_validation,

        // --- Production ---
        handlers::production::create_order,
        handlers::production::list_orders,
        handlers::production::get_order,
        handlers::production::create_formula,
        handlers::production::list_formulas,

        // --- Sales ---
        handlers::sales::create_quote,
        handlers::sales::list_quotes,
        handlers::sales::get_quote,

        // --- Quality ---
        handlers::quality::create_control,
        handlers::quality::list_controls,
        handlers::quality::get_control,

        // --- Entities ---
        handlers::entities::create_entity,
        handlers::entities::list_entities,
        handlers::entities::get_entity_tree,
        handlers::entities::update_entity,
        handlers::entities::delete_entity,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- RBAC ---
            models::rbac::Resource,
            models::rbac::Action,
            models::rbac::Permission,
            models::rbac::Role,
            models::rbac::CreateRolePayload,
            models::rbac::UpdateRolePayload,

            // --- Workflows ---
            models::workflow::EntityType,
            models::workflow::ValidationStatus,
            models::workflow::WorkflowStep,
            models::workflow::Workflow,
            models::workflow::WorkflowValidation,
            models::workflow::WorkflowApproval,
            models::workflow::CreateWorkflowStep,
            models::workflow::CreateWorkflowPayload,
            models::workflow::SubmitForApprovalPayload,
            models::workflow::ApproveStepPayload,
            models::workflow::RejectStepPayload,
            models::workflow::SubmissionOutcome,
            models::workflow::StepOutcome,
            models::workflow::ValidationDetail,

            // --- Production ---
            models::production::ProductionOrder,
            models::production::CreateProductionOrderPayload,
            models::production::Formula,
            models::production::FormulaIngredient,
            models::production::FormulaDetail,
            models::production::CreateFormulaIngredient,
            models::production::CreateFormulaPayload,

            // --- Sales ---
            models::sales::Quote,
            models::sales::CreateQuotePayload,

            // --- Quality ---
            models::quality::QualityControl,
            models::quality::CreateQualityControlPayload,

            // --- Entities ---
            models::entities::OrgEntity,
            models::entities::EntityTree,
            models::entities::CreateEntityPayload,
            models::entities::UpdateEntityPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "RBAC", description = "Controle de Acesso (Cargos e Permissões)"),
        (name = "Workflows", description = "Workflows de Aprovação e Validações"),
        (name = "Production", description = "Ordens de Produção e Fórmulas"),
        (name = "Sales", description = "Cotações Comerciais"),
        (name = "Quality", description = "Controles de Qualidade"),
        (name = "Entities", description = "Hierarquia Organizacional")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
