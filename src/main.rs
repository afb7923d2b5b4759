//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

// Importações principais
use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não
    // deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação (públicas) + /me (protegida)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .merge(
            Router::new()
                .route("/me", get(handlers::auth::get_me))
                .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard)),
        );

    // RBAC: permissões do usuário + gestão de cargos
    let rbac_routes = Router::new()
        .route("/permissions", get(handlers::rbac::get_my_permissions))
        .route("/roles"
               ,get(handlers::rbac::get_all_roles)
               .post(handlers::rbac::create_role)
        )
        .route("/roles/initialize", post(handlers::rbac::initialize_roles))
        .route("/roles/{id}", put(handlers::rbac::update_role))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // Workflows de aprovação
    let workflow_routes = Router::new()
        .route("/", post(handlers::workflow::create_workflow))
        .route("/submit", post(handlers::workflow::submit_for_approval))
        .route("/validations/{validation_id}", get(handlers::workflow::get_validation))
        .route("/{entity_type}", get(handlers::workflow::get_workflow))
        .route(
            "/{validation_id}/approve/{step_id}",
            post(handlers::workflow::approve_step),
        )
        .route(
            "/{validation_id}/reject/{step_id}",
            post(handlers::workflow::reject_step),
        )
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // Produção: ordens e fórmulas
    let production_routes = Router::new()
        .route("/orders"
               ,post(handlers::production::create_order)
               .get(handlers::production::list_orders)
        )
        .route("/orders/{id}", get(handlers::production::get_order))
        .route("/formulas"
               ,post(handlers::production::create_formula)
               .get(handlers::production::list_formulas)
        )
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // Vendas: cotações
    let sales_routes = Router::new()
        .route("/quotes"
               ,post(handlers::sales::create_quote)
               .get(handlers::sales::list_quotes)
        )
        .route("/quotes/{id}", get(handlers::sales::get_quote))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // Qualidade: controles
    let quality_routes = Router::new()
        .route("/controls"
               ,post(handlers::quality::create_control)
               .get(handlers::quality::list_controls)
        )
        .route("/controls/{id}", get(handlers::quality::get_control))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // Hierarquia organizacional
    let entity_routes = Router::new()
        .route("/"
               ,post(handlers::entities::create_entity)
               .get(handlers::entities::list_entities)
        )
        .route("/{id}/tree", get(handlers::entities::get_entity_tree))
        .route("/{id}"
               ,put(handlers::entities::update_entity)
               .delete(handlers::entities::delete_entity)
        )
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/rbac", rbac_routes)
        .nest("/api/v1/workflows", workflow_routes)
        .nest("/api/v1/production", production_routes)
        .nest("/api/v1/sales", sales_routes)
        .nest("/api/v1/quality", quality_routes)
        .nest("/api/v1/entities", entity_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
