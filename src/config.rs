// src/config.rs

use std::sync::Arc;
use std::{env, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::db::{
    EntityRepository, ProductionRepository, QualityRepository, RbacRepository, SalesRepository,
    UserRepository, WorkflowRepository,
};
use crate::models::rbac::PermissionCatalog;
use crate::services::{
    auth::AuthService, entity_service::EntityService, production_service::ProductionService,
    quality_service::QualityService, rbac_service::RbacService, sales_service::SalesService,
    status_sink::EntityStatusRegistry, workflow_service::WorkflowService,
};

// O estado compartilhado, acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub rbac_service: RbacService,
    pub workflow_service: WorkflowService,
    pub production_service: ProductionService,
    pub sales_service: SalesService,
    pub quality_service: QualityService,
    pub entity_service: EntityService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // O catálogo de permissões é um valor injetado aqui, não um
        // static: um teste pode montar o estado com outro catálogo
        Ok(Self::build(db_pool, jwt_secret, PermissionCatalog::default()))
    }

    // --- Monta o gráfico de dependências ---
    pub fn build(db_pool: PgPool, jwt_secret: String, catalog: PermissionCatalog) -> Self {
        let catalog = Arc::new(catalog);

        let user_repo = UserRepository::new(db_pool.clone());
        let rbac_repo = RbacRepository::new(db_pool.clone());
        let workflow_repo = WorkflowRepository::new(db_pool.clone());
        let production_repo = ProductionRepository::new(db_pool.clone());
        let sales_repo = SalesRepository::new(db_pool.clone());
        let quality_repo = QualityRepository::new(db_pool.clone());
        let entity_repo = EntityRepository::new(db_pool.clone());

        // Um atualizador de status registrado por tipo de entidade
        // governada
        let registry = Arc::new(EntityStatusRegistry::with_defaults());

        let auth_service = AuthService::new(user_repo.clone(), jwt_secret);
        let rbac_service = RbacService::new(rbac_repo, user_repo, catalog);
        let workflow_service = WorkflowService::new(workflow_repo, registry, db_pool.clone());
        let production_service = ProductionService::new(production_repo, db_pool.clone());
        let sales_service = SalesService::new(sales_repo);
        let quality_service = QualityService::new(quality_repo);
        let entity_service = EntityService::new(entity_repo);

        Self {
            db_pool,
            auth_service,
            rbac_service,
            workflow_service,
            production_service,
            sales_service,
            quality_service,
            entity_service,
        }
    }
}
