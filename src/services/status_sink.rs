// src/services/status_sink.rs

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::workflow::{EntityType, ValidationStatus};

// ---
// O contrato que a máquina de aprovação usa para gravar o desfecho no
// campo status da entidade de negócio governada. O método recebe a
// conexão da transação em curso: a transição da validação e a escrita
// do status entram juntas ou nenhuma das duas entra.
// ---
#[async_trait]
pub trait EntityStatusUpdater: Send + Sync {
    fn entity_type(&self) -> EntityType;

    async fn apply(
        &self,
        conn: &mut PgConnection,
        entity_id: Uuid,
        status: ValidationStatus,
    ) -> Result<(), AppError>;
}

// Atualizador genérico por tabela: todas as entidades governadas seguem
// o mesmo padrão (coluna status + updated_at).
pub struct TableStatusUpdater {
    entity_type: EntityType,
    table: &'static str,
    not_found: &'static str,
}

impl TableStatusUpdater {
    pub fn production_orders() -> Self {
        Self {
            entity_type: EntityType::ProductionOrder,
            table: "production_orders",
            not_found: "Ordem de produção não encontrada.",
        }
    }

    pub fn quotes() -> Self {
        Self {
            entity_type: EntityType::Quote,
            table: "quotes",
            not_found: "Cotação não encontrada.",
        }
    }

    pub fn quality_controls() -> Self {
        Self {
            entity_type: EntityType::QualityControl,
            table: "quality_controls",
            not_found: "Controle de qualidade não encontrado.",
        }
    }
}

#[async_trait]
impl EntityStatusUpdater for TableStatusUpdater {
    fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    async fn apply(
        &self,
        conn: &mut PgConnection,
        entity_id: Uuid,
        status: ValidationStatus,
    ) -> Result<(), AppError> {
        // `table` é um literal conhecido em compile-time, nunca entrada
        // do usuário
        let sql =
            format!("UPDATE {} SET status = $1, updated_at = NOW() WHERE id = $2", self.table);

        let result = sqlx::query(&sql)
            .bind(status.as_str())
            .bind(entity_id)
            .execute(&mut *conn)
            .await?;

        // Entidade sumiu por baixo da validação: falha e desfaz a
        // transição inteira, senão aprovação e negócio divergem
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(self.not_found.to_string()));
        }

        Ok(())
    }
}

// ---
// Registro por tipo de entidade: tipos novos entram por registro,
// não editando um switch central.
// ---
#[derive(Clone, Default)]
pub struct EntityStatusRegistry {
    updaters: HashMap<EntityType, Arc<dyn EntityStatusUpdater>>,
}

impl EntityStatusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // O registro completo usado em produção: um atualizador por tipo
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(TableStatusUpdater::production_orders()));
        registry.register(Arc::new(TableStatusUpdater::quotes()));
        registry.register(Arc::new(TableStatusUpdater::quality_controls()));
        registry
    }

    pub fn register(&mut self, updater: Arc<dyn EntityStatusUpdater>) {
        self.updaters.insert(updater.entity_type(), updater);
    }

    // Tipo sem atualizador registrado é falha de configuração (500),
    // nunca ignorada em silêncio
    pub fn get(
        &self,
        entity_type: EntityType,
    ) -> Result<&Arc<dyn EntityStatusUpdater>, AppError> {
        self.updaters
            .get(&entity_type)
            .ok_or_else(|| AppError::UnsupportedEntityType(entity_type.to_string()))
    }

    pub async fn apply(
        &self,
        conn: &mut PgConnection,
        entity_type: EntityType,
        entity_id: Uuid,
        status: ValidationStatus,
    ) -> Result<(), AppError> {
        self.get(entity_type)?.apply(conn, entity_id, status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registro_vazio_rejeita_qualquer_tipo() {
        let registry = EntityStatusRegistry::new();

        let err = registry.get(EntityType::Quote).err().unwrap();
        assert!(matches!(err, AppError::UnsupportedEntityType(t) if t == "quote"));
    }

    #[test]
    fn registro_padrao_cobre_todos_os_tipos_governados() {
        let registry = EntityStatusRegistry::with_defaults();

        for entity_type in EntityType::ALL {
            assert!(registry.get(entity_type).is_ok(), "sem atualizador para {entity_type}");
        }
    }

    #[test]
    fn registrar_de_novo_substitui_o_atualizador_do_tipo() {
        let mut registry = EntityStatusRegistry::new();
        registry.register(Arc::new(TableStatusUpdater::quotes()));
        registry.register(Arc::new(TableStatusUpdater::quotes()));

        assert!(registry.get(EntityType::Quote).is_ok());
        assert!(registry.get(EntityType::ProductionOrder).is_err());
    }
}
