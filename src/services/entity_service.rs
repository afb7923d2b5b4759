// src/services/entity_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::EntityRepository,
    models::entities::{CreateEntityPayload, EntityTree, OrgEntity, UpdateEntityPayload},
};

#[derive(Clone)]
pub struct EntityService {
    repo: EntityRepository,
}

impl EntityService {
    pub fn new(repo: EntityRepository) -> Self {
        Self { repo }
    }

    pub async fn create_entity(&self, payload: &CreateEntityPayload) -> Result<OrgEntity, AppError> {
        // Pai informado precisa existir
        if let Some(parent_id) = payload.parent_id {
            if self.repo.find_by_id(parent_id).await?.is_none() {
                return Err(AppError::BadRequest("A entidade pai não existe.".into()));
            }
        }

        self.repo
            .insert(
                &payload.name,
                &payload.kind,
                payload.parent_id,
                payload.address.as_deref(),
                payload.phone.as_deref(),
                payload.email.as_deref(),
            )
            .await
    }

    pub async fn list_entities(&self, kind: Option<&str>) -> Result<Vec<OrgEntity>, AppError> {
        match kind {
            Some(kind) => self.repo.list_by_type(kind).await,
            None => self.repo.list_all().await,
        }
    }

    // Subárvore de três níveis (entidade, filhos, netos), como a tela de
    // mapa consome
    pub async fn get_entity_tree(&self, id: Uuid) -> Result<EntityTree, AppError> {
        let entity = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Entidade não encontrada.".into()))?;

        let mut root = EntityTree { entity, children: Vec::new() };

        for child in self.repo.list_children(id).await? {
            let mut node = EntityTree { entity: child, children: Vec::new() };

            for grandchild in self.repo.list_children(node.entity.id).await? {
                node.children.push(EntityTree { entity: grandchild, children: Vec::new() });
            }

            root.children.push(node);
        }

        Ok(root)
    }

    pub async fn update_entity(
        &self,
        id: Uuid,
        changes: &UpdateEntityPayload,
    ) -> Result<OrgEntity, AppError> {
        self.repo.update(id, changes).await
    }

    // Remoção é recusada enquanto houver filhos
    pub async fn delete_entity(&self, id: Uuid) -> Result<(), AppError> {
        if self.repo.count_children(id).await? > 0 {
            return Err(AppError::Conflict(
                "Impossível remover uma entidade que ainda tem filhos.".into(),
            ));
        }

        let deleted = self.repo.delete(id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound("Entidade não encontrada.".into()));
        }

        Ok(())
    }
}
