// src/db/entity_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::entities::{OrgEntity, UpdateEntityPayload};

#[derive(Clone)]
pub struct EntityRepository {
    pool: PgPool,
}

impl EntityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        name: &str,
        kind: &str,
        parent_id: Option<Uuid>,
        address: Option<&str>,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> Result<OrgEntity, AppError> {
        let entity = sqlx::query_as::<_, OrgEntity>(
            r#"
            INSERT INTO entities (name, type, parent_id, address, phone, email)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(kind)
        .bind(parent_id)
        .bind(address)
        .bind(phone)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(entity)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<OrgEntity>, AppError> {
        let entity = sqlx::query_as::<_, OrgEntity>("SELECT * FROM entities WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(entity)
    }

    pub async fn list_all(&self) -> Result<Vec<OrgEntity>, AppError> {
        let entities = sqlx::query_as::<_, OrgEntity>("SELECT * FROM entities ORDER BY type, name")
            .fetch_all(&self.pool)
            .await?;

        Ok(entities)
    }

    pub async fn list_by_type(&self, kind: &str) -> Result<Vec<OrgEntity>, AppError> {
        let entities =
            sqlx::query_as::<_, OrgEntity>("SELECT * FROM entities WHERE type = $1 ORDER BY name")
                .bind(kind)
                .fetch_all(&self.pool)
                .await?;

        Ok(entities)
    }

    pub async fn list_children(&self, parent_id: Uuid) -> Result<Vec<OrgEntity>, AppError> {
        let entities = sqlx::query_as::<_, OrgEntity>(
            "SELECT * FROM entities WHERE parent_id = $1 ORDER BY name",
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entities)
    }

    // Atualização parcial via COALESCE: campos ausentes permanecem
    pub async fn update(
        &self,
        id: Uuid,
        changes: &UpdateEntityPayload,
    ) -> Result<OrgEntity, AppError> {
        sqlx::query_as::<_, OrgEntity>(
            r#"
            UPDATE entities
            SET name = COALESCE($1, name),
                type = COALESCE($2, type),
                parent_id = COALESCE($3, parent_id),
                address = COALESCE($4, address),
                phone = COALESCE($5, phone),
                email = COALESCE($6, email),
                updated_at = NOW()
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(changes.name.as_deref())
        .bind(changes.kind.as_deref())
        .bind(changes.parent_id)
        .bind(changes.address.as_deref())
        .bind(changes.phone.as_deref())
        .bind(changes.email.as_deref())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Entidade não encontrada.".into()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM entities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn count_children(&self, parent_id: Uuid) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM entities WHERE parent_id = $1")
                .bind(parent_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
