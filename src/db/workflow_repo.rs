// src/db/workflow_repo.rs

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{Executor, FromRow, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::workflow::{
    EntityType, Workflow, WorkflowApproval, WorkflowStep, WorkflowValidation,
};

// Linhas cruas: entity_type e status chegam como texto e são promovidos
// para os enums na conversão (texto desconhecido é falha de dados, 500)
#[derive(FromRow)]
struct WorkflowRow {
    id: Uuid,
    name: String,
    entity_type: String,
    steps: Json<Vec<WorkflowStep>>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<WorkflowRow> for Workflow {
    type Error = AppError;

    fn try_from(row: WorkflowRow) -> Result<Self, Self::Error> {
        Ok(Workflow {
            id: row.id,
            name: row.name,
            entity_type: row.entity_type.parse()?,
            steps: row.steps.0,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct ValidationRow {
    id: Uuid,
    entity_id: Uuid,
    entity_type: String,
    workflow_id: Uuid,
    current_step: Uuid,
    status: String,
    submitted_by: Uuid,
    submitted_at: DateTime<Utc>,
    approved_at: Option<DateTime<Utc>>,
    rejected_at: Option<DateTime<Utc>>,
    rejected_by: Option<Uuid>,
    rejection_reason: Option<String>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ValidationRow> for WorkflowValidation {
    type Error = AppError;

    fn try_from(row: ValidationRow) -> Result<Self, Self::Error> {
        Ok(WorkflowValidation {
            id: row.id,
            entity_id: row.entity_id,
            entity_type: row.entity_type.parse()?,
            workflow_id: row.workflow_id,
            current_step: row.current_step,
            status: row.status.parse()?,
            submitted_by: row.submitted_by,
            submitted_at: row.submitted_at,
            approved_at: row.approved_at,
            rejected_at: row.rejected_at,
            rejected_by: row.rejected_by,
            rejection_reason: row.rejection_reason,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Clone)]
pub struct WorkflowRepository {
    pool: PgPool,
}

impl WorkflowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // --- Definições ---

    pub async fn insert_workflow(
        &self,
        name: &str,
        entity_type: EntityType,
        steps: &[WorkflowStep],
    ) -> Result<Workflow, AppError> {
        let row = sqlx::query_as::<_, WorkflowRow>(
            r#"
            INSERT INTO workflows (name, entity_type, steps, is_active)
            VALUES ($1, $2, $3, TRUE)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(entity_type.as_str())
        .bind(Json(steps))
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    // O ativo mais recente vence; ativos mais antigos do mesmo tipo ficam
    // silenciosamente mortos
    pub async fn find_active_for_entity(
        &self,
        entity_type: EntityType,
    ) -> Result<Option<Workflow>, AppError> {
        let row = sqlx::query_as::<_, WorkflowRow>(
            r#"
            SELECT * FROM workflows
            WHERE entity_type = $1 AND is_active = TRUE
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(entity_type.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Workflow::try_from).transpose()
    }

    pub async fn find_workflow_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Workflow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, WorkflowRow>("SELECT * FROM workflows WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        row.map(Workflow::try_from).transpose()
    }

    // --- Instâncias de validação ---

    pub async fn insert_validation(
        &self,
        entity_id: Uuid,
        entity_type: EntityType,
        workflow_id: Uuid,
        first_step: Uuid,
        submitted_by: Uuid,
    ) -> Result<WorkflowValidation, AppError> {
        let row = sqlx::query_as::<_, ValidationRow>(
            r#"
            INSERT INTO workflow_validations
                (entity_id, entity_type, workflow_id, current_step, status, submitted_by)
            VALUES ($1, $2, $3, $4, 'pending', $5)
            RETURNING *
            "#,
        )
        .bind(entity_id)
        .bind(entity_type.as_str())
        .bind(workflow_id)
        .bind(first_step)
        .bind(submitted_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Índice parcial: no máximo uma validação pendente por entidade
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict(
                        "Já existe uma validação pendente para esta entidade.".into(),
                    );
                }
            }
            e.into()
        })?;

        row.try_into()
    }

    pub async fn find_validation_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<WorkflowValidation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row =
            sqlx::query_as::<_, ValidationRow>("SELECT * FROM workflow_validations WHERE id = $1")
                .bind(id)
                .fetch_optional(executor)
                .await?;

        row.map(WorkflowValidation::try_from).transpose()
    }

    // --- Transições condicionais (o guard contra o avanço duplo) ---
    // Todas retornam o número de linhas afetadas: 0 significa que outra
    // chamada venceu a corrida ou a validação já saiu de 'pending'.

    pub async fn advance_current_step<'e, E>(
        &self,
        executor: E,
        validation_id: Uuid,
        from_step: Uuid,
        to_step: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE workflow_validations
            SET current_step = $1, updated_at = NOW()
            WHERE id = $2 AND status = 'pending' AND current_step = $3
            "#,
        )
        .bind(to_step)
        .bind(validation_id)
        .bind(from_step)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn finalize_approved<'e, E>(
        &self,
        executor: E,
        validation_id: Uuid,
        from_step: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE workflow_validations
            SET status = 'approved', approved_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND status = 'pending' AND current_step = $2
            "#,
        )
        .bind(validation_id)
        .bind(from_step)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn finalize_rejected<'e, E>(
        &self,
        executor: E,
        validation_id: Uuid,
        rejected_by: Uuid,
        reason: &str,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE workflow_validations
            SET status = 'rejected', rejected_at = NOW(), rejected_by = $1,
                rejection_reason = $2, updated_at = NOW()
            WHERE id = $3 AND status = 'pending'
            "#,
        )
        .bind(rejected_by)
        .bind(reason)
        .bind(validation_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    // --- Trilha de auditoria ---

    pub async fn insert_approval<'e, E>(
        &self,
        executor: E,
        validation_id: Uuid,
        step_id: Uuid,
        approved_by: Uuid,
        comments: Option<&str>,
    ) -> Result<WorkflowApproval, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let approval = sqlx::query_as::<_, WorkflowApproval>(
            r#"
            INSERT INTO workflow_approvals (validation_id, step_id, approved_by, comments)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(validation_id)
        .bind(step_id)
        .bind(approved_by)
        .bind(comments)
        .fetch_one(executor)
        .await?;

        Ok(approval)
    }

    pub async fn list_approvals(
        &self,
        validation_id: Uuid,
    ) -> Result<Vec<WorkflowApproval>, AppError> {
        let approvals = sqlx::query_as::<_, WorkflowApproval>(
            r#"
            SELECT * FROM workflow_approvals
            WHERE validation_id = $1
            ORDER BY approved_at
            "#,
        )
        .bind(validation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(approvals)
    }
}
