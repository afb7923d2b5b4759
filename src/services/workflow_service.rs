// src/services/workflow_service.rs

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::db::WorkflowRepository;
use crate::models::workflow::{
    CreateWorkflowStep, EntityType, StepAdvance, StepOutcome, SubmissionOutcome, ValidationDetail,
    ValidationStatus, Workflow, WorkflowStep,
};
use crate::services::status_sink::EntityStatusRegistry;

// Normaliza as etapas recebidas no payload: os ids são atribuídos aqui
// e a sequência fica ordenada por `order`. Lista vazia continua legal
// (vira o caminho de bypass na submissão).
fn normalize_steps(steps: Vec<CreateWorkflowStep>) -> Vec<WorkflowStep> {
    let mut steps: Vec<WorkflowStep> = steps
        .into_iter()
        .map(|s| WorkflowStep {
            id: Uuid::new_v4(),
            name: s.name,
            order: s.order,
            approver_role: s.approver_role,
            is_required: s.is_required,
            can_reject: s.can_reject,
        })
        .collect();

    steps.sort_by_key(|s| s.order);
    steps
}

// Duas chamadas concorrentes sobre a mesma validação: a segunda perde a
// guarda condicional e cai aqui
fn concurrent_conflict() -> AppError {
    AppError::Conflict("A validação mudou durante a operação. Tente novamente.".into())
}

#[derive(Clone)]
pub struct WorkflowService {
    repo: WorkflowRepository,
    registry: Arc<EntityStatusRegistry>,
    pool: PgPool,
}

impl WorkflowService {
    pub fn new(repo: WorkflowRepository, registry: Arc<EntityStatusRegistry>, pool: PgPool) -> Self {
        Self { repo, registry, pool }
    }

    // ---
    // Definições
    // ---

    pub async fn create_workflow(
        &self,
        name: &str,
        entity_type: EntityType,
        steps: Vec<CreateWorkflowStep>,
    ) -> Result<Workflow, AppError> {
        let steps = normalize_steps(steps);
        self.repo.insert_workflow(name, entity_type, &steps).await
    }

    pub async fn get_workflow_for_entity(
        &self,
        entity_type: EntityType,
    ) -> Result<Option<Workflow>, AppError> {
        self.repo.find_active_for_entity(entity_type).await
    }

    // ---
    // A máquina de aprovação
    // ---

    // Sem workflow configurado (ou com lista de etapas vazia) a entidade
    // é tratada como já aprovada: nenhuma linha de validação é criada.
    pub async fn submit_for_approval(
        &self,
        entity_id: Uuid,
        entity_type: EntityType,
        submitted_by: Uuid,
    ) -> Result<SubmissionOutcome, AppError> {
        let Some(workflow) = self.repo.find_active_for_entity(entity_type).await? else {
            return Ok(SubmissionOutcome::bypass());
        };

        let Some(first) = workflow.first_step() else {
            return Ok(SubmissionOutcome::bypass());
        };

        let validation = self
            .repo
            .insert_validation(entity_id, entity_type, workflow.id, first.id, submitted_by)
            .await?;

        tracing::info!(
            "📋 Entidade {} ({}) submetida para aprovação: validação {}",
            entity_id,
            entity_type,
            validation.id
        );

        Ok(SubmissionOutcome::pending(validation.id, validation.current_step))
    }

    pub async fn approve_step(
        &self,
        validation_id: Uuid,
        step_id: Uuid,
        approved_by: Uuid,
        comments: Option<&str>,
    ) -> Result<StepOutcome, AppError> {
        // Transação única: auditoria + transição + status da entidade.
        // Qualquer retorno antecipado solta o tx e desfaz tudo.
        let mut tx = self.pool.begin().await?;

        // 1. Carrega a validação
        let validation = self
            .repo
            .find_validation_by_id(&mut *tx, validation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Validação não encontrada.".into()))?;

        // 2. Estados terminais são congelados
        if validation.status.is_terminal() {
            return Err(AppError::Conflict(format!(
                "Validação já finalizada ({}).",
                validation.status.as_str()
            )));
        }

        // 3. Carrega o workflow e localiza a etapa na sequência
        let workflow = self
            .repo
            .find_workflow_by_id(&mut *tx, validation.workflow_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Workflow não encontrado.".into()))?;

        let advance = workflow
            .advance_from(step_id)
            .ok_or_else(|| AppError::NotFound("Etapa não encontrada.".into()))?;

        // 4. Só a etapa corrente pode ser aprovada (aprovação fora de
        // sequência é rejeitada, não registrada)
        if step_id != validation.current_step {
            return Err(AppError::Conflict(
                "A etapa informada não é a etapa corrente da validação.".into(),
            ));
        }

        // 5. Trilha de auditoria
        self.repo
            .insert_approval(&mut *tx, validation_id, step_id, approved_by, comments)
            .await?;

        // 6. Avança ou finaliza, sempre com a guarda condicional
        let outcome = match advance {
            StepAdvance::Next(next_step) => {
                let updated = self
                    .repo
                    .advance_current_step(&mut *tx, validation_id, step_id, next_step)
                    .await?;
                if updated == 0 {
                    return Err(concurrent_conflict());
                }

                StepOutcome { status: ValidationStatus::Pending, next_step: Some(next_step) }
            }
            StepAdvance::Final => {
                let updated =
                    self.repo.finalize_approved(&mut *tx, validation_id, step_id).await?;
                if updated == 0 {
                    return Err(concurrent_conflict());
                }

                // O desfecho chega à entidade governada dentro da mesma
                // transação
                self.registry
                    .apply(
                        &mut *tx,
                        validation.entity_type,
                        validation.entity_id,
                        ValidationStatus::Approved,
                    )
                    .await?;

                tracing::info!(
                    "✅ Validação {} aprovada (entidade {} {})",
                    validation_id,
                    validation.entity_type,
                    validation.entity_id
                );

                StepOutcome { status: ValidationStatus::Approved, next_step: None }
            }
        };

        tx.commit().await?;

        Ok(outcome)
    }

    // Rejeição é sempre terminal e imediata, em qualquer posição da
    // sequência: etapas já aprovadas antes não mudam nada.
    pub async fn reject_step(
        &self,
        validation_id: Uuid,
        step_id: Uuid,
        rejected_by: Uuid,
        reason: &str,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let validation = self
            .repo
            .find_validation_by_id(&mut *tx, validation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Validação não encontrada.".into()))?;

        if validation.status.is_terminal() {
            return Err(AppError::Conflict(format!(
                "Validação já finalizada ({}).",
                validation.status.as_str()
            )));
        }

        let workflow = self
            .repo
            .find_workflow_by_id(&mut *tx, validation.workflow_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Workflow não encontrado.".into()))?;

        // Simetria com a aprovação: a etapa precisa existir no workflow
        if workflow.find_step(step_id).is_none() {
            return Err(AppError::NotFound("Etapa não encontrada.".into()));
        }

        let updated =
            self.repo.finalize_rejected(&mut *tx, validation_id, rejected_by, reason).await?;
        if updated == 0 {
            return Err(concurrent_conflict());
        }

        self.registry
            .apply(
                &mut *tx,
                validation.entity_type,
                validation.entity_id,
                ValidationStatus::Rejected,
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            "🚫 Validação {} rejeitada (entidade {} {})",
            validation_id,
            validation.entity_type,
            validation.entity_id
        );

        Ok(())
    }

    // Validação + trilha de auditoria, para as telas de acompanhamento
    pub async fn get_validation(&self, validation_id: Uuid) -> Result<ValidationDetail, AppError> {
        let validation = self
            .repo
            .find_validation_by_id(&self.pool, validation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Validação não encontrada.".into()))?;

        let approvals = self.repo.list_approvals(validation_id).await?;

        Ok(ValidationDetail { validation, approvals })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_step(name: &str, order: i32) -> CreateWorkflowStep {
        CreateWorkflowStep {
            name: name.to_string(),
            order,
            approver_role: "sales_manager".to_string(),
            is_required: true,
            can_reject: true,
        }
    }

    #[test]
    fn normalizacao_ordena_pelas_posicoes() {
        let steps = normalize_steps(vec![
            payload_step("Diretoria", 3),
            payload_step("Comercial", 1),
            payload_step("Financeiro", 2),
        ]);

        let names: Vec<&str> = steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Comercial", "Financeiro", "Diretoria"]);
    }

    #[test]
    fn normalizacao_atribui_ids_distintos() {
        let steps = normalize_steps(vec![payload_step("A", 1), payload_step("B", 2)]);

        assert_ne!(steps[0].id, steps[1].id);
    }

    #[test]
    fn normalizacao_preserva_lista_vazia() {
        assert!(normalize_steps(Vec::new()).is_empty());
    }
}
