// src/models/workflow.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;

// ---
// Tipo de entidade governada por workflow. Conjunto fechado: cada
// variante precisa de um atualizador de status registrado no sink.
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    ProductionOrder,
    Quote,
    QualityControl,
}

impl EntityType {
    pub const ALL: [EntityType; 3] =
        [EntityType::ProductionOrder, EntityType::Quote, EntityType::QualityControl];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::ProductionOrder => "production_order",
            EntityType::Quote => "quote",
            EntityType::QualityControl => "quality_control",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "production_order" => Ok(EntityType::ProductionOrder),
            "quote" => Ok(EntityType::Quote),
            "quality_control" => Ok(EntityType::QualityControl),
            other => Err(AppError::UnsupportedEntityType(other.to_string())),
        }
    }
}

// ---
// Status de uma instância de validação. `approved` e `rejected` são
// terminais: nenhuma transição sai deles.
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ValidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Pending => "pending",
            ValidationStatus::Approved => "approved",
            ValidationStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ValidationStatus::Pending)
    }
}

impl FromStr for ValidationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ValidationStatus::Pending),
            "approved" => Ok(ValidationStatus::Approved),
            "rejected" => Ok(ValidationStatus::Rejected),
            other => Err(AppError::BadRequest(format!("Status de validação inválido: {other}"))),
        }
    }
}

// ---
// Etapa de aprovação. Imutável depois que o workflow é criado.
// ---
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorkflowStep {
    pub id: Uuid,

    #[schema(example = "Aprovação do responsável comercial")]
    pub name: String,

    // Posição na sequência (define a ordem de aprovação)
    #[schema(example = 1)]
    pub order: i32,

    #[schema(example = "sales_manager")]
    pub approver_role: String,

    pub is_required: bool,
    pub can_reject: bool,
}

// Resultado da consulta "qual é a próxima etapa depois desta?"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAdvance {
    // Ainda há etapas: avança para esta
    Next(Uuid),
    // Era a última etapa: a validação finaliza aprovada
    Final,
}

// ---
// Definição de workflow (tabela workflows, etapas em JSONB)
// ---
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub id: Uuid,

    #[schema(example = "Aprovação de cotações")]
    pub name: String,

    pub entity_type: EntityType,

    pub steps: Vec<WorkflowStep>,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,
}

impl Workflow {
    pub fn find_step(&self, step_id: Uuid) -> Option<&WorkflowStep> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    pub fn first_step(&self) -> Option<&WorkflowStep> {
        self.steps.first()
    }

    // None = a etapa não pertence a este workflow
    pub fn advance_from(&self, step_id: Uuid) -> Option<StepAdvance> {
        let position = self.steps.iter().position(|s| s.id == step_id)?;

        match self.steps.get(position + 1) {
            Some(next) => Some(StepAdvance::Next(next.id)),
            None => Some(StepAdvance::Final),
        }
    }
}

// ---
// Instância de aprovação (tabela workflow_validations)
// ---
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowValidation {
    pub id: Uuid,
    pub entity_id: Uuid,
    pub entity_type: EntityType,
    pub workflow_id: Uuid,
    pub current_step: Uuid,
    pub status: ValidationStatus,
    pub submitted_by: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<Uuid>,
    pub rejection_reason: Option<String>,
    pub updated_at: DateTime<Utc>,
}

// ---
// Registro de auditoria: uma linha por aprovação de etapa (append-only)
// ---
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowApproval {
    pub id: Uuid,
    pub validation_id: Uuid,
    pub step_id: Uuid,
    pub approved_by: Uuid,
    pub comments: Option<String>,
    pub approved_at: DateTime<Utc>,
}

// ---
// Payloads
// ---

// Etapa ainda sem id: o serviço atribui o UUID e ordena por `order`
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateWorkflowStep {
    pub name: String,

    #[schema(example = 1)]
    pub order: i32,

    #[schema(example = "sales_manager")]
    pub approver_role: String,

    #[serde(default = "default_true")]
    pub is_required: bool,

    #[serde(default = "default_true")]
    pub can_reject: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkflowPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    pub entity_type: EntityType,

    pub steps: Vec<CreateWorkflowStep>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitForApprovalPayload {
    pub entity_id: Uuid,
    pub entity_type: EntityType,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApproveStepPayload {
    #[schema(example = "Dentro do orçamento, ok.")]
    pub comments: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RejectStepPayload {
    #[validate(length(min = 1, message = "A razão do rejeito é obrigatória."))]
    #[schema(example = "Preço abaixo do mínimo aprovado.")]
    pub reason: String,
}

// ---
// Retornos da máquina de aprovação
// ---

// Submissão: ou cai no bypass (sem workflow/etapas -> aprovado direto,
// nenhuma linha criada) ou abre uma validação pendente na primeira etapa.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOutcome {
    pub status: ValidationStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_id: Option<Uuid>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_step: Option<Uuid>,
}

impl SubmissionOutcome {
    pub fn bypass() -> Self {
        Self { status: ValidationStatus::Approved, validation_id: None, current_step: None }
    }

    pub fn pending(validation_id: Uuid, current_step: Uuid) -> Self {
        Self {
            status: ValidationStatus::Pending,
            validation_id: Some(validation_id),
            current_step: Some(current_step),
        }
    }
}

// Aprovação de etapa: pendente com próxima etapa, ou aprovação final
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepOutcome {
    pub status: ValidationStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_step: Option<Uuid>,
}

// Validação + trilha de auditoria (consulta de acompanhamento)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationDetail {
    #[serde(flatten)]
    pub validation: WorkflowValidation,

    pub approvals: Vec<WorkflowApproval>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(order: i32) -> WorkflowStep {
        WorkflowStep {
            id: Uuid::new_v4(),
            name: format!("Etapa {order}"),
            order,
            approver_role: "sales_manager".to_string(),
            is_required: true,
            can_reject: true,
        }
    }

    fn workflow_with_steps(steps: Vec<WorkflowStep>) -> Workflow {
        Workflow {
            id: Uuid::new_v4(),
            name: "Aprovação de cotações".to_string(),
            entity_type: EntityType::Quote,
            steps,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn avanco_sequencial_ate_a_etapa_final() {
        let s1 = step(1);
        let s2 = step(2);
        let s3 = step(3);
        let (id1, id2, id3) = (s1.id, s2.id, s3.id);
        let wf = workflow_with_steps(vec![s1, s2, s3]);

        assert_eq!(wf.advance_from(id1), Some(StepAdvance::Next(id2)));
        assert_eq!(wf.advance_from(id2), Some(StepAdvance::Next(id3)));
        assert_eq!(wf.advance_from(id3), Some(StepAdvance::Final));
    }

    #[test]
    fn etapa_desconhecida_nao_avanca() {
        let s1 = step(1);
        let wf = workflow_with_steps(vec![s1]);

        assert_eq!(wf.advance_from(Uuid::new_v4()), None);
    }

    #[test]
    fn workflow_de_etapa_unica_finaliza_direto() {
        let s1 = step(1);
        let id1 = s1.id;
        let wf = workflow_with_steps(vec![s1]);

        assert_eq!(wf.advance_from(id1), Some(StepAdvance::Final));
        assert!(wf.first_step().is_some());
    }

    #[test]
    fn status_terminais_sao_congelados() {
        assert!(!ValidationStatus::Pending.is_terminal());
        assert!(ValidationStatus::Approved.is_terminal());
        assert!(ValidationStatus::Rejected.is_terminal());
    }

    #[test]
    fn desfecho_de_bypass_omite_os_campos_da_validacao() {
        let json = serde_json::to_value(SubmissionOutcome::bypass()).unwrap();
        assert_eq!(json, serde_json::json!({"status": "approved"}));
    }

    #[test]
    fn desfecho_pendente_expoe_validacao_e_etapa_em_camel_case() {
        let (validation_id, step_id) = (Uuid::new_v4(), Uuid::new_v4());
        let json = serde_json::to_value(SubmissionOutcome::pending(validation_id, step_id)).unwrap();

        assert_eq!(json["status"], "pending");
        assert_eq!(json["validationId"], serde_json::json!(validation_id));
        assert_eq!(json["currentStep"], serde_json::json!(step_id));
    }

    #[test]
    fn aprovacao_intermediaria_carrega_a_proxima_etapa() {
        let next = Uuid::new_v4();
        let outcome = StepOutcome { status: ValidationStatus::Pending, next_step: Some(next) };
        let json = serde_json::to_value(outcome).unwrap();

        assert_eq!(json["status"], "pending");
        assert_eq!(json["nextStep"], serde_json::json!(next));

        let terminal = StepOutcome { status: ValidationStatus::Approved, next_step: None };
        let json = serde_json::to_value(terminal).unwrap();
        assert!(json.get("nextStep").is_none());
    }

    #[test]
    fn entity_type_roundtrip_em_snake_case() {
        assert_eq!(EntityType::ProductionOrder.as_str(), "production_order");
        assert_eq!("quality_control".parse::<EntityType>().unwrap(), EntityType::QualityControl);
        assert!("invoice".parse::<EntityType>().is_err());

        let json = serde_json::to_string(&EntityType::Quote).unwrap();
        assert_eq!(json, r#""quote""#);
    }
}
