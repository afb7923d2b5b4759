// src/models/rbac.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ---
// Recurso protegido (substantivo): newtype aberto sobre String.
// Strings desconhecidas são aceitas, só nunca casam com nada.
// ---
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "production")]
pub struct Resource(pub String);

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Resource {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

// ---
// Ação (verbo): enum fechado. O catálogo é congelado, então um typo
// de ação vira erro 400 já na desserialização do payload.
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    Approve,
    Resolve,
    Export,
    // O curinga: concede todas as ações sobre o recurso
    #[serde(rename = "*")]
    Wildcard,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Approve => "approve",
            Action::Resolve => "resolve",
            Action::Export => "export",
            Action::Wildcard => "*",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---
// Permissão: um recurso + o conjunto de ações concedidas.
// Nunca persiste sozinha; vive embutida na lista JSONB do cargo.
// ---
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Permission {
    pub resource: Resource,
    #[schema(example = json!(["read", "update"]))]
    pub actions: Vec<Action>,
}

impl Permission {
    pub fn new(resource: &str, actions: &[Action]) -> Self {
        Self { resource: Resource::from(resource), actions: actions.to_vec() }
    }

    // Concede a ação pedida? O curinga cobre qualquer ação.
    pub fn allows(&self, action: Action) -> bool {
        self.actions.iter().any(|a| *a == action || *a == Action::Wildcard)
    }
}

// ---
// Catálogo de permissões: a enumeração fixa de (recurso, ações) que o
// sistema reconhece. É um valor injetado na inicialização (fica no
// AppState), não um static de módulo, para poder ser trocado em teste.
// ---
#[derive(Debug, Clone)]
pub struct PermissionCatalog {
    entries: Vec<Permission>,
}

impl PermissionCatalog {
    pub fn new(entries: Vec<Permission>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Permission] {
        &self.entries
    }

    pub fn to_vec(&self) -> Vec<Permission> {
        self.entries.clone()
    }

    pub fn contains_resource(&self, resource: &Resource) -> bool {
        self.entries.iter().any(|p| p.resource == *resource)
    }
}

impl Default for PermissionCatalog {
    fn default() -> Self {
        use Action::*;

        let crud = [Create, Read, Update, Delete];
        let crud_approve = [Create, Read, Update, Delete, Approve];

        Self::new(vec![
            // Produção
            Permission::new("production", &crud_approve),
            Permission::new("formulas", &crud_approve),
            Permission::new("production_orders", &crud_approve),
            // Qualidade
            Permission::new("quality", &crud_approve),
            Permission::new("quality_controls", &crud),
            Permission::new("non_conformities", &[Create, Read, Update, Delete, Resolve]),
            // Estoque
            Permission::new("inventory", &crud),
            Permission::new("stock_movements", &[Create, Read, Update]),
            // Vendas
            Permission::new("sales", &crud_approve),
            Permission::new("quotes", &crud_approve),
            Permission::new("orders", &crud_approve),
            Permission::new("customers", &crud),
            // Custos e relatórios
            Permission::new("costs", &[Read, Update]),
            Permission::new("reports", &[Read, Export]),
            // Manutenção
            Permission::new("maintenance", &crud),
            Permission::new("equipment", &crud),
            // Logística
            Permission::new("deliveries", &crud),
            Permission::new("vehicles", &crud),
            // Agropole
            Permission::new("agropole", &crud),
            Permission::new("sites", &crud),
            Permission::new("parcels", &crud),
            // Administração
            Permission::new("users", &crud),
            Permission::new("roles", &crud),
            Permission::new("entities", &crud),
            Permission::new("settings", &[Read, Update]),
        ])
    }
}

// ---
// Cargo (tabela roles): permissões embutidas em JSONB
// ---
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    #[schema(example = "production_manager")]
    pub name: String,

    #[schema(example = "Responsável de produção")]
    pub description: Option<String>,

    pub permissions: Vec<Permission>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// O payload para criar um cargo
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRolePayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "quality_controller")]
    pub name: String,

    pub description: Option<String>,

    #[schema(example = json!([{"resource": "quality", "actions": ["*"]}]))]
    pub permissions: Vec<Permission>,
}

// Atualização: substituição integral dos três campos mutáveis
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRolePayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    pub description: Option<String>,

    pub permissions: Vec<Permission>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curinga_concede_qualquer_acao() {
        let perm = Permission::new("sales", &[Action::Wildcard]);

        assert!(perm.allows(Action::Create));
        assert!(perm.allows(Action::Read));
        assert!(perm.allows(Action::Delete));
        assert!(perm.allows(Action::Export));
    }

    #[test]
    fn acao_fora_da_lista_e_negada() {
        let perm = Permission::new("production", &[Action::Read, Action::Update]);

        assert!(perm.allows(Action::Update));
        assert!(!perm.allows(Action::Delete));
    }

    #[test]
    fn serde_do_curinga_usa_asterisco() {
        let json = serde_json::to_string(&Action::Wildcard).unwrap();
        assert_eq!(json, r#""*""#);

        let back: Action = serde_json::from_str(r#""*""#).unwrap();
        assert_eq!(back, Action::Wildcard);
    }

    #[test]
    fn acao_desconhecida_falha_na_desserializacao() {
        let result: Result<Action, _> = serde_json::from_str(r#""destroy""#);
        assert!(result.is_err());
    }

    #[test]
    fn catalogo_padrao_cobre_os_recursos_administrativos() {
        let catalog = PermissionCatalog::default();

        for resource in ["production", "quotes", "roles", "entities", "settings"] {
            assert!(
                catalog.contains_resource(&Resource::from(resource)),
                "recurso ausente do catálogo: {resource}"
            );
        }
    }
}
