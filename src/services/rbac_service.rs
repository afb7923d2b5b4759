// src/services/rbac_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::common::error::AppError;
use crate::db::{RbacRepository, UserRepository};
use crate::models::auth::User;
use crate::models::rbac::{Action, Permission, PermissionCatalog, Resource, Role};

// Os super-cargos de escape: sempre concedidos, mesmo sem linha na
// tabela roles
pub const SUPER_ROLES: [&str; 2] = ["admin", "super_admin"];

pub fn is_super_role(role: &str) -> bool {
    SUPER_ROLES.contains(&role)
}

// Decisão pura sobre dados já carregados:
// 1. Usuário inexistente ou inativo nega (fail-closed)
// 2. Super-cargo concede incondicionalmente
// 3. Cargo sem linha na tabela nega
// 4. Senão, varre a lista de permissões do cargo (primeiro match ganha)
fn decide(
    user: Option<&User>,
    role_permissions: Option<&[Permission]>,
    resource: &Resource,
    action: Action,
) -> bool {
    let Some(user) = user else {
        return false;
    };

    if !user.is_active {
        return false;
    }

    if is_super_role(&user.role) {
        return true;
    }

    let Some(permissions) = role_permissions else {
        return false;
    };

    permissions.iter().any(|p| p.resource == *resource && p.allows(action))
}

// Modelo de cargo padrão usado pela semeadura
struct RoleTemplate {
    name: &'static str,
    description: &'static str,
    permissions: Vec<Permission>,
}

// Os seis cargos semeados no deploy. super_admin/admin recebem '*' em
// cada recurso do catálogo; os demais carregam subconjuntos curados.
fn default_role_templates(catalog: &PermissionCatalog) -> Vec<RoleTemplate> {
    use Action::*;

    let full_access: Vec<Permission> = catalog
        .entries()
        .iter()
        .map(|p| Permission { resource: p.resource.clone(), actions: vec![Wildcard] })
        .collect();

    vec![
        RoleTemplate {
            name: "super_admin",
            description: "Super administrador com todos os acessos",
            permissions: full_access.clone(),
        },
        RoleTemplate {
            name: "admin",
            description: "Administrador",
            permissions: full_access,
        },
        RoleTemplate {
            name: "production_manager",
            description: "Responsável de produção",
            permissions: vec![
                Permission::new("production", &[Wildcard]),
                Permission::new("formulas", &[Wildcard]),
                Permission::new("production_orders", &[Wildcard]),
                Permission::new("quality", &[Read, Update]),
                Permission::new("inventory", &[Read]),
                Permission::new("reports", &[Read, Export]),
            ],
        },
        RoleTemplate {
            name: "quality_controller",
            description: "Controlador de qualidade",
            permissions: vec![
                Permission::new("quality", &[Wildcard]),
                Permission::new("quality_controls", &[Wildcard]),
                Permission::new("non_conformities", &[Wildcard]),
                Permission::new("production", &[Read]),
                Permission::new("reports", &[Read, Export]),
            ],
        },
        RoleTemplate {
            name: "sales_manager",
            description: "Responsável comercial",
            permissions: vec![
                Permission::new("sales", &[Wildcard]),
                Permission::new("quotes", &[Wildcard]),
                Permission::new("orders", &[Wildcard]),
                Permission::new("customers", &[Wildcard]),
                Permission::new("deliveries", &[Read]),
                Permission::new("reports", &[Read, Export]),
            ],
        },
        RoleTemplate {
            name: "operator",
            description: "Operador de produção",
            permissions: vec![
                Permission::new("production", &[Read, Update]),
                Permission::new("production_orders", &[Read, Update]),
                Permission::new("quality_controls", &[Create, Read]),
                Permission::new("inventory", &[Read]),
            ],
        },
    ]
}

#[derive(Clone)]
pub struct RbacService {
    repo: RbacRepository,
    user_repo: UserRepository,
    catalog: Arc<PermissionCatalog>,
}

impl RbacService {
    pub fn new(
        repo: RbacRepository,
        user_repo: UserRepository,
        catalog: Arc<PermissionCatalog>,
    ) -> Self {
        Self { repo, user_repo, catalog }
    }

    // ---
    // O avaliador de permissões
    // ---

    // Nunca propaga erro: o middleware depende de um booleano, não de
    // uma exceção. Erro de infraestrutura nega (fail-closed) e loga.
    pub async fn has_permission(&self, user_id: Uuid, resource: &Resource, action: Action) -> bool {
        match self.check_permission(user_id, resource, action).await {
            Ok(granted) => granted,
            Err(e) => {
                tracing::warn!("Falha ao verificar permissão {}:{}: {}", resource, action, e);
                false
            }
        }
    }

    async fn check_permission(
        &self,
        user_id: Uuid,
        resource: &Resource,
        action: Action,
    ) -> Result<bool, AppError> {
        let user = self.user_repo.find_by_id(user_id).await?;

        // Super-cargo decide sem consultar a tabela de cargos
        let role_permissions = match &user {
            Some(u) if u.is_active && !is_super_role(&u.role) => {
                self.repo.find_by_name(&u.role).await?.map(|r| r.permissions)
            }
            _ => None,
        };

        Ok(decide(user.as_ref(), role_permissions.as_deref(), resource, action))
    }

    // Super-cargos enxergam o catálogo inteiro, não a linha gravada:
    // assim o catálogo evolui sem reeditar o cargo admin no banco.
    pub async fn get_user_permissions(&self, user_id: Uuid) -> Result<Vec<Permission>, AppError> {
        let Some(user) = self.user_repo.find_by_id(user_id).await? else {
            return Ok(Vec::new());
        };

        if !user.is_active {
            return Ok(Vec::new());
        }

        if is_super_role(&user.role) {
            return Ok(self.catalog.to_vec());
        }

        let role = self.repo.find_by_name(&user.role).await?;
        Ok(role.map(|r| r.permissions).unwrap_or_default())
    }

    // ---
    // Gestão de cargos
    // ---

    pub async fn get_all_roles(&self) -> Result<Vec<Role>, AppError> {
        self.repo.list_all().await
    }

    pub async fn create_role(
        &self,
        name: &str,
        description: Option<&str>,
        permissions: &[Permission],
    ) -> Result<Role, AppError> {
        // Recurso fora do catálogo não é erro (nunca casa com nada),
        // mas quase sempre é typo: fica no log
        for perm in permissions {
            if !self.catalog.contains_resource(&perm.resource) {
                tracing::warn!(
                    "Cargo '{}' concede permissão sobre recurso fora do catálogo: {}",
                    name,
                    perm.resource
                );
            }
        }

        self.repo.insert(name, description, permissions).await
    }

    pub async fn update_role(
        &self,
        id: Uuid,
        name: &str,
        description: Option<&str>,
        permissions: &[Permission],
    ) -> Result<Role, AppError> {
        self.repo.update(id, name, description, permissions).await
    }

    // Semeadura idempotente: cargo que já existe (inclusive editado à
    // mão) fica intocado; só os ausentes são criados. Retorna os nomes
    // criados nesta execução.
    pub async fn initialize_default_roles(&self) -> Result<Vec<String>, AppError> {
        let mut created = Vec::new();

        for template in default_role_templates(&self.catalog) {
            if self.repo.find_by_name(template.name).await?.is_some() {
                continue;
            }

            self.repo
                .insert(template.name, Some(template.description), &template.permissions)
                .await?;
            created.push(template.name.to_string());
        }

        if !created.is_empty() {
            tracing::info!("🌱 Cargos padrão criados: {}", created.join(", "));
        }

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(role: &str, is_active: bool) -> User {
        User {
            id: Uuid::new_v4(),
            email: "teste@malao.com".to_string(),
            password_hash: "$2b$10$hash".to_string(),
            first_name: "Maria".to_string(),
            last_name: "Camara".to_string(),
            role: role.to_string(),
            is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn usuario_inativo_e_negado_mesmo_com_curinga() {
        let u = user("operator", false);
        let perms = vec![Permission::new("production", &[Action::Wildcard])];

        assert!(!decide(
            Some(&u),
            Some(&perms),
            &Resource::from("production"),
            Action::Read
        ));
    }

    #[test]
    fn usuario_inexistente_e_negado() {
        assert!(!decide(None, None, &Resource::from("production"), Action::Read));
    }

    #[test]
    fn super_cargo_concede_sem_linha_na_tabela() {
        for role in SUPER_ROLES {
            let u = user(role, true);

            assert!(decide(Some(&u), None, &Resource::from("qualquer"), Action::Delete));
        }
    }

    #[test]
    fn cargo_sem_linha_na_tabela_e_negado() {
        let u = user("fantasma", true);

        assert!(!decide(Some(&u), None, &Resource::from("production"), Action::Read));
    }

    #[test]
    fn operador_atualiza_producao_mas_nao_apaga() {
        let u = user("operator", true);
        let perms = vec![Permission::new("production", &[Action::Read, Action::Update])];
        let resource = Resource::from("production");

        assert!(decide(Some(&u), Some(&perms), &resource, Action::Update));
        assert!(!decide(Some(&u), Some(&perms), &resource, Action::Delete));
    }

    #[test]
    fn curinga_no_cargo_concede_toda_acao_do_recurso() {
        let u = user("sales_manager", true);
        let perms = vec![Permission::new("sales", &[Action::Wildcard])];
        let resource = Resource::from("sales");

        for action in [Action::Create, Action::Read, Action::Approve, Action::Export] {
            assert!(decide(Some(&u), Some(&perms), &resource, action));
        }
    }

    #[test]
    fn recurso_diferente_nao_casa() {
        let u = user("operator", true);
        let perms = vec![Permission::new("production", &[Action::Wildcard])];

        assert!(!decide(Some(&u), Some(&perms), &Resource::from("sales"), Action::Read));
    }

    #[test]
    fn modelos_padrao_cobrem_os_seis_cargos() {
        let catalog = PermissionCatalog::default();
        let templates = default_role_templates(&catalog);

        let names: Vec<&str> = templates.iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec![
                "super_admin",
                "admin",
                "production_manager",
                "quality_controller",
                "sales_manager",
                "operator"
            ]
        );
    }

    #[test]
    fn super_admin_recebe_curinga_em_cada_recurso_do_catalogo() {
        let catalog = PermissionCatalog::default();
        let templates = default_role_templates(&catalog);
        let super_admin = &templates[0];

        assert_eq!(super_admin.permissions.len(), catalog.entries().len());
        for perm in &super_admin.permissions {
            assert_eq!(perm.actions, vec![Action::Wildcard]);
            assert!(catalog.contains_resource(&perm.resource));
        }
    }

    #[test]
    fn cargos_curados_so_citam_recursos_do_catalogo() {
        let catalog = PermissionCatalog::default();

        for template in default_role_templates(&catalog) {
            for perm in &template.permissions {
                assert!(
                    catalog.contains_resource(&perm.resource),
                    "cargo {} cita recurso fora do catálogo: {}",
                    template.name,
                    perm.resource
                );
            }
        }
    }
}
