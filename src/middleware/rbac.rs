// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::User,
    models::rbac::{Action, Resource},
    services::rbac_service::is_super_role,
};

/// 1. O Trait que define o que é uma Permissão exigida por uma rota
pub trait PermissionDef: Send + Sync + 'static {
    fn resource() -> &'static str;
    fn action() -> Action;
}

/// 2. O Extractor (Guardião)
pub struct RequirePermission<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        // A. Extrai o usuário (injetado pelo auth_guard)
        let user = parts.extensions.get::<User>().ok_or(AppError::Unauthenticated)?;

        // B. Decide no avaliador (fail-closed: erro interno nega)
        let resource = Resource::from(T::resource());
        let action = T::action();
        let granted = app_state.rbac_service.has_permission(user.id, &resource, action).await;

        if !granted {
            return Err(AppError::PermissionDenied(format!("{resource}:{action}")));
        }

        Ok(RequirePermission(PhantomData))
    }
}

// Portão grosso para as rotas administrativas: só os super-cargos passam
pub struct RequireAdmin;

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts.extensions.get::<User>().ok_or(AppError::Unauthenticated)?;

        if !is_super_role(&user.role) {
            return Err(AppError::PermissionDenied("acesso administrativo".into()));
        }

        Ok(RequireAdmin)
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

pub struct PermRolesCreate;
impl PermissionDef for PermRolesCreate {
    fn resource() -> &'static str {
        "roles"
    }
    fn action() -> Action {
        Action::Create
    }
}

pub struct PermRolesUpdate;
impl PermissionDef for PermRolesUpdate {
    fn resource() -> &'static str {
        "roles"
    }
    fn action() -> Action {
        Action::Update
    }
}

pub struct PermSettingsUpdate;
impl PermissionDef for PermSettingsUpdate {
    fn resource() -> &'static str {
        "settings"
    }
    fn action() -> Action {
        Action::Update
    }
}

pub struct PermProductionCreate;
impl PermissionDef for PermProductionCreate {
    fn resource() -> &'static str {
        "production"
    }
    fn action() -> Action {
        Action::Create
    }
}

pub struct PermProductionApprove;
impl PermissionDef for PermProductionApprove {
    fn resource() -> &'static str {
        "production"
    }
    fn action() -> Action {
        Action::Approve
    }
}
