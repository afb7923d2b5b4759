pub mod auth;
pub mod entity_service;
pub mod production_service;
pub mod quality_service;
pub mod rbac_service;
pub mod sales_service;
pub mod status_sink;
pub mod workflow_service;
