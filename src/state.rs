//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::PgRouteStore;
use crate::services::RouteCompositionService;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub route_service: RouteCompositionService<PgRouteStore>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let store = Arc::new(PgRouteStore::new(pool.clone()));
        Self {
            pool,
            config,
            route_service: RouteCompositionService::new(store),
        }
    }
}
