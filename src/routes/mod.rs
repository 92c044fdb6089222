pub mod route_routes;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::database::health_check;
use crate::middleware::cors_layer;
use crate::state::AppState;

/// Crear el router principal de la aplicación
pub fn create_app_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health))
        .nest("/api/routes", route_routes::create_route_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let timestamp = chrono::Utc::now().to_rfc3339();
    match health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "database": "up", "timestamp": timestamp })),
        ),
        Err(e) => {
            tracing::error!("❌ Health check falló: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "database": "down", "timestamp": timestamp })),
            )
        }
    }
}
