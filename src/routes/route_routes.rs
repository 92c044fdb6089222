use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use crate::controllers::route_controller::RouteController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::route_dto::{
    CreateCompoundRouteRequest, CreateSimpleRouteRequest, UpdateCompoundSegmentsRequest,
};
use crate::models::{Route, RouteFilters, RoutePage, RouteWithDetails, SegmentDetail};
use crate::state::AppState;
use crate::utils::errors::AppError;
use uuid::Uuid;

pub fn create_route_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_routes))
        .route("/simple", post(create_simple_route))
        .route("/compound", post(create_compound_route))
        .route(
            "/compound/:id/segments",
            get(get_compound_segments).put(update_compound_segments),
        )
        .route("/:id", get(get_route).delete(delete_route))
}

fn controller(state: &AppState) -> RouteController<crate::repositories::PgRouteStore> {
    RouteController::new(state.route_service.clone())
}

async fn create_simple_route(
    State(state): State<AppState>,
    Json(request): Json<CreateSimpleRouteRequest>,
) -> Result<Json<ApiResponse<Route>>, AppError> {
    let response = controller(&state).create_simple(request).await?;
    Ok(Json(response))
}

async fn create_compound_route(
    State(state): State<AppState>,
    Json(request): Json<CreateCompoundRouteRequest>,
) -> Result<Json<ApiResponse<RouteWithDetails>>, AppError> {
    let response = controller(&state).create_compound(request).await?;
    Ok(Json(response))
}

async fn update_compound_segments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCompoundSegmentsRequest>,
) -> Result<Json<ApiResponse<RouteWithDetails>>, AppError> {
    let response = controller(&state).update_segments(id, request).await?;
    Ok(Json(response))
}

async fn get_compound_segments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<SegmentDetail>>, AppError> {
    let response = controller(&state).segments(id).await?;
    Ok(Json(response))
}

async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RouteWithDetails>, AppError> {
    let response = controller(&state).get_by_id(id).await?;
    Ok(Json(response))
}

async fn list_routes(
    State(state): State<AppState>,
    Query(filters): Query<RouteFilters>,
) -> Result<Json<RoutePage>, AppError> {
    let response = controller(&state).list(filters).await?;
    Ok(Json(response))
}

async fn delete_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    controller(&state).delete(id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Ruta eliminada exitosamente"
    })))
}
