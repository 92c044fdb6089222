use crate::dto::common_dto::ApiResponse;
use crate::dto::route_dto::{
    CreateCompoundRouteRequest, CreateSimpleRouteRequest, UpdateCompoundSegmentsRequest,
};
use crate::models::{Route, RouteFilters, RoutePage, RouteWithDetails, SegmentDetail};
use crate::repositories::route_store::RouteStore;
use crate::services::RouteCompositionService;
use crate::utils::errors::AppError;
use uuid::Uuid;
use validator::Validate;

pub struct RouteController<S: RouteStore> {
    service: RouteCompositionService<S>,
}

impl<S: RouteStore> RouteController<S> {
    pub fn new(service: RouteCompositionService<S>) -> Self {
        Self { service }
    }

    pub async fn create_simple(
        &self,
        request: CreateSimpleRouteRequest,
    ) -> Result<ApiResponse<Route>, AppError> {
        request.validate()?;
        let route = self.service.create_simple_route(request).await?;

        Ok(ApiResponse::success_with_message(
            route,
            "Ruta simple creada exitosamente".to_string(),
        ))
    }

    pub async fn create_compound(
        &self,
        request: CreateCompoundRouteRequest,
    ) -> Result<ApiResponse<RouteWithDetails>, AppError> {
        request.validate()?;
        let route = self.service.create_compound_route(request).await?;

        Ok(ApiResponse::success_with_message(
            route,
            "Ruta compuesta creada exitosamente".to_string(),
        ))
    }

    pub async fn update_segments(
        &self,
        compound_route_id: Uuid,
        request: UpdateCompoundSegmentsRequest,
    ) -> Result<ApiResponse<RouteWithDetails>, AppError> {
        request.validate()?;
        let route = self
            .service
            .update_compound_route_segments(compound_route_id, &request.route_ids)
            .await?;

        Ok(ApiResponse::success_with_message(
            route,
            "Segmentos actualizados exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<RouteWithDetails, AppError> {
        self.service.get_route(id).await
    }

    pub async fn list(&self, filters: RouteFilters) -> Result<RoutePage, AppError> {
        self.service.list_routes(&filters).await
    }

    pub async fn segments(&self, id: Uuid) -> Result<Vec<SegmentDetail>, AppError> {
        self.service.get_compound_route_segments(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.service.delete_route(id).await
    }
}
