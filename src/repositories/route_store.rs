//! Contrato de persistencia del motor de composición
//!
//! El motor abre una transacción con `begin`, la pasa explícitamente a cada
//! escritura y la cierra con `commit` o `rollback`. Las lecturas de validación
//! y la lectura final de detalle van fuera de la transacción.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    NewPathway, NewRoute, NewRouteSegment, Pathway, Route, RouteAggregates, RouteFilters,
    RoutePage, RouteSegment, RouteWithDetails, SegmentDetail,
};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait RouteStore: Send + Sync {
    /// Handle de transacción propagado a cada escritura
    type Tx: Send;

    async fn begin(&self) -> AppResult<Self::Tx>;
    async fn commit(&self, tx: Self::Tx) -> AppResult<()>;
    async fn rollback(&self, tx: Self::Tx) -> AppResult<()>;

    async fn find_route(&self, id: Uuid) -> AppResult<Option<Route>>;
    async fn find_simple_routes_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Route>>;
    async fn find_compound_route(&self, id: Uuid) -> AppResult<Option<Route>>;
    async fn find_route_with_full_details(&self, id: Uuid) -> AppResult<Option<RouteWithDetails>>;
    async fn find_segments(&self, parent_route_id: Uuid) -> AppResult<Vec<SegmentDetail>>;
    async fn list_routes(&self, filters: &RouteFilters) -> AppResult<RoutePage>;

    async fn create_pathway(&self, tx: &mut Self::Tx, pathway: &NewPathway) -> AppResult<Pathway>;
    async fn delete_pathway(&self, tx: &mut Self::Tx, id: Uuid) -> AppResult<()>;
    async fn create_route(&self, tx: &mut Self::Tx, route: &NewRoute) -> AppResult<Route>;
    async fn update_route(
        &self,
        tx: &mut Self::Tx,
        id: Uuid,
        aggregates: &RouteAggregates,
    ) -> AppResult<Route>;
    async fn delete_route(&self, tx: &mut Self::Tx, id: Uuid) -> AppResult<bool>;
    async fn create_segment(&self, tx: &mut Self::Tx, segment: &NewRouteSegment) -> AppResult<RouteSegment>;
    async fn delete_segments_by_parent(&self, tx: &mut Self::Tx, parent_route_id: Uuid) -> AppResult<u64>;
    async fn is_used_as_segment(&self, tx: &mut Self::Tx, route_id: Uuid) -> AppResult<bool>;
}
