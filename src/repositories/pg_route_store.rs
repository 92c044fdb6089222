//! Implementación PostgreSQL de `RouteStore`
//!
//! Delega en los repositorios por tabla; la transacción es una
//! `sqlx::Transaction` que cada escritura recibe como `&mut PgConnection`.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::city_repository::CityRepository;
use super::pathway_repository::PathwayRepository;
use super::route_repository::RouteRepository;
use super::route_segment_repository::RouteSegmentRepository;
use super::route_store::RouteStore;
use crate::models::{
    NewPathway, NewRoute, NewRouteSegment, Pathway, Route, RouteAggregates, RouteFilters,
    RoutePage, RouteSegment, RouteWithDetails, SegmentDetail,
};
use crate::utils::errors::AppResult;

pub struct PgRouteStore {
    pool: PgPool,
    pathways: PathwayRepository,
    routes: RouteRepository,
    segments: RouteSegmentRepository,
    cities: CityRepository,
}

impl PgRouteStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pathways: PathwayRepository::new(pool.clone()),
            routes: RouteRepository::new(pool.clone()),
            segments: RouteSegmentRepository::new(pool.clone()),
            cities: CityRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl RouteStore for PgRouteStore {
    type Tx = Transaction<'static, Postgres>;

    async fn begin(&self) -> AppResult<Self::Tx> {
        Ok(self.pool.begin().await?)
    }

    async fn commit(&self, tx: Self::Tx) -> AppResult<()> {
        Ok(tx.commit().await?)
    }

    async fn rollback(&self, tx: Self::Tx) -> AppResult<()> {
        Ok(tx.rollback().await?)
    }

    async fn find_route(&self, id: Uuid) -> AppResult<Option<Route>> {
        self.routes.find_by_id(id).await
    }

    async fn find_simple_routes_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Route>> {
        self.routes.find_simple_by_ids(ids).await
    }

    async fn find_compound_route(&self, id: Uuid) -> AppResult<Option<Route>> {
        self.routes.find_compound_by_id(id).await
    }

    async fn find_route_with_full_details(&self, id: Uuid) -> AppResult<Option<RouteWithDetails>> {
        let Some(route) = self.routes.find_by_id(id).await? else {
            return Ok(None);
        };

        let cities = self
            .cities
            .find_cities(&[route.origin_city_id, route.destination_city_id])
            .await?;
        let terminals = self
            .cities
            .find_terminals(&[route.origin_terminal_id, route.destination_terminal_id])
            .await?;
        let pathway = match route.pathway_id {
            Some(pathway_id) => self.pathways.find_by_id(pathway_id).await?,
            None => None,
        };
        let segments = if route.is_compound {
            self.segments.find_by_parent(route.id).await?
        } else {
            Vec::new()
        };

        let find_city = |city_id: Uuid| cities.iter().find(|c| c.id == city_id).cloned();
        let find_terminal = |terminal_id: Uuid| terminals.iter().find(|t| t.id == terminal_id).cloned();

        Ok(Some(RouteWithDetails {
            kind: route.kind(),
            origin_city: find_city(route.origin_city_id),
            destination_city: find_city(route.destination_city_id),
            origin_terminal: find_terminal(route.origin_terminal_id),
            destination_terminal: find_terminal(route.destination_terminal_id),
            pathway,
            segments,
            route,
        }))
    }

    async fn find_segments(&self, parent_route_id: Uuid) -> AppResult<Vec<SegmentDetail>> {
        self.segments.find_by_parent(parent_route_id).await
    }

    async fn list_routes(&self, filters: &RouteFilters) -> AppResult<RoutePage> {
        self.routes.list(filters).await
    }

    async fn create_pathway(&self, tx: &mut Self::Tx, pathway: &NewPathway) -> AppResult<Pathway> {
        self.pathways.create(tx, pathway).await
    }

    async fn delete_pathway(&self, tx: &mut Self::Tx, id: Uuid) -> AppResult<()> {
        self.pathways.delete(tx, id).await
    }

    async fn create_route(&self, tx: &mut Self::Tx, route: &NewRoute) -> AppResult<Route> {
        self.routes.create(tx, route).await
    }

    async fn update_route(
        &self,
        tx: &mut Self::Tx,
        id: Uuid,
        aggregates: &RouteAggregates,
    ) -> AppResult<Route> {
        self.routes.update_aggregates(tx, id, aggregates).await
    }

    async fn delete_route(&self, tx: &mut Self::Tx, id: Uuid) -> AppResult<bool> {
        self.routes.delete(tx, id).await
    }

    async fn create_segment(&self, tx: &mut Self::Tx, segment: &NewRouteSegment) -> AppResult<RouteSegment> {
        self.segments.create(tx, segment).await
    }

    async fn delete_segments_by_parent(&self, tx: &mut Self::Tx, parent_route_id: Uuid) -> AppResult<u64> {
        self.segments.delete_by_parent(tx, parent_route_id).await
    }

    async fn is_used_as_segment(&self, tx: &mut Self::Tx, route_id: Uuid) -> AppResult<bool> {
        self.segments.is_used_as_segment(tx, route_id).await
    }
}
