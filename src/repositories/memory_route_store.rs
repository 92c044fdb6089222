//! Implementación en memoria de `RouteStore`
//!
//! Cada transacción trabaja sobre una copia de las tablas y el commit la
//! publica completa. La transacción retiene el lock de escritor desde
//! `begin` hasta `commit`/`rollback`, así que las escrituras concurrentes
//! se serializan y ninguna pisa a otra. Respeta las mismas
//! restricciones que el schema SQL y permite inyectar fallos de escritura
//! para comprobar los rollbacks.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use uuid::Uuid;

use super::route_store::RouteStore;
use crate::models::{
    City, NewPathway, NewRoute, NewRouteSegment, Pathway, Route, RouteAggregates, RouteFilters,
    RoutePage, RouteSegment, RouteWithDetails, SegmentDetail, Terminal,
};
use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Clone, Default)]
struct MemoryTables {
    cities: HashMap<Uuid, City>,
    terminals: HashMap<Uuid, Terminal>,
    pathways: HashMap<Uuid, Pathway>,
    routes: HashMap<Uuid, Route>,
    segments: Vec<RouteSegment>,
}

impl MemoryTables {
    fn segment_details(&self, parent_route_id: Uuid) -> Vec<SegmentDetail> {
        let mut segments: Vec<&RouteSegment> = self
            .segments
            .iter()
            .filter(|s| s.parent_route_id == parent_route_id)
            .collect();
        segments.sort_by_key(|s| s.sequence);

        segments
            .into_iter()
            .filter_map(|s| {
                self.routes.get(&s.segment_route_id).map(|route| SegmentDetail {
                    id: s.id,
                    sequence: s.sequence,
                    active: s.active,
                    route: route.clone(),
                })
            })
            .collect()
    }
}

/// Fallos a provocar en las escrituras transaccionales
#[derive(Debug, Clone, Default)]
pub struct FailurePlan {
    /// Falla la N-ésima inserción de segmento (1-based) de cada transacción
    pub fail_segment_insert_at: Option<usize>,
    pub fail_segment_delete: bool,
    pub fail_route_update: bool,
}

pub struct MemoryTx {
    tables: MemoryTables,
    segment_inserts: usize,
    _writer: OwnedMutexGuard<()>,
}

#[derive(Default)]
pub struct InMemoryRouteStore {
    tables: RwLock<MemoryTables>,
    writer: Arc<Mutex<()>>,
    failures: RwLock<FailurePlan>,
}

impl InMemoryRouteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_city(&self, name: &str, code: &str) -> City {
        let city = City {
            id: Uuid::new_v4(),
            name: name.to_string(),
            code: code.to_string(),
            active: true,
            created_at: Utc::now(),
        };
        self.tables.write().await.cities.insert(city.id, city.clone());
        city
    }

    pub async fn insert_terminal(&self, city_id: Uuid, name: &str, code: &str) -> Terminal {
        let terminal = Terminal {
            id: Uuid::new_v4(),
            city_id,
            name: name.to_string(),
            code: code.to_string(),
            active: true,
            created_at: Utc::now(),
        };
        self.tables.write().await.terminals.insert(terminal.id, terminal.clone());
        terminal
    }

    pub async fn set_failure_plan(&self, plan: FailurePlan) {
        *self.failures.write().await = plan;
    }

    pub async fn route_count(&self) -> usize {
        self.tables.read().await.routes.len()
    }

    pub async fn pathway_count(&self) -> usize {
        self.tables.read().await.pathways.len()
    }

    pub async fn segment_count(&self) -> usize {
        self.tables.read().await.segments.len()
    }

    /// Filas crudas de segmentos de un padre, ordenadas por secuencia
    pub async fn segments_of(&self, parent_route_id: Uuid) -> Vec<RouteSegment> {
        let tables = self.tables.read().await;
        let mut segments: Vec<RouteSegment> = tables
            .segments
            .iter()
            .filter(|s| s.parent_route_id == parent_route_id)
            .cloned()
            .collect();
        segments.sort_by_key(|s| s.sequence);
        segments
    }
}

fn integrity(message: String) -> AppError {
    AppError::Internal(message)
}

#[async_trait]
impl RouteStore for InMemoryRouteStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> AppResult<Self::Tx> {
        // El snapshot se toma con el lock ya adquirido
        let writer = Arc::clone(&self.writer).lock_owned().await;
        Ok(MemoryTx {
            tables: self.tables.read().await.clone(),
            segment_inserts: 0,
            _writer: writer,
        })
    }

    async fn commit(&self, tx: Self::Tx) -> AppResult<()> {
        *self.tables.write().await = tx.tables;
        Ok(())
    }

    async fn rollback(&self, _tx: Self::Tx) -> AppResult<()> {
        Ok(())
    }

    async fn find_route(&self, id: Uuid) -> AppResult<Option<Route>> {
        Ok(self.tables.read().await.routes.get(&id).cloned())
    }

    async fn find_simple_routes_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Route>> {
        let tables = self.tables.read().await;
        Ok(tables
            .routes
            .values()
            .filter(|r| !r.is_compound && ids.contains(&r.id))
            .cloned()
            .collect())
    }

    async fn find_compound_route(&self, id: Uuid) -> AppResult<Option<Route>> {
        let tables = self.tables.read().await;
        Ok(tables.routes.get(&id).filter(|r| r.is_compound).cloned())
    }

    async fn find_route_with_full_details(&self, id: Uuid) -> AppResult<Option<RouteWithDetails>> {
        let tables = self.tables.read().await;
        let Some(route) = tables.routes.get(&id).cloned() else {
            return Ok(None);
        };

        Ok(Some(RouteWithDetails {
            kind: route.kind(),
            origin_city: tables.cities.get(&route.origin_city_id).cloned(),
            destination_city: tables.cities.get(&route.destination_city_id).cloned(),
            origin_terminal: tables.terminals.get(&route.origin_terminal_id).cloned(),
            destination_terminal: tables.terminals.get(&route.destination_terminal_id).cloned(),
            pathway: route.pathway_id.and_then(|p| tables.pathways.get(&p).cloned()),
            segments: tables.segment_details(route.id),
            route,
        }))
    }

    async fn find_segments(&self, parent_route_id: Uuid) -> AppResult<Vec<SegmentDetail>> {
        Ok(self.tables.read().await.segment_details(parent_route_id))
    }

    async fn list_routes(&self, filters: &RouteFilters) -> AppResult<RoutePage> {
        let tables = self.tables.read().await;
        let mut matching: Vec<Route> = tables
            .routes
            .values()
            .filter(|r| filters.matches(r))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let limit = filters.limit();
        let offset = filters.offset();
        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();

        Ok(RoutePage { items, total, limit, offset })
    }

    async fn create_pathway(&self, tx: &mut Self::Tx, pathway: &NewPathway) -> AppResult<Pathway> {
        let created = Pathway {
            id: Uuid::new_v4(),
            name: pathway.name.clone(),
            distance: pathway.distance,
            typical_time: pathway.typical_time,
            toll_road: pathway.toll_road,
            meta: sqlx::types::Json(pathway.meta.clone()),
            active: true,
            created_at: Utc::now(),
        };
        tx.tables.pathways.insert(created.id, created.clone());
        Ok(created)
    }

    async fn delete_pathway(&self, tx: &mut Self::Tx, id: Uuid) -> AppResult<()> {
        tx.tables.pathways.remove(&id);
        Ok(())
    }

    async fn create_route(&self, tx: &mut Self::Tx, route: &NewRoute) -> AppResult<Route> {
        for city_id in [route.origin_city_id, route.destination_city_id] {
            if !tx.tables.cities.contains_key(&city_id) {
                return Err(integrity(format!("foreign key violation: city {}", city_id)));
            }
        }
        for terminal_id in [route.origin_terminal_id, route.destination_terminal_id] {
            if !tx.tables.terminals.contains_key(&terminal_id) {
                return Err(integrity(format!("foreign key violation: terminal {}", terminal_id)));
            }
        }
        if let Some(pathway_id) = route.pathway_id {
            if !tx.tables.pathways.contains_key(&pathway_id) {
                return Err(integrity(format!("foreign key violation: pathway {}", pathway_id)));
            }
            if tx.tables.routes.values().any(|r| r.pathway_id == Some(pathway_id)) {
                return Err(integrity(format!("unique violation: pathway {}", pathway_id)));
            }
        }

        let now = Utc::now();
        let created = Route {
            id: Uuid::new_v4(),
            name: route.name.clone(),
            description: route.description.clone(),
            origin_city_id: route.origin_city_id,
            destination_city_id: route.destination_city_id,
            origin_terminal_id: route.origin_terminal_id,
            destination_terminal_id: route.destination_terminal_id,
            pathway_id: route.pathway_id,
            distance: route.distance,
            base_time: route.base_time,
            is_compound: route.is_compound,
            connection_count: route.connection_count,
            total_travel_time: route.total_travel_time,
            total_distance: route.total_distance,
            created_at: now,
            updated_at: now,
        };
        tx.tables.routes.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_route(
        &self,
        tx: &mut Self::Tx,
        id: Uuid,
        aggregates: &RouteAggregates,
    ) -> AppResult<Route> {
        if self.failures.read().await.fail_route_update {
            return Err(integrity(format!("injected failure updating route {}", id)));
        }

        let route = tx
            .tables
            .routes
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Route {} not found", id)))?;
        route.origin_city_id = aggregates.origin_city_id;
        route.destination_city_id = aggregates.destination_city_id;
        route.origin_terminal_id = aggregates.origin_terminal_id;
        route.destination_terminal_id = aggregates.destination_terminal_id;
        route.connection_count = aggregates.connection_count;
        route.total_distance = aggregates.total_distance;
        route.distance = aggregates.total_distance;
        route.total_travel_time = aggregates.total_travel_time;
        route.base_time = aggregates.base_time;
        route.updated_at = Utc::now();
        Ok(route.clone())
    }

    async fn delete_route(&self, tx: &mut Self::Tx, id: Uuid) -> AppResult<bool> {
        if tx.tables.segments.iter().any(|s| s.segment_route_id == id) {
            return Err(integrity(format!("foreign key violation: route {} is a segment", id)));
        }
        let removed = tx.tables.routes.remove(&id).is_some();
        tx.tables.segments.retain(|s| s.parent_route_id != id);
        Ok(removed)
    }

    async fn create_segment(&self, tx: &mut Self::Tx, segment: &NewRouteSegment) -> AppResult<RouteSegment> {
        tx.segment_inserts += 1;
        if self.failures.read().await.fail_segment_insert_at == Some(tx.segment_inserts) {
            return Err(integrity(format!(
                "injected failure on segment insert #{}",
                tx.segment_inserts
            )));
        }

        for route_id in [segment.parent_route_id, segment.segment_route_id] {
            if !tx.tables.routes.contains_key(&route_id) {
                return Err(integrity(format!("foreign key violation: route {}", route_id)));
            }
        }
        if segment.sequence < 1 {
            return Err(integrity(format!("check violation: sequence {}", segment.sequence)));
        }
        let duplicated = tx.tables.segments.iter().any(|s| {
            s.parent_route_id == segment.parent_route_id
                && (s.sequence == segment.sequence || s.segment_route_id == segment.segment_route_id)
        });
        if duplicated {
            return Err(integrity(format!(
                "unique violation: segment of route {}",
                segment.parent_route_id
            )));
        }

        let created = RouteSegment {
            id: Uuid::new_v4(),
            parent_route_id: segment.parent_route_id,
            segment_route_id: segment.segment_route_id,
            sequence: segment.sequence,
            active: true,
            created_at: Utc::now(),
        };
        tx.tables.segments.push(created.clone());
        Ok(created)
    }

    async fn delete_segments_by_parent(&self, tx: &mut Self::Tx, parent_route_id: Uuid) -> AppResult<u64> {
        if self.failures.read().await.fail_segment_delete {
            return Err(integrity(format!(
                "injected failure deleting segments of {}",
                parent_route_id
            )));
        }
        let before = tx.tables.segments.len();
        tx.tables.segments.retain(|s| s.parent_route_id != parent_route_id);
        Ok((before - tx.tables.segments.len()) as u64)
    }

    async fn is_used_as_segment(&self, tx: &mut Self::Tx, route_id: Uuid) -> AppResult<bool> {
        Ok(tx.tables.segments.iter().any(|s| s.segment_route_id == route_id))
    }
}
