//! Motor de composición de rutas
//!
//! Crea rutas simples (pathway + ruta en una transacción) y arma rutas
//! compuestas a partir de cadenas ordenadas de rutas simples, recalculando
//! origen, destino y agregados dentro de la misma transacción que escribe
//! los segmentos.
//!
//! Las validaciones leen el último estado confirmado antes de abrir la
//! transacción de escritura; no se toma ningún lock entre ambas fases.

use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::dto::route_dto::{CreateCompoundRouteRequest, CreateSimpleRouteRequest};
use crate::models::{
    NewPathway, NewRoute, NewRouteSegment, Route, RouteAggregates, RouteFilters, RoutePage,
    RouteWithDetails, SegmentDetail,
};
use crate::repositories::route_store::RouteStore;
use crate::utils::errors::{AppError, AppResult, RouteCompositionError};
use crate::utils::validation::all_distinct;

/// Número mínimo de rutas simples en una cadena
pub const MIN_COMPOUND_SEGMENTS: usize = 2;

/// Reordenar las rutas obtenidas según la lista del cliente.
///
/// Devuelve la cadena ordenada y los ids que no aparecieron en `routes`.
pub fn order_by_ids(routes: Vec<Route>, route_ids: &[Uuid]) -> (Vec<Route>, Vec<Uuid>) {
    let mut by_id: HashMap<Uuid, Route> = routes.into_iter().map(|r| (r.id, r)).collect();
    let mut ordered = Vec::with_capacity(route_ids.len());
    let mut missing = Vec::new();

    for id in route_ids {
        match by_id.remove(id) {
            Some(route) => ordered.push(route),
            None => missing.push(*id),
        }
    }

    (ordered, missing)
}

/// Cada destino debe coincidir con el origen de la siguiente ruta.
/// Solo se comparan pares adyacentes, así que las cadenas circulares son válidas.
pub fn check_connectivity(chain: &[Route]) -> Result<(), RouteCompositionError> {
    match chain
        .windows(2)
        .find(|pair| pair[0].destination_city_id != pair[1].origin_city_id)
    {
        Some(pair) => Err(RouteCompositionError::InvalidConnection(pair[0].id, pair[1].id)),
        None => Ok(()),
    }
}

/// Suma de minutos sin desbordar la columna `INTEGER`
fn checked_minutes(
    chain: &[Route],
    field: &'static str,
    minutes: impl Fn(&Route) -> i32,
) -> Result<i32, RouteCompositionError> {
    chain
        .iter()
        .try_fold(0i32, |acc, route| acc.checked_add(minutes(route)))
        .ok_or(RouteCompositionError::AggregateOverflow(field))
}

/// Agregados de una cadena ordenada
pub fn compute_aggregates(chain: &[Route]) -> Result<RouteAggregates, RouteCompositionError> {
    let (Some(first), Some(last)) = (chain.first(), chain.last()) else {
        return Err(RouteCompositionError::CompoundRouteMinimum);
    };

    let connection_count = i32::try_from(chain.len() - 1)
        .map_err(|_| RouteCompositionError::AggregateOverflow("connection_count"))?;
    let total_distance: f64 = chain.iter().map(|r| r.distance).sum();
    if !total_distance.is_finite() {
        return Err(RouteCompositionError::AggregateOverflow("total_distance"));
    }

    Ok(RouteAggregates {
        origin_city_id: first.origin_city_id,
        origin_terminal_id: first.origin_terminal_id,
        destination_city_id: last.destination_city_id,
        destination_terminal_id: last.destination_terminal_id,
        connection_count,
        total_distance,
        total_travel_time: checked_minutes(chain, "total_travel_time", |r| r.total_travel_time)?,
        base_time: checked_minutes(chain, "base_time", |r| r.base_time)?,
    })
}

pub struct RouteCompositionService<S: RouteStore> {
    store: Arc<S>,
}

impl<S: RouteStore> Clone for RouteCompositionService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: RouteStore> RouteCompositionService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Crear una ruta simple y su pathway en una sola transacción
    pub async fn create_simple_route(&self, request: CreateSimpleRouteRequest) -> AppResult<Route> {
        log::info!("🛣️ Creando ruta simple '{}'", request.name);

        if request.origin_city_id == request.destination_city_id {
            log::warn!("❌ Ruta '{}' con origen y destino iguales", request.name);
            return Err(RouteCompositionError::SameOriginDestination.into());
        }

        let pathway = NewPathway {
            name: request.pathway_name(),
            distance: request.distance,
            typical_time: request.typical_time,
            toll_road: request.toll_road,
            meta: request.meta.clone(),
        };

        let mut tx = self.store.begin().await?;
        let written: AppResult<Route> = async {
            let pathway = self.store.create_pathway(&mut tx, &pathway).await?;
            let route = NewRoute {
                name: request.name.trim().to_string(),
                description: request.description.clone(),
                origin_city_id: request.origin_city_id,
                destination_city_id: request.destination_city_id,
                origin_terminal_id: request.origin_terminal_id,
                destination_terminal_id: request.destination_terminal_id,
                pathway_id: Some(pathway.id),
                distance: pathway.distance,
                base_time: request.base_time,
                is_compound: false,
                connection_count: 0,
                total_travel_time: pathway.typical_time,
                total_distance: pathway.distance,
            };
            self.store.create_route(&mut tx, &route).await
        }
        .await;

        match written {
            Ok(route) => {
                self.store.commit(tx).await?;
                log::info!("✅ Ruta simple creada: {}", route.id);
                Ok(route)
            }
            Err(e) => {
                log::error!("❌ Error creando ruta simple, rollback: {}", e);
                self.rollback_quietly(tx).await;
                Err(e)
            }
        }
    }

    /// Crear una ruta compuesta a partir de rutas simples existentes
    pub async fn create_compound_route(
        &self,
        request: CreateCompoundRouteRequest,
    ) -> AppResult<RouteWithDetails> {
        log::info!(
            "🔗 Creando ruta compuesta '{}' con {} rutas",
            request.name,
            request.route_ids.len()
        );

        let chain = self.resolve_chain(&request.route_ids).await?;
        let aggregates = compute_aggregates(&chain).map_err(|e| {
            log::warn!("❌ {}", e);
            AppError::from(e)
        })?;

        let parent = NewRoute {
            name: request.name.trim().to_string(),
            description: request.description.clone(),
            origin_city_id: aggregates.origin_city_id,
            destination_city_id: aggregates.destination_city_id,
            origin_terminal_id: aggregates.origin_terminal_id,
            destination_terminal_id: aggregates.destination_terminal_id,
            pathway_id: None,
            distance: aggregates.total_distance,
            base_time: aggregates.base_time,
            is_compound: true,
            connection_count: aggregates.connection_count,
            total_travel_time: aggregates.total_travel_time,
            total_distance: aggregates.total_distance,
        };

        let mut tx = self.store.begin().await?;
        let written: AppResult<Route> = async {
            let route = self.store.create_route(&mut tx, &parent).await?;
            self.insert_segments(&mut tx, route.id, &chain).await?;
            Ok(route)
        }
        .await;

        let route = match written {
            Ok(route) => route,
            Err(e) => {
                log::error!("❌ Error creando segmentos, rollback: {}", e);
                self.rollback_quietly(tx).await;
                return Err(RouteCompositionError::SegmentCreationFailed.into());
            }
        };

        if let Err(e) = self.store.commit(tx).await {
            log::error!("❌ Error confirmando ruta compuesta: {}", e);
            return Err(RouteCompositionError::SegmentCreationFailed.into());
        }
        log::info!("✅ Ruta compuesta creada: {} ({} segmentos)", route.id, chain.len());

        self.get_route(route.id).await
    }

    /// Reemplazar por completo la cadena de segmentos de una ruta compuesta
    pub async fn update_compound_route_segments(
        &self,
        compound_route_id: Uuid,
        route_ids: &[Uuid],
    ) -> AppResult<RouteWithDetails> {
        log::info!(
            "🔄 Reemplazando segmentos de la ruta compuesta {} ({} rutas)",
            compound_route_id,
            route_ids.len()
        );

        if self.store.find_compound_route(compound_route_id).await?.is_none() {
            log::warn!("❌ Ruta compuesta {} no encontrada", compound_route_id);
            return Err(RouteCompositionError::CompoundRouteNotFound(compound_route_id).into());
        }

        let chain = self.resolve_chain(route_ids).await?;
        let aggregates = compute_aggregates(&chain).map_err(|e| {
            log::warn!("❌ {}", e);
            AppError::from(e)
        })?;

        let mut tx = self.store.begin().await?;
        let written: AppResult<()> = async {
            let removed = self.store.delete_segments_by_parent(&mut tx, compound_route_id).await?;
            log::debug!("🗑️ {} segmentos anteriores eliminados", removed);
            self.insert_segments(&mut tx, compound_route_id, &chain).await?;
            self.store.update_route(&mut tx, compound_route_id, &aggregates).await?;
            Ok(())
        }
        .await;

        if let Err(e) = written {
            log::error!("❌ Error reemplazando segmentos, rollback: {}", e);
            self.rollback_quietly(tx).await;
            return Err(RouteCompositionError::SegmentReplacementFailed.into());
        }

        if let Err(e) = self.store.commit(tx).await {
            log::error!("❌ Error confirmando reemplazo de segmentos: {}", e);
            return Err(RouteCompositionError::SegmentReplacementFailed.into());
        }
        log::info!("✅ Segmentos reemplazados para {}", compound_route_id);

        self.get_route(compound_route_id).await
    }

    /// Obtener una ruta con ciudades, terminales, pathway y segmentos
    pub async fn get_route(&self, id: Uuid) -> AppResult<RouteWithDetails> {
        self.store
            .find_route_with_full_details(id)
            .await?
            .ok_or_else(|| RouteCompositionError::RouteNotFound(id).into())
    }

    pub async fn list_routes(&self, filters: &RouteFilters) -> AppResult<RoutePage> {
        self.store.list_routes(filters).await
    }

    pub async fn get_compound_route_segments(&self, id: Uuid) -> AppResult<Vec<SegmentDetail>> {
        if self.store.find_compound_route(id).await?.is_none() {
            return Err(RouteCompositionError::CompoundRouteNotFound(id).into());
        }
        self.store.find_segments(id).await
    }

    /// Borrar una ruta.
    ///
    /// Una compuesta arrastra sus segmentos; una simple se lleva su pathway
    /// y se rechaza si alguna cadena la usa.
    pub async fn delete_route(&self, id: Uuid) -> AppResult<()> {
        let route = self
            .store
            .find_route(id)
            .await?
            .ok_or(RouteCompositionError::RouteNotFound(id))?;

        let mut tx = self.store.begin().await?;
        let written: AppResult<()> = async {
            if !route.is_compound && self.store.is_used_as_segment(&mut tx, id).await? {
                return Err(RouteCompositionError::RouteInUse(id).into());
            }
            if !self.store.delete_route(&mut tx, id).await? {
                return Err(RouteCompositionError::RouteNotFound(id).into());
            }
            if let Some(pathway_id) = route.pathway_id {
                self.store.delete_pathway(&mut tx, pathway_id).await?;
            }
            Ok(())
        }
        .await;

        match written {
            Ok(()) => {
                self.store.commit(tx).await?;
                log::info!("🗑️ Ruta {} eliminada", id);
                Ok(())
            }
            Err(e) => {
                log::warn!("❌ No se pudo eliminar la ruta {}: {}", id, e);
                self.rollback_quietly(tx).await;
                Err(e)
            }
        }
    }

    /// Validaciones de cadena: duplicados, existencia y tipo, orden,
    /// longitud mínima y conectividad, en ese orden
    async fn resolve_chain(&self, route_ids: &[Uuid]) -> AppResult<Vec<Route>> {
        if !all_distinct(route_ids) {
            log::warn!("❌ Cadena con rutas repetidas");
            return Err(RouteCompositionError::RepeatedSegments.into());
        }

        let found = self.store.find_simple_routes_by_ids(route_ids).await?;
        let (chain, missing) = order_by_ids(found, route_ids);
        if !missing.is_empty() {
            log::warn!("❌ Rutas inexistentes o compuestas: {:?}", missing);
            return Err(RouteCompositionError::RoutesNotFound(missing).into());
        }

        if chain.len() < MIN_COMPOUND_SEGMENTS {
            log::warn!("❌ Cadena con {} rutas, mínimo {}", chain.len(), MIN_COMPOUND_SEGMENTS);
            return Err(RouteCompositionError::CompoundRouteMinimum.into());
        }

        check_connectivity(&chain).map_err(|e| {
            log::warn!("❌ {}", e);
            AppError::from(e)
        })?;

        Ok(chain)
    }

    async fn insert_segments(&self, tx: &mut S::Tx, parent_route_id: Uuid, chain: &[Route]) -> AppResult<()> {
        for (position, route) in chain.iter().enumerate() {
            let segment = NewRouteSegment {
                parent_route_id,
                segment_route_id: route.id,
                sequence: position as i32 + 1,
            };
            self.store.create_segment(tx, &segment).await?;
        }
        Ok(())
    }

    async fn rollback_quietly(&self, tx: S::Tx) {
        if let Err(e) = self.store.rollback(tx).await {
            log::error!("❌ Error en rollback: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn simple(origin: Uuid, destination: Uuid, distance: f64, travel: i32, base: i32) -> Route {
        let now = Utc::now();
        Route {
            id: Uuid::new_v4(),
            name: "tramo".to_string(),
            description: None,
            origin_city_id: origin,
            destination_city_id: destination,
            origin_terminal_id: Uuid::new_v4(),
            destination_terminal_id: Uuid::new_v4(),
            pathway_id: Some(Uuid::new_v4()),
            distance,
            base_time: base,
            is_compound: false,
            connection_count: 0,
            total_travel_time: travel,
            total_distance: distance,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_order_by_ids_follows_input_order() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let r1 = simple(a, b, 1.0, 1, 1);
        let r2 = simple(b, c, 1.0, 1, 1);
        let ids = [r2.id, r1.id];

        let (ordered, missing) = order_by_ids(vec![r1.clone(), r2.clone()], &ids);
        assert!(missing.is_empty());
        assert_eq!(ordered[0].id, r2.id);
        assert_eq!(ordered[1].id, r1.id);
    }

    #[test]
    fn test_order_by_ids_reports_missing() {
        let r1 = simple(Uuid::new_v4(), Uuid::new_v4(), 1.0, 1, 1);
        let ghost = Uuid::new_v4();

        let (ordered, missing) = order_by_ids(vec![r1.clone()], &[r1.id, ghost]);
        assert_eq!(ordered.len(), 1);
        assert_eq!(missing, vec![ghost]);
    }

    #[test]
    fn test_connectivity_names_first_broken_pair() {
        let (a, b, c, d) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let r1 = simple(a, b, 1.0, 1, 1);
        let r2 = simple(b, c, 1.0, 1, 1);
        let r3 = simple(d, a, 1.0, 1, 1);

        assert!(check_connectivity(&[r1.clone(), r2.clone()]).is_ok());
        assert_eq!(
            check_connectivity(&[r1, r2.clone(), r3.clone()]),
            Err(RouteCompositionError::InvalidConnection(r2.id, r3.id))
        );
    }

    #[test]
    fn test_connectivity_allows_circular_chain() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let outbound = simple(a, b, 10.0, 10, 10);
        let inbound = simple(b, a, 10.0, 10, 10);
        assert!(check_connectivity(&[outbound, inbound]).is_ok());
    }

    #[test]
    fn test_compute_aggregates() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let r1 = simple(a, b, 100.0, 120, 110);
        let r2 = simple(b, c, 50.0, 60, 55);

        let aggregates = compute_aggregates(&[r1.clone(), r2.clone()]).unwrap();
        assert_eq!(aggregates.origin_city_id, a);
        assert_eq!(aggregates.origin_terminal_id, r1.origin_terminal_id);
        assert_eq!(aggregates.destination_city_id, c);
        assert_eq!(aggregates.destination_terminal_id, r2.destination_terminal_id);
        assert_eq!(aggregates.connection_count, 1);
        assert_eq!(aggregates.total_distance, 150.0);
        assert_eq!(aggregates.total_travel_time, 180);
        assert_eq!(aggregates.base_time, 165);
    }

    #[test]
    fn test_compute_aggregates_empty_chain() {
        assert_eq!(compute_aggregates(&[]), Err(RouteCompositionError::CompoundRouteMinimum));
    }

    #[test]
    fn test_compute_aggregates_rejects_minute_overflow() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let r1 = simple(a, b, 1.0, i32::MAX, 1);
        let r2 = simple(b, c, 1.0, 1, 1);
        assert_eq!(
            compute_aggregates(&[r1.clone(), r2.clone()]),
            Err(RouteCompositionError::AggregateOverflow("total_travel_time"))
        );

        let r1 = simple(a, b, 1.0, 1, i32::MAX);
        assert_eq!(
            compute_aggregates(&[r1, r2]),
            Err(RouteCompositionError::AggregateOverflow("base_time"))
        );
    }
}
