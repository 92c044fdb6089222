//! Modelo de Route
//!
//! Una ruta es simple (respaldada por un pathway) o compuesta (cadena ordenada
//! de rutas simples). El tipo nunca cambia después de creada.
//! Mapea exactamente a la tabla `routes`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::city::{City, Terminal};
use super::pathway::Pathway;
use super::route_segment::SegmentDetail;

/// Route principal - mapea exactamente a la tabla routes
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Route {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub origin_city_id: Uuid,
    pub destination_city_id: Uuid,
    pub origin_terminal_id: Uuid,
    pub destination_terminal_id: Uuid,
    pub pathway_id: Option<Uuid>,
    pub distance: f64,
    pub base_time: i32,
    pub is_compound: bool,
    pub connection_count: i32,
    pub total_travel_time: i32,
    pub total_distance: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Variante de una ruta
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    Simple,
    Compound,
}

impl Route {
    pub fn kind(&self) -> RouteKind {
        if self.is_compound {
            RouteKind::Compound
        } else {
            RouteKind::Simple
        }
    }
}

/// Datos para insertar una ruta (simple o compuesta)
#[derive(Debug, Clone)]
pub struct NewRoute {
    pub name: String,
    pub description: Option<String>,
    pub origin_city_id: Uuid,
    pub destination_city_id: Uuid,
    pub origin_terminal_id: Uuid,
    pub destination_terminal_id: Uuid,
    pub pathway_id: Option<Uuid>,
    pub distance: f64,
    pub base_time: i32,
    pub is_compound: bool,
    pub connection_count: i32,
    pub total_travel_time: i32,
    pub total_distance: f64,
}

/// Campos derivados de una cadena de segmentos.
///
/// Se recalculan completos cada vez que se reemplaza la cadena.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteAggregates {
    pub origin_city_id: Uuid,
    pub destination_city_id: Uuid,
    pub origin_terminal_id: Uuid,
    pub destination_terminal_id: Uuid,
    pub connection_count: i32,
    pub total_distance: f64,
    pub total_travel_time: i32,
    pub base_time: i32,
}

/// Ruta con todas sus relaciones resueltas
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteWithDetails {
    #[serde(flatten)]
    pub route: Route,
    pub kind: RouteKind,
    pub origin_city: Option<City>,
    pub destination_city: Option<City>,
    pub origin_terminal: Option<Terminal>,
    pub destination_terminal: Option<Terminal>,
    pub pathway: Option<Pathway>,
    pub segments: Vec<SegmentDetail>,
}

/// Filtros para listado de rutas
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteFilters {
    pub is_compound: Option<bool>,
    pub origin_city_id: Option<Uuid>,
    pub destination_city_id: Option<Uuid>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl RouteFilters {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 100;

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT).clamp(1, Self::MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    /// Patrón ILIKE para la búsqueda por nombre
    pub fn search_pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s))
    }

    pub fn matches(&self, route: &Route) -> bool {
        if let Some(compound) = self.is_compound {
            if route.is_compound != compound {
                return false;
            }
        }
        if let Some(city) = self.origin_city_id {
            if route.origin_city_id != city {
                return false;
            }
        }
        if let Some(city) = self.destination_city_id {
            if route.destination_city_id != city {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(needle) => route.name.to_lowercase().contains(&needle.to_lowercase()),
            None => true,
        }
    }
}

/// Página de resultados
#[derive(Debug, Clone, Serialize)]
pub struct RoutePage {
    pub items: Vec<Route>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(name: &str, is_compound: bool) -> Route {
        let now = Utc::now();
        Route {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            origin_city_id: Uuid::new_v4(),
            destination_city_id: Uuid::new_v4(),
            origin_terminal_id: Uuid::new_v4(),
            destination_terminal_id: Uuid::new_v4(),
            pathway_id: None,
            distance: 0.0,
            base_time: 0,
            is_compound,
            connection_count: 0,
            total_travel_time: 0,
            total_distance: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_route_kind() {
        assert_eq!(route("a", false).kind(), RouteKind::Simple);
        assert_eq!(route("a", true).kind(), RouteKind::Compound);
    }

    #[test]
    fn test_filters_limit_clamped() {
        let filters = RouteFilters { limit: Some(500), offset: Some(-3), ..Default::default() };
        assert_eq!(filters.limit(), RouteFilters::MAX_LIMIT);
        assert_eq!(filters.offset(), 0);
        assert_eq!(RouteFilters::default().limit(), RouteFilters::DEFAULT_LIMIT);
    }

    #[test]
    fn test_filters_match_search_case_insensitive() {
        let filters = RouteFilters { search: Some(" norte ".to_string()), ..Default::default() };
        assert!(filters.matches(&route("Expreso Norte", false)));
        assert!(!filters.matches(&route("Sur", false)));
        assert_eq!(filters.search_pattern().as_deref(), Some("%norte%"));
    }

    #[test]
    fn test_filters_match_kind() {
        let filters = RouteFilters { is_compound: Some(true), ..Default::default() };
        assert!(filters.matches(&route("x", true)));
        assert!(!filters.matches(&route("x", false)));
    }
}
