//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean exactamente
//! al schema PostgreSQL de rutas.

pub mod city;
pub mod pathway;
pub mod route;
pub mod route_segment;

pub use city::{City, Terminal};
pub use pathway::{NewPathway, Pathway};
pub use route::{NewRoute, Route, RouteAggregates, RouteFilters, RouteKind, RoutePage, RouteWithDetails};
pub use route_segment::{NewRouteSegment, RouteSegment, SegmentDetail};
