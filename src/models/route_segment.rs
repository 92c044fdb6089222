//! Modelo de RouteSegment
//!
//! Tabla de unión ordenada entre una ruta compuesta (padre) y las rutas
//! simples que la forman. Para un mismo padre, `sequence` va de 1 a N sin huecos.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::route::Route;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct RouteSegment {
    pub id: Uuid,
    pub parent_route_id: Uuid,
    pub segment_route_id: Uuid,
    pub sequence: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
pub struct NewRouteSegment {
    pub parent_route_id: Uuid,
    pub segment_route_id: Uuid,
    pub sequence: i32,
}

/// Segmento junto con la ruta simple a la que apunta
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SegmentDetail {
    pub id: Uuid,
    pub sequence: i32,
    pub active: bool,
    pub route: Route,
}
