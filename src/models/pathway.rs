//! Modelo de Pathway
//!
//! Trayecto físico punto a punto que respalda exactamente una ruta simple.
//! Mapea a la tabla `pathways`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Pathway principal - mapea exactamente a la tabla pathways
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Pathway {
    pub id: Uuid,
    pub name: String,
    /// Kilómetros
    pub distance: f64,
    /// Minutos
    pub typical_time: i32,
    pub toll_road: bool,
    pub meta: Json<serde_json::Value>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Datos para insertar un pathway nuevo
#[derive(Debug, Clone)]
pub struct NewPathway {
    pub name: String,
    pub distance: f64,
    pub typical_time: i32,
    pub toll_road: bool,
    pub meta: serde_json::Value,
}
