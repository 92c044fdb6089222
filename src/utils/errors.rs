//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Errores del motor de composición de rutas
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteCompositionError {
    #[error("Origin and destination city must be different")]
    SameOriginDestination,

    #[error("A route cannot appear more than once in the same chain")]
    RepeatedSegments,

    #[error("Routes not found or not simple: {}", join_ids(.0))]
    RoutesNotFound(Vec<Uuid>),

    #[error("Route {0} does not connect with route {1}")]
    InvalidConnection(Uuid, Uuid),

    #[error("A compound route needs at least 2 simple routes")]
    CompoundRouteMinimum,

    #[error("The {0} of the chain exceeds the supported range")]
    AggregateOverflow(&'static str),

    #[error("Compound route {0} not found")]
    CompoundRouteNotFound(Uuid),

    #[error("Route {0} not found")]
    RouteNotFound(Uuid),

    #[error("Route {0} is used as a segment of a compound route")]
    RouteInUse(Uuid),

    #[error("Could not create the route segments")]
    SegmentCreationFailed,

    #[error("Could not replace the route segments")]
    SegmentReplacementFailed,
}

fn join_ids(ids: &[Uuid]) -> String {
    ids.iter().map(Uuid::to_string).collect::<Vec<_>>().join(", ")
}

impl RouteCompositionError {
    /// Código estable expuesto en la respuesta
    pub fn code(&self) -> &'static str {
        match self {
            Self::SameOriginDestination => "SAME_ORIGIN_DESTINATION",
            Self::RepeatedSegments => "REPEATED_SEGMENTS",
            Self::RoutesNotFound(_) => "ROUTES_NOT_FOUND",
            Self::InvalidConnection(_, _) => "INVALID_CONNECTION",
            Self::CompoundRouteMinimum => "COMPOUND_ROUTE_MINIMUM",
            Self::AggregateOverflow(_) => "AGGREGATE_OVERFLOW",
            Self::CompoundRouteNotFound(_) => "COMPOUND_ROUTE_NOT_FOUND",
            Self::RouteNotFound(_) => "ROUTE_NOT_FOUND",
            Self::RouteInUse(_) => "ROUTE_IN_USE",
            Self::SegmentCreationFailed => "SEGMENT_CREATION_FAILED",
            Self::SegmentReplacementFailed => "SEGMENT_REPLACEMENT_FAILED",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::SameOriginDestination
            | Self::RepeatedSegments
            | Self::RoutesNotFound(_)
            | Self::InvalidConnection(_, _)
            | Self::CompoundRouteMinimum
            | Self::AggregateOverflow(_) => StatusCode::BAD_REQUEST,
            Self::CompoundRouteNotFound(_) | Self::RouteNotFound(_) => StatusCode::NOT_FOUND,
            Self::RouteInUse(_) => StatusCode::CONFLICT,
            Self::SegmentCreationFailed | Self::SegmentReplacementFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Datos adicionales para que el cliente pueda corregir la petición
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::RoutesNotFound(ids) => Some(json!({ "missing_route_ids": ids })),
            Self::InvalidConnection(from, to) => Some(json!({ "from_route_id": from, "to_route_id": to })),
            Self::CompoundRouteNotFound(id) | Self::RouteNotFound(id) | Self::RouteInUse(id) => {
                Some(json!({ "route_id": id }))
            }
            Self::AggregateOverflow(field) => Some(json!({ "field": field })),
            _ => None,
        }
    }
}

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error(transparent)]
    RouteComposition(#[from] RouteCompositionError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Database Error".to_string(),
                        message: "An error occurred while accessing the database".to_string(),
                        details: None,
                        code: Some("DB_ERROR".to_string()),
                    },
                )
            }

            AppError::Validation(e) => {
                tracing::warn!("Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Validation Error".to_string(),
                        message: "The provided data is invalid".to_string(),
                        details: Some(json!(e)),
                        code: Some("VALIDATION_ERROR".to_string()),
                    },
                )
            }

            AppError::RouteComposition(e) => {
                let status = e.status();
                if status.is_server_error() {
                    tracing::error!("Route composition failed: {}", e);
                } else {
                    tracing::warn!("Route composition rejected: {}", e);
                }
                let error = if status.is_server_error() {
                    "Operation Failed"
                } else if status == StatusCode::NOT_FOUND {
                    "Not Found"
                } else if status == StatusCode::CONFLICT {
                    "Conflict"
                } else {
                    "Validation Error"
                };
                (
                    status,
                    ErrorResponse {
                        error: error.to_string(),
                        message: e.to_string(),
                        details: e.details(),
                        code: Some(e.code().to_string()),
                    },
                )
            }

            AppError::NotFound(msg) => {
                tracing::warn!("Resource not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error: "Not Found".to_string(),
                        message: msg,
                        details: None,
                        code: Some("NOT_FOUND".to_string()),
                    },
                )
            }

            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal Server Error".to_string(),
                        message: "An unexpected error occurred".to_string(),
                        details: None,
                        code: Some("INTERNAL_ERROR".to_string()),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composition_status_mapping() {
        assert_eq!(RouteCompositionError::RepeatedSegments.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            RouteCompositionError::CompoundRouteNotFound(Uuid::nil()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(RouteCompositionError::RouteInUse(Uuid::nil()).status(), StatusCode::CONFLICT);
        assert_eq!(
            RouteCompositionError::AggregateOverflow("base_time").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RouteCompositionError::SegmentReplacementFailed.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_routes_not_found_lists_ids() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let message = RouteCompositionError::RoutesNotFound(vec![a, b]).to_string();
        assert!(message.contains(&a.to_string()));
        assert!(message.contains(&b.to_string()));
    }

    #[test]
    fn test_integrity_errors_hide_cause() {
        let response = AppError::from(RouteCompositionError::SegmentCreationFailed).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(RouteCompositionError::SegmentCreationFailed.details().is_none());
    }
}
