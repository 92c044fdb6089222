//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación. El motor de
//! composición de rutas coordina validación, transacciones y recálculo de
//! agregados sobre los repositorios.

pub mod route_composition_service;

pub use route_composition_service::RouteCompositionService;
