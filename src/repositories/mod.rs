//! Repositorios
//!
//! Un repositorio por tabla con SQL directo, más el contrato `RouteStore`
//! que consume el motor de composición y sus dos implementaciones.

pub mod city_repository;
pub mod memory_route_store;
pub mod pathway_repository;
pub mod pg_route_store;
pub mod route_repository;
pub mod route_segment_repository;
pub mod route_store;

pub use memory_route_store::{FailurePlan, InMemoryRouteStore};
pub use pg_route_store::PgRouteStore;
pub use route_store::RouteStore;
