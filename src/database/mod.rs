//! Módulo de base de datos
//!
//! Maneja la conexión y migraciones con PostgreSQL

pub mod connection;

pub use connection::{health_check, DatabaseConnection};
