//! Backend de inventario de rutas
//!
//! Composición de rutas simples y compuestas sobre PostgreSQL, expuesta
//! como API REST para el panel de administración.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
