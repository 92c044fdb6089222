use crate::models::city::{City, Terminal};
use crate::utils::errors::AppError;
use sqlx::PgPool;
use uuid::Uuid;

/// Lecturas de ciudades y terminales para el detalle de rutas
pub struct CityRepository {
    pool: PgPool,
}

impl CityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_cities(&self, ids: &[Uuid]) -> Result<Vec<City>, AppError> {
        let cities = sqlx::query_as::<_, City>("SELECT * FROM cities WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(cities)
    }

    pub async fn find_terminals(&self, ids: &[Uuid]) -> Result<Vec<Terminal>, AppError> {
        let terminals = sqlx::query_as::<_, Terminal>("SELECT * FROM terminals WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(terminals)
    }
}
