use crate::models::route::{NewRoute, Route, RouteAggregates, RouteFilters, RoutePage};
use crate::utils::errors::AppError;
use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

pub struct RouteRepository {
    pool: PgPool,
}

impl RouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, conn: &mut PgConnection, route: &NewRoute) -> Result<Route, AppError> {
        let now = Utc::now();
        let created = sqlx::query_as::<_, Route>(
            r#"
            INSERT INTO routes (
                id, name, description, origin_city_id, destination_city_id,
                origin_terminal_id, destination_terminal_id, pathway_id, distance,
                base_time, is_compound, connection_count, total_travel_time,
                total_distance, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $15)
            RETURNING *
            "#
        )
        .bind(Uuid::new_v4())
        .bind(&route.name)
        .bind(&route.description)
        .bind(route.origin_city_id)
        .bind(route.destination_city_id)
        .bind(route.origin_terminal_id)
        .bind(route.destination_terminal_id)
        .bind(route.pathway_id)
        .bind(route.distance)
        .bind(route.base_time)
        .bind(route.is_compound)
        .bind(route.connection_count)
        .bind(route.total_travel_time)
        .bind(route.total_distance)
        .bind(now)
        .fetch_one(&mut *conn)
        .await?;

        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Route>, AppError> {
        let route = sqlx::query_as::<_, Route>("SELECT * FROM routes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(route)
    }

    /// Solo devuelve rutas simples; el orden del resultado no está garantizado
    pub async fn find_simple_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Route>, AppError> {
        let routes = sqlx::query_as::<_, Route>(
            "SELECT * FROM routes WHERE id = ANY($1) AND is_compound = FALSE"
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(routes)
    }

    pub async fn find_compound_by_id(&self, id: Uuid) -> Result<Option<Route>, AppError> {
        let route = sqlx::query_as::<_, Route>(
            "SELECT * FROM routes WHERE id = $1 AND is_compound = TRUE"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(route)
    }

    /// Reescribir origen, destino y agregados de una ruta compuesta
    pub async fn update_aggregates(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        aggregates: &RouteAggregates,
    ) -> Result<Route, AppError> {
        let route = sqlx::query_as::<_, Route>(
            r#"
            UPDATE routes
            SET origin_city_id = $2, destination_city_id = $3,
                origin_terminal_id = $4, destination_terminal_id = $5,
                connection_count = $6, total_distance = $7, distance = $7,
                total_travel_time = $8, base_time = $9, updated_at = $10
            WHERE id = $1
            RETURNING *
            "#
        )
        .bind(id)
        .bind(aggregates.origin_city_id)
        .bind(aggregates.destination_city_id)
        .bind(aggregates.origin_terminal_id)
        .bind(aggregates.destination_terminal_id)
        .bind(aggregates.connection_count)
        .bind(aggregates.total_distance)
        .bind(aggregates.total_travel_time)
        .bind(aggregates.base_time)
        .bind(Utc::now())
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Route {} not found", id)))?;

        Ok(route)
    }

    /// Borrar una ruta; los segmentos donde es padre se eliminan en cascada
    pub async fn delete(&self, conn: &mut PgConnection, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM routes WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list(&self, filters: &RouteFilters) -> Result<RoutePage, AppError> {
        let limit = filters.limit();
        let offset = filters.offset();
        let pattern = filters.search_pattern();

        let items = sqlx::query_as::<_, Route>(
            r#"
            SELECT * FROM routes
            WHERE ($1::boolean IS NULL OR is_compound = $1)
            AND ($2::uuid IS NULL OR origin_city_id = $2)
            AND ($3::uuid IS NULL OR destination_city_id = $3)
            AND ($4::text IS NULL OR name ILIKE $4)
            ORDER BY created_at DESC
            LIMIT $5 OFFSET $6
            "#
        )
        .bind(filters.is_compound)
        .bind(filters.origin_city_id)
        .bind(filters.destination_city_id)
        .bind(&pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM routes
            WHERE ($1::boolean IS NULL OR is_compound = $1)
            AND ($2::uuid IS NULL OR origin_city_id = $2)
            AND ($3::uuid IS NULL OR destination_city_id = $3)
            AND ($4::text IS NULL OR name ILIKE $4)
            "#
        )
        .bind(filters.is_compound)
        .bind(filters.origin_city_id)
        .bind(filters.destination_city_id)
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok(RoutePage {
            items,
            total: total.0,
            limit,
            offset,
        })
    }
}
