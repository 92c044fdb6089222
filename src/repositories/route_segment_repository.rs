use crate::models::route::Route;
use crate::models::route_segment::{NewRouteSegment, RouteSegment, SegmentDetail};
use crate::utils::errors::AppError;
use chrono::Utc;
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

/// Fila del join segmento + ruta hija
#[derive(Debug, FromRow)]
struct SegmentRow {
    segment_id: Uuid,
    segment_sequence: i32,
    segment_active: bool,
    #[sqlx(flatten)]
    route: Route,
}

impl From<SegmentRow> for SegmentDetail {
    fn from(row: SegmentRow) -> Self {
        Self {
            id: row.segment_id,
            sequence: row.segment_sequence,
            active: row.segment_active,
            route: row.route,
        }
    }
}

pub struct RouteSegmentRepository {
    pool: PgPool,
}

impl RouteSegmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        conn: &mut PgConnection,
        segment: &NewRouteSegment,
    ) -> Result<RouteSegment, AppError> {
        let created = sqlx::query_as::<_, RouteSegment>(
            r#"
            INSERT INTO route_segments (id, parent_route_id, segment_route_id, sequence, active, created_at)
            VALUES ($1, $2, $3, $4, TRUE, $5)
            RETURNING id, parent_route_id, segment_route_id, sequence, active, created_at
            "#
        )
        .bind(Uuid::new_v4())
        .bind(segment.parent_route_id)
        .bind(segment.segment_route_id)
        .bind(segment.sequence)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;

        Ok(created)
    }

    /// Borrar toda la cadena de un padre; devuelve cuántas filas se eliminaron
    pub async fn delete_by_parent(&self, conn: &mut PgConnection, parent_route_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM route_segments WHERE parent_route_id = $1")
            .bind(parent_route_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }

    /// Segmentos de un padre con su ruta hija, en orden de secuencia
    pub async fn find_by_parent(&self, parent_route_id: Uuid) -> Result<Vec<SegmentDetail>, AppError> {
        let rows = sqlx::query_as::<_, SegmentRow>(
            r#"
            SELECT s.id AS segment_id, s.sequence AS segment_sequence, s.active AS segment_active, r.*
            FROM route_segments s
            JOIN routes r ON r.id = s.segment_route_id
            WHERE s.parent_route_id = $1
            ORDER BY s.sequence ASC
            "#
        )
        .bind(parent_route_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SegmentDetail::from).collect())
    }

    pub async fn is_used_as_segment(&self, conn: &mut PgConnection, route_id: Uuid) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM route_segments WHERE segment_route_id = $1)"
        )
        .bind(route_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(result.0)
    }
}
