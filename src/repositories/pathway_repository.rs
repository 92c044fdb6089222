use crate::models::pathway::{NewPathway, Pathway};
use crate::utils::errors::AppError;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

pub struct PathwayRepository {
    pool: PgPool,
}

impl PathwayRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insertar un pathway dentro de la transacción recibida
    pub async fn create(&self, conn: &mut PgConnection, pathway: &NewPathway) -> Result<Pathway, AppError> {
        let created = sqlx::query_as::<_, Pathway>(
            r#"
            INSERT INTO pathways (id, name, distance, typical_time, toll_road, meta, active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE, $7)
            RETURNING *
            "#
        )
        .bind(Uuid::new_v4())
        .bind(&pathway.name)
        .bind(pathway.distance)
        .bind(pathway.typical_time)
        .bind(pathway.toll_road)
        .bind(Json(pathway.meta.clone()))
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;

        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Pathway>, AppError> {
        let pathway = sqlx::query_as::<_, Pathway>("SELECT * FROM pathways WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(pathway)
    }

    pub async fn delete(&self, conn: &mut PgConnection, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM pathways WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }
}
