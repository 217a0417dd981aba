use async_trait::async_trait;
use rentix_core::models::Rent;
use rentix_core::{BoxError, RentRepository};
use sqlx::PgPool;
use uuid::Uuid;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS rents (
    id TEXT PRIMARY KEY,
    document JSONB NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
)";

/// Postgres-backed rent repository. Each rent is one JSONB document,
/// keeping the single-document atomicity the workflow assumes.
pub struct PgRentRepository {
    pool: PgPool,
}

impl PgRentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        Ok(())
    }
}

// Postgres rejects a negative LIMIT, so both values get a floor here
// even though the API clamps them too.
fn limit_for(per_page: i64) -> i64 {
    per_page.max(1)
}

fn offset_for(page: i64, per_page: i64) -> i64 {
    (page - 1).max(0) * limit_for(per_page)
}

#[async_trait]
impl RentRepository for PgRentRepository {
    async fn create(&self, rent: &Rent) -> Result<Rent, BoxError> {
        let mut stored = rent.clone();
        if stored.id.is_empty() {
            stored.id = Uuid::new_v4().to_string();
        }

        let document = serde_json::to_value(&stored)?;
        sqlx::query("INSERT INTO rents (id, document) VALUES ($1, $2)")
            .bind(&stored.id)
            .bind(&document)
            .execute(&self.pool)
            .await?;

        Ok(stored)
    }

    async fn get(&self, id: &str) -> Result<Option<Rent>, BoxError> {
        let document: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT document FROM rents WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        match document {
            Some(document) => Ok(Some(serde_json::from_value(document)?)),
            None => Ok(None),
        }
    }

    async fn list(&self, page: i64, per_page: i64) -> Result<(Vec<Rent>, i64), BoxError> {
        let documents: Vec<serde_json::Value> = sqlx::query_scalar(
            "SELECT document FROM rents ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit_for(per_page))
        .bind(offset_for(page, per_page))
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rents")
            .fetch_one(&self.pool)
            .await?;

        let rents = documents
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Rent>, _>>()?;

        Ok((rents, total))
    }

    async fn update(&self, id: &str, rent: &Rent) -> Result<Option<Rent>, BoxError> {
        let mut stored = rent.clone();
        stored.id = id.to_string();

        let document = serde_json::to_value(&stored)?;
        let result = sqlx::query("UPDATE rents SET document = $2 WHERE id = $1")
            .bind(id)
            .bind(&document)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            Ok(None)
        } else {
            Ok(Some(stored))
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, BoxError> {
        let result = sqlx::query("DELETE FROM rents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
