use async_trait::async_trait;
use uuid::Uuid;

use super::{
    dto::{NewSource, SourcePatch},
    repo_types::Source,
};
use crate::store::{PgStore, StoreResult};

const SOURCE_COLUMNS: &str = "id, name, description, created_at, updated_at";

#[async_trait]
pub trait SourceRepo: Send + Sync {
    async fn list_sources(&self) -> StoreResult<Vec<Source>>;
    async fn get_source(&self, id: Uuid) -> StoreResult<Option<Source>>;
    /// Sources whose id is in `ids`; unknown ids are skipped.
    async fn find_sources(&self, ids: &[Uuid]) -> StoreResult<Vec<Source>>;
    async fn insert_source(&self, new: &NewSource) -> StoreResult<Source>;
    async fn update_source(&self, id: Uuid, patch: &SourcePatch) -> StoreResult<Option<Source>>;
    /// Returns `false` when nothing was deleted.
    async fn delete_source(&self, id: Uuid) -> StoreResult<bool>;
    async fn count_sources(&self) -> StoreResult<i64>;
}

#[async_trait]
impl SourceRepo for PgStore {
    async fn list_sources(&self) -> StoreResult<Vec<Source>> {
        let rows = sqlx::query_as::<_, Source>(&format!(
            "SELECT {SOURCE_COLUMNS} FROM sources ORDER BY created_at ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_source(&self, id: Uuid) -> StoreResult<Option<Source>> {
        let row = sqlx::query_as::<_, Source>(&format!(
            "SELECT {SOURCE_COLUMNS} FROM sources WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_sources(&self, ids: &[Uuid]) -> StoreResult<Vec<Source>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, Source>(&format!(
            "SELECT {SOURCE_COLUMNS} FROM sources WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert_source(&self, new: &NewSource) -> StoreResult<Source> {
        let row = sqlx::query_as::<_, Source>(&format!(
            r#"
            INSERT INTO sources (id, name, description)
            VALUES ($1, $2, $3)
            RETURNING {SOURCE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_source(&self, id: Uuid, patch: &SourcePatch) -> StoreResult<Option<Source>> {
        let row = sqlx::query_as::<_, Source>(&format!(
            r#"
            UPDATE sources
               SET name = COALESCE($2, name),
                   description = CASE WHEN $3::TEXT IS NULL THEN description
                                      ELSE NULLIF($3, '') END,
                   updated_at = now()
             WHERE id = $1
            RETURNING {SOURCE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.description)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_source(&self, id: Uuid) -> StoreResult<bool> {
        let res = sqlx::query("DELETE FROM sources WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn count_sources(&self) -> StoreResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sources")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
