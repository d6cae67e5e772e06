use async_trait::async_trait;
use uuid::Uuid;

use super::{
    dto::{NewProduct, ProductPatch},
    repo_types::Product,
};
use crate::store::{PgStore, StoreResult};

const PRODUCT_COLUMNS: &str = "id, name, price, discount_price, buying_price, source_id, \
     image, description, short_description, created_at, updated_at";

#[async_trait]
pub trait ProductRepo: Send + Sync {
    async fn list_products(&self) -> StoreResult<Vec<Product>>;
    async fn get_product(&self, id: Uuid) -> StoreResult<Option<Product>>;
    /// Products whose id is in `ids`; unknown ids are skipped.
    async fn find_products(&self, ids: &[Uuid]) -> StoreResult<Vec<Product>>;
    async fn insert_product(&self, new: &NewProduct) -> StoreResult<Product>;
    async fn update_product(&self, id: Uuid, patch: &ProductPatch) -> StoreResult<Option<Product>>;
    async fn delete_product(&self, id: Uuid) -> StoreResult<bool>;
    async fn count_products(&self) -> StoreResult<i64>;
}

#[async_trait]
impl ProductRepo for PgStore {
    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_product(&self, id: Uuid) -> StoreResult<Option<Product>> {
        let row = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_products(&self, ids: &[Uuid]) -> StoreResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert_product(&self, new: &NewProduct) -> StoreResult<Product> {
        let row = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (id, name, price, discount_price, buying_price, source_id,
                                  image, description, short_description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(new.price)
        .bind(new.discount_price)
        .bind(new.buying_price)
        .bind(new.source)
        .bind(&new.image)
        .bind(&new.description)
        .bind(&new.short_description)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_product(&self, id: Uuid, patch: &ProductPatch) -> StoreResult<Option<Product>> {
        let row = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
               SET name = COALESCE($2, name),
                   price = COALESCE($3, price),
                   discount_price = COALESCE($4, discount_price),
                   buying_price = COALESCE($5, buying_price),
                   source_id = COALESCE($6, source_id),
                   image = CASE WHEN $7::TEXT IS NULL THEN image ELSE NULLIF($7, '') END,
                   description = CASE WHEN $8::TEXT IS NULL THEN description
                                      ELSE NULLIF($8, '') END,
                   short_description = CASE WHEN $9::TEXT IS NULL THEN short_description
                                            ELSE NULLIF($9, '') END,
                   updated_at = now()
             WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&patch.name)
        .bind(patch.price)
        .bind(patch.discount_price)
        .bind(patch.buying_price)
        .bind(patch.source)
        .bind(&patch.image)
        .bind(&patch.description)
        .bind(&patch.short_description)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_product(&self, id: Uuid) -> StoreResult<bool> {
        let res = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn count_products(&self) -> StoreResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
