use async_trait::async_trait;
use sqlx::types::Json;
use uuid::Uuid;

use super::repo_types::{Order, OrderDraft, OrderRow};
use crate::store::{PgStore, StoreResult};

const ORDER_COLUMNS: &str = "id, title, customer_name, email, phone, address, delivery_charge, \
     payment_method, products, total_amount, total_profit, created_at, updated_at";

#[async_trait]
pub trait OrderRepo: Send + Sync {
    async fn list_orders(&self) -> StoreResult<Vec<Order>>;
    async fn get_order(&self, id: Uuid) -> StoreResult<Option<Order>>;
    async fn insert_order(&self, draft: &OrderDraft) -> StoreResult<Order>;
    /// Overwrites every writable field; last write wins.
    async fn replace_order(&self, id: Uuid, draft: &OrderDraft) -> StoreResult<Option<Order>>;
    async fn delete_order(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
impl OrderRepo for PgStore {
    async fn list_orders(&self) -> StoreResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Order::from).collect())
    }

    async fn get_order(&self, id: Uuid) -> StoreResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Order::from))
    }

    async fn insert_order(&self, draft: &OrderDraft) -> StoreResult<Order> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            INSERT INTO orders (id, title, customer_name, email, phone, address, delivery_charge,
                                payment_method, products, total_amount, total_profit)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&draft.title)
        .bind(&draft.customer_name)
        .bind(&draft.email)
        .bind(&draft.phone)
        .bind(&draft.address)
        .bind(draft.delivery_charge)
        .bind(&draft.payment_method)
        .bind(Json(&draft.products))
        .bind(draft.total_amount)
        .bind(draft.total_profit)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn replace_order(&self, id: Uuid, draft: &OrderDraft) -> StoreResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            UPDATE orders
               SET title = $2,
                   customer_name = $3,
                   email = $4,
                   phone = $5,
                   address = $6,
                   delivery_charge = $7,
                   payment_method = $8,
                   products = $9,
                   total_amount = $10,
                   total_profit = $11,
                   updated_at = now()
             WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.customer_name)
        .bind(&draft.email)
        .bind(&draft.phone)
        .bind(&draft.address)
        .bind(draft.delivery_charge)
        .bind(&draft.payment_method)
        .bind(Json(&draft.products))
        .bind(draft.total_amount)
        .bind(draft.total_profit)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Order::from))
    }

    async fn delete_order(&self, id: Uuid) -> StoreResult<bool> {
        let res = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
