use async_trait::async_trait;

use super::repo_types::{OrderTotals, SourceProfit};
use crate::store::{PgStore, StoreResult};

#[async_trait]
pub trait StatsRepo: Send + Sync {
    async fn order_totals(&self) -> StoreResult<OrderTotals>;
    /// Profit per source over all line items whose product and source still exist,
    /// using the unit price and cost frozen on each line.
    async fn profit_by_source(&self) -> StoreResult<Vec<SourceProfit>>;
}

#[async_trait]
impl StatsRepo for PgStore {
    async fn order_totals(&self) -> StoreResult<OrderTotals> {
        let totals = sqlx::query_as::<_, OrderTotals>(
            r#"
            SELECT COUNT(*)                              AS orders,
                   COALESCE(SUM(o.total_amount), 0)      AS sales,
                   COALESCE(SUM(o.total_profit), 0)      AS profit,
                   COALESCE(SUM(items.qty), 0)::BIGINT   AS items_sold
              FROM orders o
              LEFT JOIN LATERAL (
                    SELECT SUM((li->>'quantity')::BIGINT) AS qty
                      FROM jsonb_array_elements(o.products) li
                   ) items ON TRUE
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(totals)
    }

    async fn profit_by_source(&self) -> StoreResult<Vec<SourceProfit>> {
        let rows = sqlx::query_as::<_, SourceProfit>(
            r#"
            SELECT s.id   AS source_id,
                   s.name AS name,
                   SUM(
                       (COALESCE((li->>'adjustedPrice')::DOUBLE PRECISION, p.price)
                        - COALESCE((li->>'buyingPrice')::DOUBLE PRECISION, p.buying_price))
                       * (li->>'quantity')::DOUBLE PRECISION
                   )::DOUBLE PRECISION AS total_profit
              FROM orders o
             CROSS JOIN LATERAL jsonb_array_elements(o.products) li
              JOIN products p ON p.id = (li->>'product')::UUID
              JOIN sources s  ON s.id = p.source_id
             GROUP BY s.id, s.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
