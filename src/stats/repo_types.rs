use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Aggregates over every stored order.
#[derive(Debug, Clone, Copy, Default, PartialEq, FromRow)]
pub struct OrderTotals {
    pub orders: i64,
    pub sales: f64,
    pub profit: f64,
    pub items_sold: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SourceProfit {
    pub source_id: Uuid,
    pub name: String,
    pub total_profit: f64,
}
