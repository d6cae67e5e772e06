use serde::Serialize;

use super::repo_types::SourceProfit;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_products: i64,
    pub total_orders: i64,
    pub total_sources: i64,
    pub total_sales: f64,
    pub total_products_sold: i64,
    pub total_profit: f64,
    pub average_order_value: f64,
    pub profit_by_source: Vec<SourceProfit>,
}
