use std::cmp::Ordering;

use tracing::debug;

use super::{
    dto::Stats,
    repo_types::{OrderTotals, SourceProfit},
};
use crate::{error::AppError, orders::pricing::round_cents, store::Store};

/// Takes one snapshot of the dashboard figures. Any failed read fails the whole call.
pub async fn compute(store: &dyn Store) -> Result<Stats, AppError> {
    let (products, sources, totals, by_source) = tokio::try_join!(
        store.count_products(),
        store.count_sources(),
        store.order_totals(),
        store.profit_by_source(),
    )
    .map_err(|e| AppError::internal("Failed to fetch statistics", e))?;

    let stats = summarize(products, sources, totals, by_source);
    debug!(
        orders = stats.total_orders,
        sales = stats.total_sales,
        "statistics computed"
    );
    Ok(stats)
}

pub fn summarize(
    total_products: i64,
    total_sources: i64,
    totals: OrderTotals,
    mut by_source: Vec<SourceProfit>,
) -> Stats {
    let average_order_value = if totals.orders > 0 {
        totals.sales / totals.orders as f64
    } else {
        0.0
    };

    for entry in &mut by_source {
        entry.total_profit = round_cents(entry.total_profit);
    }
    by_source.sort_by(|a, b| {
        b.total_profit
            .partial_cmp(&a.total_profit)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });

    Stats {
        total_products,
        total_orders: totals.orders,
        total_sources,
        total_sales: round_cents(totals.sales),
        total_products_sold: totals.items_sold,
        total_profit: round_cents(totals.profit),
        average_order_value: round_cents(average_order_value),
        profit_by_source: by_source,
    }
}
