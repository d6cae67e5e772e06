use std::collections::HashMap;

use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{LineItemView, NewOrder, OrderPatch, OrderView},
    pricing,
    repo_types::{LineItem, Order, OrderDraft},
};
use crate::{
    error::AppError,
    products::{self, repo_types::Product},
    store::Store,
};

fn product_ids(items: impl IntoIterator<Item = Uuid>) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = items.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

async fn catalog_for(
    store: &dyn Store,
    items: &[LineItem],
) -> Result<HashMap<Uuid, Product>, AppError> {
    let ids = product_ids(items.iter().map(|i| i.product));
    Ok(store
        .find_products(&ids)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect())
}

/// Resolves every line item's product, and each product's source.
pub(crate) async fn populate(
    store: &dyn Store,
    orders: Vec<Order>,
) -> Result<Vec<OrderView>, AppError> {
    let ids = product_ids(orders.iter().flat_map(|o| o.products.iter().map(|i| i.product)));
    let found = store.find_products(&ids).await?;
    let views: HashMap<Uuid, _> = products::services::populate(store, found)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    Ok(orders
        .into_iter()
        .map(|mut order| {
            let lines = std::mem::take(&mut order.products)
                .into_iter()
                .map(|item| LineItemView {
                    product: views.get(&item.product).cloned(),
                    quantity: item.quantity,
                    adjusted_price: item.adjusted_price,
                    buying_price: item.buying_price,
                })
                .collect();
            OrderView::new(order, lines)
        })
        .collect())
}

async fn populate_one(store: &dyn Store, order: Order) -> Result<OrderView, AppError> {
    let mut views = populate(store, vec![order]).await?;
    Ok(views.remove(0))
}

pub async fn list(store: &dyn Store) -> Result<Vec<OrderView>, AppError> {
    let orders = store.list_orders().await?;
    populate(store, orders).await
}

pub async fn get(store: &dyn Store, id: Uuid) -> Result<OrderView, AppError> {
    let order = store
        .get_order(id)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found"))?;
    populate_one(store, order).await
}

pub async fn create(store: &dyn Store, mut new: NewOrder) -> Result<OrderView, AppError> {
    new.validate()?;
    let mut draft = new.into_draft();

    let catalog = catalog_for(store, &draft.products).await?;
    let totals = pricing::price_order(&mut draft.products, draft.delivery_charge, &catalog)?;
    if let Err(e) = pricing::check_supplied("totalAmount", draft.total_amount, totals.amount)
        .and_then(|_| pricing::check_supplied("totalProfit", draft.total_profit, totals.profit))
    {
        warn!(error = %e, "order totals rejected");
        return Err(e);
    }
    draft.total_amount = totals.amount;
    draft.total_profit = totals.profit;

    let order = store.insert_order(&draft).await?;
    info!(order_id = %order.id, total = order.total_amount, "order created");
    populate_one(store, order).await
}

/// Applies a partial update. Totals are re-derived whenever the patch touches
/// line items, delivery or totals; supplied totals must agree with them.
/// Only lines sent in the patch are resolved against the catalog; stored lines
/// are priced from the values frozen on them.
pub async fn update(store: &dyn Store, id: Uuid, mut patch: OrderPatch) -> Result<OrderView, AppError> {
    patch.validate()?;
    let existing = store
        .get_order(id)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found"))?;

    let mut draft = OrderDraft::from(existing);
    let reprice = patch.touches_pricing();
    let new_lines = patch.products.is_some();
    patch.apply_details(&mut draft);

    if reprice {
        if new_lines {
            let catalog = catalog_for(store, &draft.products).await?;
            pricing::freeze_lines(&mut draft.products, &catalog)?;
        }
        let totals = pricing::totals(&draft.products, draft.delivery_charge);
        if let Some(supplied) = patch.total_amount {
            pricing::check_supplied("totalAmount", supplied, totals.amount)?;
        }
        if let Some(supplied) = patch.total_profit {
            pricing::check_supplied("totalProfit", supplied, totals.profit)?;
        }
        draft.total_amount = totals.amount;
        draft.total_profit = totals.profit;
    }

    let order = store
        .replace_order(id, &draft)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found"))?;
    info!(order_id = %id, repriced = reprice, "order updated");
    populate_one(store, order).await
}

pub async fn delete(store: &dyn Store, id: Uuid) -> Result<(), AppError> {
    if !store.delete_order(id).await? {
        return Err(AppError::not_found("Order not found"));
    }
    info!(order_id = %id, "order deleted");
    Ok(())
}
