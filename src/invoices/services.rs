use tracing::info;
use uuid::Uuid;

use super::render::Invoice;
use crate::{config::InvoiceConfig, error::AppError, orders, store::Store};

pub async fn build(
    store: &dyn Store,
    branding: &InvoiceConfig,
    order_id: Uuid,
) -> Result<Invoice, AppError> {
    let order = orders::services::get(store, order_id).await?;
    let invoice = Invoice::from_order(&order, branding)?;
    info!(%order_id, number = %invoice.number, "invoice rendered");
    Ok(invoice)
}
