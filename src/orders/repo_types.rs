use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

/// One embedded order line. Serialized as-is into the `orders.products` jsonb column.
///
/// `adjusted_price` and `buying_price` are frozen when the line is written, so
/// the stored order keeps the unit price and unit cost it was sold at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product: Uuid,
    pub quantity: i32,
    pub adjusted_price: Option<f64>,
    /// Set from the catalog on write; a client-sent value is overwritten.
    #[serde(default)]
    pub buying_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub title: String,
    pub customer_name: String,
    pub email: Option<String>,
    pub phone: String,
    pub address: String,
    pub delivery_charge: f64,
    pub payment_method: Option<String>,
    pub products: Vec<LineItem>,
    pub total_amount: f64,
    pub total_profit: f64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Every writable field of an order; what create and update hand to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub title: String,
    pub customer_name: String,
    pub email: Option<String>,
    pub phone: String,
    pub address: String,
    pub delivery_charge: f64,
    pub payment_method: Option<String>,
    pub products: Vec<LineItem>,
    pub total_amount: f64,
    pub total_profit: f64,
}

impl From<Order> for OrderDraft {
    fn from(o: Order) -> Self {
        Self {
            title: o.title,
            customer_name: o.customer_name,
            email: o.email,
            phone: o.phone,
            address: o.address,
            delivery_charge: o.delivery_charge,
            payment_method: o.payment_method,
            products: o.products,
            total_amount: o.total_amount,
            total_profit: o.total_profit,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct OrderRow {
    pub id: Uuid,
    pub title: String,
    pub customer_name: String,
    pub email: Option<String>,
    pub phone: String,
    pub address: String,
    pub delivery_charge: f64,
    pub payment_method: Option<String>,
    pub products: Json<Vec<LineItem>>,
    pub total_amount: f64,
    pub total_profit: f64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<OrderRow> for Order {
    fn from(r: OrderRow) -> Self {
        Self {
            id: r.id,
            title: r.title,
            customer_name: r.customer_name,
            email: r.email,
            phone: r.phone,
            address: r.address,
            delivery_charge: r.delivery_charge,
            payment_method: r.payment_method,
            products: r.products.0,
            total_amount: r.total_amount,
            total_profit: r.total_profit,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
