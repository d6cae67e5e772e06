use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Stored catalog row; `source_id` is resolved to a `Source` on read.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub discount_price: Option<f64>,
    pub buying_price: f64,
    pub source_id: Uuid,
    pub image: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
