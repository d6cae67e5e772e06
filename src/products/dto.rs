use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::Product;
use crate::{error::AppError, sources::repo_types::Source, validate};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub discount_price: Option<f64>,
    pub buying_price: f64,
    pub source: Uuid,
    pub image: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
}

impl NewProduct {
    pub fn validate(&mut self) -> Result<(), AppError> {
        validate::required_text("name", &mut self.name)?;
        validate::amount("price", self.price)?;
        validate::optional_amount("discountPrice", self.discount_price)?;
        validate::amount("buyingPrice", self.buying_price)?;
        validate::optional_text(&mut self.image);
        validate::optional_text(&mut self.description);
        validate::optional_text(&mut self.short_description);
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub discount_price: Option<f64>,
    pub buying_price: Option<f64>,
    pub source: Option<Uuid>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
}

impl ProductPatch {
    pub fn validate(&mut self) -> Result<(), AppError> {
        if let Some(name) = self.name.as_mut() {
            validate::required_text("name", name)?;
        }
        validate::optional_amount("price", self.price)?;
        validate::optional_amount("discountPrice", self.discount_price)?;
        validate::optional_amount("buyingPrice", self.buying_price)?;
        validate::patch_text(&mut self.image);
        validate::patch_text(&mut self.description);
        validate::patch_text(&mut self.short_description);
        Ok(())
    }
}

/// A product with its source populated. `source` is `null` once the
/// referenced source has been deleted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub discount_price: Option<f64>,
    pub buying_price: f64,
    pub source: Option<Source>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl ProductView {
    pub fn new(p: Product, source: Option<Source>) -> Self {
        Self {
            id: p.id,
            name: p.name,
            price: p.price,
            discount_price: p.discount_price,
            buying_price: p.buying_price,
            source,
            image: p.image,
            description: p.description,
            short_description: p.short_description,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}
