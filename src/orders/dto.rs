use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{LineItem, Order, OrderDraft};
use crate::{error::AppError, products::dto::ProductView, validate};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub title: String,
    pub customer_name: String,
    pub email: Option<String>,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub delivery_charge: Option<f64>,
    pub payment_method: Option<String>,
    #[serde(default)]
    pub products: Vec<LineItem>,
    pub total_amount: f64,
    pub total_profit: f64,
}

impl NewOrder {
    pub fn validate(&mut self) -> Result<(), AppError> {
        validate::required_text("title", &mut self.title)?;
        validate::required_text("customerName", &mut self.customer_name)?;
        validate::required_text("phone", &mut self.phone)?;
        validate::required_text("address", &mut self.address)?;
        validate::optional_text(&mut self.email);
        validate::optional_text(&mut self.payment_method);
        validate::optional_amount("deliveryCharge", self.delivery_charge)?;
        Ok(())
    }

    /// Draft with the client totals; pricing replaces them once checked.
    pub fn into_draft(self) -> OrderDraft {
        OrderDraft {
            title: self.title,
            customer_name: self.customer_name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            delivery_charge: self.delivery_charge.unwrap_or(0.0),
            payment_method: self.payment_method,
            products: self.products,
            total_amount: self.total_amount,
            total_profit: self.total_profit,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPatch {
    pub title: Option<String>,
    pub customer_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub delivery_charge: Option<f64>,
    pub payment_method: Option<String>,
    pub products: Option<Vec<LineItem>>,
    pub total_amount: Option<f64>,
    pub total_profit: Option<f64>,
}

impl OrderPatch {
    pub fn validate(&mut self) -> Result<(), AppError> {
        for (field, value) in [
            ("title", &mut self.title),
            ("customerName", &mut self.customer_name),
            ("phone", &mut self.phone),
            ("address", &mut self.address),
        ] {
            if let Some(v) = value.as_mut() {
                validate::required_text(field, v)?;
            }
        }
        validate::patch_text(&mut self.email);
        validate::patch_text(&mut self.payment_method);
        validate::optional_amount("deliveryCharge", self.delivery_charge)?;
        Ok(())
    }

    /// Whether applying the patch can change the order's totals.
    pub fn touches_pricing(&self) -> bool {
        self.products.is_some()
            || self.delivery_charge.is_some()
            || self.total_amount.is_some()
            || self.total_profit.is_some()
    }

    /// Copies the patched fields onto `draft`. A blank email or payment method
    /// clears it.
    pub fn apply_details(&mut self, draft: &mut OrderDraft) {
        if let Some(v) = self.title.take() {
            draft.title = v;
        }
        if let Some(v) = self.customer_name.take() {
            draft.customer_name = v;
        }
        if let Some(v) = self.email.take() {
            draft.email = validate::cleared(v);
        }
        if let Some(v) = self.phone.take() {
            draft.phone = v;
        }
        if let Some(v) = self.address.take() {
            draft.address = v;
        }
        if let Some(v) = self.payment_method.take() {
            draft.payment_method = validate::cleared(v);
        }
        if let Some(v) = self.delivery_charge {
            draft.delivery_charge = v;
        }
        if let Some(v) = self.products.take() {
            draft.products = v;
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemView {
    /// `null` once the product has been deleted.
    pub product: Option<ProductView>,
    pub quantity: i32,
    pub adjusted_price: Option<f64>,
    pub buying_price: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: Uuid,
    pub title: String,
    pub customer_name: String,
    pub email: Option<String>,
    pub phone: String,
    pub address: String,
    pub delivery_charge: f64,
    pub payment_method: Option<String>,
    pub products: Vec<LineItemView>,
    pub total_amount: f64,
    pub total_profit: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl OrderView {
    pub fn new(o: Order, products: Vec<LineItemView>) -> Self {
        Self {
            id: o.id,
            title: o.title,
            customer_name: o.customer_name,
            email: o.email,
            phone: o.phone,
            address: o.address,
            delivery_charge: o.delivery_charge,
            payment_method: o.payment_method,
            products,
            total_amount: o.total_amount,
            total_profit: o.total_profit,
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}
