//! Fixtures shared by the service and router tests.

use uuid::Uuid;

use crate::{
    orders::{dto::NewOrder, repo_types::LineItem},
    products::{self, dto::NewProduct, dto::ProductView},
    sources::{self, dto::NewSource, repo_types::Source},
    store::Store,
};

pub async fn seed_source(store: &dyn Store, name: &str) -> Source {
    sources::services::create(
        store,
        NewSource {
            name: name.into(),
            description: None,
        },
    )
    .await
    .expect("seed source")
}

pub async fn seed_product(
    store: &dyn Store,
    source_id: Uuid,
    name: &str,
    price: f64,
    buying_price: f64,
) -> ProductView {
    products::services::create(
        store,
        NewProduct {
            name: name.into(),
            price,
            discount_price: None,
            buying_price,
            source: source_id,
            image: None,
            description: None,
            short_description: None,
        },
    )
    .await
    .expect("seed product")
}

pub fn line(product: Uuid, quantity: i32) -> LineItem {
    LineItem {
        product,
        quantity,
        adjusted_price: None,
        buying_price: None,
    }
}

pub fn new_order(products: Vec<LineItem>, total_amount: f64, total_profit: f64) -> NewOrder {
    NewOrder {
        title: "Eid delivery".into(),
        customer_name: "Rahim Uddin".into(),
        email: None,
        phone: "+880 1700 000000".into(),
        address: "House 12, Road 5, Dhanmondi".into(),
        delivery_charge: None,
        payment_method: Some("Cash on delivery".into()),
        products,
        total_amount,
        total_profit,
    }
}
