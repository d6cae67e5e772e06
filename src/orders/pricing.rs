//! Server-side order totals. Client totals are checked against these and the
//! recomputed values are what gets stored.

use std::collections::HashMap;

use uuid::Uuid;

use super::repo_types::LineItem;
use crate::{error::AppError, products::repo_types::Product, validate};

/// Largest accepted gap between a client total and the recomputed one.
pub const TOTAL_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub amount: f64,
    pub profit: f64,
}

pub fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Resolves every line against `catalog`: checks quantity and product,
/// freezes the unit price on lines that did not carry one and records the
/// product's current buying price as the line's unit cost.
pub fn freeze_lines(items: &mut [LineItem], catalog: &HashMap<Uuid, Product>) -> Result<(), AppError> {
    for (i, item) in items.iter_mut().enumerate() {
        if item.quantity < 1 {
            return Err(AppError::validation(format!(
                "products[{i}].quantity must be at least 1"
            )));
        }
        let product = catalog.get(&item.product).ok_or_else(|| {
            AppError::validation(format!(
                "products[{i}].product does not reference an existing product"
            ))
        })?;

        let unit = *item.adjusted_price.get_or_insert(product.price);
        validate::amount(&format!("products[{i}].adjustedPrice"), unit)?;
        item.buying_price = Some(product.buying_price);
    }
    Ok(())
}

/// Totals of already frozen lines, delivery included. Never consults the
/// catalog, so lines whose product was deleted still price. A line without a
/// recorded cost contributes no profit.
pub fn totals(items: &[LineItem], delivery_charge: f64) -> Totals {
    let (amount, profit) = items.iter().fold((0.0, 0.0), |(amount, profit), item| {
        let unit = item.adjusted_price.unwrap_or(0.0);
        let cost = item.buying_price.unwrap_or(unit);
        let qty = f64::from(item.quantity);
        (amount + unit * qty, profit + (unit - cost) * qty)
    });
    Totals {
        amount: round_cents(amount + delivery_charge),
        profit: round_cents(profit),
    }
}

/// [`freeze_lines`] followed by [`totals`].
pub fn price_order(
    items: &mut [LineItem],
    delivery_charge: f64,
    catalog: &HashMap<Uuid, Product>,
) -> Result<Totals, AppError> {
    freeze_lines(items, catalog)?;
    Ok(totals(items, delivery_charge))
}

/// Rejects a client-supplied total that disagrees with the recomputed one.
pub fn check_supplied(field: &str, supplied: f64, computed: f64) -> Result<(), AppError> {
    if !supplied.is_finite() || (supplied - computed).abs() > TOTAL_TOLERANCE + 1e-9 {
        return Err(AppError::validation(format!(
            "{field} {supplied:.2} does not match line items (expected {computed:.2})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn product(price: f64, buying_price: f64) -> Product {
        let now = OffsetDateTime::now_utc();
        Product {
            id: Uuid::new_v4(),
            name: "Lungi".into(),
            price,
            discount_price: None,
            buying_price,
            source_id: Uuid::new_v4(),
            image: None,
            description: None,
            short_description: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn item(product: Uuid, quantity: i32, adjusted_price: Option<f64>) -> LineItem {
        LineItem {
            product,
            quantity,
            adjusted_price,
            buying_price: None,
        }
    }

    fn catalog(products: &[&Product]) -> HashMap<Uuid, Product> {
        products.iter().map(|p| (p.id, (*p).clone())).collect()
    }

    #[test]
    fn totals_include_delivery_but_profit_does_not() {
        let a = product(100.0, 70.0);
        let b = product(30.0, 25.0);
        let mut items = vec![
            item(a.id, 2, None),
            item(b.id, 1, Some(35.0)),
        ];

        let totals = price_order(&mut items, 60.0, &catalog(&[&a, &b])).unwrap();
        assert_eq!(totals.amount, 2.0 * 100.0 + 35.0 + 60.0);
        assert_eq!(totals.profit, 2.0 * 30.0 + 10.0);
        // missing adjusted price is frozen at the catalog price
        assert_eq!(items[0].adjusted_price, Some(100.0));
        assert_eq!(items[0].buying_price, Some(70.0));
        assert_eq!(items[1].buying_price, Some(25.0));
    }

    #[test]
    fn client_cost_is_replaced_by_catalog_cost() {
        let p = product(10.0, 5.0);
        let mut items = vec![LineItem {
            buying_price: Some(10.0),
            ..item(p.id, 1, None)
        }];
        let totals = price_order(&mut items, 0.0, &catalog(&[&p])).unwrap();
        assert_eq!(items[0].buying_price, Some(5.0));
        assert_eq!(totals.profit, 5.0);
    }

    #[test]
    fn frozen_lines_price_without_the_catalog() {
        let items = vec![
            LineItem {
                buying_price: Some(5.0),
                ..item(Uuid::new_v4(), 2, Some(10.0))
            },
            LineItem {
                buying_price: Some(1.0),
                ..item(Uuid::new_v4(), 1, Some(4.0))
            },
        ];
        assert_eq!(
            totals(&items, 30.0),
            Totals {
                amount: 20.0 + 4.0 + 30.0,
                profit: 10.0 + 3.0
            }
        );
        // no recorded cost: no profit claimed
        assert_eq!(totals(&[item(Uuid::new_v4(), 3, Some(2.0))], 0.0).profit, 0.0);
    }

    #[test]
    fn empty_order_costs_only_delivery() {
        let totals = price_order(&mut [], 50.0, &HashMap::new()).unwrap();
        assert_eq!(totals, Totals { amount: 50.0, profit: 0.0 });
    }

    #[test]
    fn unknown_product_and_bad_quantity_are_rejected() {
        let p = product(10.0, 5.0);
        let cat = catalog(&[&p]);

        let mut unknown = vec![item(Uuid::new_v4(), 1, None)];
        let err = price_order(&mut unknown, 0.0, &cat).unwrap_err();
        assert!(err.to_string().contains("products[0].product"));

        let mut zero = vec![item(p.id, 0, None)];
        let err = price_order(&mut zero, 0.0, &cat).unwrap_err();
        assert!(err.to_string().contains("at least 1"));

        let mut negative = vec![item(p.id, 1, Some(-2.0))];
        assert!(price_order(&mut negative, 0.0, &cat).is_err());
    }

    #[test]
    fn supplied_totals_within_a_cent_are_accepted() {
        assert!(check_supplied("totalAmount", 100.0, 100.0).is_ok());
        assert!(check_supplied("totalAmount", 100.004, 100.0).is_ok());
        assert!(check_supplied("totalAmount", 100.01, 100.0).is_ok());
        let err = check_supplied("totalAmount", 120.0, 100.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "totalAmount 120.00 does not match line items (expected 100.00)"
        );
        assert!(check_supplied("totalProfit", f64::NAN, 0.0).is_err());
    }

    #[test]
    fn rounds_to_cents() {
        assert_eq!(round_cents(0.1 + 0.2), 0.3);
        assert_eq!(round_cents(75.0), 75.0);
        assert_eq!(round_cents(33.3333), 33.33);
    }
}
