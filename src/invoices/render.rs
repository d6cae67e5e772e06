//! Invoice document model plus its HTML page and paginated PDF renderings.

use askama::Template;
use printpdf::{BuiltinFont, Mm, PdfDocument};
use time::{format_description::FormatItem, macros::format_description};

use crate::{config::InvoiceConfig, error::AppError, orders::dto::OrderView};

const DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year]");

/// Body lines per PDF page, excluding the footer.
pub const PAGE_BODY_LINES: usize = 40;
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const TOP_MM: f32 = 280.0;
const LINE_HEIGHT_MM: f32 = 6.0;
const FONT_SIZE: f32 = 9.0;
const DESCRIPTION_WIDTH: usize = 32;
const UNAVAILABLE: &str = "Unavailable product";

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceItem {
    pub description: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub total: f64,
}

#[derive(Debug, Clone)]
pub struct Invoice {
    pub number: String,
    pub date: String,
    pub title: String,
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub email: Option<String>,
    pub items: Vec<InvoiceItem>,
    pub sub_total: f64,
    pub delivery_fee: f64,
    pub total_due: f64,
    pub payment_method: String,
    pub branding: InvoiceConfig,
}

pub fn invoice_number(order_id: &uuid::Uuid) -> String {
    let hex = order_id.simple().to_string();
    format!("INV-{}", hex[..8].to_uppercase())
}

impl Invoice {
    pub fn from_order(order: &OrderView, branding: &InvoiceConfig) -> Result<Self, AppError> {
        let date = order
            .created_at
            .format(DATE_FORMAT)
            .map_err(|e| AppError::internal("Failed to render invoice", e))?;

        let items: Vec<InvoiceItem> = order
            .products
            .iter()
            .map(|line| {
                let unit_price = line
                    .adjusted_price
                    .or_else(|| line.product.as_ref().map(|p| p.price))
                    .unwrap_or(0.0);
                InvoiceItem {
                    description: line
                        .product
                        .as_ref()
                        .map(|p| p.name.clone())
                        .unwrap_or_else(|| UNAVAILABLE.to_string()),
                    quantity: line.quantity,
                    unit_price,
                    total: unit_price * f64::from(line.quantity),
                }
            })
            .collect();
        let sub_total = items.iter().map(|i| i.total).sum();

        Ok(Self {
            number: invoice_number(&order.id),
            date,
            title: order.title.clone(),
            customer_name: order.customer_name.clone(),
            phone: order.phone.clone(),
            address: order.address.clone(),
            email: order.email.clone(),
            items,
            sub_total,
            delivery_fee: order.delivery_charge,
            total_due: order.total_amount,
            payment_method: order
                .payment_method
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
            branding: branding.clone(),
        })
    }

    fn money(&self, v: f64) -> String {
        format!("{} {:.2}", self.branding.currency, v)
    }

    pub fn render_html(&self) -> Result<String, AppError> {
        let rows = self
            .items
            .iter()
            .map(|item| ItemRow {
                description: &item.description,
                quantity: item.quantity,
                unit_price: self.money(item.unit_price),
                total: self.money(item.total),
            })
            .collect();
        InvoiceTemplate {
            inv: self,
            email: self.email.as_deref(),
            rows,
            sub_total: self.money(self.sub_total),
            delivery_fee: self.money(self.delivery_fee),
            total_due: self.money(self.total_due),
        }
        .render()
        .map_err(|e| AppError::internal("Failed to render invoice", e))
    }

    fn text_lines(&self) -> Vec<String> {
        let b = &self.branding;
        let mut lines = vec![b.company_name.clone()];
        for extra in [&b.company_address, &b.company_website] {
            if !extra.is_empty() {
                lines.push(extra.clone());
            }
        }
        lines.push(String::new());
        lines.push(format!("INVOICE {}", self.number));
        lines.push(format!("Date: {}", self.date));
        lines.push(format!("Order: {}", self.title));
        lines.push(String::new());
        lines.push("Billed to:".into());
        lines.push(format!("  {}", self.customer_name));
        lines.push(format!("  {}", self.phone));
        lines.push(format!("  {}", self.address));
        if let Some(email) = &self.email {
            lines.push(format!("  {email}"));
        }
        lines.push(String::new());

        lines.push(format!(
            "{:<w$} {:>5} {:>14} {:>14}",
            "Description",
            "Qty",
            "Unit price",
            "Total",
            w = DESCRIPTION_WIDTH
        ));
        lines.push("-".repeat(DESCRIPTION_WIDTH + 36));
        for item in &self.items {
            lines.push(format!(
                "{:<w$} {:>5} {:>14} {:>14}",
                truncate(&item.description, DESCRIPTION_WIDTH),
                item.quantity,
                self.money(item.unit_price),
                self.money(item.total),
                w = DESCRIPTION_WIDTH
            ));
        }
        lines.push("-".repeat(DESCRIPTION_WIDTH + 36));

        let label_width = DESCRIPTION_WIDTH + 21;
        lines.push(format!("{:>label_width$} {:>14}", "Subtotal", self.money(self.sub_total)));
        lines.push(format!(
            "{:>label_width$} {:>14}",
            "Delivery fee",
            self.money(self.delivery_fee)
        ));
        lines.push(format!("{:>label_width$} {:>14}", "Total due", self.money(self.total_due)));
        lines.push(String::new());
        lines.push(format!("Payment method: {}", self.payment_method));
        lines.push(String::new());
        lines.push(b.thank_you.clone());
        lines.push(b.admin_name.clone());
        lines
    }

    /// Lines of each page; the last line of every page is its `Page N of M` footer.
    pub fn pages(&self) -> Vec<Vec<String>> {
        let lines = self.text_lines();
        let count = lines.len().div_ceil(PAGE_BODY_LINES);
        lines
            .chunks(PAGE_BODY_LINES)
            .enumerate()
            .map(|(i, body)| {
                let mut page = body.to_vec();
                page.push(format!("Page {} of {}", i + 1, count));
                page
            })
            .collect()
    }

    /// A4 PDF in a monospace font, one PDF page per entry of [`Invoice::pages`].
    pub fn render_pdf(&self) -> Result<Vec<u8>, AppError> {
        let pages = self.pages();
        let title = format!("Invoice {}", self.number);
        let (doc, first_page, first_layer) = PdfDocument::new(
            title.as_str(),
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );
        let font = doc.add_builtin_font(BuiltinFont::Courier).map_err(pdf_error)?;

        let mut targets = vec![(first_page, first_layer)];
        for _ in 1..pages.len() {
            targets.push(doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1"));
        }

        for (lines, (page, layer)) in pages.iter().zip(targets) {
            let layer = doc.get_page(page).get_layer(layer);
            let Some((footer, body)) = lines.split_last() else {
                continue;
            };
            for (row, line) in body.iter().enumerate() {
                let y = TOP_MM - row as f32 * LINE_HEIGHT_MM;
                layer.use_text(line.clone(), FONT_SIZE, Mm(MARGIN_MM), Mm(y), &font);
            }
            layer.use_text(footer.clone(), FONT_SIZE, Mm(MARGIN_MM), Mm(MARGIN_MM), &font);
        }

        doc.save_to_bytes().map_err(pdf_error)
    }
}

struct ItemRow<'a> {
    description: &'a str,
    quantity: i32,
    unit_price: String,
    total: String,
}

#[derive(Template)]
#[template(path = "invoice.html")]
struct InvoiceTemplate<'a> {
    inv: &'a Invoice,
    email: Option<&'a str>,
    rows: Vec<ItemRow<'a>>,
    sub_total: String,
    delivery_fee: String,
    total_due: String,
}

fn pdf_error(e: impl std::fmt::Debug) -> AppError {
    AppError::internal("Failed to render invoice", anyhow::anyhow!("{e:?}"))
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(width - 3).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{orders::dto::LineItemView, products::dto::ProductView};
    use time::macros::datetime;
    use uuid::Uuid;

    fn product(name: &str, price: f64) -> ProductView {
        let now = datetime!(2025-02-01 10:00 UTC);
        ProductView {
            id: Uuid::new_v4(),
            name: name.into(),
            price,
            discount_price: None,
            buying_price: price / 2.0,
            source: None,
            image: None,
            description: None,
            short_description: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn order(lines: Vec<LineItemView>) -> OrderView {
        let created = datetime!(2025-02-23 18:30 UTC);
        OrderView {
            id: Uuid::parse_str("a1b2c3d4-0000-4000-8000-000000000000").unwrap(),
            title: "Wedding set".into(),
            customer_name: "Nadia <Khan>".into(),
            email: None,
            phone: "01700000000".into(),
            address: "Mirpur 10".into(),
            delivery_charge: 60.0,
            payment_method: None,
            products: lines,
            total_amount: 160.0,
            total_profit: 50.0,
            created_at: created,
            updated_at: created,
        }
    }

    fn line(product: Option<ProductView>, quantity: i32, adjusted_price: Option<f64>) -> LineItemView {
        LineItemView {
            product,
            quantity,
            adjusted_price,
            buying_price: None,
        }
    }

    fn lines() -> Vec<LineItemView> {
        vec![
            line(Some(product("Katan saree", 30.0)), 2, Some(25.0)),
            line(None, 1, Some(50.0)),
        ]
    }

    fn invoice(lines: Vec<LineItemView>) -> Invoice {
        Invoice::from_order(&order(lines), &InvoiceConfig::default()).unwrap()
    }

    #[test]
    fn builds_invoice_from_order() {
        let invoice = invoice(lines());
        assert_eq!(invoice.number, "INV-A1B2C3D4");
        assert_eq!(invoice.date, "February 23, 2025");
        assert_eq!(invoice.items[0].description, "Katan saree");
        assert_eq!(invoice.items[0].total, 50.0);
        assert_eq!(invoice.items[1].description, "Unavailable product");
        assert_eq!(invoice.sub_total, 100.0);
        assert_eq!(invoice.delivery_fee, 60.0);
        assert_eq!(invoice.total_due, 160.0);
        assert_eq!(invoice.payment_method, "N/A");
    }

    #[test]
    fn html_escapes_customer_input() {
        let html = invoice(lines()).render_html().unwrap();
        assert!(html.contains("Nadia &lt;Khan&gt;"));
        assert!(!html.contains("<Khan>"));
        assert!(html.contains("Katan saree"));
        assert!(html.contains("BDT 160.00"));
        assert!(html.contains("Thank you for your business!"));
    }

    #[test]
    fn html_shows_email_only_when_present() {
        let mut o = order(lines());
        let without = Invoice::from_order(&o, &InvoiceConfig::default()).unwrap();
        assert!(!without.render_html().unwrap().contains("buyer@mail.test"));

        o.email = Some("buyer@mail.test".into());
        let with = Invoice::from_order(&o, &InvoiceConfig::default()).unwrap();
        assert!(with.render_html().unwrap().contains("buyer@mail.test"));
    }

    #[test]
    fn short_invoice_fits_one_page() {
        let pages = invoice(lines()).pages();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].last().map(String::as_str), Some("Page 1 of 1"));
        assert!(pages[0].iter().any(|l| l == "INVOICE INV-A1B2C3D4"));
    }

    #[test]
    fn long_invoice_spans_pages_with_footers() {
        let many = (0..100)
            .map(|i| line(Some(product(&format!("Item {i}"), 1.0)), 1, None))
            .collect();
        let invoice = invoice(many);
        assert_eq!(invoice.sub_total, 100.0);

        let pages = invoice.pages();
        let count = pages.len();
        assert!(count >= 3);
        for (i, page) in pages.iter().enumerate() {
            assert!(page.len() <= PAGE_BODY_LINES + 1);
            assert_eq!(page.last().unwrap(), &format!("Page {} of {}", i + 1, count));
        }
        // every item line lands on exactly one page
        let items = pages.iter().flatten().filter(|l| l.starts_with("Item ")).count();
        assert_eq!(items, 100);
    }

    #[test]
    fn renders_a_pdf_document() {
        let pdf = invoice(lines()).render_pdf().unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
        assert!(pdf.len() > 200);
    }

    #[test]
    fn long_descriptions_are_truncated() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long product name", 10), "a very ...");
    }
}
