//! Printable invoices for stored orders.

pub mod handlers;
pub mod render;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
