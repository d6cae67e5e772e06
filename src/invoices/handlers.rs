use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::header,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::services;
use crate::{auth::AuthUser, error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices/:id", get(view_invoice))
        .route("/invoices/:id/download", get(download_invoice))
}

#[instrument(skip(state, id))]
pub async fn view_invoice(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Html<String>, AppError> {
    let Path(id) = id?;
    let invoice = services::build(state.store.as_ref(), &state.config.invoice, id).await?;
    Ok(Html(invoice.render_html()?))
}

#[instrument(skip(state, id))]
pub async fn download_invoice(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;
    let invoice = services::build(state.store.as_ref(), &state.config.invoice, id).await?;
    let pdf = invoice.render_pdf()?;
    let disposition = format!("attachment; filename=\"{}.pdf\"", invoice.number);
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    ))
}
