// src/handlers/documents.rs

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Local;
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    services::document_service::DocumentService,
};

fn pdf_response(filename: &str, bytes: Vec<u8>) -> Response {
    // Configura os Headers para o navegador baixar ou mostrar o PDF
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", filename)),
    ];
    (headers, bytes).into_response()
}

#[utoipa::path(
    get,
    path = "/api/suggestions/pdf",
    tag = "Pianificazione",
    responses(
        (status = 200, description = "Elenco da ordinare in pezzi", content_type = "application/pdf"),
        (status = 500, description = "Font non trovato")
    )
)]
pub async fn suggestions_pdf(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<Response, ApiError> {
    let ledger = app_state
        .inventory_service
        .snapshot()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let rows = DocumentService::suggestion_rows(&ledger.suggestions());
    let today = Local::now().date_naive();

    // genpdf é síncrono e pesado: roda fora do executor
    let documents = app_state.document_service.clone();
    let pdf_bytes = tokio::task::spawn_blocking(move || {
        documents.render("Scatole da ordinare", &rows, today)
    })
    .await
    .map_err(|e| AppError::from(anyhow::anyhow!(e)).to_api_error(&locale))?
    .map_err(|e| e.to_api_error(&locale))?;

    let filename = format!("ordine_suggerito_{}.pdf", today.format("%Y%m%d"));
    Ok(pdf_response(&filename, pdf_bytes))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}/pdf",
    tag = "Ordini",
    params(("id" = Uuid, Path, description = "ID dell'ordine")),
    responses(
        (status = 200, description = "Ordine in pezzi", content_type = "application/pdf"),
        (status = 404, description = "Ordine non trovato")
    )
)]
pub async fn order_pdf(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(order_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let order = app_state
        .order_service
        .get_order(order_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let rows = DocumentService::order_rows(&order);
    let date = order.header.created_at.with_timezone(&Local).date_naive();

    let documents = app_state.document_service.clone();
    let pdf_bytes = tokio::task::spawn_blocking(move || {
        documents.render("Ordine al fornitore", &rows, date)
    })
    .await
    .map_err(|e| AppError::from(anyhow::anyhow!(e)).to_api_error(&locale))?
    .map_err(|e| e.to_api_error(&locale))?;

    Ok(pdf_response(&format!("ordine_{}.pdf", order_id), pdf_bytes))
}
