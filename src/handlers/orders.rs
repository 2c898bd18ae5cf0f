// src/handlers/orders.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AdminUser, i18n::Locale},
    models::orders::{ArrivalReport, CartQuote, ConfirmedOrder, OrderDetail, OrderStatus},
    services::cart::Cart,
};

// --- DTO: uma linha do carrinho ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLinePayload {
    pub item_id: Uuid,

    #[validate(range(min = 1, max = 1000000, message = "Inserisci una quantità valida."))]
    pub boxes: i32,
}

// --- DTO: carrinho inteiro ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartPayload {
    #[validate(nested)]
    pub lines: Vec<CartLinePayload>,

    #[validate(length(max = 500, message = "Note troppo lunghe."))]
    pub notes: Option<String>,
}

impl CartPayload {
    // Linhas repetidas do mesmo artigo são somadas
    fn to_cart(&self) -> Result<Cart, AppError> {
        let mut cart = Cart::new();
        for line in &self.lines {
            cart.add(line.item_id, line.boxes)?;
        }
        Ok(cart)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalsPayload {
    pub line_ids: Vec<Uuid>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrdersQuery {
    /// `OPEN` ou `RECEIVED`; sem filtro traz todos
    pub status: Option<OrderStatus>,
}

// ---
// Handler: quote_cart (não grava nada)
// ---
#[utoipa::path(
    post,
    path = "/api/cart/quote",
    tag = "Ordini",
    request_body = CartPayload,
    responses(
        (status = 200, description = "Totale e soglia minima", body = CartQuote),
        (status = 400, description = "Carrello vuoto o quantità non valida"),
        (status = 404, description = "Articolo non trovato")
    )
)]
pub async fn quote_cart(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CartPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let cart = payload.to_cart().map_err(|e| e.to_api_error(&locale))?;

    let quote = app_state
        .order_service
        .quote(&cart)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(quote)))
}

// ---
// Handler: confirm_order
// ---
#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Ordini",
    request_body = CartPayload,
    responses(
        (status = 201, description = "Ordine registrato, in arrivo aggiornato", body = ConfirmedOrder),
        (status = 400, description = "Carrello vuoto o quantità non valida"),
        (status = 401, description = "Non autorizzato"),
        (status = 502, description = "Errore dell'archivio")
    ),
    security(("api_jwt" = []))
)]
pub async fn confirm_order(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: AdminUser,
    Json(payload): Json<CartPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let cart = payload.to_cart().map_err(|e| e.to_api_error(&locale))?;

    let confirmed = app_state
        .order_service
        .confirm(&cart, payload.notes.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(confirmed)))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Ordini",
    params(OrdersQuery),
    responses(
        (status = 200, description = "Ordini con righe, più recenti prima", body = Vec<OrderDetail>)
    )
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<OrdersQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let orders = app_state
        .order_service
        .list_orders(query.status)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(orders)))
}

// ---
// Handler: receive_lines (conciliação de chegadas)
// ---
#[utoipa::path(
    post,
    path = "/api/orders/arrivals",
    tag = "Ordini",
    request_body = ArrivalsPayload,
    responses(
        (status = 200, description = "Righe arrivate e ordini chiusi", body = ArrivalReport),
        (status = 400, description = "Nessuna riga o riga già arrivata"),
        (status = 404, description = "Riga non trovata")
    ),
    security(("api_jwt" = []))
)]
pub async fn receive_lines(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: AdminUser,
    Json(payload): Json<ArrivalsPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let report = app_state
        .order_service
        .receive(&payload.line_ids)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(report)))
}
