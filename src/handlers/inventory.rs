// src/handlers/inventory.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        validation::{validate_not_blank, validate_unit_cost},
    },
    config::AppState,
    middleware::{auth::AdminUser, i18n::Locale},
    models::inventory::{ItemPatch, ItemView, NewItem, QuantityField, ReorderSuggestion, ViewScope},
};

// Os payloads usam i64 para que valores negativos cheguem até a validação
fn to_count(value: i64) -> Result<i32, AppError> {
    i32::try_from(value).map_err(|_| AppError::InvalidQuantity)
}

fn to_count_opt(value: Option<i64>) -> Result<Option<i32>, AppError> {
    value.map(to_count).transpose()
}

// ---
// Query: lista
// ---
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Busca por código ou descrição
    pub q: Option<String>,
    /// `operational` (só visíveis, padrão) ou `planning` (todos)
    pub scope: Option<ViewScope>,
}

// ---
// Payload: CreateItem
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemPayload {
    #[validate(custom(function = "validate_not_blank"))]
    pub code: String,

    #[validate(custom(function = "validate_not_blank"))]
    pub description: String,

    #[validate(range(min = 1, max = 1000000, message = "Pz per scatola non valido."))]
    pub pieces_per_box: i64,

    #[validate(range(min = 0, max = 1000000, message = "Scatole inventario non valido."))]
    #[serde(default)]
    pub on_hand: i64,

    #[validate(range(min = 0, max = 1000000, message = "Il valore non può essere negativo."))]
    #[serde(default)]
    pub committed: i64,

    #[validate(range(min = 0, max = 1000000, message = "Il valore non può essere negativo."))]
    #[serde(default)]
    pub incoming: i64,

    #[validate(range(min = 0, max = 1000000, message = "Il valore non può essere negativo."))]
    #[serde(default)]
    pub minimum: i64,

    #[validate(range(min = 0, max = 1000000, message = "Il valore non può essere negativo."))]
    #[serde(default)]
    pub target: i64,

    #[validate(custom(function = "validate_unit_cost"))]
    #[serde(default)] // Se o JSON não tiver esse campo, assume 0
    pub unit_cost: Decimal,

    pub visible: Option<bool>,
}

impl CreateItemPayload {
    fn into_new_item(self) -> Result<NewItem, AppError> {
        Ok(NewItem {
            code: self.code,
            description: self.description,
            pieces_per_box: to_count(self.pieces_per_box)?,
            on_hand: to_count(self.on_hand)?,
            committed: to_count(self.committed)?,
            incoming: to_count(self.incoming)?,
            minimum: to_count(self.minimum)?,
            target: to_count(self.target)?,
            unit_cost: self.unit_cost,
            visible: self.visible.unwrap_or(true),
        })
    }
}

// ---
// Payload: UpdateItem (só os campos enviados mudam)
// ---
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemPayload {
    #[validate(custom(function = "validate_not_blank"))]
    pub code: Option<String>,

    #[validate(custom(function = "validate_not_blank"))]
    pub description: Option<String>,

    #[validate(range(min = 1, max = 1000000, message = "Pz per scatola non valido."))]
    pub pieces_per_box: Option<i64>,

    #[validate(range(min = 0, max = 1000000, message = "Il valore non può essere negativo."))]
    pub on_hand: Option<i64>,

    #[validate(range(min = 0, max = 1000000, message = "Il valore non può essere negativo."))]
    pub committed: Option<i64>,

    #[validate(range(min = 0, max = 1000000, message = "Il valore non può essere negativo."))]
    pub incoming: Option<i64>,

    #[validate(range(min = 0, max = 1000000, message = "Il valore non può essere negativo."))]
    pub minimum: Option<i64>,

    #[validate(range(min = 0, max = 1000000, message = "Il valore non può essere negativo."))]
    pub target: Option<i64>,

    #[validate(custom(function = "validate_unit_cost"))]
    pub unit_cost: Option<Decimal>,

    pub visible: Option<bool>,
}

impl UpdateItemPayload {
    fn into_patch(self) -> Result<ItemPatch, AppError> {
        Ok(ItemPatch {
            code: self.code,
            description: self.description,
            pieces_per_box: to_count_opt(self.pieces_per_box)?,
            on_hand: to_count_opt(self.on_hand)?,
            committed: to_count_opt(self.committed)?,
            incoming: to_count_opt(self.incoming)?,
            minimum: to_count_opt(self.minimum)?,
            target: to_count_opt(self.target)?,
            unit_cost: self.unit_cost,
            visible: self.visible,
        })
    }
}

// --- DTO: Carico / Scarico ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BoxesPayload {
    #[validate(range(min = 1, max = 1000000, message = "Inserisci una quantità valida."))]
    pub boxes: i64,
}

// --- DTO: ajuste de um campo de quantidade ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AdjustPayload {
    pub field: QuantityField,

    #[validate(range(min = -1000000, max = 1000000, message = "Inserisci una quantità valida."))]
    pub delta: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VisibilityPayload {
    pub visible: bool,
}

// ---
// Handler: get_all_items
// ---
#[utoipa::path(
    get,
    path = "/api/items",
    tag = "Inventario",
    params(ListQuery),
    responses(
        (status = 200, description = "Articoli filtrati, in ordine alfabetico", body = Vec<ItemView>)
    )
)]
pub async fn get_all_items(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let ledger = app_state
        .inventory_service
        .snapshot()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let items = ledger.list(query.q.as_deref().unwrap_or(""), query.scope.unwrap_or_default());
    Ok((StatusCode::OK, Json(items)))
}

// ---
// Handler: get_ranked_items (críticos primeiro)
// ---
#[utoipa::path(
    get,
    path = "/api/items/ranked",
    tag = "Inventario",
    params(ListQuery),
    responses(
        (status = 200, description = "Articoli per urgenza", body = Vec<ItemView>)
    )
)]
pub async fn get_ranked_items(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let ledger = app_state
        .inventory_service
        .snapshot()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ledger.ranked(query.scope.unwrap_or_default()))))
}

#[utoipa::path(
    get,
    path = "/api/items/{id}",
    tag = "Inventario",
    params(("id" = Uuid, Path, description = "ID dell'articolo")),
    responses(
        (status = 200, description = "Dettaglio", body = ItemView),
        (status = 404, description = "Articolo non trovato")
    )
)]
pub async fn get_item(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let view = app_state
        .inventory_service
        .view_item(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(view)))
}

// ---
// Handler: create_item
// ---
#[utoipa::path(
    post,
    path = "/api/items",
    tag = "Inventario",
    request_body = CreateItemPayload,
    responses(
        (status = 201, description = "Articolo creato", body = ItemView),
        (status = 400, description = "Dati non validi"),
        (status = 401, description = "Non autorizzato")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_item(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: AdminUser,
    Json(payload): Json<CreateItemPayload>,
) -> Result<impl IntoResponse, ApiError> {
    // Validação padrão do Validator
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let new_item = payload.into_new_item().map_err(|e| e.to_api_error(&locale))?;

    let item = app_state
        .inventory_service
        .create_item(new_item)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(app_state.inventory_service.view(&item))))
}

#[utoipa::path(
    patch,
    path = "/api/items/{id}",
    tag = "Inventario",
    request_body = UpdateItemPayload,
    params(("id" = Uuid, Path, description = "ID dell'articolo")),
    responses(
        (status = 200, description = "Articolo aggiornato", body = ItemView),
        (status = 400, description = "Dati non validi"),
        (status = 404, description = "Articolo non trovato")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_item(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateItemPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let patch = payload.into_patch().map_err(|e| e.to_api_error(&locale))?;

    let item = app_state
        .inventory_service
        .update_item(id, patch)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(app_state.inventory_service.view(&item))))
}

#[utoipa::path(
    delete,
    path = "/api/items/{id}",
    tag = "Inventario",
    params(("id" = Uuid, Path, description = "ID dell'articolo")),
    responses(
        (status = 204, description = "Articolo eliminato"),
        (status = 404, description = "Articolo non trovato")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_item(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .inventory_service
        .delete_item(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}

// --- CARICO ---
#[utoipa::path(
    post,
    path = "/api/items/{id}/load",
    tag = "Movimenti",
    request_body = BoxesPayload,
    params(("id" = Uuid, Path, description = "ID dell'articolo")),
    responses(
        (status = 200, description = "Nuovo saldo", body = ItemView),
        (status = 400, description = "Quantità non valida")
    )
)]
pub async fn load_item(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<BoxesPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let item = app_state
        .inventory_service
        .load(id, payload.boxes)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    // Retorna o novo saldo para o frontend atualizar a tela
    Ok((StatusCode::OK, Json(app_state.inventory_service.view(&item))))
}

// --- SCARICO ---
#[utoipa::path(
    post,
    path = "/api/items/{id}/unload",
    tag = "Movimenti",
    request_body = BoxesPayload,
    params(("id" = Uuid, Path, description = "ID dell'articolo")),
    responses(
        (status = 200, description = "Nuovo saldo", body = ItemView),
        (status = 400, description = "Quantità non valida o sotto zero")
    )
)]
pub async fn unload_item(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<BoxesPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let item = app_state
        .inventory_service
        .unload(id, payload.boxes)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(app_state.inventory_service.view(&item))))
}

#[utoipa::path(
    post,
    path = "/api/items/{id}/adjust",
    tag = "Movimenti",
    request_body = AdjustPayload,
    params(("id" = Uuid, Path, description = "ID dell'articolo")),
    responses(
        (status = 200, description = "Nuovo saldo", body = ItemView),
        (status = 400, description = "Quantità non valida o sotto zero")
    ),
    security(("api_jwt" = []))
)]
pub async fn adjust_item(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdjustPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let item = app_state
        .inventory_service
        .adjust(id, payload.field, payload.delta)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(app_state.inventory_service.view(&item))))
}

#[utoipa::path(
    put,
    path = "/api/items/{id}/visibility",
    tag = "Inventario",
    request_body = VisibilityPayload,
    params(("id" = Uuid, Path, description = "ID dell'articolo")),
    responses(
        (status = 200, description = "Visibilità aggiornata", body = ItemView)
    ),
    security(("api_jwt" = []))
)]
pub async fn set_visibility(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<VisibilityPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let item = app_state
        .inventory_service
        .set_visibility(id, payload.visible)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(app_state.inventory_service.view(&item))))
}

// --- SUGGERIMENTI D'ORDINE ---
#[utoipa::path(
    get,
    path = "/api/suggestions",
    tag = "Pianificazione",
    responses(
        (status = 200, description = "Quantità da ordinare per arrivare al target", body = Vec<ReorderSuggestion>)
    )
)]
pub async fn get_suggestions(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let ledger = app_state
        .inventory_service
        .snapshot()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ledger.suggestions())))
}
