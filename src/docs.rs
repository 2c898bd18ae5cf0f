// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,

        // --- INVENTARIO ---
        handlers::inventory::get_all_items,
        handlers::inventory::get_ranked_items,
        handlers::inventory::get_item,
        handlers::inventory::create_item,
        handlers::inventory::update_item,
        handlers::inventory::delete_item,
        handlers::inventory::set_visibility,

        // --- MOVIMENTI ---
        handlers::inventory::load_item,
        handlers::inventory::unload_item,
        handlers::inventory::adjust_item,

        // --- PIANIFICAZIONE ---
        handlers::inventory::get_suggestions,
        handlers::documents::suggestions_pdf,

        // --- ORDINI ---
        handlers::orders::quote_cart,
        handlers::orders::confirm_order,
        handlers::orders::list_orders,
        handlers::orders::receive_lines,
        handlers::documents::order_pdf,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
    ),
    components(
        schemas(
            // --- Inventory ---
            models::inventory::Item,
            models::inventory::ItemView,
            models::inventory::StockLevel,
            models::inventory::QuantityField,
            models::inventory::ViewScope,
            models::inventory::ReorderSuggestion,

            // --- Orders ---
            models::orders::OrderStatus,
            models::orders::Order,
            models::orders::OrderLine,
            models::orders::OrderDetail,
            models::orders::QuoteLine,
            models::orders::CartQuote,
            models::orders::ConfirmedOrder,
            models::orders::ArrivalReport,

            // --- DASHBOARD ---
            models::dashboard::DashboardSummary,

            // --- Auth ---
            models::auth::LoginPayload,
            models::auth::AuthResponse,

            // --- Payloads ---
            handlers::inventory::CreateItemPayload,
            handlers::inventory::UpdateItemPayload,
            handlers::inventory::BoxesPayload,
            handlers::inventory::AdjustPayload,
            handlers::inventory::VisibilityPayload,
            handlers::orders::CartLinePayload,
            handlers::orders::CartPayload,
            handlers::orders::ArrivalsPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Accesso amministratore"),
        (name = "Inventario", description = "Anagrafica articoli e giacenze"),
        (name = "Movimenti", description = "Carico, scarico e rettifiche"),
        (name = "Pianificazione", description = "Suggerimenti di riordino"),
        (name = "Ordini", description = "Carrello, ordini al fornitore e arrivi"),
        (name = "Dashboard", description = "Indicatori del magazzino")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
