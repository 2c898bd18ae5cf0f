// src/routes.rs

use axum::{
    routing::{get, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers};

// Monta o router principal; as rotas de admin são protegidas pelo extrator AdminUser
pub fn app(app_state: AppState) -> Router {
    let item_routes = Router::new()
        .route("/api/items"
               ,get(handlers::inventory::get_all_items)
               .post(handlers::inventory::create_item)
        )
        .route("/api/items/ranked", get(handlers::inventory::get_ranked_items))
        .route("/api/items/{id}"
               ,get(handlers::inventory::get_item)
               .patch(handlers::inventory::update_item)
               .delete(handlers::inventory::delete_item)
        )
        .route("/api/items/{id}/load", post(handlers::inventory::load_item))
        .route("/api/items/{id}/unload", post(handlers::inventory::unload_item))
        .route("/api/items/{id}/adjust", post(handlers::inventory::adjust_item))
        .route("/api/items/{id}/visibility", put(handlers::inventory::set_visibility))
        .route("/api/suggestions", get(handlers::inventory::get_suggestions))
        .route("/api/suggestions/pdf", get(handlers::documents::suggestions_pdf));

    let order_routes = Router::new()
        .route("/api/cart/quote", post(handlers::orders::quote_cart))
        .route("/api/orders"
               ,get(handlers::orders::list_orders)
               .post(handlers::orders::confirm_order)
        )
        .route("/api/orders/arrivals", post(handlers::orders::receive_lines))
        .route("/api/orders/{id}/pdf", get(handlers::documents::order_pdf));

    // Combina tudo no router principal
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/dashboard", get(handlers::dashboard::get_summary))
        .merge(item_routes)
        .merge(order_routes)
        .with_state(app_state)
}
