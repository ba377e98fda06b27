// src/app.rs

use axum::{
    routing::{get, patch, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers};

// Monta o router completo. O main só faz o bind; os testes usam o mesmo router.
pub fn build_app(app_state: AppState) -> Router {
    let hub_routes = Router::new()
        .route("/create", post(handlers::hubs::create_hub))
        .route("/get", post(handlers::hubs::get_hub))
        .route("/getall", get(handlers::hubs::get_all_hubs));

    let sku_routes = Router::new()
        .route("/create", post(handlers::skus::create_sku))
        .route("/get", post(handlers::skus::get_skus));

    let inventory_routes = Router::new()
        .route("/create", post(handlers::inventory::create_inventory))
        .route("/upsert", patch(handlers::inventory::upsert_inventory))
        .route("/get", post(handlers::inventory::get_inventory))
        .route("/update-quantity", patch(handlers::inventory::update_quantity));

    let api_v1 = Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/hubs", hub_routes)
        .nest("/skus", sku_routes)
        .nest("/inventory", inventory_routes);

    Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/api/v1", api_v1)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}
