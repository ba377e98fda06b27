// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Health ---
        handlers::health::health,

        // --- Hubs ---
        handlers::hubs::create_hub,
        handlers::hubs::get_hub,
        handlers::hubs::get_all_hubs,

        // --- SKUs ---
        handlers::skus::create_sku,
        handlers::skus::get_skus,

        // --- INVENTORY ---
        handlers::inventory::create_inventory,
        handlers::inventory::upsert_inventory,
        handlers::inventory::get_inventory,
        handlers::inventory::update_quantity,
    ),
    components(
        schemas(
            // --- Health ---
            handlers::health::HealthResponse,
            handlers::health::HealthStatus,

            // --- Hubs ---
            models::hub::Hub,
            handlers::hubs::CreateHubPayload,
            handlers::hubs::GetHubPayload,
            handlers::hubs::HubListResponse,

            // --- SKUs ---
            models::sku::Sku,
            handlers::skus::CreateSkuPayload,
            handlers::skus::GetSkusPayload,
            handlers::skus::SkuListResponse,

            // --- Inventory ---
            models::inventory::Inventory,
            models::inventory::InventoryView,
            handlers::inventory::InventoryLevelPayload,
            handlers::inventory::GetInventoryPayload,
            handlers::inventory::InventoryListResponse,
            handlers::inventory::UpdateQuantityPayload,
            handlers::inventory::UpdateQuantityResponse,
        )
    ),
    tags(
        (name = "Health", description = "Verificação de saúde do serviço"),
        (name = "Hubs", description = "Armazéns físicos"),
        (name = "SKUs", description = "Catálogo de SKUs por seller"),
        (name = "Inventory", description = "Saldos de estoque por SKU e hub")
    )
)]
pub struct ApiDoc;
