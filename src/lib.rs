use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod service;
pub mod validation;

use crate::db::ItemStore;
use crate::service::ItemService;

/// Shared application state, cheap to clone (the store sits behind an Arc).
#[derive(Clone)]
pub struct AppState {
    pub items: ItemService,
}

impl AppState {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self {
            items: ItemService::new(store),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        // ── Health ──────────────────────────────────────────────────────────
        .route("/health", get(handlers::health))

        // ── Items CRUD ──────────────────────────────────────────────────────
        .route(
            "/items",
            get(handlers::items::list_items).post(handlers::items::create_item),
        )
        .route(
            "/items/:id",
            get(handlers::items::show_item)
                .put(handlers::items::update_item)
                .patch(handlers::items::update_item)
                .delete(handlers::items::delete_item),
        );

    Router::new()
        // Liveness check outside the API prefix
        .route("/health", get(handlers::health))
        .nest("/api", api)

        // ── Middleware ──────────────────────────────────────────────────────
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
