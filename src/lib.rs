//! Recipe Box Backend
//!
//! REST backend for recipe management: recipes with images and nutritional
//! data, stored in SQLite-backed document and blob stores.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod ingest;
pub mod models;
pub mod recipes;
pub mod search;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use db::{DocumentStore, SqliteBlobStore, SqliteDocumentStore};
use recipes::RecipeService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub recipes: Arc<RecipeService>,
    pub docs: Arc<dyn DocumentStore>,
    pub blobs: Arc<SqliteBlobStore>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire the SQLite stores into the recipe service.
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        let docs: Arc<dyn DocumentStore> = Arc::new(SqliteDocumentStore::new(pool.clone()));
        let blobs = Arc::new(SqliteBlobStore::new(pool, config.public_base_url.clone()));
        let recipes = Arc::new(RecipeService::new(docs.clone(), blobs.clone()));

        Self {
            recipes,
            docs,
            blobs,
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone PSK for the auth layer
    let psk = state.config.api_psk.clone();

    let api_routes = Router::new()
        .route("/recipe", post(api::create_recipe).get(api::list_recipes))
        .route(
            "/recipe/{id}",
            get(api::get_recipe)
                .put(api::update_recipe)
                .delete(api::delete_recipe),
        )
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Images and health check (no auth required)
    let public_routes = Router::new()
        .route("/images/{*path}", get(api::get_image))
        .route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(public_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
