//! JSON REST API for the Phrasebook idiom catalog.
//!
//! Exposes an axum [`Router`] backed by any
//! [`phrasebook_core::store::CatalogStore`]. Every route except the status
//! endpoint and registration sits behind the API-key gate; the gate runs
//! before the CORS layer so unauthenticated requests never reach business
//! logic.

pub mod auth;
pub mod error;
pub mod idioms;
pub mod users;

use std::sync::Arc;

use axum::{
  Json, Router, middleware,
  routing::{get, patch, post},
};
use phrasebook_core::store::CatalogStore;
use serde::Deserialize;
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::ApiError;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` merged with
/// `PHRASEBOOK_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: std::path::PathBuf,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8000 }
fn default_store_path() -> std::path::PathBuf { "phrasebook.db".into() }

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised router for `store`.
///
/// Layer order matters: the access gate is added last so it runs first,
/// ahead of the permissive CORS layer and every handler.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: CatalogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/", get(status))
    // Idioms
    .route("/idioms/", get(idioms::list::<S>).post(idioms::create::<S>))
    .route("/idioms/random", get(idioms::random::<S>))
    .route("/idioms/favorites", get(idioms::favorites::<S>))
    .route("/idioms/categories", get(idioms::categories::<S>))
    .route("/idioms/{id}/upvote", post(idioms::upvote::<S>))
    .route("/idioms/{id}/downvote", post(idioms::downvote::<S>))
    .route("/idioms/{id}", patch(idioms::update::<S>))
    // Users
    .route("/users/register", post(users::register::<S>))
    .route("/users/me", get(users::me))
    .layer(CorsLayer::permissive())
    .layer(middleware::from_fn_with_state(
      store.clone(),
      auth::require_api_key::<S>,
    ))
    .layer(TraceLayer::new_for_http())
    .with_state(store)
}

/// `GET /` — gate-exempt health/status endpoint.
async fn status() -> Json<serde_json::Value> {
  Json(json!({ "status": "ok" }))
}
