//! Handlers for `/users` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/users/register` | gate-exempt; body `{"installation_id":"..."}` |
//! | `GET`  | `/users/me` | current authenticated user |

use std::sync::Arc;

use axum::{Json, extract::State};
use phrasebook_core::{store::CatalogStore, user::User};
use serde::Deserialize;

use crate::{auth::CurrentUser, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub installation_id: String,
}

/// `POST /users/register` — always creates a new user with a fresh key,
/// even for an `installation_id` seen before.
pub async fn register<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<Json<User>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let user = store
    .register_user(body.installation_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(user))
}

/// `GET /users/me` — the identity the gate resolved for this request.
pub async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
  Json(user)
}
