//! The access gate: API-key middleware and the `CurrentUser` extractor.
//!
//! Per request: `UNCHECKED → EXEMPT | UNAUTHENTICATED | AUTHENTICATED`.
//! Exempt paths bypass the credential check entirely; everything else needs
//! an `x-api-key` header matching a stored user. The resolved user travels
//! to handlers in request extensions, never as ambient mutable state.

use std::sync::Arc;

use axum::{
  extract::{FromRequestParts, Request, State},
  http::request::Parts,
  middleware::Next,
  response::{IntoResponse, Response},
};
use phrasebook_core::{store::CatalogStore, user::User};

use crate::error::ApiError;

/// Header carrying the opaque API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Path prefixes reachable without a credential: the docs routes, the schema
/// document, and registration. The status endpoint `/` is exempted by exact
/// match — as a prefix it would exempt every path.
pub const EXEMPT_PREFIXES: &[&str] =
  &["/docs", "/openapi.json", "/redoc", "/users/register"];

fn is_exempt(path: &str) -> bool {
  path == "/" || EXEMPT_PREFIXES.iter().any(|p| path.starts_with(p))
}

/// Identity attached to authenticated requests.
#[derive(Debug, Clone)]
pub struct AuthContext {
  pub user:    User,
  pub api_key: String,
}

/// Gate middleware. One point-in-time store lookup per non-exempt request;
/// a credential revoked mid-flight may race, which the design accepts.
pub async fn require_api_key<S>(
  State(store): State<Arc<S>>,
  mut req: Request,
  next: Next,
) -> Response
where
  S: CatalogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if is_exempt(req.uri().path()) {
    return next.run(req).await;
  }

  let Some(api_key) = req
    .headers()
    .get(API_KEY_HEADER)
    .and_then(|v| v.to_str().ok())
    .map(str::to_owned)
  else {
    return ApiError::Unauthorized.into_response();
  };

  let user = match store.user_by_api_key(&api_key).await {
    Ok(Some(user)) => user,
    Ok(None) => {
      tracing::debug!(path = %req.uri().path(), "rejected unknown api key");
      return ApiError::Unauthorized.into_response();
    }
    Err(e) => return ApiError::store(e).into_response(),
  };

  req.extensions_mut().insert(AuthContext { user, api_key });
  next.run(req).await
}

/// Extractor handing handlers the authenticated user.
///
/// Fails with 401 when used on a request that never passed the gate (an
/// exempt route asking for identity, or a route mounted outside the layer).
pub struct CurrentUser(pub User);

impl<St: Send + Sync> FromRequestParts<St> for CurrentUser {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &St,
  ) -> Result<Self, Self::Rejection> {
    parts
      .extensions
      .get::<AuthContext>()
      .map(|ctx| CurrentUser(ctx.user.clone()))
      .ok_or(ApiError::Unauthorized)
  }
}
