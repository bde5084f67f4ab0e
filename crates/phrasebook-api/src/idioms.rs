//! Handlers for `/idioms` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/idioms/` | `page, limit(≤50), text, category, sort` |
//! | `GET`   | `/idioms/random` | `page, limit(≤50), seed` |
//! | `GET`   | `/idioms/favorites` | `page, limit(≤50)` |
//! | `GET`   | `/idioms/categories` | sorted distinct category values |
//! | `POST`  | `/idioms/` | bulk create, 201 with no body |
//! | `POST`  | `/idioms/:id/upvote` | 404 if not found |
//! | `POST`  | `/idioms/:id/downvote` | 404 if not found |
//! | `PATCH` | `/idioms/:id` | favorite flag only |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
};
use phrasebook_core::{
  idiom::{Idiom, IdiomPatch, NewIdiom},
  query::{DEFAULT_PAGE_SIZE, IdiomQuery, MAX_PAGE_SIZE, Page, Sort},
  store::CatalogStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

const IDIOM_NOT_FOUND: &str = "Idiom not found";

// ─── Boundary validation ─────────────────────────────────────────────────────

/// Validate page/limit at the boundary: over-ceiling limits are rejected,
/// never clamped, and page numbering is 1-based.
fn page_window(page: Option<u32>, limit: Option<u32>) -> Result<Page, ApiError> {
  let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE);
  if limit > MAX_PAGE_SIZE {
    return Err(ApiError::Unprocessable(format!(
      "limit must be at most {MAX_PAGE_SIZE}"
    )));
  }

  let page = page.unwrap_or(1);
  if page == 0 {
    return Err(ApiError::Unprocessable("page must be at least 1".to_string()));
  }

  Ok(Page::new(page, limit))
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  pub page:     Option<u32>,
  pub limit:    Option<u32>,
  /// Free-text filter; surrounding whitespace ignored, empty means none.
  pub text:     Option<String>,
  /// Comma-separated category values matched against `context_diversity`.
  pub category: Option<String>,
  /// `frequency` | `-frequency` | `imagery` | `-imagery`; anything else
  /// falls back to alphabetical.
  pub sort:     Option<String>,
}

/// `GET /idioms/`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Idiom>>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let query = IdiomQuery {
    page:       page_window(params.page, params.limit)?,
    text:       params
      .text
      .as_deref()
      .map(str::trim)
      .filter(|t| !t.is_empty())
      .map(str::to_owned),
    categories: params
      .category
      .as_deref()
      .map(|s| {
        s.split(',')
          .map(str::trim)
          .filter(|c| !c.is_empty())
          .map(str::to_owned)
          .collect()
      })
      .unwrap_or_default(),
    sort:       params.sort.as_deref().and_then(Sort::parse),
  };

  let idioms = store.list_idioms(&query).await.map_err(ApiError::store)?;
  Ok(Json(idioms))
}

// ─── Random ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct RandomParams {
  pub page:  Option<u32>,
  pub limit: Option<u32>,
  pub seed:  Option<i64>,
}

/// `GET /idioms/random` — seed-stable sampling when `seed` is supplied.
pub async fn random<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<RandomParams>,
) -> Result<Json<Vec<Idiom>>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let page = page_window(params.page, params.limit)?;
  let idioms = store
    .list_random(page, params.seed)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(idioms))
}

// ─── Favorites ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct FavoritesParams {
  pub page:  Option<u32>,
  pub limit: Option<u32>,
}

/// `GET /idioms/favorites`
pub async fn favorites<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<FavoritesParams>,
) -> Result<Json<Vec<Idiom>>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let page = page_window(params.page, params.limit)?;
  let idioms = store.list_favorites(page).await.map_err(ApiError::store)?;
  Ok(Json(idioms))
}

// ─── Categories ──────────────────────────────────────────────────────────────

/// `GET /idioms/categories`
pub async fn categories<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<String>>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let categories = store.list_categories().await.map_err(ApiError::store)?;
  Ok(Json(categories))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /idioms/` — bulk insert, all-or-nothing.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(payload): Json<Vec<NewIdiom>>,
) -> Result<StatusCode, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store.add_idioms(payload).await.map_err(ApiError::store)?;
  Ok(StatusCode::CREATED)
}

// ─── Votes ───────────────────────────────────────────────────────────────────

/// `POST /idioms/:id/upvote`
pub async fn upvote<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Idiom>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .upvote(id)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(IDIOM_NOT_FOUND.to_string()))
}

/// `POST /idioms/:id/downvote`
pub async fn downvote<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Idiom>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .downvote(id)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(IDIOM_NOT_FOUND.to_string()))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PATCH /idioms/:id` — body `{"favorite": bool}`; only the favorite flag
/// is externally mutable.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(patch): Json<IdiomPatch>,
) -> Result<Json<Idiom>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .patch_idiom(id, patch)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(IDIOM_NOT_FOUND.to_string()))
}
