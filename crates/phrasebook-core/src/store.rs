//! The `CatalogStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `phrasebook-store-sqlite`). The API layer depends on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  idiom::{Idiom, IdiomPatch, NewIdiom},
  query::{IdiomQuery, Page},
  user::User,
};

/// Abstraction over the idiom and user stores.
///
/// Operations that target a single idiom by id return `Ok(None)` when the id
/// is unknown; the caller decides how to surface that. Vote increments are
/// atomic per idiom and batch inserts are all-or-nothing.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait CatalogStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Idioms — reads ────────────────────────────────────────────────────

  /// List idioms matching `query`, ordered and paginated. An empty page is
  /// an empty list, not an error.
  fn list_idioms<'a>(
    &'a self,
    query: &'a IdiomQuery,
  ) -> impl Future<Output = Result<Vec<Idiom>, Self::Error>> + Send + 'a;

  /// List idioms in pseudo-random order.
  ///
  /// With a seed the order is a deterministic, prefix-stable permutation of
  /// the whole catalog (see [`crate::shuffle::Shuffle`]); without one, each
  /// call draws a fresh order.
  fn list_random(
    &self,
    page: Page,
    seed: Option<i64>,
  ) -> impl Future<Output = Result<Vec<Idiom>, Self::Error>> + Send + '_;

  /// List idioms with `favorite = true`, alphabetical by text.
  fn list_favorites(
    &self,
    page: Page,
  ) -> impl Future<Output = Result<Vec<Idiom>, Self::Error>> + Send + '_;

  /// Every distinct value appearing in any idiom's `context_diversity`,
  /// sorted ascending, no duplicates.
  fn list_categories(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  // ── Idioms — writes ───────────────────────────────────────────────────

  /// Insert a batch of idioms in a single all-or-nothing transaction.
  fn add_idioms(
    &self,
    idioms: Vec<NewIdiom>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Increment `upvotes` by exactly one and return the updated idiom.
  fn upvote(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Idiom>, Self::Error>> + Send + '_;

  /// Increment `downvotes` by exactly one and return the updated idiom.
  fn downvote(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Idiom>, Self::Error>> + Send + '_;

  /// Apply a partial update (favorite flag only) and return the updated
  /// idiom. A patch with no fields set is a no-op read.
  fn patch_idiom(
    &self,
    id: Uuid,
    patch: IdiomPatch,
  ) -> impl Future<Output = Result<Option<Idiom>, Self::Error>> + Send + '_;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create a new user with a fresh unique api key. Never deduplicates by
  /// `installation_id`.
  fn register_user(
    &self,
    installation_id: String,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Look up the user owning `api_key`, if any. One point-in-time read per
  /// gated request.
  fn user_by_api_key<'a>(
    &'a self,
    api_key: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;
}
