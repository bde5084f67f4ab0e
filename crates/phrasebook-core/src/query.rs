//! Query types for the idiom listing engine.
//!
//! Pagination and filter validation happen at the HTTP boundary; by the time
//! an [`IdiomQuery`] reaches a store, `page >= 1` and `limit <= 50` hold.

/// Default page size when the caller does not supply a `limit`.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Hard ceiling on `limit`. Requests above it are rejected at the boundary
/// with a 422, never clamped.
pub const MAX_PAGE_SIZE: u32 = 50;

// ─── Page ────────────────────────────────────────────────────────────────────

/// A 1-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
  pub page:  u32,
  pub limit: u32,
}

impl Page {
  pub fn new(page: u32, limit: u32) -> Self { Self { page, limit } }

  /// Number of rows to skip: `(page - 1) * limit`.
  pub fn offset(&self) -> u64 {
    u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
  }
}

impl Default for Page {
  fn default() -> Self {
    Self { page: 1, limit: DEFAULT_PAGE_SIZE }
  }
}

// ─── Sort ────────────────────────────────────────────────────────────────────

/// Sortable ranking over the two numeric metrics. Absent (or unrecognized
/// input, which parses to `None`) means the default alphabetical order.
///
/// Every order, including the default, carries the idiom id as an explicit
/// secondary key so ties cannot reshuffle rows across pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sort {
  /// `frequency_of_use` ascending.
  Frequency,
  /// `frequency_of_use` descending.
  FrequencyDesc,
  /// `literal_transparency` ascending.
  Imagery,
  /// `literal_transparency` descending.
  ImageryDesc,
}

impl Sort {
  /// Parse the wire form (`frequency`, `-frequency`, `imagery`, `-imagery`).
  /// Anything else falls back to the default order.
  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "frequency" => Some(Sort::Frequency),
      "-frequency" => Some(Sort::FrequencyDesc),
      "imagery" => Some(Sort::Imagery),
      "-imagery" => Some(Sort::ImageryDesc),
      _ => None,
    }
  }
}

// ─── IdiomQuery ──────────────────────────────────────────────────────────────

/// Parameters for listing idioms.
///
/// `text` is a case-insensitive substring filter over the headline text.
/// `categories` matches idioms whose `context_diversity` contains ANY of the
/// values; when both filters are present, results must satisfy both.
#[derive(Debug, Clone, Default)]
pub struct IdiomQuery {
  pub page:       Page,
  pub text:       Option<String>,
  pub categories: Vec<String>,
  pub sort:       Option<Sort>,
}
