//! Idiom — one catalog entry.
//!
//! An idiom pairs a phrase with linguistic metadata (meaning, examples,
//! metric scores, tag sets) and engagement counters. Entries are created in
//! bulk, voted on, and flagged as favorites; they are never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted catalog entry.
///
/// The metric scores are conventionally in `[0, 10]` but not validated here.
/// Tag sets are stored as ordered sequences; the order carries no meaning
/// beyond display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Idiom {
  pub id:          Uuid,
  pub text:        String,
  pub meaning:     String,
  pub explanation: String,
  pub examples:    Vec<String>,

  pub frequency_of_use:       f64,
  pub literal_transparency:   f64,
  pub translation_difficulty: f64,

  pub category_theme:        Vec<String>,
  pub sentiment:             Vec<String>,
  pub context_diversity:     Vec<String>,
  pub depiction:             Vec<String>,
  pub alternative_depiction: Vec<String>,
  pub meaning_depiction:     Vec<String>,

  pub favorite:  bool,
  pub upvotes:   i64,
  pub downvotes: i64,

  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Payload for creating an idiom. The store assigns `id`, the audit
/// timestamps, and zeroed vote counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIdiom {
  pub text:        String,
  pub meaning:     String,
  pub explanation: String,
  #[serde(default)]
  pub examples:    Vec<String>,

  #[serde(default)]
  pub frequency_of_use:       f64,
  #[serde(default)]
  pub literal_transparency:   f64,
  #[serde(default)]
  pub translation_difficulty: f64,

  #[serde(default)]
  pub category_theme:        Vec<String>,
  #[serde(default)]
  pub sentiment:             Vec<String>,
  #[serde(default)]
  pub context_diversity:     Vec<String>,
  #[serde(default)]
  pub depiction:             Vec<String>,
  #[serde(default)]
  pub alternative_depiction: Vec<String>,
  #[serde(default)]
  pub meaning_depiction:     Vec<String>,

  #[serde(default)]
  pub favorite: bool,
}

/// Partial update. Only the favorite flag is externally mutable; votes go
/// through their own endpoints and everything else is immutable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdiomPatch {
  #[serde(default)]
  pub favorite: Option<bool>,
}

impl NewIdiom {
  /// Promote the payload to a full [`Idiom`] with store-assigned identity
  /// and audit fields.
  pub fn into_idiom(self, id: Uuid, now: DateTime<Utc>) -> Idiom {
    Idiom {
      id,
      text: self.text,
      meaning: self.meaning,
      explanation: self.explanation,
      examples: self.examples,
      frequency_of_use: self.frequency_of_use,
      literal_transparency: self.literal_transparency,
      translation_difficulty: self.translation_difficulty,
      category_theme: self.category_theme,
      sentiment: self.sentiment,
      context_diversity: self.context_diversity,
      depiction: self.depiction,
      alternative_depiction: self.alternative_depiction,
      meaning_depiction: self.meaning_depiction,
      favorite: self.favorite,
      upvotes: 0,
      downvotes: 0,
      created_at: now,
      updated_at: now,
    }
  }
}
