//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Sequence fields (examples,
//! tag sets) are stored as compact JSON arrays. UUIDs are stored as
//! hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use phrasebook_core::{idiom::Idiom, user::User};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── String sequences ────────────────────────────────────────────────────────

pub fn encode_list(values: &[String]) -> Result<String> {
  Ok(serde_json::to_string(values)?)
}

pub fn decode_list(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from an `idioms` row.
pub struct RawIdiom {
  pub id:          String,
  pub text:        String,
  pub meaning:     String,
  pub explanation: String,
  pub examples:    String,

  pub frequency_of_use:       f64,
  pub literal_transparency:   f64,
  pub translation_difficulty: f64,

  pub category_theme:        String,
  pub sentiment:             String,
  pub context_diversity:     String,
  pub depiction:             String,
  pub alternative_depiction: String,
  pub meaning_depiction:     String,

  pub favorite:  bool,
  pub upvotes:   i64,
  pub downvotes: i64,

  pub created_at: String,
  pub updated_at: String,
}

impl RawIdiom {
  pub fn into_idiom(self) -> Result<Idiom> {
    Ok(Idiom {
      id: decode_uuid(&self.id)?,
      text: self.text,
      meaning: self.meaning,
      explanation: self.explanation,
      examples: decode_list(&self.examples)?,
      frequency_of_use: self.frequency_of_use,
      literal_transparency: self.literal_transparency,
      translation_difficulty: self.translation_difficulty,
      category_theme: decode_list(&self.category_theme)?,
      sentiment: decode_list(&self.sentiment)?,
      context_diversity: decode_list(&self.context_diversity)?,
      depiction: decode_list(&self.depiction)?,
      alternative_depiction: decode_list(&self.alternative_depiction)?,
      meaning_depiction: decode_list(&self.meaning_depiction)?,
      favorite: self.favorite,
      upvotes: self.upvotes,
      downvotes: self.downvotes,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub id:              String,
  pub installation_id: String,
  pub api_key:         String,
  pub created_at:      String,
  pub updated_at:      String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:              decode_uuid(&self.id)?,
      installation_id: self.installation_id,
      api_key:         self.api_key,
      created_at:      decode_dt(&self.created_at)?,
      updated_at:      decode_dt(&self.updated_at)?,
    })
  }
}
