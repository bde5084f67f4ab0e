//! User — one anonymous client installation.
//!
//! Registration is self-service and never deduplicates: posting the same
//! `installation_id` twice yields two distinct users with two distinct keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered client. The `api_key` is the bearer credential checked by
/// the access gate; it uniquely determines at most one user and is never
/// rotated or mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub id:              Uuid,
  pub installation_id: String,
  pub api_key:         String,

  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
