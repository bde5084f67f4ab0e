//! [`SqliteStore`] — the SQLite implementation of [`CatalogStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{OptionalExtension as _, types::Value};
use uuid::Uuid;

use phrasebook_core::{
  idiom::{Idiom, IdiomPatch, NewIdiom},
  query::{IdiomQuery, Page, Sort},
  shuffle::Shuffle,
  store::CatalogStore,
  user::User,
};

use crate::{
  Error, Result,
  encode::{RawIdiom, RawUser, encode_dt, encode_list, encode_uuid},
  schema::SCHEMA,
};

// ─── Row plumbing ────────────────────────────────────────────────────────────

/// Column list for idiom SELECTs; order must match [`raw_idiom_from_row`].
const IDIOM_COLUMNS: &str = "\
  i.id, i.text, i.meaning, i.explanation, i.examples, \
  i.frequency_of_use, i.literal_transparency, i.translation_difficulty, \
  i.category_theme, i.sentiment, i.context_diversity, \
  i.depiction, i.alternative_depiction, i.meaning_depiction, \
  i.favorite, i.upvotes, i.downvotes, i.created_at, i.updated_at";

fn raw_idiom_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawIdiom> {
  Ok(RawIdiom {
    id:                     row.get(0)?,
    text:                   row.get(1)?,
    meaning:                row.get(2)?,
    explanation:            row.get(3)?,
    examples:               row.get(4)?,
    frequency_of_use:       row.get(5)?,
    literal_transparency:   row.get(6)?,
    translation_difficulty: row.get(7)?,
    category_theme:         row.get(8)?,
    sentiment:              row.get(9)?,
    context_diversity:      row.get(10)?,
    depiction:              row.get(11)?,
    alternative_depiction:  row.get(12)?,
    meaning_depiction:      row.get(13)?,
    favorite:               row.get(14)?,
    upvotes:                row.get(15)?,
    downvotes:              row.get(16)?,
    created_at:             row.get(17)?,
    updated_at:             row.get(18)?,
  })
}

fn raw_user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUser> {
  Ok(RawUser {
    id:              row.get(0)?,
    installation_id: row.get(1)?,
    api_key:         row.get(2)?,
    created_at:      row.get(3)?,
    updated_at:      row.get(4)?,
  })
}

/// ORDER BY clause for a listing query. Every variant carries the id as a
/// secondary key so ties cannot duplicate or drop rows across pages.
fn order_clause(sort: Option<Sort>) -> &'static str {
  match sort {
    None => "i.text ASC, i.id ASC",
    Some(Sort::Frequency) => "i.frequency_of_use ASC, i.id ASC",
    Some(Sort::FrequencyDesc) => "i.frequency_of_use DESC, i.id ASC",
    Some(Sort::Imagery) => "i.literal_transparency ASC, i.id ASC",
    Some(Sort::ImageryDesc) => "i.literal_transparency DESC, i.id ASC",
  }
}

/// Parameter values for one row of the idioms INSERT, in column order.
fn idiom_insert_values(idiom: &Idiom) -> Result<Vec<Value>> {
  Ok(vec![
    Value::Text(encode_uuid(idiom.id)),
    Value::Text(idiom.text.clone()),
    Value::Text(idiom.meaning.clone()),
    Value::Text(idiom.explanation.clone()),
    Value::Text(encode_list(&idiom.examples)?),
    Value::Real(idiom.frequency_of_use),
    Value::Real(idiom.literal_transparency),
    Value::Real(idiom.translation_difficulty),
    Value::Text(encode_list(&idiom.category_theme)?),
    Value::Text(encode_list(&idiom.sentiment)?),
    Value::Text(encode_list(&idiom.context_diversity)?),
    Value::Text(encode_list(&idiom.depiction)?),
    Value::Text(encode_list(&idiom.alternative_depiction)?),
    Value::Text(encode_list(&idiom.meaning_depiction)?),
    Value::Integer(i64::from(idiom.favorite)),
    Value::Integer(idiom.upvotes),
    Value::Integer(idiom.downvotes),
    Value::Text(encode_dt(idiom.created_at)),
    Value::Text(encode_dt(idiom.updated_at)),
  ])
}

const IDIOM_INSERT: &str = "INSERT INTO idioms (
   id, text, meaning, explanation, examples,
   frequency_of_use, literal_transparency, translation_difficulty,
   category_theme, sentiment, context_diversity,
   depiction, alternative_depiction, meaning_depiction,
   favorite, upvotes, downvotes, created_at, updated_at
 ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Phrasebook catalog store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted, and all
/// calls are serialised onto it, which is what makes the two-statement vote
/// read-back race-free.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch the whole catalog in id order. Seeded sampling permutes this set
  /// in process, so the database order must not matter.
  async fn all_idioms(&self) -> Result<Vec<Idiom>> {
    let raws: Vec<RawIdiom> = self
      .conn
      .call(|conn| {
        let sql = format!("SELECT {IDIOM_COLUMNS} FROM idioms i ORDER BY i.id ASC");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], raw_idiom_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawIdiom::into_idiom).collect()
  }

  /// Increment one vote counter and return the updated row. Both statements
  /// run in a single call on the shared connection; the increment itself is
  /// one atomic UPDATE, so concurrent votes cannot lose updates.
  async fn bump_counter(
    &self,
    id: Uuid,
    column: &'static str,
  ) -> Result<Option<Idiom>> {
    let id_str = encode_uuid(id);
    let now_str = encode_dt(Utc::now());

    let raw: Option<RawIdiom> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          &format!(
            "UPDATE idioms SET {column} = {column} + 1, updated_at = ?2 WHERE id = ?1"
          ),
          rusqlite::params![id_str, now_str],
        )?;
        if changed == 0 {
          return Ok(None);
        }

        let sql = format!("SELECT {IDIOM_COLUMNS} FROM idioms i WHERE i.id = ?1");
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], raw_idiom_from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawIdiom::into_idiom).transpose()
  }
}

// ─── CatalogStore impl ───────────────────────────────────────────────────────

impl CatalogStore for SqliteStore {
  type Error = Error;

  // ── Idioms — reads ────────────────────────────────────────────────────────

  async fn list_idioms(&self, query: &IdiomQuery) -> Result<Vec<Idiom>> {
    // SQLite LIKE is case-insensitive for ASCII, matching the reference
    // substring semantics.
    let text_pattern = query.text.as_deref().map(|t| format!("%{t}%"));
    let categories = query.categories.clone();
    let order = order_clause(query.sort);
    let limit = i64::from(query.page.limit);
    let offset = query.page.offset() as i64;

    let raws: Vec<RawIdiom> = self
      .conn
      .call(move |conn| {
        let mut conds: Vec<String> = vec![];
        let mut values: Vec<Value> = vec![];

        if let Some(pattern) = text_pattern {
          conds.push("i.text LIKE ?".to_string());
          values.push(Value::Text(pattern));
        }
        if !categories.is_empty() {
          // "contains any of": overlap between the supplied values and the
          // JSON-encoded context_diversity set.
          let marks = vec!["?"; categories.len()].join(", ");
          conds.push(format!(
            "EXISTS (SELECT 1 FROM json_each(i.context_diversity) je \
             WHERE je.value IN ({marks}))"
          ));
          values.extend(categories.into_iter().map(Value::Text));
        }

        let where_clause = if conds.is_empty() {
          String::new()
        } else {
          format!("WHERE {}", conds.join(" AND "))
        };

        let sql = format!(
          "SELECT {IDIOM_COLUMNS} FROM idioms i \
           {where_clause} ORDER BY {order} LIMIT ? OFFSET ?"
        );
        values.push(Value::Integer(limit));
        values.push(Value::Integer(offset));

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(values), raw_idiom_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawIdiom::into_idiom).collect()
  }

  async fn list_random(&self, page: Page, seed: Option<i64>) -> Result<Vec<Idiom>> {
    let Some(seed) = seed else {
      // Unseeded: a fresh draw per request is fine.
      let limit = i64::from(page.limit);
      let offset = page.offset() as i64;

      let raws: Vec<RawIdiom> = self
        .conn
        .call(move |conn| {
          let sql = format!(
            "SELECT {IDIOM_COLUMNS} FROM idioms i \
             ORDER BY RANDOM() LIMIT ? OFFSET ?"
          );
          let mut stmt = conn.prepare(&sql)?;
          let rows = stmt
            .query_map(rusqlite::params![limit, offset], raw_idiom_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?;

      return raws.into_iter().map(RawIdiom::into_idiom).collect();
    };

    // Seeded: the permutation is a pure function of (seed, id), computed in
    // process rather than with the database RNG, so the same seed always
    // reproduces the same order and enlarging the page size only extends
    // the prefix.
    let shuffle = Shuffle::from_seed(seed);
    let mut idioms = self.all_idioms().await?;
    idioms.sort_by_key(|idiom| (shuffle.key(idiom.id), idiom.id));

    Ok(
      idioms
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit as usize)
        .collect(),
    )
  }

  async fn list_favorites(&self, page: Page) -> Result<Vec<Idiom>> {
    let limit = i64::from(page.limit);
    let offset = page.offset() as i64;

    let raws: Vec<RawIdiom> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {IDIOM_COLUMNS} FROM idioms i \
           WHERE i.favorite = 1 ORDER BY i.text ASC, i.id ASC \
           LIMIT ? OFFSET ?"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![limit, offset], raw_idiom_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawIdiom::into_idiom).collect()
  }

  async fn list_categories(&self) -> Result<Vec<String>> {
    let categories: Vec<String> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT DISTINCT je.value \
           FROM idioms i, json_each(i.context_diversity) je \
           ORDER BY je.value ASC",
        )?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(categories)
  }

  // ── Idioms — writes ───────────────────────────────────────────────────────

  async fn add_idioms(&self, idioms: Vec<NewIdiom>) -> Result<()> {
    let now = Utc::now();
    let rows: Vec<Vec<Value>> = idioms
      .into_iter()
      .map(|input| {
        let idiom = input.into_idiom(Uuid::new_v4(), now);
        idiom_insert_values(&idiom)
      })
      .collect::<Result<_>>()?;

    // One transaction for the whole batch: a failed insert rolls back
    // everything already written.
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(IDIOM_INSERT)?;
          for values in rows {
            stmt.execute(rusqlite::params_from_iter(values))?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(())
  }

  async fn upvote(&self, id: Uuid) -> Result<Option<Idiom>> {
    self.bump_counter(id, "upvotes").await
  }

  async fn downvote(&self, id: Uuid) -> Result<Option<Idiom>> {
    self.bump_counter(id, "downvotes").await
  }

  async fn patch_idiom(&self, id: Uuid, patch: IdiomPatch) -> Result<Option<Idiom>> {
    let id_str = encode_uuid(id);
    let now_str = encode_dt(Utc::now());
    let favorite = patch.favorite;

    let raw: Option<RawIdiom> = self
      .conn
      .call(move |conn| {
        if let Some(flag) = favorite {
          let changed = conn.execute(
            "UPDATE idioms SET favorite = ?2, updated_at = ?3 WHERE id = ?1",
            rusqlite::params![id_str, flag, now_str],
          )?;
          if changed == 0 {
            return Ok(None);
          }
        }

        let sql = format!("SELECT {IDIOM_COLUMNS} FROM idioms i WHERE i.id = ?1");
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], raw_idiom_from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawIdiom::into_idiom).transpose()
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn register_user(&self, installation_id: String) -> Result<User> {
    let now = Utc::now();
    let user = User {
      id: Uuid::new_v4(),
      installation_id,
      // 122 random bits; the UNIQUE column constraint backstops the
      // negligible collision probability.
      api_key: Uuid::new_v4().hyphenated().to_string(),
      created_at: now,
      updated_at: now,
    };

    let id_str = encode_uuid(user.id);
    let installation = user.installation_id.clone();
    let api_key = user.api_key.clone();
    let created_str = encode_dt(user.created_at);
    let updated_str = encode_dt(user.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (id, installation_id, api_key, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, installation, api_key, created_str, updated_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(user)
  }

  async fn user_by_api_key(&self, api_key: &str) -> Result<Option<User>> {
    let key = api_key.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, installation_id, api_key, created_at, updated_at
               FROM users WHERE api_key = ?1",
              rusqlite::params![key],
              raw_user_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }
}
