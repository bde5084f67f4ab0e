//! Integration tests for `SqliteStore` against an in-memory database.

use phrasebook_core::{
  idiom::{IdiomPatch, NewIdiom},
  query::{IdiomQuery, Page, Sort},
  store::CatalogStore,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn idiom(text: &str, contexts: &[&str], frequency: f64, imagery: f64) -> NewIdiom {
  NewIdiom {
    text: text.to_string(),
    meaning: format!("meaning of {text}"),
    explanation: format!("explanation of {text}"),
    examples: vec![format!("He said: {text}.")],
    frequency_of_use: frequency,
    literal_transparency: imagery,
    translation_difficulty: 5.0,
    category_theme: vec!["phrase".into()],
    sentiment: vec!["neutral".into()],
    context_diversity: contexts.iter().map(|c| c.to_string()).collect(),
    depiction: vec![],
    alternative_depiction: vec![],
    meaning_depiction: vec![],
    favorite: false,
  }
}

/// Eight entries mirroring the reference sample set; "All in a day's work"
/// is the only headline containing "work".
async fn seeded_store() -> SqliteStore {
  let s = store().await;
  s.add_idioms(vec![
    idiom("All in a day's work", &["business", "daily life"], 7.0, 3.0),
    idiom("Bite the bullet", &["daily life"], 8.0, 2.0),
    idiom("Break the ice", &["social", "business"], 9.0, 4.0),
    idiom("Cry over spilt milk", &["daily life"], 6.0, 6.0),
    idiom("Hit the sack", &["daily life"], 5.0, 1.0),
    idiom("Jump on the bandwagon", &["social"], 4.0, 5.0),
    idiom("Spill the beans", &["social"], 3.0, 7.0),
    idiom("Under the weather", &["health"], 2.0, 8.0),
  ])
  .await
  .unwrap();
  s
}

fn page(page: u32, limit: u32) -> Page { Page::new(page, limit) }

fn texts(idioms: &[phrasebook_core::Idiom]) -> Vec<&str> {
  idioms.iter().map(|i| i.text.as_str()).collect()
}

// ─── Listing & filtering ─────────────────────────────────────────────────────

#[tokio::test]
async fn list_defaults_to_alphabetical() {
  let s = seeded_store().await;

  let all = s.list_idioms(&IdiomQuery::default()).await.unwrap();
  assert_eq!(all.len(), 8);

  let mut sorted: Vec<String> = all.iter().map(|i| i.text.clone()).collect();
  sorted.sort();
  assert_eq!(texts(&all), sorted.iter().map(String::as_str).collect::<Vec<_>>());
}

#[tokio::test]
async fn response_length_never_exceeds_limit() {
  let s = seeded_store().await;

  for limit in [1, 3, 8, 50] {
    let query = IdiomQuery { page: page(1, limit), ..Default::default() };
    let got = s.list_idioms(&query).await.unwrap();
    assert!(got.len() as u32 <= limit);
  }
}

#[tokio::test]
async fn pages_are_disjoint_and_contiguous() {
  let s = seeded_store().await;

  let full = s.list_idioms(&IdiomQuery::default()).await.unwrap();

  let mut paged = Vec::new();
  for p in 1..=3 {
    let query = IdiomQuery { page: page(p, 3), ..Default::default() };
    paged.extend(s.list_idioms(&query).await.unwrap());
  }

  // No item repeated, none skipped.
  assert_eq!(
    paged.iter().map(|i| i.id).collect::<Vec<_>>(),
    full.iter().map(|i| i.id).collect::<Vec<_>>()
  );
}

#[tokio::test]
async fn page_past_the_end_is_empty() {
  let s = seeded_store().await;
  let query = IdiomQuery { page: page(4, 50), ..Default::default() };
  assert!(s.list_idioms(&query).await.unwrap().is_empty());
}

#[tokio::test]
async fn text_filter_is_case_insensitive_substring() {
  let s = seeded_store().await;

  let query = IdiomQuery { text: Some("work".into()), ..Default::default() };
  let got = s.list_idioms(&query).await.unwrap();
  assert_eq!(texts(&got), ["All in a day's work"]);

  let query = IdiomQuery { text: Some("WORK".into()), ..Default::default() };
  let got = s.list_idioms(&query).await.unwrap();
  assert_eq!(texts(&got), ["All in a day's work"]);

  // Substring, not prefix: "the" appears mid-headline.
  let query = IdiomQuery { text: Some("the".into()), ..Default::default() };
  let got = s.list_idioms(&query).await.unwrap();
  assert!(got.len() >= 5);
}

#[tokio::test]
async fn category_filter_matches_any_supplied_value() {
  let s = seeded_store().await;

  let query = IdiomQuery {
    categories: vec!["business".into()],
    ..Default::default()
  };
  let business = s.list_idioms(&query).await.unwrap();
  assert_eq!(texts(&business), ["All in a day's work", "Break the ice"]);

  // OR across the list: business ∪ health.
  let query = IdiomQuery {
    categories: vec!["business".into(), "health".into()],
    ..Default::default()
  };
  let either = s.list_idioms(&query).await.unwrap();
  assert_eq!(
    texts(&either),
    ["All in a day's work", "Break the ice", "Under the weather"]
  );
}

#[tokio::test]
async fn unmatched_category_returns_empty() {
  let s = seeded_store().await;

  let query = IdiomQuery {
    categories: vec!["sports".into()],
    ..Default::default()
  };
  assert!(s.list_idioms(&query).await.unwrap().is_empty());

  // Combining an unmatched category with any text is still empty.
  let query = IdiomQuery {
    text: Some("work".into()),
    categories: vec!["sports".into()],
    ..Default::default()
  };
  assert!(s.list_idioms(&query).await.unwrap().is_empty());
}

#[tokio::test]
async fn text_and_category_compose_with_and() {
  let s = seeded_store().await;

  // "Break the ice" is business but does not contain "work".
  let query = IdiomQuery {
    text: Some("work".into()),
    categories: vec!["business".into()],
    ..Default::default()
  };
  let got = s.list_idioms(&query).await.unwrap();
  assert_eq!(texts(&got), ["All in a day's work"]);
}

// ─── Sorting ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn sort_by_frequency_ascending_and_descending() {
  let s = seeded_store().await;

  let asc = s
    .list_idioms(&IdiomQuery { sort: Some(Sort::Frequency), ..Default::default() })
    .await
    .unwrap();
  let desc = s
    .list_idioms(&IdiomQuery {
      sort: Some(Sort::FrequencyDesc),
      ..Default::default()
    })
    .await
    .unwrap();

  let mut frequencies: Vec<f64> = asc.iter().map(|i| i.frequency_of_use).collect();
  assert!(frequencies.windows(2).all(|w| w[0] <= w[1]));

  // All frequencies in the fixture are distinct, so reversing the ascending
  // order must equal the descending order.
  frequencies.reverse();
  let desc_frequencies: Vec<f64> = desc.iter().map(|i| i.frequency_of_use).collect();
  assert_eq!(frequencies, desc_frequencies);
}

#[tokio::test]
async fn sort_by_imagery_uses_literal_transparency() {
  let s = seeded_store().await;

  let asc = s
    .list_idioms(&IdiomQuery { sort: Some(Sort::Imagery), ..Default::default() })
    .await
    .unwrap();
  let transparencies: Vec<f64> =
    asc.iter().map(|i| i.literal_transparency).collect();
  assert!(transparencies.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn equal_sort_keys_break_ties_deterministically() {
  let s = store().await;
  s.add_idioms(vec![
    idiom("alpha", &[], 5.0, 5.0),
    idiom("bravo", &[], 5.0, 5.0),
    idiom("charlie", &[], 5.0, 5.0),
    idiom("delta", &[], 5.0, 5.0),
  ])
  .await
  .unwrap();

  // All frequencies are equal; the id tiebreak must keep one-per-page
  // pagination disjoint and contiguous.
  let full = s
    .list_idioms(&IdiomQuery { sort: Some(Sort::Frequency), ..Default::default() })
    .await
    .unwrap();

  let mut paged = Vec::new();
  for p in 1..=4 {
    let query = IdiomQuery {
      page: page(p, 1),
      sort: Some(Sort::Frequency),
      ..Default::default()
    };
    paged.extend(s.list_idioms(&query).await.unwrap());
  }

  assert_eq!(
    paged.iter().map(|i| i.id).collect::<Vec<_>>(),
    full.iter().map(|i| i.id).collect::<Vec<_>>()
  );
}

// ─── Categories ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn categories_are_the_sorted_distinct_union() {
  let s = seeded_store().await;

  let categories = s.list_categories().await.unwrap();
  assert_eq!(categories, ["business", "daily life", "health", "social"]);
}

#[tokio::test]
async fn categories_of_empty_catalog_is_empty() {
  let s = store().await;
  assert!(s.list_categories().await.unwrap().is_empty());
}

// ─── Random sampling ─────────────────────────────────────────────────────────

#[tokio::test]
async fn seeded_random_is_reproducible() {
  let s = seeded_store().await;

  let first = s.list_random(page(1, 8), Some(42)).await.unwrap();
  let second = s.list_random(page(1, 8), Some(42)).await.unwrap();

  assert_eq!(
    first.iter().map(|i| i.id).collect::<Vec<_>>(),
    second.iter().map(|i| i.id).collect::<Vec<_>>()
  );
}

#[tokio::test]
async fn seeded_random_prefix_is_stable_under_larger_limits() {
  let s = seeded_store().await;

  let two = s.list_random(page(1, 2), Some(7)).await.unwrap();
  let four = s.list_random(page(1, 4), Some(7)).await.unwrap();

  assert_eq!(
    two.iter().map(|i| i.id).collect::<Vec<_>>(),
    four.iter().take(2).map(|i| i.id).collect::<Vec<_>>()
  );
}

#[tokio::test]
async fn seeded_random_pages_tile_the_permutation() {
  let s = seeded_store().await;

  let full = s.list_random(page(1, 8), Some(3)).await.unwrap();
  let mut paged = Vec::new();
  for p in 1..=4 {
    paged.extend(s.list_random(page(p, 2), Some(3)).await.unwrap());
  }

  assert_eq!(
    paged.iter().map(|i| i.id).collect::<Vec<_>>(),
    full.iter().map(|i| i.id).collect::<Vec<_>>()
  );
}

#[tokio::test]
async fn seeds_congruent_mod_1000_share_a_permutation() {
  let s = seeded_store().await;

  let a = s.list_random(page(1, 8), Some(12)).await.unwrap();
  let b = s.list_random(page(1, 8), Some(1012)).await.unwrap();

  assert_eq!(
    a.iter().map(|i| i.id).collect::<Vec<_>>(),
    b.iter().map(|i| i.id).collect::<Vec<_>>()
  );
}

#[tokio::test]
async fn unseeded_random_still_respects_the_limit() {
  let s = seeded_store().await;
  let got = s.list_random(page(1, 3), None).await.unwrap();
  assert_eq!(got.len(), 3);
}

// ─── Votes & patches ─────────────────────────────────────────────────────────

#[tokio::test]
async fn upvote_increments_exactly_one_counter() {
  let s = seeded_store().await;
  let before = s.list_idioms(&IdiomQuery::default()).await.unwrap();
  let target = &before[0];

  let updated = s.upvote(target.id).await.unwrap().unwrap();

  assert_eq!(updated.upvotes, target.upvotes + 1);
  assert_eq!(updated.downvotes, target.downvotes);
  assert_eq!(updated.favorite, target.favorite);
  assert_eq!(updated.text, target.text);
  assert_eq!(updated.created_at, target.created_at);
  assert!(updated.updated_at >= target.updated_at);
}

#[tokio::test]
async fn downvote_increments_only_downvotes() {
  let s = seeded_store().await;
  let before = s.list_idioms(&IdiomQuery::default()).await.unwrap();
  let target = &before[0];

  let updated = s.downvote(target.id).await.unwrap().unwrap();
  assert_eq!(updated.downvotes, target.downvotes + 1);
  assert_eq!(updated.upvotes, target.upvotes);
}

#[tokio::test]
async fn voting_on_unknown_id_returns_none() {
  let s = seeded_store().await;
  assert!(s.upvote(Uuid::new_v4()).await.unwrap().is_none());
  assert!(s.downvote(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn patch_sets_favorite_flag() {
  let s = seeded_store().await;
  let before = s.list_idioms(&IdiomQuery::default()).await.unwrap();
  let target = &before[0];

  let updated = s
    .patch_idiom(target.id, IdiomPatch { favorite: Some(true) })
    .await
    .unwrap()
    .unwrap();
  assert!(updated.favorite);

  let favorites = s.list_favorites(Page::default()).await.unwrap();
  assert_eq!(
    favorites.iter().map(|i| i.id).collect::<Vec<_>>(),
    [target.id]
  );
}

#[tokio::test]
async fn empty_patch_is_a_no_op_read() {
  let s = seeded_store().await;
  let before = s.list_idioms(&IdiomQuery::default()).await.unwrap();
  let target = &before[0];

  let unchanged = s
    .patch_idiom(target.id, IdiomPatch::default())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(unchanged.favorite, target.favorite);
  assert_eq!(unchanged.updated_at, target.updated_at);
}

#[tokio::test]
async fn patch_on_unknown_id_returns_none() {
  let s = seeded_store().await;
  let result = s
    .patch_idiom(Uuid::new_v4(), IdiomPatch { favorite: Some(true) })
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn favorites_listing_is_alphabetical() {
  let s = seeded_store().await;
  let all = s.list_idioms(&IdiomQuery::default()).await.unwrap();

  // Flag them out of alphabetical order on purpose.
  s.patch_idiom(all[5].id, IdiomPatch { favorite: Some(true) })
    .await
    .unwrap();
  s.patch_idiom(all[1].id, IdiomPatch { favorite: Some(true) })
    .await
    .unwrap();

  let favorites = s.list_favorites(Page::default()).await.unwrap();
  assert_eq!(
    favorites.iter().map(|i| i.id).collect::<Vec<_>>(),
    [all[1].id, all[5].id]
  );
}

// ─── Round-trips ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn tag_sets_and_examples_survive_storage() {
  let s = store().await;
  let mut input = idiom("Kick the bucket", &["mortality", "humor"], 6.5, 2.5);
  input.sentiment = vec!["negative".into(), "humorous".into()];
  input.depiction = vec!["a tipped-over bucket".into()];

  s.add_idioms(vec![input]).await.unwrap();

  let got = &s.list_idioms(&IdiomQuery::default()).await.unwrap()[0];
  assert_eq!(got.context_diversity, ["mortality", "humor"]);
  assert_eq!(got.sentiment, ["negative", "humorous"]);
  assert_eq!(got.depiction, ["a tipped-over bucket"]);
  assert_eq!(got.examples, ["He said: Kick the bucket."]);
  assert_eq!(got.frequency_of_use, 6.5);
  assert_eq!(got.upvotes, 0);
  assert_eq!(got.downvotes, 0);
  assert!(!got.favorite);
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn registration_never_deduplicates() {
  let s = store().await;

  let first = s.register_user("install-123".into()).await.unwrap();
  let second = s.register_user("install-123".into()).await.unwrap();

  assert_ne!(first.id, second.id);
  assert_ne!(first.api_key, second.api_key);
  assert_eq!(first.installation_id, second.installation_id);
}

#[tokio::test]
async fn user_lookup_by_api_key() {
  let s = store().await;
  let user = s.register_user("install-42".into()).await.unwrap();

  let found = s.user_by_api_key(&user.api_key).await.unwrap().unwrap();
  assert_eq!(found.id, user.id);
  assert_eq!(found.installation_id, "install-42");

  assert!(s.user_by_api_key("not-a-key").await.unwrap().is_none());
}
