//! Core types and trait definitions for the Phrasebook idiom catalog.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod idiom;
pub mod query;
pub mod shuffle;
pub mod store;
pub mod user;

pub use idiom::{Idiom, IdiomPatch, NewIdiom};
pub use query::{IdiomQuery, MAX_PAGE_SIZE, Page, Sort};
pub use user::User;
