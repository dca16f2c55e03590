//! Core types and trait definitions for the fisio clinical record store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod checklist;
pub mod error;
pub mod injury;
pub mod memory;
pub mod period;
pub mod player;
pub mod report;
pub mod status;
pub mod store;
pub mod timeline;

pub use error::{Error, Result};
