//! SQLite backend for the fisio clinical store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. The one-entry-per-day and
//! one-checklist-per-match invariants are enforced by UNIQUE indexes, not
//! only in application logic.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
