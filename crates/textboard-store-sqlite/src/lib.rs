//! SQLite backend for the textboard post store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! background thread without blocking the async runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{SqliteStore, StoreConfig};

#[cfg(test)]
mod tests;
