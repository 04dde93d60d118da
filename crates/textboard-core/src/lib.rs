//! Core types and trait definitions for the textboard post store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::BoardStore`]; the API layer depends on
//! that abstraction only.

pub mod aggregate;
pub mod board;
pub mod error;
pub mod post;
pub mod store;
pub mod view;

pub use error::{Error, Result};
