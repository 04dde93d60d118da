//! JSON REST API for textboard.
//!
//! Exposes an axum [`Router`] backed by any [`textboard_core::store::BoardStore`].
//! Request bodies are checked here before reaching the store; TLS and
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", textboard_api::api_router(store.clone()))
//! ```

pub mod boards;
pub mod error;
pub mod threads;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use textboard_core::store::BoardStore;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: BoardStore + 'static,
{
  Router::new()
    // Boards
    .route("/boards", get(boards::list::<S>))
    .route("/boards/{board}", get(boards::get_one::<S>))
    // Threads
    .route("/boards/{board}/threads", post(threads::create::<S>))
    .route(
      "/boards/{board}/threads/{thread}",
      get(threads::get_one::<S>).post(threads::reply::<S>),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(store)
}
