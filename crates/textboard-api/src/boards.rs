//! Handlers for `/boards` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/boards` | Configured board names |
//! | `GET`  | `/boards/:board` | Map of `thread_id -> {subject, date, reply_count}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use textboard_core::{store::BoardStore, view::BoardSummary};

use crate::error::ApiError;

/// `GET /boards`
pub async fn list<S>(State(store): State<Arc<S>>) -> Json<Vec<String>>
where
  S: BoardStore,
{
  Json(store.boards().iter().map(str::to_owned).collect())
}

/// `GET /boards/:board` — 404 if the board is not configured.
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(board): Path<String>,
) -> Result<Json<BoardSummary>, ApiError>
where
  S: BoardStore,
{
  store.boards().check(&board)?;
  let summary = store.get_board(&board).await.map_err(ApiError::from_store)?;
  Ok(Json(summary))
}
