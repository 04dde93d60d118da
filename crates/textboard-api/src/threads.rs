//! Handlers for `/boards/:board/threads` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/boards/:board/threads` | Body: [`NewThreadBody`]; returns 201 + `{"thread_id":n}` |
//! | `GET`  | `/boards/:board/threads/:thread` | Full thread; 404 if not found |
//! | `POST` | `/boards/:board/threads/:thread` | Body: [`ReplyBody`]; returns 201 + `{"success":true,"post_order":n}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use textboard_core::{
  post::{PostOrder, ThreadId},
  store::BoardStore,
  view::Thread,
};

use crate::error::ApiError;

fn require_content(content: &str) -> Result<(), ApiError> {
  if content.trim().is_empty() {
    return Err(ApiError::BadRequest("content must not be empty".into()));
  }
  Ok(())
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /boards/:board/threads`.
#[derive(Debug, Deserialize)]
pub struct NewThreadBody {
  pub subject: String,
  pub content: String,
}

#[derive(Debug, Serialize)]
pub struct Created {
  pub thread_id: ThreadId,
}

/// `POST /boards/:board/threads`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Path(board): Path<String>,
  Json(body): Json<NewThreadBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BoardStore,
{
  store.boards().check(&board)?;
  require_content(&body.content)?;

  let thread_id = store
    .new_thread(&board, &body.subject, &body.content)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(Created { thread_id })))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /boards/:board/threads/:thread`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path((board, thread)): Path<(String, ThreadId)>,
) -> Result<Json<Thread>, ApiError>
where
  S: BoardStore,
{
  store.boards().check(&board)?;
  let thread = store
    .get_thread(&board, thread)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(thread))
}

// ─── Reply ────────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /boards/:board/threads/:thread`.
#[derive(Debug, Deserialize)]
pub struct ReplyBody {
  pub content: String,
}

#[derive(Debug, Serialize)]
pub struct Replied {
  pub success:    bool,
  pub post_order: PostOrder,
}

/// `POST /boards/:board/threads/:thread`
pub async fn reply<S>(
  State(store): State<Arc<S>>,
  Path((board, thread)): Path<(String, ThreadId)>,
  Json(body): Json<ReplyBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BoardStore,
{
  store.boards().check(&board)?;
  require_content(&body.content)?;

  let post_order = store
    .reply_thread(&board, thread, &body.content)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(Replied { success: true, post_order })))
}
