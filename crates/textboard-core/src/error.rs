//! Error types for `textboard-core`.

use thiserror::Error;

use crate::post::ThreadId;

#[derive(Debug, Error)]
pub enum Error {
  /// The board is not in the configured allow-list.
  #[error("unknown board: {0:?}")]
  UnknownBoard(String),

  #[error("thread {thread} not found on board {board:?}")]
  UnknownThread { board: String, thread: ThreadId },

  /// Two writers computed the same next identifier. Safe to retry.
  #[error("identifier conflict on board {board:?}")]
  IdentifierConflict {
    board:  String,
    thread: Option<ThreadId>,
  },

  #[error("storage unavailable: {0}")]
  StorageUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Whether the same request may succeed if sent again.
  pub fn is_transient(&self) -> bool {
    matches!(self, Self::IdentifierConflict { .. })
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
