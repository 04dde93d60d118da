//! Error type for `textboard-store-sqlite`.

use textboard_core::post::ThreadId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] textboard_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// The database could not be opened or its schema initialised.
  #[error("storage unavailable: {0}")]
  Unavailable(#[source] tokio_rusqlite::Error),

  #[error("thread {thread} not found on board {board:?}")]
  UnknownThread { board: String, thread: ThreadId },

  /// An insert hit the `(board, thread, post_order)` primary key.
  #[error("identifier conflict on board {board:?}")]
  IdentifierConflict {
    board:  String,
    thread: Option<ThreadId>,
  },

  #[error("date/time decode error: {0}")]
  DateParse(String),
}

impl Error {
  /// Classify a failed write: key collisions become
  /// [`Error::IdentifierConflict`], everything else [`Error::Database`].
  pub(crate) fn from_write(
    err:    tokio_rusqlite::Error,
    board:  &str,
    thread: Option<ThreadId>,
  ) -> Self {
    if is_constraint_violation(&err) {
      Error::IdentifierConflict { board: board.to_owned(), thread }
    } else {
      Error::Database(err)
    }
  }
}

impl Error {
  /// Lift a core error, folding its domain variants into this crate's own so
  /// callers only ever match one form.
  pub(crate) fn from_core(err: textboard_core::Error) -> Self {
    match err {
      textboard_core::Error::UnknownThread { board, thread } => {
        Error::UnknownThread { board, thread }
      }
      textboard_core::Error::IdentifierConflict { board, thread } => {
        Error::IdentifierConflict { board, thread }
      }
      other => Error::Core(other),
    }
  }
}

fn is_constraint_violation(err: &tokio_rusqlite::Error) -> bool {
  matches!(
    err,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _))
      if e.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

impl From<Error> for textboard_core::Error {
  fn from(err: Error) -> Self {
    match err {
      Error::Core(e) => e,
      Error::UnknownThread { board, thread } => Self::UnknownThread { board, thread },
      Error::IdentifierConflict { board, thread } => {
        Self::IdentifierConflict { board, thread }
      }
      other => Self::StorageUnavailable(Box::new(other)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
