//! The `BoardStore` trait.
//!
//! Implemented by storage backends (e.g. `textboard-store-sqlite`). The API
//! layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  board::BoardSet,
  post::{PostOrder, ThreadId},
  view::{BoardSummary, Thread},
};

/// Abstraction over a textboard post store.
///
/// Posts are append-only. Identifier assignment (`new_thread`,
/// `reply_thread`) must be atomic: two concurrent callers never receive the
/// same thread id on a board, or the same post order in a thread.
///
/// Backend errors convert into [`crate::Error`] so callers can classify them
/// without knowing the backend.
pub trait BoardStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  /// The boards this store was configured to serve.
  fn boards(&self) -> &BoardSet;

  /// Open a thread and return its id: one past the highest id on `board`,
  /// or 1 for an empty board.
  fn new_thread<'a>(
    &'a self,
    board: &'a str,
    subject: &'a str,
    content: &'a str,
  ) -> impl Future<Output = Result<ThreadId, Self::Error>> + Send + 'a;

  /// Append a reply and return its post order. Fails if the thread does not
  /// exist, in which case nothing is written.
  fn reply_thread<'a>(
    &'a self,
    board: &'a str,
    thread: ThreadId,
    content: &'a str,
  ) -> impl Future<Output = Result<PostOrder, Self::Error>> + Send + 'a;

  /// Summarise every thread on `board`. Empty, not an error, when the board
  /// has no threads.
  fn get_board<'a>(
    &'a self,
    board: &'a str,
  ) -> impl Future<Output = Result<BoardSummary, Self::Error>> + Send + 'a;

  /// Load a full thread. Fails if the thread has no opening post.
  fn get_thread<'a>(
    &'a self,
    board: &'a str,
    thread: ThreadId,
  ) -> impl Future<Output = Result<Thread, Self::Error>> + Send + 'a;
}
