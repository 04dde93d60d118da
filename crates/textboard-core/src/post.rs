//! The post row, the only persisted entity.
//!
//! A thread's opening post and all of its replies are rows of the same shape.
//! The OP is the row with `post_order == 0`; replies count up from 1.

use chrono::{DateTime, Utc};

/// Thread identifier, unique per board and assigned from 1 upwards.
pub type ThreadId = i64;

/// Position of a post within its thread.
pub type PostOrder = i64;

/// The `post_order` of a thread's opening post.
pub const OP_ORDER: PostOrder = 0;

/// One stored post. Rows are append-only: never updated, never deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRow {
  pub board:      String,
  pub thread:     ThreadId,
  pub post_order: PostOrder,
  pub date:       DateTime<Utc>,
  /// Empty on replies.
  pub subject:    String,
  pub content:    String,
}

impl PostRow {
  pub fn is_op(&self) -> bool { self.post_order == OP_ORDER }
}
