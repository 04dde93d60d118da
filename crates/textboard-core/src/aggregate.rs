//! Shapes raw post rows into the [`view`](crate::view) read models.

use std::collections::HashMap;

use crate::{
  Error, Result,
  post::{PostRow, ThreadId},
  view::{BoardSummary, Post, Thread, ThreadSummary},
};

/// Replies in a thread holding `rows` posts. The OP is not a reply.
pub fn reply_count(rows: u64) -> u64 { rows.saturating_sub(1) }

/// Build a board summary from the board's opening posts and the total number
/// of rows stored per thread.
///
/// Non-OP rows in `ops` are ignored. A thread missing from `row_counts` is
/// treated as having only its OP.
pub fn board_summary<I>(ops: I, row_counts: &HashMap<ThreadId, u64>) -> BoardSummary
where
  I: IntoIterator<Item = PostRow>,
{
  let mut ops: Vec<PostRow> = ops.into_iter().filter(PostRow::is_op).collect();
  ops.sort_by_key(|op| op.thread);

  ops
    .into_iter()
    .map(|op| ThreadSummary {
      thread_id:   op.thread,
      date:        op.date,
      reply_count: reply_count(row_counts.get(&op.thread).copied().unwrap_or(1)),
      subject:     op.subject,
    })
    .collect()
}

/// Assemble one thread from all of its rows.
///
/// Rows may arrive in any order. Fails with [`Error::UnknownThread`] unless
/// an OP is present.
pub fn thread(board: &str, thread_id: ThreadId, mut rows: Vec<PostRow>) -> Result<Thread> {
  rows.sort_by_key(|r| r.post_order);

  let summary = match rows.first() {
    Some(op) if op.is_op() => ThreadSummary {
      thread_id,
      date:        op.date,
      subject:     op.subject.clone(),
      reply_count: reply_count(rows.len() as u64),
    },
    _ => {
      return Err(Error::UnknownThread {
        board:  board.to_owned(),
        thread: thread_id,
      });
    }
  };

  let posts = rows
    .into_iter()
    .map(|r| Post { content: r.content, date: r.date, order: r.post_order })
    .collect();

  Ok(Thread { summary, posts })
}
