//! Read models built from post rows on every request. Never stored.
//!
//! The serialized shapes are keyed maps rather than arrays: a board renders
//! as `thread_id -> summary` and a thread's posts as `order -> post`.

use chrono::{DateTime, Utc};
use serde::{
  Serialize, Serializer,
  ser::SerializeStruct as _,
};

use crate::post::{PostOrder, ThreadId};

// ─── Summaries ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadSummary {
  pub thread_id:   ThreadId,
  /// Creation time of the opening post.
  pub date:        DateTime<Utc>,
  pub subject:     String,
  /// Number of posts in the thread, not counting the OP.
  pub reply_count: u64,
}

/// Every thread on one board, ordered by `thread_id` ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardSummary {
  threads: Vec<ThreadSummary>,
}

impl BoardSummary {
  pub fn new() -> Self { Self::default() }

  pub fn add_thread(&mut self, thread: ThreadSummary) { self.threads.push(thread); }

  pub fn threads(&self) -> &[ThreadSummary] { &self.threads }

  pub fn get(&self, thread_id: ThreadId) -> Option<&ThreadSummary> {
    self.threads.iter().find(|t| t.thread_id == thread_id)
  }

  pub fn len(&self) -> usize { self.threads.len() }

  pub fn is_empty(&self) -> bool { self.threads.is_empty() }
}

impl FromIterator<ThreadSummary> for BoardSummary {
  fn from_iter<I: IntoIterator<Item = ThreadSummary>>(iter: I) -> Self {
    Self { threads: iter.into_iter().collect() }
  }
}

#[derive(Serialize)]
struct SummaryEntry<'a> {
  subject:     &'a str,
  date:        i64,
  reply_count: u64,
}

impl Serialize for BoardSummary {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_map(self.threads.iter().map(|t| {
      (t.thread_id, SummaryEntry {
        subject:     &t.subject,
        date:        t.date.timestamp_millis(),
        reply_count: t.reply_count,
      })
    }))
  }
}

// ─── Threads ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
  pub content: String,
  pub date:    DateTime<Utc>,
  pub order:   PostOrder,
}

/// A full thread: its summary plus every post, OP first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thread {
  pub summary: ThreadSummary,
  /// Sorted by `order`; `posts[0]` is always the OP.
  pub posts:   Vec<Post>,
}

impl Thread {
  pub fn op(&self) -> Option<&Post> { self.posts.first() }

  pub fn replies(&self) -> &[Post] { self.posts.get(1..).unwrap_or_default() }
}

#[derive(Serialize)]
struct PostEntry<'a> {
  date:    i64,
  content: &'a str,
}

struct PostMap<'a>(&'a [Post]);

impl Serialize for PostMap<'_> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_map(self.0.iter().map(|p| {
      (p.order, PostEntry { date: p.date.timestamp_millis(), content: &p.content })
    }))
  }
}

impl Serialize for Thread {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut s = serializer.serialize_struct("Thread", 5)?;
    s.serialize_field("subject", &self.summary.subject)?;
    s.serialize_field("date", &self.summary.date.timestamp_millis())?;
    s.serialize_field("thread_id", &self.summary.thread_id)?;
    s.serialize_field("reply_count", &self.summary.reply_count)?;
    s.serialize_field("posts", &PostMap(&self.posts))?;
    s.end()
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;
  use serde_json::json;

  use super::*;

  fn at(ms: i64) -> DateTime<Utc> { Utc.timestamp_millis_opt(ms).unwrap() }

  #[test]
  fn board_summary_serializes_as_thread_map() {
    let board: BoardSummary = [
      ThreadSummary {
        thread_id:   1,
        date:        at(1_700_000_000_000),
        subject:     "hi".into(),
        reply_count: 2,
      },
      ThreadSummary {
        thread_id:   2,
        date:        at(1_700_000_000_500),
        subject:     "again".into(),
        reply_count: 0,
      },
    ]
    .into_iter()
    .collect();

    assert_eq!(
      serde_json::to_value(&board).unwrap(),
      json!({
        "1": { "subject": "hi", "date": 1_700_000_000_000_i64, "reply_count": 2 },
        "2": { "subject": "again", "date": 1_700_000_000_500_i64, "reply_count": 0 },
      })
    );
  }

  #[test]
  fn empty_board_serializes_as_empty_map() {
    assert_eq!(serde_json::to_value(BoardSummary::new()).unwrap(), json!({}));
  }

  #[test]
  fn thread_serializes_posts_by_order() {
    let thread = Thread {
      summary: ThreadSummary {
        thread_id:   7,
        date:        at(10),
        subject:     "hi".into(),
        reply_count: 1,
      },
      posts:   vec![
        Post { content: "first".into(), date: at(10), order: 0 },
        Post { content: "second".into(), date: at(20), order: 1 },
      ],
    };

    assert_eq!(
      serde_json::to_value(&thread).unwrap(),
      json!({
        "subject": "hi",
        "date": 10,
        "thread_id": 7,
        "reply_count": 1,
        "posts": {
          "0": { "date": 10, "content": "first" },
          "1": { "date": 20, "content": "second" },
        },
      })
    );
    assert_eq!(thread.replies().len(), 1);
  }
}
