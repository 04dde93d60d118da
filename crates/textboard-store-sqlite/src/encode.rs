//! Encoding and decoding helpers between domain types and SQLite columns.
//!
//! Timestamps are stored as integer milliseconds since the Unix epoch.

use chrono::{DateTime, Utc};
use textboard_core::post::PostRow;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_date(dt: DateTime<Utc>) -> i64 { dt.timestamp_millis() }

pub fn decode_date(ms: i64) -> Result<DateTime<Utc>> {
  DateTime::from_timestamp_millis(ms)
    .ok_or_else(|| Error::DateParse(format!("timestamp out of range: {ms}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawPost::from_row`].
pub const POST_COLUMNS: &str = "board, thread, post_order, date, subject, content";

/// Values read directly from a `posts` row.
pub struct RawPost {
  pub board:      String,
  pub thread:     i64,
  pub post_order: i64,
  pub date:       i64,
  pub subject:    String,
  pub content:    String,
}

impl RawPost {
  /// Read a row selected with [`POST_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawPost {
      board:      row.get(0)?,
      thread:     row.get(1)?,
      post_order: row.get(2)?,
      date:       row.get(3)?,
      subject:    row.get(4)?,
      content:    row.get(5)?,
    })
  }

  pub fn into_post(self) -> Result<PostRow> {
    Ok(PostRow {
      board:      self.board,
      thread:     self.thread,
      post_order: self.post_order,
      date:       decode_date(self.date)?,
      subject:    self.subject,
      content:    self.content,
    })
  }
}
