//! [`SqliteStore`] — the SQLite implementation of [`BoardStore`].

use std::{collections::HashMap, future::Future, path::PathBuf, sync::Arc, time::Duration};

use chrono::Utc;
use rusqlite::TransactionBehavior;
use textboard_core::{
  aggregate,
  board::BoardSet,
  post::{PostOrder, ThreadId},
  store::BoardStore,
  view::{BoardSummary, Thread},
};

use crate::{
  Error, Result,
  encode::{POST_COLUMNS, RawPost, encode_date},
  schema::SCHEMA,
};

/// How long a statement waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Attempts made at an identifier-assigning insert before a conflict is
/// reported to the caller.
const MAX_ATTEMPTS: u32 = 3;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Everything needed to construct a [`SqliteStore`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
  /// Database file; created if absent.
  pub path:   PathBuf,
  pub boards: BoardSet,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A textboard post store backed by a single SQLite file.
///
/// Cloning is cheap: the connection and board set are reference-counted.
/// All clones share one connection thread, so calls are executed one at a
/// time in submission order.
#[derive(Clone)]
pub struct SqliteStore {
  conn:   tokio_rusqlite::Connection,
  boards: Arc<BoardSet>,
}

impl SqliteStore {
  /// Open (or create) the store described by `config` and run schema
  /// initialisation.
  pub async fn open(config: StoreConfig) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(&config.path)
      .await
      .map_err(Error::Unavailable)?;
    let store = Self { conn, boards: Arc::new(config.boards) };
    store.init_schema().await?;
    tracing::debug!(path = %config.path.display(), "opened sqlite store");
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory(boards: BoardSet) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(Error::Unavailable)?;
    let store = Self { conn, boards: Arc::new(boards) };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
      .map_err(Error::Unavailable)
  }

  /// Insert an opening post under the next free thread id.
  ///
  /// The id is read and the row written inside one `IMMEDIATE` transaction,
  /// so the write lock is held from the `MAX` lookup through the insert.
  async fn insert_op(&self, board: &str, subject: &str, content: &str) -> Result<ThreadId> {
    let board_str = board.to_owned();
    let subject   = subject.to_owned();
    let content   = content.to_owned();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let date = encode_date(Utc::now());
        let thread: ThreadId = tx.query_row(
          "SELECT COALESCE(MAX(thread), 0) + 1 FROM posts WHERE board = ?1",
          rusqlite::params![board_str],
          |r| r.get(0),
        )?;
        tx.execute(
          "INSERT INTO posts (board, thread, post_order, date, subject, content)
           VALUES (?1, ?2, 0, ?3, ?4, ?5)",
          rusqlite::params![board_str, thread, date, subject, content],
        )?;
        tx.commit()?;
        Ok(thread)
      })
      .await
      .map_err(|e| Error::from_write(e, board, None))
  }

  /// Insert a reply under the next post order of `thread`.
  ///
  /// Returns `None`, with nothing written, when the thread has no rows.
  async fn insert_reply(
    &self,
    board:   &str,
    thread:  ThreadId,
    content: &str,
  ) -> Result<Option<PostOrder>> {
    let board_str = board.to_owned();
    let content   = content.to_owned();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        // Taken under the write lock: dates follow post order.
        let date = encode_date(Utc::now());
        // MAX over no rows is NULL, and so is NULL + 1.
        let next: Option<PostOrder> = tx.query_row(
          "SELECT MAX(post_order) + 1 FROM posts WHERE board = ?1 AND thread = ?2",
          rusqlite::params![board_str, thread],
          |r| r.get(0),
        )?;
        let Some(post_order) = next else {
          return Ok(None);
        };
        tx.execute(
          "INSERT INTO posts (board, thread, post_order, date, subject, content)
           VALUES (?1, ?2, ?3, ?4, '', ?5)",
          rusqlite::params![board_str, thread, post_order, date, content],
        )?;
        tx.commit()?;
        Ok(Some(post_order))
      })
      .await
      .map_err(|e| Error::from_write(e, board, Some(thread)))
  }

  /// Total rows in the `posts` table.
  #[cfg(test)]
  pub(crate) async fn row_count(&self) -> Result<u64> {
    Ok(
      self
        .conn
        .call(|conn| {
          Ok(conn.query_row("SELECT COUNT(*) FROM posts", [], |r| r.get(0))?)
        })
        .await?,
    )
  }

  /// Run a raw statement, bypassing identifier assignment.
  #[cfg(test)]
  pub(crate) async fn execute_raw(&self, sql: &'static str) -> Result<usize> {
    Ok(self.conn.call(move |conn| Ok(conn.execute(sql, [])?)).await?)
  }
}

/// Run `op` until it succeeds or fails with something other than an
/// identifier conflict, at most [`MAX_ATTEMPTS`] times.
pub(crate) async fn retry_on_conflict<T, F, Fut>(mut op: F) -> Result<T>
where
  F: FnMut() -> Fut,
  Fut: Future<Output = Result<T>>,
{
  let mut attempt = 1;
  loop {
    match op().await {
      Err(Error::IdentifierConflict { board, thread }) if attempt < MAX_ATTEMPTS => {
        tracing::warn!(%board, ?thread, attempt, "identifier conflict, retrying");
        attempt += 1;
      }
      result => return result,
    }
  }
}

// ─── BoardStore impl ─────────────────────────────────────────────────────────

impl BoardStore for SqliteStore {
  type Error = Error;

  fn boards(&self) -> &BoardSet { &self.boards }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn new_thread(&self, board: &str, subject: &str, content: &str) -> Result<ThreadId> {
    let thread = retry_on_conflict(|| self.insert_op(board, subject, content)).await?;
    tracing::debug!(%board, thread, "opened thread");
    Ok(thread)
  }

  async fn reply_thread(&self, board: &str, thread: ThreadId, content: &str) -> Result<PostOrder> {
    let post_order = retry_on_conflict(|| self.insert_reply(board, thread, content))
      .await?
      .ok_or_else(|| Error::UnknownThread { board: board.to_owned(), thread })?;
    tracing::debug!(%board, thread, post_order, "appended reply");
    Ok(post_order)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get_board(&self, board: &str) -> Result<BoardSummary> {
    let board_str = board.to_owned();

    let (raws, counts): (Vec<RawPost>, Vec<(ThreadId, u64)>) = self
      .conn
      .call(move |conn| {
        // Both reads see the same snapshot.
        let tx = conn.transaction()?;

        let raws = {
          let mut stmt = tx.prepare(&format!(
            "SELECT {POST_COLUMNS} FROM posts
             WHERE board = ?1 AND post_order = 0
             ORDER BY thread"
          ))?;
          stmt
            .query_map(rusqlite::params![board_str], RawPost::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };

        let counts = {
          let mut stmt = tx.prepare(
            "SELECT thread, COUNT(*) FROM posts WHERE board = ?1 GROUP BY thread",
          )?;
          stmt
            .query_map(rusqlite::params![board_str], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };

        Ok((raws, counts))
      })
      .await?;

    let ops = raws
      .into_iter()
      .map(RawPost::into_post)
      .collect::<Result<Vec<_>>>()?;
    let counts: HashMap<ThreadId, u64> = counts.into_iter().collect();

    Ok(aggregate::board_summary(ops, &counts))
  }

  async fn get_thread(&self, board: &str, thread: ThreadId) -> Result<Thread> {
    let board_str = board.to_owned();

    let raws: Vec<RawPost> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {POST_COLUMNS} FROM posts
           WHERE board = ?1 AND thread = ?2
           ORDER BY post_order"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![board_str, thread], RawPost::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let rows = raws
      .into_iter()
      .map(RawPost::into_post)
      .collect::<Result<Vec<_>>>()?;

    aggregate::thread(board, thread, rows).map_err(Error::from_core)
  }
}
