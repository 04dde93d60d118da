//! Integration tests for `SqliteStore` against an in-memory database.

use textboard_core::{board::BoardSet, store::BoardStore};

use crate::{Error, SqliteStore, StoreConfig, store::retry_on_conflict};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory(BoardSet::new(["b", "tech"]))
    .await
    .expect("in-memory store")
}

// ─── Thread creation ─────────────────────────────────────────────────────────

#[tokio::test]
async fn first_thread_on_board_is_one() {
  let s = store().await;
  assert_eq!(s.new_thread("b", "hi", "first").await.unwrap(), 1);
}

#[tokio::test]
async fn thread_ids_increase_per_board() {
  let s = store().await;

  for expected in 1..=5 {
    let id = s.new_thread("b", "subject", "content").await.unwrap();
    assert_eq!(id, expected);
  }

  // Another board has its own sequence.
  assert_eq!(s.new_thread("tech", "subject", "content").await.unwrap(), 1);
  assert_eq!(s.new_thread("b", "subject", "content").await.unwrap(), 6);
}

#[tokio::test]
async fn concurrent_thread_creation_assigns_unique_ids() {
  let s = store().await;

  let handles: Vec<_> = (0..16)
    .map(|i| {
      let s = s.clone();
      tokio::spawn(async move {
        s.new_thread("b", &format!("subject {i}"), "content").await
      })
    })
    .collect();

  let mut ids = Vec::new();
  for h in handles {
    ids.push(h.await.unwrap().unwrap());
  }
  ids.sort_unstable();

  assert_eq!(ids, (1..=16).collect::<Vec<_>>());
  assert_eq!(s.get_board("b").await.unwrap().len(), 16);
}

// ─── Replies ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn reply_orders_are_gap_free() {
  let s = store().await;
  let thread = s.new_thread("b", "hi", "first").await.unwrap();

  for expected in 1..=4 {
    let order = s.reply_thread("b", thread, "reply").await.unwrap();
    assert_eq!(order, expected);
  }

  let view = s.get_thread("b", thread).await.unwrap();
  let orders: Vec<_> = view.posts.iter().map(|p| p.order).collect();
  assert_eq!(orders, [0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn concurrent_replies_assign_unique_orders() {
  let s = store().await;
  let thread = s.new_thread("b", "hi", "first").await.unwrap();

  let handles: Vec<_> = (0..16)
    .map(|i| {
      let s = s.clone();
      tokio::spawn(async move {
        s.reply_thread("b", thread, &format!("reply {i}")).await
      })
    })
    .collect();

  let mut orders = Vec::new();
  for h in handles {
    orders.push(h.await.unwrap().unwrap());
  }
  orders.sort_unstable();

  assert_eq!(orders, (1..=16).collect::<Vec<_>>());
  let summary = s.get_board("b").await.unwrap();
  assert_eq!(summary.get(thread).unwrap().reply_count, 16);

  // Dates never run backwards along post order.
  let view = s.get_thread("b", thread).await.unwrap();
  assert!(view.posts.windows(2).all(|w| w[0].date <= w[1].date));
}

#[tokio::test]
async fn reply_to_unknown_thread_errors_without_insert() {
  let s = store().await;
  s.new_thread("b", "hi", "first").await.unwrap();
  let before = s.row_count().await.unwrap();

  let err = s.reply_thread("b", 99, "lost").await.unwrap_err();
  assert!(matches!(err, Error::UnknownThread { ref board, thread: 99 } if board == "b"));

  // Same thread id, different board.
  let err = s.reply_thread("tech", 1, "lost").await.unwrap_err();
  assert!(matches!(err, Error::UnknownThread { .. }));

  assert_eq!(s.row_count().await.unwrap(), before);
}

#[tokio::test]
async fn replies_have_blank_subject() {
  let s = store().await;
  let thread = s.new_thread("b", "hi", "first").await.unwrap();
  s.reply_thread("b", thread, "second").await.unwrap();

  let view = s.get_thread("b", thread).await.unwrap();
  // The thread's subject comes from the OP only.
  assert_eq!(view.summary.subject, "hi");
  assert_eq!(view.posts[1].content, "second");
}

// ─── Board summaries ─────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_board_has_empty_summary() {
  let s = store().await;
  let summary = s.get_board("b").await.unwrap();
  assert!(summary.is_empty());
}

#[tokio::test]
async fn board_summary_counts_replies() {
  let s = store().await;
  let quiet = s.new_thread("b", "quiet", "nobody answers").await.unwrap();
  let busy = s.new_thread("b", "busy", "everyone answers").await.unwrap();
  for _ in 0..3 {
    s.reply_thread("b", busy, "me too").await.unwrap();
  }
  s.new_thread("tech", "elsewhere", "not on b").await.unwrap();

  let summary = s.get_board("b").await.unwrap();
  assert_eq!(summary.len(), 2);

  let ids: Vec<_> = summary.threads().iter().map(|t| t.thread_id).collect();
  assert_eq!(ids, [quiet, busy]);

  assert_eq!(summary.get(quiet).unwrap().reply_count, 0);
  assert_eq!(summary.get(busy).unwrap().reply_count, 3);
  assert_eq!(summary.get(busy).unwrap().subject, "busy");
}

// ─── Thread reads ────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_reply_and_read_thread() {
  let s = store().await;

  let thread = s.new_thread("b", "hi", "first").await.unwrap();
  assert_eq!(thread, 1);
  let order = s.reply_thread("b", thread, "second").await.unwrap();
  assert_eq!(order, 1);

  let view = s.get_thread("b", 1).await.unwrap();
  assert_eq!(view.summary.thread_id, 1);
  assert_eq!(view.summary.subject, "hi");
  assert_eq!(view.summary.reply_count, 1);
  assert_eq!(view.posts.len(), 2);
  assert_eq!((view.posts[0].order, view.posts[0].content.as_str()), (0, "first"));
  assert_eq!((view.posts[1].order, view.posts[1].content.as_str()), (1, "second"));
  assert_eq!(view.summary.date, view.posts[0].date);
  assert!(view.posts[1].date >= view.posts[0].date);
}

#[tokio::test]
async fn get_unknown_thread_errors() {
  let s = store().await;
  let err = s.get_thread("b", 1).await.unwrap_err();
  assert!(matches!(err, Error::UnknownThread { thread: 1, .. }));
}

#[tokio::test]
async fn thread_without_op_is_unknown() {
  let s = store().await;
  s.execute_raw(
    "INSERT INTO posts (board, thread, post_order, date, subject, content)
     VALUES ('b', 3, 1, 0, '', 'orphaned reply')",
  )
  .await
  .unwrap();

  let err = s.get_thread("b", 3).await.unwrap_err();
  assert!(matches!(err, Error::UnknownThread { ref board, thread: 3 } if board == "b"));
}

#[tokio::test]
async fn special_characters_roundtrip() {
  let s = store().await;
  let subject = "it's \"quoted\"";
  let content = "'); DROP TABLE posts; --\n\t\\ back\\slash, 日本語, 🦀, %_ wildcards";

  let thread = s.new_thread("b", subject, content).await.unwrap();
  s.reply_thread("b", thread, content).await.unwrap();

  let view = s.get_thread("b", thread).await.unwrap();
  assert_eq!(view.summary.subject, subject);
  assert_eq!(view.posts[0].content.as_bytes(), content.as_bytes());
  assert_eq!(view.posts[1].content.as_bytes(), content.as_bytes());
  assert_eq!(s.row_count().await.unwrap(), 2);
}

// ─── Conflicts ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_key_surfaces_as_conflict() {
  let s = store().await;
  s.new_thread("b", "hi", "first").await.unwrap();

  let err = s
    .execute_raw(
      "INSERT INTO posts (board, thread, post_order, date, subject, content)
       VALUES ('b', 1, 0, 0, 'dup', 'dup')",
    )
    .await
    .unwrap_err();
  let db_err = match err {
    Error::Database(e) => e,
    other => panic!("expected database error, got {other:?}"),
  };

  let classified = Error::from_write(db_err, "b", Some(1));
  assert!(matches!(classified, Error::IdentifierConflict { thread: Some(1), .. }));

  let core: textboard_core::Error = classified.into();
  assert!(core.is_transient());

  // The original row is untouched.
  let view = s.get_thread("b", 1).await.unwrap();
  assert_eq!(view.posts[0].content, "first");
}

fn conflict() -> Error {
  Error::IdentifierConflict { board: "b".into(), thread: None }
}

#[tokio::test]
async fn persistent_conflict_gives_up_after_three_attempts() {
  let mut attempts = 0;
  let result: crate::Result<i64> = retry_on_conflict(|| {
    attempts += 1;
    async { Err(conflict()) }
  })
  .await;

  assert_eq!(attempts, 3);
  let err = result.unwrap_err();
  assert!(matches!(err, Error::IdentifierConflict { ref board, thread: None } if board == "b"));
  assert!(textboard_core::Error::from(err).is_transient());
}

#[tokio::test]
async fn conflict_retry_recovers() {
  let mut attempts = 0;
  let result = retry_on_conflict(|| {
    attempts += 1;
    let attempt = attempts;
    async move { if attempt < 3 { Err(conflict()) } else { Ok(attempt) } }
  })
  .await;

  assert_eq!(result.unwrap(), 3);
  assert_eq!(attempts, 3);
}

#[tokio::test]
async fn other_errors_are_not_retried() {
  let mut attempts = 0;
  let result: crate::Result<i64> = retry_on_conflict(|| {
    attempts += 1;
    async { Err(Error::UnknownThread { board: "b".into(), thread: 1 }) }
  })
  .await;

  assert_eq!(attempts, 1);
  assert!(matches!(result, Err(Error::UnknownThread { .. })));
}

// ─── Persistence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn rows_survive_reopen() {
  let dir = tempfile::tempdir().unwrap();
  let config = StoreConfig {
    path:   dir.path().join("board.db"),
    boards: BoardSet::new(["b"]),
  };

  {
    let s = SqliteStore::open(config.clone()).await.unwrap();
    let thread = s.new_thread("b", "hi", "first").await.unwrap();
    s.reply_thread("b", thread, "second").await.unwrap();
  }

  // Re-running schema initialisation on an existing file is a no-op.
  let s = SqliteStore::open(config).await.unwrap();
  let view = s.get_thread("b", 1).await.unwrap();
  assert_eq!(view.summary.reply_count, 1);
  assert_eq!(s.new_thread("b", "next", "thread").await.unwrap(), 2);
  assert_eq!(s.boards().iter().collect::<Vec<_>>(), ["b"]);
}

#[tokio::test]
async fn unopenable_path_is_unavailable() {
  let dir = tempfile::tempdir().unwrap();
  let config = StoreConfig {
    path:   dir.path().join("missing").join("board.db"),
    boards: BoardSet::default(),
  };

  let err = SqliteStore::open(config).await.err().expect("open should fail");
  assert!(matches!(err, Error::Unavailable(_)));
  assert!(matches!(
    textboard_core::Error::from(err),
    textboard_core::Error::StorageUnavailable(_)
  ));
}
