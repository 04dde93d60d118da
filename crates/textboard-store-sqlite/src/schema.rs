//! SQL schema for the textboard SQLite store.
//!
//! Executed on every open; `PRAGMA user_version` tracks the layout for
//! future migrations.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Opening posts and replies share one table.
-- Rows are strictly append-only: no UPDATE or DELETE is ever issued.
CREATE TABLE IF NOT EXISTS posts (
    board       TEXT    NOT NULL,
    thread      INTEGER NOT NULL CHECK (thread >= 1),
    post_order  INTEGER NOT NULL CHECK (post_order >= 0),  -- 0 = opening post
    date        INTEGER NOT NULL,                          -- ms since epoch
    subject     TEXT    NOT NULL DEFAULT '',               -- '' on replies
    content     TEXT    NOT NULL,
    PRIMARY KEY (board, thread, post_order)
) WITHOUT ROWID;

CREATE INDEX IF NOT EXISTS posts_op_idx ON posts(board, thread) WHERE post_order = 0;

PRAGMA user_version = 1;
";
