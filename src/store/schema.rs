use rusqlite::{Connection, Result};

pub fn run_migrations(conn: &Connection) -> Result<()> {
  conn.execute_batch(
    r#"
    CREATE TABLE IF NOT EXISTS card_progress (
      learner_id TEXT NOT NULL,
      card_id TEXT NOT NULL,
      ease_factor REAL NOT NULL DEFAULT 2.5,
      interval_days INTEGER NOT NULL DEFAULT 0,
      repetitions INTEGER NOT NULL DEFAULT 0,
      next_review INTEGER NOT NULL,
      updated_at TEXT NOT NULL,
      PRIMARY KEY (learner_id, card_id)
    );

    CREATE TABLE IF NOT EXISTS question_states (
      learner_id TEXT NOT NULL,
      question_id TEXT NOT NULL,
      checked INTEGER NOT NULL DEFAULT 0,
      note TEXT NOT NULL DEFAULT '',
      updated_at TEXT NOT NULL,
      PRIMARY KEY (learner_id, question_id)
    );

    CREATE TABLE IF NOT EXISTS schema_version (
      version INTEGER NOT NULL
    );

    -- Indexes
    CREATE INDEX IF NOT EXISTS idx_card_progress_next_review
      ON card_progress(learner_id, next_review);
    "#,
  )?;

  let version: Option<i64> =
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
  if version.is_none() {
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [SCHEMA_VERSION])?;
  }

  Ok(())
}

pub const SCHEMA_VERSION: i64 = 1;
