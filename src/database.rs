//! # SQLite persistence
//!
//! One row per session keyed by user id, plus an append-only deletion log
//! filled by a trigger so that deleting a session and auditing it happen in
//! one statement. Every statement binds its parameters.
//!
//! - **Version**: 2.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.1.0: Deletion log rejects deletes as well as updates
//! - 2.0.0: Parameterized statements only, deletion log trigger, upsert persona
//! - 1.1.0: Persona column
//! - 1.0.0: Initial release with users and log tables

use chrono::{DateTime, Utc};
use log::{debug, info};
use sqlite::{Connection, State, Statement};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::core::error::{SessionError, UserId};
use crate::features::sessions::{DeletedSession, Session};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS sessions (
        user_id INTEGER PRIMARY KEY,
        persona TEXT NOT NULL,
        history TEXT NOT NULL DEFAULT '',
        message_count INTEGER NOT NULL DEFAULT 0,
        created_at INTEGER NOT NULL
    );
    CREATE TABLE IF NOT EXISTS deletion_log (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        history TEXT NOT NULL,
        persona TEXT NOT NULL,
        deleted_at INTEGER NOT NULL
    );
    CREATE TRIGGER IF NOT EXISTS log_session_delete AFTER DELETE ON sessions
    BEGIN
        INSERT INTO deletion_log (user_id, history, persona, deleted_at)
        VALUES (old.user_id, old.history, old.persona, CAST(strftime('%s', 'now') AS INTEGER));
    END;
    CREATE TRIGGER IF NOT EXISTS deletion_log_no_update BEFORE UPDATE ON deletion_log
    BEGIN
        SELECT RAISE(ABORT, 'deletion_log is append-only');
    END;
    CREATE TRIGGER IF NOT EXISTS deletion_log_no_delete BEFORE DELETE ON deletion_log
    BEGIN
        SELECT RAISE(ABORT, 'deletion_log is append-only');
    END;
";

const SESSION_COLUMNS: &str = "user_id, persona, history, message_count, created_at";

type DbResult<T> = Result<T, SessionError>;

#[derive(Clone)]
pub struct Database {
    connection: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database at `path`. `":memory:"` gives a private in-memory store.
    pub async fn new(path: &str) -> DbResult<Self> {
        let connection = sqlite::open(path)?;
        connection.execute(SCHEMA)?;
        info!("Database ready at {path}");

        Ok(Database {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    pub async fn fetch_session(&self, user_id: UserId) -> DbResult<Option<Session>> {
        let conn = self.connection.lock().await;
        let mut statement =
            conn.prepare(format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE user_id = ?"))?;
        statement.bind((1, user_id as i64))?;

        if let State::Row = statement.next()? {
            Ok(Some(read_session(&statement)?))
        } else {
            Ok(None)
        }
    }

    /// Insert a fresh session unless one exists. Returns whether a row was inserted.
    pub async fn insert_session_if_absent(
        &self,
        user_id: UserId,
        persona: &str,
        created_at: DateTime<Utc>,
    ) -> DbResult<bool> {
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare(
            "INSERT OR IGNORE INTO sessions (user_id, persona, history, message_count, created_at)
             VALUES (?, ?, '', 0, ?)",
        )?;
        statement.bind((1, user_id as i64))?;
        statement.bind((2, persona))?;
        statement.bind((3, created_at.timestamp()))?;
        run(&mut statement)?;

        let inserted = conn.change_count() > 0;
        if inserted {
            debug!("Created session for user {user_id}");
        }
        Ok(inserted)
    }

    pub async fn increment_message_count(&self, user_id: UserId) -> DbResult<bool> {
        self.update_one(
            "UPDATE sessions SET message_count = message_count + 1 WHERE user_id = ?",
            user_id,
            None,
        )
        .await
    }

    pub async fn update_history(&self, user_id: UserId, history: &str) -> DbResult<bool> {
        self.update_one(
            "UPDATE sessions SET history = ? WHERE user_id = ?",
            user_id,
            Some(history),
        )
        .await
    }

    pub async fn clear_history(&self, user_id: UserId) -> DbResult<bool> {
        self.update_one(
            "UPDATE sessions SET history = '' WHERE user_id = ?",
            user_id,
            None,
        )
        .await
    }

    /// Overwrite the persona, creating the session with empty history if needed
    pub async fn upsert_persona(
        &self,
        user_id: UserId,
        persona: &str,
        created_at: DateTime<Utc>,
    ) -> DbResult<()> {
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare(
            "INSERT INTO sessions (user_id, persona, history, message_count, created_at)
             VALUES (?, ?, '', 0, ?)
             ON CONFLICT(user_id) DO UPDATE SET persona = excluded.persona",
        )?;
        statement.bind((1, user_id as i64))?;
        statement.bind((2, persona))?;
        statement.bind((3, created_at.timestamp()))?;
        run(&mut statement)
    }

    /// Zero every non-zero counter in one statement. Returns the number of sessions touched.
    pub async fn reset_all_message_counts(&self) -> DbResult<usize> {
        let conn = self.connection.lock().await;
        conn.execute("UPDATE sessions SET message_count = 0 WHERE message_count != 0")?;
        Ok(conn.change_count())
    }

    /// Delete a session; the trigger copies it into the deletion log
    pub async fn delete_session(&self, user_id: UserId) -> DbResult<bool> {
        self.update_one("DELETE FROM sessions WHERE user_id = ?", user_id, None)
            .await
    }

    pub async fn deletion_log(&self, user_id: UserId) -> DbResult<Vec<DeletedSession>> {
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare(
            "SELECT user_id, history, persona, deleted_at FROM deletion_log
             WHERE user_id = ? ORDER BY id",
        )?;
        statement.bind((1, user_id as i64))?;

        let mut entries = Vec::new();
        while let State::Row = statement.next()? {
            entries.push(DeletedSession {
                user_id: statement.read::<i64, _>("user_id")? as UserId,
                history: statement.read::<String, _>("history")?,
                persona: statement.read::<String, _>("persona")?,
                deleted_at: from_timestamp(statement.read::<i64, _>("deleted_at")?),
            });
        }
        Ok(entries)
    }

    pub async fn session_count(&self) -> DbResult<u64> {
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare("SELECT COUNT(*) FROM sessions")?;
        if let State::Row = statement.next()? {
            Ok(statement.read::<i64, _>(0)? as u64)
        } else {
            Ok(0)
        }
    }

    /// Raw SQL for tests that need to break or inspect the schema
    #[cfg(test)]
    pub(crate) async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.connection.lock().await.execute(sql)?;
        Ok(())
    }

    /// Run a single-row statement whose last parameter is the user id
    async fn update_one(&self, sql: &str, user_id: UserId, text: Option<&str>) -> DbResult<bool> {
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare(sql)?;
        let mut index = 1;
        if let Some(text) = text {
            statement.bind((index, text))?;
            index += 1;
        }
        statement.bind((index, user_id as i64))?;
        run(&mut statement)?;
        Ok(conn.change_count() > 0)
    }
}

fn run(statement: &mut Statement<'_>) -> DbResult<()> {
    while let State::Row = statement.next()? {}
    Ok(())
}

fn read_session(statement: &Statement<'_>) -> DbResult<Session> {
    Ok(Session {
        user_id: statement.read::<i64, _>("user_id")? as UserId,
        persona: statement.read::<String, _>("persona")?,
        history: statement.read::<String, _>("history")?,
        message_count: statement.read::<i64, _>("message_count")?.max(0) as u32,
        created_at: from_timestamp(statement.read::<i64, _>("created_at")?),
    })
}

fn from_timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_else(Utc::now)
}
