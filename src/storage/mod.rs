//! SQLite persistence layer.
//!
//! All state lives in one database file: accounts, players, the game log,
//! streak rows, the seeded achievement catalog, and unlock rows. Access
//! goes through [`Database`], a cloneable handle around a single shared
//! connection.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;
use thiserror::Error;

mod games;
mod gamification;
mod players;
mod users;

pub use games::{GamePatch, NewGame, SportTotals};
pub use players::{NewPlayer, PlayerPatch};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("database lock poisoned")]
    LockPoisoned,
}

/// Shared database handle.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create the database at the given path.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// In-memory database, for tests and throwaway runs.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    pub(crate) fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    fn init_schema(&self) -> Result<(), StorageError> {
        let conn = self.conn()?;
        conn.execute_batch(SCHEMA_SQL)?;
        drop(conn);
        self.run_migrations()
    }

    fn run_migrations(&self) -> Result<(), StorageError> {
        let conn = self.conn()?;
        let version: i32 = conn
            .query_row(
                "SELECT COALESCE(MAX(version), 0) FROM schema_version",
                [],
                |r| r.get(0),
            )
            .unwrap_or(0);
        tracing::debug!(version, "database schema version");
        // Schema is at version 1; nothing to migrate yet.
        Ok(())
    }
}

/// Map a bad stored value to a rusqlite conversion error inside row
/// mappers.
pub(crate) fn bad_column(idx: usize, what: &'static str, value: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        rusqlite::types::Type::Text,
        format!("invalid {what}: {value}").into(),
    )
}

/// Calendar dates are stored as `%Y-%m-%d` text.
pub(crate) const DATE_FMT: &str = "%Y-%m-%d";

pub(crate) fn now_text() -> String {
    chrono::Utc::now().to_rfc3339()
}

pub(crate) fn parse_timestamp(
    idx: usize,
    value: &str,
) -> rusqlite::Result<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|_| bad_column(idx, "timestamp", value))
}

pub(crate) fn parse_date(idx: usize, value: &str) -> rusqlite::Result<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(value, DATE_FMT).map_err(|_| bad_column(idx, "date", value))
}

const SCHEMA_SQL: &str = r#"
-- Accounts
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    name TEXT,
    password_hash TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Opponents and partners, per user and sport
CREATE TABLE IF NOT EXISTS players (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id),
    sport TEXT NOT NULL,
    name TEXT NOT NULL,
    dominant_hand TEXT,
    level TEXT,
    play_style TEXT,
    age_group TEXT,
    notes TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_players_user_sport ON players(user_id, sport);

-- Game log
CREATE TABLE IF NOT EXISTS games (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id),
    sport TEXT NOT NULL,
    game_type TEXT NOT NULL,
    opponent_id INTEGER NOT NULL REFERENCES players(id),
    opponent2_id INTEGER REFERENCES players(id),
    partner_id INTEGER REFERENCES players(id),
    game_date TEXT NOT NULL,
    result TEXT NOT NULL,
    score TEXT,
    detailed_score TEXT,
    location TEXT,
    notes TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_games_user_sport ON games(user_id, sport);
CREATE INDEX IF NOT EXISTS idx_games_opponent ON games(opponent_id);
CREATE INDEX IF NOT EXISTS idx_games_partner ON games(partner_id);

-- Streak state, one row per user
CREATE TABLE IF NOT EXISTS streaks (
    user_id INTEGER PRIMARY KEY REFERENCES users(id),
    current_streak INTEGER NOT NULL DEFAULT 0,
    best_streak INTEGER NOT NULL DEFAULT 0,
    last_game_date TEXT,
    updated_at TEXT NOT NULL
);

-- Seeded achievement catalog
CREATE TABLE IF NOT EXISTS achievements (
    key TEXT PRIMARY KEY,
    icon TEXT NOT NULL,
    rarity TEXT NOT NULL,
    condition_type TEXT NOT NULL,
    condition_value INTEGER NOT NULL,
    sort_order INTEGER NOT NULL
);

-- Unlock rows; the primary key is the sole guard against double unlock
CREATE TABLE IF NOT EXISTS achievement_unlocks (
    user_id INTEGER NOT NULL REFERENCES users(id),
    achievement_key TEXT NOT NULL REFERENCES achievements(key),
    unlocked_at TEXT NOT NULL,
    PRIMARY KEY (user_id, achievement_key)
);

-- Schema version
CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY);
INSERT OR IGNORE INTO schema_version VALUES (1);
"#;
