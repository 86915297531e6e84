//! Consecutive-day streak arithmetic.

use chrono::{NaiveDate, Utc};

use crate::models::StreakRecord;
use crate::storage::{Database, StorageError, DATE_FMT};

/// Advances a user's play streak when a game is logged.
///
/// The read-modify-write here is serialized only by the shared connection
/// lock; concurrent game creations for the same user across processes may
/// race and land a non-deterministic (but valid) streak state.
#[derive(Clone)]
pub struct StreakTracker {
    db: Database,
}

impl StreakTracker {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Fold one game date into the user's streak and return the stored
    /// state. Called once per logged game, at creation time.
    ///
    /// An unparseable date falls back to today with a warning; callers that
    /// accept dates from clients are expected to have validated the format
    /// already.
    pub fn update(&self, user_id: i64, game_date: &str) -> Result<StreakRecord, StorageError> {
        let date = match NaiveDate::parse_from_str(game_date, DATE_FMT) {
            Ok(date) => date,
            Err(_) => {
                let today = Utc::now().date_naive();
                tracing::warn!(user_id, game_date, "unparseable game date, counting as today");
                today
            }
        };

        let stored = self.db.get_streak(user_id)?;
        let updated = match stored.and_then(|r| r.last_game_date.map(|last| (r, last))) {
            None => StreakRecord::started(date),
            Some((record, last)) => {
                let day_diff = (date - last).num_days();
                if day_diff == 0 {
                    // Another game on the same day; nothing to write.
                    return Ok(record);
                }
                let (current, best) = if day_diff == 1 {
                    let current = record.current_streak + 1;
                    (current, record.best_streak.max(current))
                } else if day_diff > 1 {
                    (1, record.best_streak)
                } else {
                    // Backdated entry: no streak credit, counters stand.
                    (record.current_streak, record.best_streak)
                };
                StreakRecord {
                    current_streak: current,
                    best_streak: best,
                    last_game_date: Some(date),
                }
            }
        };

        self.db.upsert_streak(user_id, &updated)?;
        Ok(updated)
    }
}
