//! Consecutive-day play streaks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-user streak state. One row per user, created lazily on the first
/// logged game, never deleted. Invariant: `best_streak >= current_streak`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakRecord {
    pub current_streak: u32,
    pub best_streak: u32,
    pub last_game_date: Option<NaiveDate>,
}

impl StreakRecord {
    /// Fresh record for a user's first game.
    pub fn started(date: NaiveDate) -> Self {
        Self {
            current_streak: 1,
            best_streak: 1,
            last_game_date: Some(date),
        }
    }
}

impl Default for StreakRecord {
    fn default() -> Self {
        Self {
            current_streak: 0,
            best_streak: 0,
            last_game_date: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_started_record() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let record = StreakRecord::started(date);
        assert_eq!(record.current_streak, 1);
        assert_eq!(record.best_streak, 1);
        assert_eq!(record.last_game_date, Some(date));
    }

    #[test]
    fn test_default_is_empty() {
        let record = StreakRecord::default();
        assert_eq!(record.current_streak, 0);
        assert_eq!(record.best_streak, 0);
        assert!(record.last_game_date.is_none());
    }

    #[test]
    fn test_serde_shape() {
        let record = StreakRecord::started(NaiveDate::from_ymd_opt(2025, 3, 9).unwrap());
        let json: serde_json::Value = serde_json::to_value(record).unwrap();
        assert_eq!(json["current_streak"], 1);
        assert_eq!(json["last_game_date"], "2025-03-09");
    }
}
