//! Streak rows, the achievement catalog, and unlock rows.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::{bad_column, now_text, parse_date, parse_timestamp, Database, StorageError, DATE_FMT};
use crate::models::{AchievementDefinition, ConditionType, Rarity, StreakRecord};

fn definition_from_row(row: &Row) -> rusqlite::Result<AchievementDefinition> {
    let rarity: String = row.get(2)?;
    let condition_type: String = row.get(3)?;
    Ok(AchievementDefinition {
        key: row.get(0)?,
        icon: row.get(1)?,
        rarity: Rarity::parse(&rarity).ok_or_else(|| bad_column(2, "rarity", &rarity))?,
        condition_type: ConditionType::parse(&condition_type)
            .ok_or_else(|| bad_column(3, "condition type", &condition_type))?,
        condition_value: row.get(4)?,
        sort_order: row.get(5)?,
    })
}

fn streak_from_row(row: &Row) -> rusqlite::Result<StreakRecord> {
    let last_game_date: Option<String> = row.get(2)?;
    Ok(StreakRecord {
        current_streak: row.get(0)?,
        best_streak: row.get(1)?,
        last_game_date: last_game_date
            .map(|d| parse_date(2, &d))
            .transpose()?,
    })
}

const DEFINITION_COLUMNS: &str = "key, icon, rarity, condition_type, condition_value, sort_order";

impl Database {
    /// Stored streak state for a user, `None` before their first game.
    pub fn get_streak(&self, user_id: i64) -> Result<Option<StreakRecord>, StorageError> {
        let conn = self.conn()?;
        let record = conn
            .query_row(
                "SELECT current_streak, best_streak, last_game_date
                 FROM streaks WHERE user_id = ?1",
                params![user_id],
                streak_from_row,
            )
            .optional()?;
        Ok(record)
    }

    /// Write a user's streak state, creating the row on first use.
    pub fn upsert_streak(&self, user_id: i64, record: &StreakRecord) -> Result<(), StorageError> {
        let conn = self.conn()?;
        let last = record.last_game_date.map(|d| d.format(DATE_FMT).to_string());
        conn.execute(
            "INSERT INTO streaks (user_id, current_streak, best_streak, last_game_date, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(user_id) DO UPDATE SET
                 current_streak = excluded.current_streak,
                 best_streak = excluded.best_streak,
                 last_game_date = excluded.last_game_date,
                 updated_at = excluded.updated_at",
            params![
                user_id,
                record.current_streak,
                record.best_streak,
                last,
                now_text()
            ],
        )?;
        Ok(())
    }

    /// Insert catalog rows that are not present yet. Safe to call on every
    /// startup; returns how many rows were actually added.
    pub fn seed_achievements(
        &self,
        definitions: &[AchievementDefinition],
    ) -> Result<usize, StorageError> {
        let conn = self.conn()?;
        let mut inserted = 0;
        for def in definitions {
            inserted += conn.execute(
                "INSERT OR IGNORE INTO achievements
                     (key, icon, rarity, condition_type, condition_value, sort_order)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    def.key,
                    def.icon,
                    def.rarity.as_str(),
                    def.condition_type.as_str(),
                    def.condition_value,
                    def.sort_order
                ],
            )?;
        }
        Ok(inserted)
    }

    /// Full catalog in sort order.
    pub fn list_achievement_catalog(&self) -> Result<Vec<AchievementDefinition>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {DEFINITION_COLUMNS} FROM achievements ORDER BY sort_order"
        ))?;
        let definitions = stmt
            .query_map([], definition_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(definitions)
    }

    pub fn is_unlocked(&self, user_id: i64, key: &str) -> Result<bool, StorageError> {
        let conn = self.conn()?;
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM achievement_unlocks
                 WHERE user_id = ?1 AND achievement_key = ?2",
                params![user_id, key],
                |r| r.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Keys of every achievement the user has unlocked.
    pub fn unlocked_keys(&self, user_id: i64) -> Result<HashSet<String>, StorageError> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT achievement_key FROM achievement_unlocks WHERE user_id = ?1")?;
        let keys = stmt
            .query_map(params![user_id], |r| r.get(0))?
            .collect::<rusqlite::Result<HashSet<String>>>()?;
        Ok(keys)
    }

    /// Unlock timestamps keyed by achievement, for the catalog listing.
    pub fn unlock_times(
        &self,
        user_id: i64,
    ) -> Result<HashMap<String, DateTime<Utc>>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT achievement_key, unlocked_at FROM achievement_unlocks WHERE user_id = ?1",
        )?;
        let times = stmt
            .query_map(params![user_id], |row| {
                let key: String = row.get(0)?;
                let at: String = row.get(1)?;
                Ok((key, parse_timestamp(1, &at)?))
            })?
            .collect::<rusqlite::Result<HashMap<_, _>>>()?;
        Ok(times)
    }

    /// Atomic insert-if-absent for an unlock. `Ok(true)` means this call
    /// created the row; `Ok(false)` means the pair already existed. The
    /// primary key on (user_id, achievement_key) is the only guard needed
    /// under concurrent evaluation.
    pub fn insert_unlock(&self, user_id: i64, key: &str) -> Result<bool, StorageError> {
        let conn = self.conn()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO achievement_unlocks (user_id, achievement_key, unlocked_at)
             VALUES (?1, ?2, ?3)",
            params![user_id, key, now_text()],
        )?;
        Ok(inserted == 1)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use crate::gamification::seed_definitions;
    use crate::models::{ConditionType, StreakRecord};
    use crate::storage::Database;

    fn seeded_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.seed_achievements(&seed_definitions()).unwrap();
        db
    }

    fn user(db: &Database, email: &str) -> i64 {
        db.create_user(email, None, None).unwrap().unwrap().id
    }

    #[test]
    fn test_streak_roundtrip() {
        let db = seeded_db();
        let id = user(&db, "s@example.com");
        assert!(db.get_streak(id).unwrap().is_none());

        let record = StreakRecord::started(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        db.upsert_streak(id, &record).unwrap();
        assert_eq!(db.get_streak(id).unwrap(), Some(record));

        let grown = StreakRecord {
            current_streak: 4,
            best_streak: 9,
            last_game_date: NaiveDate::from_ymd_opt(2025, 1, 4),
        };
        db.upsert_streak(id, &grown).unwrap();
        assert_eq!(db.get_streak(id).unwrap(), Some(grown));
    }

    #[test]
    fn test_seed_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        let defs = seed_definitions();
        assert_eq!(db.seed_achievements(&defs).unwrap(), defs.len());
        assert_eq!(db.seed_achievements(&defs).unwrap(), 0);
        // Stored rows read back exactly as seeded.
        assert_eq!(db.list_achievement_catalog().unwrap(), defs);
    }

    #[test]
    fn test_catalog_in_sort_order() {
        let db = seeded_db();
        let catalog = db.list_achievement_catalog().unwrap();
        assert_eq!(catalog.first().unwrap().key, "first_step");
        assert!(catalog.windows(2).all(|w| w[0].sort_order < w[1].sort_order));
        assert_eq!(
            catalog
                .iter()
                .filter(|d| d.condition_type == ConditionType::StreakDays)
                .count(),
            4
        );
    }

    #[test]
    fn test_insert_unlock_once() {
        let db = seeded_db();
        let id = user(&db, "u@example.com");

        assert!(!db.is_unlocked(id, "first_step").unwrap());
        assert!(db.insert_unlock(id, "first_step").unwrap());
        assert!(!db.insert_unlock(id, "first_step").unwrap());
        assert!(db.is_unlocked(id, "first_step").unwrap());

        let times = db.unlock_times(id).unwrap();
        assert_eq!(times.len(), 1);
        assert!(times.contains_key("first_step"));
    }

    #[test]
    fn test_unlocks_are_per_user() {
        let db = seeded_db();
        let a = user(&db, "a@example.com");
        let b = user(&db, "b@example.com");

        db.insert_unlock(a, "first_step").unwrap();
        db.insert_unlock(a, "first_victory").unwrap();

        assert_eq!(db.unlocked_keys(a).unwrap().len(), 2);
        assert!(db.unlocked_keys(b).unwrap().is_empty());
        assert!(!db.is_unlocked(b, "first_step").unwrap());
    }
}
