//! Achievement condition checks and unlock recording.

use crate::models::{AchievementDefinition, ConditionType, DerivedStats};
use crate::stats::StatsAggregator;
use crate::storage::{Database, StorageError};

use super::AchievementCatalog;

/// Scans the catalog against a user's derived statistics and records any
/// unlocks that are due.
///
/// Safe to run concurrently for the same user: the unlock row's primary
/// key makes the insert a check-and-set, so of two racing calls exactly
/// one reports a given achievement as new.
#[derive(Clone)]
pub struct AchievementEvaluator {
    db: Database,
    aggregator: StatsAggregator,
    catalog: AchievementCatalog,
}

impl AchievementEvaluator {
    pub fn new(db: Database, catalog: AchievementCatalog) -> Self {
        let aggregator = StatsAggregator::new(db.clone());
        Self {
            db,
            aggregator,
            catalog,
        }
    }

    /// Unlock everything the user's current statistics satisfy. Returns
    /// only the achievements this call unlocked, in catalog order; a
    /// repeat call with no new games returns nothing.
    pub fn evaluate(&self, user_id: i64) -> Result<Vec<AchievementDefinition>, StorageError> {
        let stats = self.aggregator.compute(user_id)?;
        let unlocked = self.db.unlocked_keys(user_id)?;

        let mut newly_unlocked = Vec::new();
        for def in self.catalog.definitions() {
            if unlocked.contains(&def.key) || !condition_met(def, &stats) {
                continue;
            }
            // The insert loses to a concurrent evaluation cleanly; the
            // other call gets to report the unlock.
            if self.db.insert_unlock(user_id, &def.key)? {
                tracing::info!(user_id, achievement = %def.key, "achievement unlocked");
                newly_unlocked.push(def.clone());
            }
        }
        Ok(newly_unlocked)
    }
}

/// Whether one definition's threshold is met. Total over well-formed
/// statistics; rarity never participates.
fn condition_met(def: &AchievementDefinition, stats: &DerivedStats) -> bool {
    let threshold = def.condition_value;
    match def.condition_type {
        ConditionType::GamesCount => stats.total_games >= threshold,
        ConditionType::WinsCount => stats.total_wins >= threshold,
        ConditionType::OpponentsCount => stats.total_opponents >= threshold,
        ConditionType::StreakDays => {
            stats.current_streak >= threshold || stats.best_streak >= threshold
        }
        // For the rate types the stored value is a minimum game count.
        ConditionType::WinRate60 => stats.win_rate >= 60.0 && stats.total_games >= threshold,
        ConditionType::WinRate70 => stats.win_rate >= 70.0 && stats.total_games >= threshold,
    }
}
