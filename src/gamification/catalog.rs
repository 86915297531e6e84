//! The seeded achievement catalog.

use crate::models::{AchievementDefinition, ConditionType, Rarity};
use crate::storage::{Database, StorageError};

use ConditionType::*;
use Rarity::*;

/// Seed rows, in display and evaluation order. For the win-rate entries the
/// value is the minimum game count; the percentage floor lives in the type.
const SEED: &[(&str, &str, Rarity, ConditionType, u32)] = &[
    ("first_step", "🎾", Common, GamesCount, 1),
    ("getting_started", "🏸", Common, GamesCount, 10),
    ("regular", "🏓", Uncommon, GamesCount, 25),
    ("half_century", "🎯", Uncommon, GamesCount, 50),
    ("century_club", "💯", Rare, GamesCount, 100),
    ("court_veteran", "🎖️", Epic, GamesCount, 250),
    ("relentless", "🚀", Legendary, GamesCount, 500),
    ("living_legend", "👑", Mythic, GamesCount, 1000),
    ("first_victory", "🏆", Common, WinsCount, 1),
    ("serial_winner", "🥇", Rare, WinsCount, 50),
    ("conqueror", "⚔️", Epic, WinsCount, 100),
    ("social_player", "🤝", Common, OpponentsCount, 5),
    ("challenger", "🎭", Uncommon, OpponentsCount, 10),
    ("nemesis_collector", "🌐", Rare, OpponentsCount, 25),
    ("on_fire", "🔥", Common, StreakDays, 3),
    ("week_warrior", "📅", Uncommon, StreakDays, 7),
    ("unstoppable", "⚡", Epic, StreakDays, 30),
    ("iron_will", "💎", Legendary, StreakDays, 90),
    ("rising_star", "🌟", Rare, WinRate60, 20),
    ("elite_player", "🏅", Legendary, WinRate70, 50),
];

/// All catalog definitions in sort order.
pub fn seed_definitions() -> Vec<AchievementDefinition> {
    SEED.iter()
        .enumerate()
        .map(
            |(i, &(key, icon, rarity, condition_type, condition_value))| AchievementDefinition {
                key: key.to_string(),
                icon: icon.to_string(),
                rarity,
                condition_type,
                condition_value,
                sort_order: i as u32,
            },
        )
        .collect()
}

/// In-memory catalog, loaded once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct AchievementCatalog {
    definitions: Vec<AchievementDefinition>,
}

impl AchievementCatalog {
    /// Seed any missing rows, then load the stored catalog in sort order.
    pub fn load(db: &Database) -> Result<Self, StorageError> {
        let added = db.seed_achievements(&seed_definitions())?;
        if added > 0 {
            tracing::info!(added, "seeded achievement catalog");
        }
        let definitions = db.list_achievement_catalog()?;
        Ok(Self { definitions })
    }

    pub fn definitions(&self) -> &[AchievementDefinition] {
        &self.definitions
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;

    fn thresholds(condition: ConditionType) -> Vec<u32> {
        seed_definitions()
            .iter()
            .filter(|d| d.condition_type == condition)
            .map(|d| d.condition_value)
            .collect()
    }

    #[test]
    fn test_twenty_unique_keys() {
        let defs = seed_definitions();
        assert_eq!(defs.len(), 20);
        let keys: HashSet<_> = defs.iter().map(|d| d.key.clone()).collect();
        assert_eq!(keys.len(), 20);
    }

    #[test]
    fn test_threshold_ladders() {
        assert_eq!(
            thresholds(ConditionType::GamesCount),
            vec![1, 10, 25, 50, 100, 250, 500, 1000]
        );
        assert_eq!(thresholds(ConditionType::WinsCount), vec![1, 50, 100]);
        assert_eq!(thresholds(ConditionType::OpponentsCount), vec![5, 10, 25]);
        assert_eq!(thresholds(ConditionType::StreakDays), vec![3, 7, 30, 90]);
        assert_eq!(thresholds(ConditionType::WinRate60), vec![20]);
        assert_eq!(thresholds(ConditionType::WinRate70), vec![50]);
    }

    #[test]
    fn test_sort_order_is_position() {
        for (i, def) in seed_definitions().iter().enumerate() {
            assert_eq!(def.sort_order, i as u32, "{}", def.key);
        }
    }

    #[test]
    fn test_load_seeds_once() {
        let db = Database::open_in_memory().unwrap();
        let first = AchievementCatalog::load(&db).unwrap();
        assert_eq!(first.definitions().len(), 20);

        // A second load finds every row already present.
        let second = AchievementCatalog::load(&db).unwrap();
        assert_eq!(second.definitions(), first.definitions());
    }
}
