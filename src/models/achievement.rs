//! Achievement catalog entries and unlock state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display rarity, ordered from most to least common. Never consulted by
/// unlock logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
            Rarity::Mythic => "mythic",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "common" => Some(Rarity::Common),
            "uncommon" => Some(Rarity::Uncommon),
            "rare" => Some(Rarity::Rare),
            "epic" => Some(Rarity::Epic),
            "legendary" => Some(Rarity::Legendary),
            "mythic" => Some(Rarity::Mythic),
            _ => None,
        }
    }
}

/// Metric an achievement threshold is evaluated against.
///
/// For the two win-rate types the threshold is a minimum game count; the
/// percentage floor (60 or 70) is part of the type itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionType {
    GamesCount,
    WinsCount,
    OpponentsCount,
    StreakDays,
    WinRate60,
    WinRate70,
}

impl ConditionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionType::GamesCount => "games_count",
            ConditionType::WinsCount => "wins_count",
            ConditionType::OpponentsCount => "opponents_count",
            ConditionType::StreakDays => "streak_days",
            ConditionType::WinRate60 => "win_rate_60",
            ConditionType::WinRate70 => "win_rate_70",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "games_count" => Some(ConditionType::GamesCount),
            "wins_count" => Some(ConditionType::WinsCount),
            "opponents_count" => Some(ConditionType::OpponentsCount),
            "streak_days" => Some(ConditionType::StreakDays),
            "win_rate_60" => Some(ConditionType::WinRate60),
            "win_rate_70" => Some(ConditionType::WinRate70),
            _ => None,
        }
    }
}

/// Immutable catalog entry. `key` is the stable identifier clients use for
/// localization; `sort_order` fixes the evaluation and display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementDefinition {
    pub key: String,
    pub icon: String,
    pub rarity: Rarity,
    pub condition_type: ConditionType,
    pub condition_value: u32,
    pub sort_order: u32,
}

/// Catalog entry decorated with one user's unlock state, as listed by the
/// achievements endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementStatus {
    pub name: String,
    pub icon: String,
    pub rarity: Rarity,
    pub unlocked: bool,
    pub unlocked_at: Option<DateTime<Utc>>,
}

impl AchievementStatus {
    pub fn from_definition(
        def: &AchievementDefinition,
        unlocked_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            name: def.key.clone(),
            icon: def.icon.clone(),
            rarity: def.rarity,
            unlocked: unlocked_at.is_some(),
            unlocked_at,
        }
    }
}
