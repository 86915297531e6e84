//! Registered opponents and partners.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Sport;

/// Dominant hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hand {
    Right,
    Left,
}

impl Hand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Hand::Right => "right",
            Hand::Left => "left",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "right" => Some(Hand::Right),
            "left" => Some(Hand::Left),
            _ => None,
        }
    }
}

/// Self-assessed skill level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Professional,
}

impl SkillLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
            SkillLevel::Professional => "professional",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "beginner" => Some(SkillLevel::Beginner),
            "intermediate" => Some(SkillLevel::Intermediate),
            "advanced" => Some(SkillLevel::Advanced),
            "professional" => Some(SkillLevel::Professional),
            _ => None,
        }
    }
}

/// Playing style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayStyle {
    Offensive,
    Defensive,
    AllAround,
}

impl PlayStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayStyle::Offensive => "offensive",
            PlayStyle::Defensive => "defensive",
            PlayStyle::AllAround => "all_around",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "offensive" => Some(PlayStyle::Offensive),
            "defensive" => Some(PlayStyle::Defensive),
            "all_around" => Some(PlayStyle::AllAround),
            _ => None,
        }
    }
}

/// Age bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "under_20")]
    Under20,
    #[serde(rename = "20_39")]
    Twenties,
    #[serde(rename = "40_59")]
    Forties,
    #[serde(rename = "60_plus")]
    SixtyPlus,
}

impl AgeGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Under20 => "under_20",
            AgeGroup::Twenties => "20_39",
            AgeGroup::Forties => "40_59",
            AgeGroup::SixtyPlus => "60_plus",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "under_20" => Some(AgeGroup::Under20),
            "20_39" => Some(AgeGroup::Twenties),
            "40_59" => Some(AgeGroup::Forties),
            "60_plus" => Some(AgeGroup::SixtyPlus),
            _ => None,
        }
    }
}

/// A named opponent or partner, scoped to one user and one sport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: i64,
    pub user_id: i64,
    pub sport: Sport,
    pub name: String,
    pub dominant_hand: Option<Hand>,
    pub level: Option<SkillLevel>,
    pub play_style: Option<PlayStyle>,
    pub age_group: Option<AgeGroup>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Head-to-head tallies for a player, from the owning user's perspective.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PlayerTallies {
    /// Games with this player as (any) opponent.
    pub games_against: u32,
    pub wins_against: u32,
    pub losses_against: u32,
    /// Games with this player as partner.
    pub games_with: u32,
    pub wins_with: u32,
    pub losses_with: u32,
}

/// Player listing entry: the record plus computed tallies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerWithStats {
    #[serde(flatten)]
    pub player: Player,
    #[serde(flatten)]
    pub tallies: PlayerTallies,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_group_wire_names() {
        assert_eq!(
            serde_json::to_string(&AgeGroup::Twenties).unwrap(),
            "\"20_39\""
        );
        assert_eq!(AgeGroup::parse("60_plus"), Some(AgeGroup::SixtyPlus));
        assert_eq!(AgeGroup::parse("teens"), None);
    }

    #[test]
    fn test_player_with_stats_flattens() {
        let player = Player {
            id: 3,
            user_id: 1,
            sport: Sport::Badminton,
            name: "Marta".to_string(),
            dominant_hand: Some(Hand::Left),
            level: Some(SkillLevel::Advanced),
            play_style: Some(PlayStyle::Offensive),
            age_group: Some(AgeGroup::Twenties),
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let entry = PlayerWithStats {
            player,
            tallies: PlayerTallies {
                games_against: 4,
                wins_against: 3,
                ..Default::default()
            },
        };

        let json: serde_json::Value = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["name"], "Marta");
        assert_eq!(json["games_against"], 4);
        assert_eq!(json["dominant_hand"], "left");
    }
}
