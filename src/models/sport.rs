//! Sport catalog and game constants.

use serde::{Deserialize, Serialize};

/// Supported racket sports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sport {
    TableTennis,
    Badminton,
    Tennis,
    Squash,
    Padel,
    BeachTennis,
    Pickleball,
}

impl Sport {
    pub const ALL: [Sport; 7] = [
        Sport::TableTennis,
        Sport::Badminton,
        Sport::Tennis,
        Sport::Squash,
        Sport::Padel,
        Sport::BeachTennis,
        Sport::Pickleball,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sport::TableTennis => "table_tennis",
            Sport::Badminton => "badminton",
            Sport::Tennis => "tennis",
            Sport::Squash => "squash",
            Sport::Padel => "padel",
            Sport::BeachTennis => "beach_tennis",
            Sport::Pickleball => "pickleball",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "table_tennis" => Some(Sport::TableTennis),
            "badminton" => Some(Sport::Badminton),
            "tennis" => Some(Sport::Tennis),
            "squash" => Some(Sport::Squash),
            "padel" => Some(Sport::Padel),
            "beach_tennis" => Some(Sport::BeachTennis),
            "pickleball" => Some(Sport::Pickleball),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Sport::TableTennis => "Table Tennis",
            Sport::Badminton => "Badminton",
            Sport::Tennis => "Tennis",
            Sport::Squash => "Squash",
            Sport::Padel => "Padel",
            Sport::BeachTennis => "Beach Tennis",
            Sport::Pickleball => "Pickleball",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Sport::TableTennis => "🏓",
            Sport::Badminton => "🏸",
            Sport::Tennis => "🎾",
            Sport::Squash => "🟠",
            Sport::Padel => "🏓",
            Sport::BeachTennis => "🏖️",
            Sport::Pickleball => "🥒",
        }
    }

    /// Game types playable in this sport.
    pub fn game_types(&self) -> &'static [GameType] {
        match self {
            Sport::Squash => &[GameType::Singles],
            Sport::Padel | Sport::BeachTennis => &[GameType::Doubles],
            _ => &[GameType::Singles, GameType::Doubles],
        }
    }

    pub fn supports(&self, game_type: GameType) -> bool {
        self.game_types().contains(&game_type)
    }
}

impl std::fmt::Display for Sport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Singles or doubles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    Singles,
    Doubles,
}

impl GameType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Singles => "singles",
            GameType::Doubles => "doubles",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "singles" => Some(GameType::Singles),
            "doubles" => Some(GameType::Doubles),
            _ => None,
        }
    }
}

/// Outcome of a game from the owning user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    Win,
    Loss,
    Draw,
}

impl GameResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameResult::Win => "win",
            GameResult::Loss => "loss",
            GameResult::Draw => "draw",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "win" => Some(GameResult::Win),
            "loss" => Some(GameResult::Loss),
            "draw" => Some(GameResult::Draw),
            _ => None,
        }
    }
}

/// Catalog entry returned by the sports endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SportInfo {
    pub key: String,
    pub name: String,
    pub icon: String,
    pub game_types: Vec<GameType>,
}

impl SportInfo {
    pub fn catalog() -> Vec<SportInfo> {
        Sport::ALL
            .iter()
            .map(|s| SportInfo {
                key: s.as_str().to_string(),
                name: s.display_name().to_string(),
                icon: s.icon().to_string(),
                game_types: s.game_types().to_vec(),
            })
            .collect()
    }
}
