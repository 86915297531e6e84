//! Derived statistics models.

use serde::{Deserialize, Serialize};

use super::Sport;

/// Per-user aggregates the achievement engine evaluates against. Computed
/// on demand, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedStats {
    pub total_games: u32,
    pub total_wins: u32,
    /// Distinct primary opponents across all games.
    pub total_opponents: u32,
    /// Percentage in [0, 100]; 0 when no games. Unrounded.
    pub win_rate: f64,
    pub current_streak: u32,
    pub best_streak: u32,
}

impl DerivedStats {
    /// Win rate for the given tallies, 0 when nothing has been played.
    pub fn win_rate_for(total_games: u32, total_wins: u32) -> f64 {
        if total_games > 0 {
            total_wins as f64 / total_games as f64 * 100.0
        } else {
            0.0
        }
    }
}

/// Round a percentage to one decimal for display.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Statistics for one sport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SportStatistics {
    pub sport: Sport,
    pub total_games: u32,
    pub singles_games: u32,
    pub doubles_games: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    /// Percentage rounded to one decimal.
    pub win_rate: f64,
    /// Players registered for this sport.
    pub total_players: u32,
}

/// Statistics across every sport the user has played.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverallStatistics {
    pub total_games: u32,
    pub total_wins: u32,
    pub total_losses: u32,
    pub total_draws: u32,
    /// Percentage rounded to one decimal.
    pub win_rate: f64,
    pub sports_played: Vec<Sport>,
    pub by_sport: Vec<SportStatistics>,
}
