//! Logged games.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{GameResult, GameType, Sport};

/// One logged game. Player references point at [`super::Player`] rows owned
/// by the same user; `opponent2_id` and `partner_id` are set for doubles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: i64,
    pub user_id: i64,
    pub sport: Sport,
    pub game_type: GameType,
    pub opponent_id: i64,
    pub opponent2_id: Option<i64>,
    pub partner_id: Option<i64>,
    pub game_date: NaiveDate,
    pub result: GameResult,
    /// Sets summary, e.g. "3-1".
    pub score: Option<String>,
    /// Per-set points, e.g. "11-5,8-11,12-10".
    pub detailed_score: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Game {
    pub fn is_win(&self) -> bool {
        self.result == GameResult::Win
    }
}

/// Game listing entry: the record plus joined player names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameWithNames {
    #[serde(flatten)]
    pub game: Game,
    pub opponent_name: Option<String>,
    pub opponent2_name: Option<String>,
    pub partner_name: Option<String>,
}
