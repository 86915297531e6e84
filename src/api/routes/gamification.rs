//! Achievement and streak endpoints.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::{ApiError, AuthUser};
use crate::models::{AchievementDefinition, AchievementStatus, StreakRecord};

/// Streak counters as exposed over the API.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StreakSummary {
    pub current_streak: u32,
    pub best_streak: u32,
}

impl From<StreakRecord> for StreakSummary {
    fn from(record: StreakRecord) -> Self {
        Self {
            current_streak: record.current_streak,
            best_streak: record.best_streak,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AchievementsResponse {
    pub achievements: Vec<AchievementStatus>,
}

#[derive(Debug, Serialize)]
pub struct StreakResponse {
    pub streak: StreakSummary,
}

#[derive(Debug, Serialize)]
pub struct CheckAchievementsResponse {
    pub newly_unlocked: Vec<AchievementDefinition>,
    pub streak: StreakSummary,
}

/// The full catalog decorated with this user's unlock state.
pub async fn achievements(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<AchievementsResponse>, ApiError> {
    let times = state.db.unlock_times(auth.user_id)?;
    let achievements = state
        .catalog
        .definitions()
        .iter()
        .map(|def| AchievementStatus::from_definition(def, times.get(&def.key).copied()))
        .collect();
    Ok(Json(AchievementsResponse { achievements }))
}

pub async fn streak(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<StreakResponse>, ApiError> {
    let record = state.db.get_streak(auth.user_id)?.unwrap_or_default();
    Ok(Json(StreakResponse {
        streak: record.into(),
    }))
}

/// Re-run evaluation outside game creation. No game is being logged, so
/// the streak is reported as stored, never advanced.
pub async fn check_achievements(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<CheckAchievementsResponse>, ApiError> {
    let newly_unlocked = state.evaluator.evaluate(auth.user_id)?;
    let record = state.db.get_streak(auth.user_id)?.unwrap_or_default();
    Ok(Json(CheckAchievementsResponse {
        newly_unlocked,
        streak: record.into(),
    }))
}
