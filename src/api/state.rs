use crate::auth::TokenKeys;
use crate::config::AppConfig;
use crate::gamification::{AchievementCatalog, AchievementEvaluator, StreakTracker};
use crate::stats::StatsAggregator;
use crate::storage::{Database, StorageError};

/// Shared handles for request handlers. Cheap to clone; the database
/// handle is the only shared resource underneath.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub token_keys: TokenKeys,
    pub catalog: AchievementCatalog,
    pub streaks: StreakTracker,
    pub evaluator: AchievementEvaluator,
    pub stats: StatsAggregator,
    pub dev_login_enabled: bool,
}

impl AppState {
    /// Wire up the application components around an opened database.
    /// Seeds the achievement catalog as a side effect.
    pub fn new(db: Database, config: &AppConfig) -> Result<Self, StorageError> {
        let catalog = AchievementCatalog::load(&db)?;
        Ok(Self {
            token_keys: TokenKeys::new(&config.auth.jwt_secret, config.auth.token_ttl_days),
            streaks: StreakTracker::new(db.clone()),
            evaluator: AchievementEvaluator::new(db.clone(), catalog.clone()),
            stats: StatsAggregator::new(db.clone()),
            catalog,
            dev_login_enabled: config.auth.dev_login_enabled,
            db,
        })
    }
}
