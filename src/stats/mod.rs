//! On-demand aggregates derived from the game log.

use crate::models::{
    round_one_decimal, DerivedStats, OverallStatistics, Sport, SportStatistics,
};
use crate::storage::{Database, StorageError};

/// Read-only statistics queries. No caching; every call reflects the game
/// log as stored.
#[derive(Clone)]
pub struct StatsAggregator {
    db: Database,
}

impl StatsAggregator {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// The per-user aggregates the achievement evaluator runs against.
    /// `win_rate` stays unrounded here.
    pub fn compute(&self, user_id: i64) -> Result<DerivedStats, StorageError> {
        let (total_games, total_wins, _, _) = self.db.game_counts(user_id)?;
        let total_opponents = self.db.distinct_opponents(user_id)?;
        let streak = self.db.get_streak(user_id)?.unwrap_or_default();

        Ok(DerivedStats {
            total_games,
            total_wins,
            total_opponents,
            win_rate: DerivedStats::win_rate_for(total_games, total_wins),
            current_streak: streak.current_streak,
            best_streak: streak.best_streak,
        })
    }

    /// Display statistics for one sport, win rate rounded to one decimal.
    pub fn sport_statistics(
        &self,
        user_id: i64,
        sport: Sport,
    ) -> Result<SportStatistics, StorageError> {
        let totals = self.db.sport_totals(user_id, sport)?;
        let total_players = self.db.count_players_for_sport(user_id, sport)?;

        Ok(SportStatistics {
            sport,
            total_games: totals.total,
            singles_games: totals.singles,
            doubles_games: totals.doubles,
            wins: totals.wins,
            losses: totals.losses,
            draws: totals.draws,
            win_rate: round_one_decimal(DerivedStats::win_rate_for(totals.total, totals.wins)),
            total_players,
        })
    }

    /// Cross-sport totals plus a per-sport breakdown for every sport that
    /// appears in the game log.
    pub fn overall_statistics(&self, user_id: i64) -> Result<OverallStatistics, StorageError> {
        let (total_games, total_wins, total_losses, total_draws) = self.db.game_counts(user_id)?;
        let sports_played = self.db.sports_played(user_id)?;
        let by_sport = sports_played
            .iter()
            .map(|&sport| self.sport_statistics(user_id, sport))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(OverallStatistics {
            total_games,
            total_wins,
            total_losses,
            total_draws,
            win_rate: round_one_decimal(DerivedStats::win_rate_for(total_games, total_wins)),
            sports_played,
            by_sport,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::{GameResult, GameType};
    use crate::storage::{NewGame, NewPlayer};

    fn setup() -> (Database, StatsAggregator, i64) {
        let db = Database::open_in_memory().unwrap();
        let user = db
            .create_user("stats@example.com", None, None)
            .unwrap()
            .unwrap();
        let aggregator = StatsAggregator::new(db.clone());
        (db, aggregator, user.id)
    }

    fn add_player(db: &Database, user_id: i64, sport: Sport, name: &str) -> i64 {
        db.insert_player(&NewPlayer {
            user_id,
            sport,
            name: name.to_string(),
            dominant_hand: None,
            level: None,
            play_style: None,
            age_group: None,
            notes: None,
        })
        .unwrap()
        .id
    }

    fn add_game(
        db: &Database,
        user_id: i64,
        sport: Sport,
        opponent_id: i64,
        date: &str,
        result: GameResult,
    ) {
        db.insert_game(&NewGame {
            user_id,
            sport,
            game_type: GameType::Singles,
            opponent_id,
            opponent2_id: None,
            partner_id: None,
            game_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            result,
            score: None,
            detailed_score: None,
            location: None,
            notes: None,
        })
        .unwrap();
    }

    #[test]
    fn test_zero_games_means_all_zeros() {
        let (_db, aggregator, user) = setup();
        let stats = aggregator.compute(user).unwrap();
        assert_eq!(stats, DerivedStats::default());
        assert_eq!(stats.win_rate, 0.0);
    }

    #[test]
    fn test_compute_counts_and_rate() {
        let (db, aggregator, user) = setup();
        let rui = add_player(&db, user, Sport::Tennis, "Rui");
        let ze = add_player(&db, user, Sport::Tennis, "Zé");

        add_game(&db, user, Sport::Tennis, rui, "2025-02-01", GameResult::Win);
        add_game(&db, user, Sport::Tennis, rui, "2025-02-02", GameResult::Loss);
        add_game(&db, user, Sport::Tennis, ze, "2025-02-03", GameResult::Win);
        add_game(&db, user, Sport::Tennis, ze, "2025-02-04", GameResult::Draw);

        let stats = aggregator.compute(user).unwrap();
        assert_eq!(stats.total_games, 4);
        assert_eq!(stats.total_wins, 2);
        assert_eq!(stats.total_opponents, 2);
        assert_eq!(stats.win_rate, 50.0);
    }

    #[test]
    fn test_opponents_counted_once() {
        let (db, aggregator, user) = setup();
        let rui = add_player(&db, user, Sport::Squash, "Rui");
        for day in ["2025-02-01", "2025-02-03", "2025-02-05"] {
            add_game(&db, user, Sport::Squash, rui, day, GameResult::Win);
        }

        let stats = aggregator.compute(user).unwrap();
        assert_eq!(stats.total_games, 3);
        assert_eq!(stats.total_opponents, 1);
    }

    #[test]
    fn test_streak_flows_into_derived_stats() {
        let (db, aggregator, user) = setup();
        db.upsert_streak(
            user,
            &crate::models::StreakRecord {
                current_streak: 2,
                best_streak: 5,
                last_game_date: NaiveDate::from_ymd_opt(2025, 2, 10),
            },
        )
        .unwrap();

        let stats = aggregator.compute(user).unwrap();
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.best_streak, 5);
    }

    #[test]
    fn test_sport_statistics_rounding() {
        let (db, aggregator, user) = setup();
        let rui = add_player(&db, user, Sport::Padel, "Rui");
        add_game(&db, user, Sport::Padel, rui, "2025-02-01", GameResult::Win);
        add_game(&db, user, Sport::Padel, rui, "2025-02-02", GameResult::Win);
        add_game(&db, user, Sport::Padel, rui, "2025-02-03", GameResult::Loss);

        let stats = aggregator.sport_statistics(user, Sport::Padel).unwrap();
        assert_eq!(stats.total_games, 3);
        assert_eq!(stats.wins, 2);
        // 2/3 rounds to one decimal.
        assert_eq!(stats.win_rate, 66.7);
        assert_eq!(stats.total_players, 1);
    }

    #[test]
    fn test_overall_covers_played_sports() {
        let (db, aggregator, user) = setup();
        let rui = add_player(&db, user, Sport::Tennis, "Rui");
        let ze = add_player(&db, user, Sport::Squash, "Zé");

        add_game(&db, user, Sport::Tennis, rui, "2025-02-01", GameResult::Win);
        add_game(&db, user, Sport::Squash, ze, "2025-02-02", GameResult::Loss);

        let overall = aggregator.overall_statistics(user).unwrap();
        assert_eq!(overall.total_games, 2);
        assert_eq!(overall.total_wins, 1);
        assert_eq!(overall.total_losses, 1);
        assert_eq!(overall.win_rate, 50.0);
        assert_eq!(
            overall.sports_played,
            vec![Sport::Squash, Sport::Tennis]
        );
        assert_eq!(overall.by_sport.len(), 2);
    }
}
