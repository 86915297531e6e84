//! Game log rows.

use rusqlite::{params, OptionalExtension, Row};

use super::{bad_column, now_text, parse_date, parse_timestamp, Database, StorageError, DATE_FMT};
use crate::models::{Game, GameResult, GameType, GameWithNames, Sport};
use chrono::NaiveDate;

/// Fields for a new game row.
#[derive(Debug, Clone)]
pub struct NewGame {
    pub user_id: i64,
    pub sport: Sport,
    pub game_type: GameType,
    pub opponent_id: i64,
    pub opponent2_id: Option<i64>,
    pub partner_id: Option<i64>,
    pub game_date: NaiveDate,
    pub result: GameResult,
    pub score: Option<String>,
    pub detailed_score: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// Partial update; `None` fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct GamePatch {
    pub game_date: Option<NaiveDate>,
    pub result: Option<GameResult>,
    pub score: Option<String>,
    pub detailed_score: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// Per-sport aggregate counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SportTotals {
    pub total: u32,
    pub singles: u32,
    pub doubles: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

const GAME_COLUMNS: &str = "g.id, g.user_id, g.sport, g.game_type, g.opponent_id, \
                            g.opponent2_id, g.partner_id, g.game_date, g.result, g.score, \
                            g.detailed_score, g.location, g.notes, g.created_at, g.updated_at, \
                            o.name, o2.name, p.name";

const GAME_JOINS: &str = "FROM games g \
                          LEFT JOIN players o ON o.id = g.opponent_id \
                          LEFT JOIN players o2 ON o2.id = g.opponent2_id \
                          LEFT JOIN players p ON p.id = g.partner_id";

fn game_from_row(row: &Row) -> rusqlite::Result<GameWithNames> {
    let sport: String = row.get(2)?;
    let game_type: String = row.get(3)?;
    let game_date: String = row.get(7)?;
    let result: String = row.get(8)?;
    let created_at: String = row.get(13)?;
    let updated_at: String = row.get(14)?;

    let game = Game {
        id: row.get(0)?,
        user_id: row.get(1)?,
        sport: Sport::parse(&sport).ok_or_else(|| bad_column(2, "sport", &sport))?,
        game_type: GameType::parse(&game_type)
            .ok_or_else(|| bad_column(3, "game type", &game_type))?,
        opponent_id: row.get(4)?,
        opponent2_id: row.get(5)?,
        partner_id: row.get(6)?,
        game_date: parse_date(7, &game_date)?,
        result: GameResult::parse(&result).ok_or_else(|| bad_column(8, "result", &result))?,
        score: row.get(9)?,
        detailed_score: row.get(10)?,
        location: row.get(11)?,
        notes: row.get(12)?,
        created_at: parse_timestamp(13, &created_at)?,
        updated_at: parse_timestamp(14, &updated_at)?,
    };

    Ok(GameWithNames {
        game,
        opponent_name: row.get(15)?,
        opponent2_name: row.get(16)?,
        partner_name: row.get(17)?,
    })
}

impl Database {
    pub fn insert_game(&self, new: &NewGame) -> Result<GameWithNames, StorageError> {
        let id = {
            let conn = self.conn()?;
            let now = now_text();
            conn.execute(
                "INSERT INTO games (user_id, sport, game_type, opponent_id, opponent2_id, \
                 partner_id, game_date, result, score, detailed_score, location, notes, \
                 created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)",
                params![
                    new.user_id,
                    new.sport.as_str(),
                    new.game_type.as_str(),
                    new.opponent_id,
                    new.opponent2_id,
                    new.partner_id,
                    new.game_date.format(DATE_FMT).to_string(),
                    new.result.as_str(),
                    new.score,
                    new.detailed_score,
                    new.location,
                    new.notes,
                    now,
                ],
            )?;
            conn.last_insert_rowid()
        };
        match self.find_game(new.user_id, id)? {
            Some(game) => Ok(game),
            None => Err(StorageError::Sqlite(rusqlite::Error::QueryReturnedNoRows)),
        }
    }

    pub fn find_game(&self, user_id: i64, id: i64) -> Result<Option<GameWithNames>, StorageError> {
        let conn = self.conn()?;
        let game = conn
            .query_row(
                &format!("SELECT {GAME_COLUMNS} {GAME_JOINS} WHERE g.id = ?1 AND g.user_id = ?2"),
                params![id, user_id],
                game_from_row,
            )
            .optional()?;
        Ok(game)
    }

    /// Games for a user, newest first (played date, then creation order).
    pub fn list_games(
        &self,
        user_id: i64,
        sport: Option<Sport>,
    ) -> Result<Vec<GameWithNames>, StorageError> {
        let conn = self.conn()?;
        match sport {
            Some(sport) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {GAME_COLUMNS} {GAME_JOINS}
                     WHERE g.user_id = ?1 AND g.sport = ?2
                     ORDER BY g.game_date DESC, g.created_at DESC, g.id DESC"
                ))?;
                let rows = stmt.query_map(params![user_id, sport.as_str()], game_from_row)?;
                Ok(rows.collect::<rusqlite::Result<_>>()?)
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {GAME_COLUMNS} {GAME_JOINS}
                     WHERE g.user_id = ?1
                     ORDER BY g.game_date DESC, g.created_at DESC, g.id DESC"
                ))?;
                let rows = stmt.query_map(params![user_id], game_from_row)?;
                Ok(rows.collect::<rusqlite::Result<_>>()?)
            }
        }
    }

    /// Apply a partial update. Returns `None` when the game does not exist
    /// for this user.
    pub fn update_game(
        &self,
        user_id: i64,
        id: i64,
        patch: &GamePatch,
    ) -> Result<Option<GameWithNames>, StorageError> {
        let updated = {
            let conn = self.conn()?;
            conn.execute(
                "UPDATE games SET
                     game_date = COALESCE(?1, game_date),
                     result = COALESCE(?2, result),
                     score = COALESCE(?3, score),
                     detailed_score = COALESCE(?4, detailed_score),
                     location = COALESCE(?5, location),
                     notes = COALESCE(?6, notes),
                     updated_at = ?7
                 WHERE id = ?8 AND user_id = ?9",
                params![
                    patch.game_date.map(|d| d.format(DATE_FMT).to_string()),
                    patch.result.map(|r| r.as_str()),
                    patch.score,
                    patch.detailed_score,
                    patch.location,
                    patch.notes,
                    now_text(),
                    id,
                    user_id,
                ],
            )?
        };
        if updated == 0 {
            return Ok(None);
        }
        self.find_game(user_id, id)
    }

    /// Delete a game row. Returns false when it did not exist.
    pub fn delete_game(&self, user_id: i64, id: i64) -> Result<bool, StorageError> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM games WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(deleted > 0)
    }

    /// Total, won, lost, and drawn games across all sports.
    pub fn game_counts(&self, user_id: i64) -> Result<(u32, u32, u32, u32), StorageError> {
        let conn = self.conn()?;
        let counts = conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(CASE WHEN result = 'win' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN result = 'loss' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN result = 'draw' THEN 1 ELSE 0 END), 0)
             FROM games WHERE user_id = ?1",
            params![user_id],
            |r| {
                Ok((
                    r.get::<_, u32>(0)?,
                    r.get::<_, u32>(1)?,
                    r.get::<_, u32>(2)?,
                    r.get::<_, u32>(3)?,
                ))
            },
        )?;
        Ok(counts)
    }

    /// Distinct primary opponents across all games. Second opponents in
    /// doubles do not count here.
    pub fn distinct_opponents(&self, user_id: i64) -> Result<u32, StorageError> {
        let conn = self.conn()?;
        let count: u32 = conn.query_row(
            "SELECT COUNT(DISTINCT opponent_id) FROM games WHERE user_id = ?1",
            params![user_id],
            |r| r.get(0),
        )?;
        Ok(count)
    }

    pub fn sport_totals(&self, user_id: i64, sport: Sport) -> Result<SportTotals, StorageError> {
        let conn = self.conn()?;
        let totals = conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(CASE WHEN game_type = 'singles' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN game_type = 'doubles' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN result = 'win' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN result = 'loss' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN result = 'draw' THEN 1 ELSE 0 END), 0)
             FROM games WHERE user_id = ?1 AND sport = ?2",
            params![user_id, sport.as_str()],
            |r| {
                Ok(SportTotals {
                    total: r.get(0)?,
                    singles: r.get(1)?,
                    doubles: r.get(2)?,
                    wins: r.get(3)?,
                    losses: r.get(4)?,
                    draws: r.get(5)?,
                })
            },
        )?;
        Ok(totals)
    }

    /// Sports with at least one logged game, in key order.
    pub fn sports_played(&self, user_id: i64) -> Result<Vec<Sport>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT DISTINCT sport FROM games WHERE user_id = ?1 ORDER BY sport")?;
        let rows = stmt.query_map(params![user_id], |row| {
            let sport: String = row.get(0)?;
            Sport::parse(&sport).ok_or_else(|| bad_column(0, "sport", &sport))
        })?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }
}
