//! Player rows (opponents and partners).

use rusqlite::{params, OptionalExtension, Row};

use super::{bad_column, now_text, parse_timestamp, Database, StorageError};
use crate::models::{
    AgeGroup, Hand, Player, PlayStyle, PlayerTallies, PlayerWithStats, SkillLevel, Sport,
};

/// Fields for a new player row.
#[derive(Debug, Clone)]
pub struct NewPlayer {
    pub user_id: i64,
    pub sport: Sport,
    pub name: String,
    pub dominant_hand: Option<Hand>,
    pub level: Option<SkillLevel>,
    pub play_style: Option<PlayStyle>,
    pub age_group: Option<AgeGroup>,
    pub notes: Option<String>,
}

/// Partial update; `None` fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct PlayerPatch {
    pub name: Option<String>,
    pub dominant_hand: Option<Hand>,
    pub level: Option<SkillLevel>,
    pub play_style: Option<PlayStyle>,
    pub age_group: Option<AgeGroup>,
    pub notes: Option<String>,
}

const PLAYER_COLUMNS: &str = "id, user_id, sport, name, dominant_hand, level, play_style, \
                              age_group, notes, created_at, updated_at";

fn player_from_row(row: &Row) -> rusqlite::Result<Player> {
    let sport: String = row.get(2)?;
    let hand: Option<String> = row.get(4)?;
    let level: Option<String> = row.get(5)?;
    let style: Option<String> = row.get(6)?;
    let age: Option<String> = row.get(7)?;
    let created_at: String = row.get(9)?;
    let updated_at: String = row.get(10)?;

    Ok(Player {
        id: row.get(0)?,
        user_id: row.get(1)?,
        sport: Sport::parse(&sport).ok_or_else(|| bad_column(2, "sport", &sport))?,
        name: row.get(3)?,
        dominant_hand: hand
            .map(|s| Hand::parse(&s).ok_or_else(|| bad_column(4, "hand", &s)))
            .transpose()?,
        level: level
            .map(|s| SkillLevel::parse(&s).ok_or_else(|| bad_column(5, "level", &s)))
            .transpose()?,
        play_style: style
            .map(|s| PlayStyle::parse(&s).ok_or_else(|| bad_column(6, "play style", &s)))
            .transpose()?,
        age_group: age
            .map(|s| AgeGroup::parse(&s).ok_or_else(|| bad_column(7, "age group", &s)))
            .transpose()?,
        notes: row.get(8)?,
        created_at: parse_timestamp(9, &created_at)?,
        updated_at: parse_timestamp(10, &updated_at)?,
    })
}

impl Database {
    pub fn insert_player(&self, new: &NewPlayer) -> Result<Player, StorageError> {
        let conn = self.conn()?;
        let now = now_text();
        conn.execute(
            "INSERT INTO players (user_id, sport, name, dominant_hand, level, play_style, \
             age_group, notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
            params![
                new.user_id,
                new.sport.as_str(),
                new.name,
                new.dominant_hand.map(|h| h.as_str()),
                new.level.map(|l| l.as_str()),
                new.play_style.map(|p| p.as_str()),
                new.age_group.map(|a| a.as_str()),
                new.notes,
                now,
            ],
        )?;
        let id = conn.last_insert_rowid();
        let player = conn.query_row(
            &format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ?1"),
            params![id],
            player_from_row,
        )?;
        Ok(player)
    }

    pub fn find_player(&self, user_id: i64, id: i64) -> Result<Option<Player>, StorageError> {
        let conn = self.conn()?;
        let player = conn
            .query_row(
                &format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ?1 AND user_id = ?2"),
                params![id, user_id],
                player_from_row,
            )
            .optional()?;
        Ok(player)
    }

    /// Case-insensitive duplicate-name check within one user's sport.
    pub fn player_name_exists(
        &self,
        user_id: i64,
        sport: Sport,
        name: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, StorageError> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM players
             WHERE user_id = ?1 AND sport = ?2 AND LOWER(name) = LOWER(?3)
               AND (?4 IS NULL OR id != ?4)",
            params![user_id, sport.as_str(), name, exclude_id],
            |r| r.get(0),
        )?;
        Ok(count > 0)
    }

    /// Players for a user, with head-to-head tallies, ordered by sport then
    /// name (or by name when filtered to one sport).
    pub fn list_players(
        &self,
        user_id: i64,
        sport: Option<Sport>,
    ) -> Result<Vec<PlayerWithStats>, StorageError> {
        let players: Vec<Player> = {
            let conn = self.conn()?;
            match sport {
                Some(sport) => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {PLAYER_COLUMNS} FROM players
                         WHERE user_id = ?1 AND sport = ?2 ORDER BY name"
                    ))?;
                    let rows = stmt.query_map(params![user_id, sport.as_str()], player_from_row)?;
                    rows.collect::<rusqlite::Result<_>>()?
                }
                None => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {PLAYER_COLUMNS} FROM players
                         WHERE user_id = ?1 ORDER BY sport, name"
                    ))?;
                    let rows = stmt.query_map(params![user_id], player_from_row)?;
                    rows.collect::<rusqlite::Result<_>>()?
                }
            }
        };

        players
            .into_iter()
            .map(|player| {
                let tallies = self.player_tallies(user_id, player.id)?;
                Ok(PlayerWithStats { player, tallies })
            })
            .collect()
    }

    /// Win/loss tallies with the player as opponent and as partner.
    pub fn player_tallies(
        &self,
        user_id: i64,
        player_id: i64,
    ) -> Result<PlayerTallies, StorageError> {
        let conn = self.conn()?;
        let (games_against, wins_against, losses_against) = conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(CASE WHEN result = 'win' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN result = 'loss' THEN 1 ELSE 0 END), 0)
             FROM games
             WHERE user_id = ?1 AND (opponent_id = ?2 OR opponent2_id = ?2)",
            params![user_id, player_id],
            |r| Ok((r.get::<_, u32>(0)?, r.get::<_, u32>(1)?, r.get::<_, u32>(2)?)),
        )?;
        let (games_with, wins_with, losses_with) = conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(CASE WHEN result = 'win' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN result = 'loss' THEN 1 ELSE 0 END), 0)
             FROM games
             WHERE user_id = ?1 AND partner_id = ?2",
            params![user_id, player_id],
            |r| Ok((r.get::<_, u32>(0)?, r.get::<_, u32>(1)?, r.get::<_, u32>(2)?)),
        )?;

        Ok(PlayerTallies {
            games_against,
            wins_against,
            losses_against,
            games_with,
            wins_with,
            losses_with,
        })
    }

    /// Apply a partial update. Returns `None` when the player does not
    /// exist for this user.
    pub fn update_player(
        &self,
        user_id: i64,
        id: i64,
        patch: &PlayerPatch,
    ) -> Result<Option<Player>, StorageError> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE players SET
                 name = COALESCE(?1, name),
                 dominant_hand = COALESCE(?2, dominant_hand),
                 level = COALESCE(?3, level),
                 play_style = COALESCE(?4, play_style),
                 age_group = COALESCE(?5, age_group),
                 notes = COALESCE(?6, notes),
                 updated_at = ?7
             WHERE id = ?8 AND user_id = ?9",
            params![
                patch.name,
                patch.dominant_hand.map(|h| h.as_str()),
                patch.level.map(|l| l.as_str()),
                patch.play_style.map(|p| p.as_str()),
                patch.age_group.map(|a| a.as_str()),
                patch.notes,
                now_text(),
                id,
                user_id,
            ],
        )?;
        if updated == 0 {
            return Ok(None);
        }
        let player = conn.query_row(
            &format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ?1"),
            params![id],
            player_from_row,
        )?;
        Ok(Some(player))
    }

    /// True when any game references the player as opponent, second
    /// opponent, or partner.
    pub fn player_has_games(&self, player_id: i64) -> Result<bool, StorageError> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM games
             WHERE opponent_id = ?1 OR opponent2_id = ?1 OR partner_id = ?1",
            params![player_id],
            |r| r.get(0),
        )?;
        Ok(count > 0)
    }

    /// Delete a player row. Returns false when it did not exist.
    pub fn delete_player(&self, user_id: i64, id: i64) -> Result<bool, StorageError> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM players WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(deleted > 0)
    }

    /// Players registered for one sport.
    pub fn count_players_for_sport(
        &self,
        user_id: i64,
        sport: Sport,
    ) -> Result<u32, StorageError> {
        let conn = self.conn()?;
        let count: u32 = conn.query_row(
            "SELECT COUNT(*) FROM players WHERE user_id = ?1 AND sport = ?2",
            params![user_id, sport.as_str()],
            |r| r.get(0),
        )?;
        Ok(count)
    }
}
