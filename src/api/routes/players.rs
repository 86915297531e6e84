//! Player CRUD.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::{ApiError, AuthUser, MessageResponse};
use crate::models::{AgeGroup, Hand, PlayStyle, Player, PlayerWithStats, SkillLevel, Sport};
use crate::storage::{NewPlayer, PlayerPatch};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub sport: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePlayerRequest {
    pub sport: String,
    pub name: String,
    pub dominant_hand: Option<String>,
    pub level: Option<String>,
    pub play_style: Option<String>,
    pub age_group: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlayerRequest {
    pub name: Option<String>,
    pub dominant_hand: Option<String>,
    pub level: Option<String>,
    pub play_style: Option<String>,
    pub age_group: Option<String>,
    pub notes: Option<String>,
}

fn parse_sport(value: &str) -> Result<Sport, ApiError> {
    Sport::parse(value).ok_or_else(|| ApiError::BadRequest(format!("unknown sport: {value}")))
}

fn parse_enum<T>(
    value: Option<&str>,
    what: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, ApiError> {
    match value {
        None => Ok(None),
        Some(raw) => parse(raw)
            .map(Some)
            .ok_or_else(|| ApiError::BadRequest(format!("unknown {what}: {raw}"))),
    }
}

pub async fn list_players(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<PlayerWithStats>>, ApiError> {
    let sport = params.sport.as_deref().map(parse_sport).transpose()?;
    let players = state.db.list_players(auth.user_id, sport)?;
    Ok(Json(players))
}

pub async fn create_player(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreatePlayerRequest>,
) -> Result<Json<Player>, ApiError> {
    let sport = parse_sport(&req.sport)?;
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("player name is required".to_string()));
    }
    if state.db.player_name_exists(auth.user_id, sport, name, None)? {
        return Err(ApiError::BadRequest(format!(
            "a player named '{name}' already exists for this sport"
        )));
    }

    let new = NewPlayer {
        user_id: auth.user_id,
        sport,
        name: name.to_string(),
        dominant_hand: parse_enum(req.dominant_hand.as_deref(), "hand", Hand::parse)?,
        level: parse_enum(req.level.as_deref(), "level", SkillLevel::parse)?,
        play_style: parse_enum(req.play_style.as_deref(), "play style", PlayStyle::parse)?,
        age_group: parse_enum(req.age_group.as_deref(), "age group", AgeGroup::parse)?,
        notes: req.notes,
    };
    let player = state.db.insert_player(&new)?;
    Ok(Json(player))
}

pub async fn update_player(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdatePlayerRequest>,
) -> Result<Json<Player>, ApiError> {
    let existing = state
        .db
        .find_player(auth.user_id, id)?
        .ok_or_else(|| ApiError::NotFound(format!("player {id}")))?;

    if let Some(name) = req.name.as_deref() {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::BadRequest("player name is required".to_string()));
        }
        if state
            .db
            .player_name_exists(auth.user_id, existing.sport, name, Some(id))?
        {
            return Err(ApiError::BadRequest(format!(
                "a player named '{name}' already exists for this sport"
            )));
        }
    }

    let patch = PlayerPatch {
        name: req.name.map(|n| n.trim().to_string()),
        dominant_hand: parse_enum(req.dominant_hand.as_deref(), "hand", Hand::parse)?,
        level: parse_enum(req.level.as_deref(), "level", SkillLevel::parse)?,
        play_style: parse_enum(req.play_style.as_deref(), "play style", PlayStyle::parse)?,
        age_group: parse_enum(req.age_group.as_deref(), "age group", AgeGroup::parse)?,
        notes: req.notes,
    };
    let player = state
        .db
        .update_player(auth.user_id, id, &patch)?
        .ok_or_else(|| ApiError::NotFound(format!("player {id}")))?;
    Ok(Json(player))
}

pub async fn delete_player(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    if state.db.find_player(auth.user_id, id)?.is_none() {
        return Err(ApiError::NotFound(format!("player {id}")));
    }
    if state.db.player_has_games(id)? {
        return Err(ApiError::BadRequest(
            "player has recorded games and cannot be deleted".to_string(),
        ));
    }

    state.db.delete_player(auth.user_id, id)?;
    Ok(Json(MessageResponse {
        message: "player deleted".to_string(),
    }))
}
