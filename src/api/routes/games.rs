//! Game log CRUD. Creation drives the streak and achievement engine.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{ApiError, AuthUser, MessageResponse};
use crate::models::{AchievementDefinition, GameResult, GameType, GameWithNames, Sport};
use crate::storage::{GamePatch, NewGame, DATE_FMT};

use super::gamification::StreakSummary;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub sport: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    pub sport: String,
    pub game_type: String,
    pub opponent_id: i64,
    pub opponent2_id: Option<i64>,
    pub partner_id: Option<i64>,
    pub game_date: String,
    pub result: String,
    pub score: Option<String>,
    pub detailed_score: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateGameRequest {
    pub game_date: Option<String>,
    pub result: Option<String>,
    pub score: Option<String>,
    pub detailed_score: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// Creation response: the stored game plus what the engine did with it.
#[derive(Debug, Serialize)]
pub struct CreateGameResponse {
    #[serde(flatten)]
    pub game: GameWithNames,
    pub newly_unlocked: Vec<AchievementDefinition>,
    pub streak: StreakSummary,
}

fn parse_sport(value: &str) -> Result<Sport, ApiError> {
    Sport::parse(value).ok_or_else(|| ApiError::BadRequest(format!("unknown sport: {value}")))
}

fn parse_game_date(value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, DATE_FMT)
        .map_err(|_| ApiError::BadRequest(format!("invalid game date: {value}")))
}

pub async fn list_games(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<GameWithNames>>, ApiError> {
    let sport = params.sport.as_deref().map(parse_sport).transpose()?;
    let games = state.db.list_games(auth.user_id, sport)?;
    Ok(Json(games))
}

pub async fn create_game(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateGameRequest>,
) -> Result<Json<CreateGameResponse>, ApiError> {
    let sport = parse_sport(&req.sport)?;
    let game_type = GameType::parse(&req.game_type)
        .ok_or_else(|| ApiError::BadRequest(format!("unknown game type: {}", req.game_type)))?;
    if !sport.supports(game_type) {
        return Err(ApiError::BadRequest(format!(
            "{} does not support {} games",
            sport.display_name(),
            game_type.as_str()
        )));
    }
    let result = GameResult::parse(&req.result)
        .ok_or_else(|| ApiError::BadRequest(format!("unknown result: {}", req.result)))?;
    let game_date = parse_game_date(&req.game_date)?;

    if game_type == GameType::Doubles && (req.partner_id.is_none() || req.opponent2_id.is_none()) {
        return Err(ApiError::BadRequest(
            "doubles games need a partner and a second opponent".to_string(),
        ));
    }

    for id in [Some(req.opponent_id), req.opponent2_id, req.partner_id]
        .into_iter()
        .flatten()
    {
        if state.db.find_player(auth.user_id, id)?.is_none() {
            return Err(ApiError::BadRequest(format!("unknown player: {id}")));
        }
    }

    let game = state.db.insert_game(&NewGame {
        user_id: auth.user_id,
        sport,
        game_type,
        opponent_id: req.opponent_id,
        opponent2_id: req.opponent2_id,
        partner_id: req.partner_id,
        game_date,
        result,
        score: req.score,
        detailed_score: req.detailed_score,
        location: req.location,
        notes: req.notes,
    })?;

    // The logged game feeds the streak, then the evaluator sees the
    // refreshed statistics.
    let streak = state.streaks.update(auth.user_id, &req.game_date)?;
    let newly_unlocked = state.evaluator.evaluate(auth.user_id)?;

    Ok(Json(CreateGameResponse {
        game,
        newly_unlocked,
        streak: streak.into(),
    }))
}

pub async fn update_game(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateGameRequest>,
) -> Result<Json<GameWithNames>, ApiError> {
    let patch = GamePatch {
        game_date: req.game_date.as_deref().map(parse_game_date).transpose()?,
        result: match req.result.as_deref() {
            None => None,
            Some(raw) => Some(
                GameResult::parse(raw)
                    .ok_or_else(|| ApiError::BadRequest(format!("unknown result: {raw}")))?,
            ),
        },
        score: req.score,
        detailed_score: req.detailed_score,
        location: req.location,
        notes: req.notes,
    };

    let game = state
        .db
        .update_game(auth.user_id, id, &patch)?
        .ok_or_else(|| ApiError::NotFound(format!("game {id}")))?;
    Ok(Json(game))
}

pub async fn delete_game(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.db.delete_game(auth.user_id, id)? {
        return Err(ApiError::NotFound(format!("game {id}")));
    }
    Ok(Json(MessageResponse {
        message: "game deleted".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use crate::api::build_router;
    use crate::api::state::AppState;
    use crate::config::AppConfig;
    use crate::storage::Database;

    fn test_state() -> (AppState, String) {
        let db = Database::open_in_memory().unwrap();
        let state = AppState::new(db, &AppConfig::default()).unwrap();
        let user = state
            .db
            .create_user("ana@example.com", None, None)
            .unwrap()
            .unwrap();
        let token = state.token_keys.issue(&user).unwrap();
        (state, token)
    }

    async fn send(
        app: axum::Router,
        method: &str,
        uri: &str,
        token: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Authorization", format!("Bearer {token}"));
        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let resp = app.oneshot(request).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn add_player(app: axum::Router, token: &str, sport: &str, name: &str) -> i64 {
        let (status, player) = send(
            app,
            "POST",
            "/api/players",
            token,
            Some(json!({"sport": sport, "name": name})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        player["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_create_game_runs_the_engine() {
        let (state, token) = test_state();
        let app = build_router(state);
        let rui = add_player(app.clone(), &token, "tennis", "Rui").await;

        let (status, json) = send(
            app,
            "POST",
            "/api/games",
            &token,
            Some(json!({
                "sport": "tennis",
                "game_type": "singles",
                "opponent_id": rui,
                "game_date": "2025-03-01",
                "result": "win",
                "score": "6-4,6-2"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        assert_eq!(json["opponent_name"], "Rui");
        assert_eq!(json["result"], "win");
        assert_eq!(json["streak"]["current_streak"], 1);

        let keys: Vec<&str> = json["newly_unlocked"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["key"].as_str().unwrap())
            .collect();
        assert_eq!(keys, vec!["first_step", "first_victory"]);
    }

    #[tokio::test]
    async fn test_create_game_validation() {
        let (state, token) = test_state();
        let app = build_router(state);
        let rui = add_player(app.clone(), &token, "squash", "Rui").await;

        let base = json!({
            "sport": "squash",
            "game_type": "singles",
            "opponent_id": rui,
            "game_date": "2025-03-01",
            "result": "win"
        });

        let mut bad_sport = base.clone();
        bad_sport["sport"] = json!("cricket");
        let (status, _) = send(app.clone(), "POST", "/api/games", &token, Some(bad_sport)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // Squash has no doubles.
        let mut bad_type = base.clone();
        bad_type["game_type"] = json!("doubles");
        let (status, json) = send(app.clone(), "POST", "/api/games", &token, Some(bad_type)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("does not support"));

        let mut bad_result = base.clone();
        bad_result["result"] = json!("victory");
        let (status, _) = send(app.clone(), "POST", "/api/games", &token, Some(bad_result)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let mut bad_date = base.clone();
        bad_date["game_date"] = json!("03/01/2025");
        let (status, _) = send(app.clone(), "POST", "/api/games", &token, Some(bad_date)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let mut bad_player = base.clone();
        bad_player["opponent_id"] = json!(9999);
        let (status, _) = send(app, "POST", "/api/games", &token, Some(bad_player)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_doubles_needs_four_players() {
        let (state, token) = test_state();
        let app = build_router(state);
        let rui = add_player(app.clone(), &token, "padel", "Rui").await;

        let (status, json) = send(
            app.clone(),
            "POST",
            "/api/games",
            &token,
            Some(json!({
                "sport": "padel",
                "game_type": "doubles",
                "opponent_id": rui,
                "game_date": "2025-03-01",
                "result": "win"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("partner"));

        let ze = add_player(app.clone(), &token, "padel", "Zé").await;
        let ines = add_player(app.clone(), &token, "padel", "Inês").await;
        let (status, json) = send(
            app,
            "POST",
            "/api/games",
            &token,
            Some(json!({
                "sport": "padel",
                "game_type": "doubles",
                "opponent_id": rui,
                "opponent2_id": ze,
                "partner_id": ines,
                "game_date": "2025-03-01",
                "result": "draw"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["partner_name"], "Inês");
        assert_eq!(json["opponent2_name"], "Zé");
    }

    #[tokio::test]
    async fn test_list_filters_by_sport() {
        let (state, token) = test_state();
        let app = build_router(state);
        let rui = add_player(app.clone(), &token, "tennis", "Rui").await;
        let ze = add_player(app.clone(), &token, "squash", "Zé").await;

        for (sport, opponent, date) in [
            ("tennis", rui, "2025-03-01"),
            ("squash", ze, "2025-03-02"),
            ("tennis", rui, "2025-03-03"),
        ] {
            let (status, _) = send(
                app.clone(),
                "POST",
                "/api/games",
                &token,
                Some(json!({
                    "sport": sport,
                    "game_type": "singles",
                    "opponent_id": opponent,
                    "game_date": date,
                    "result": "loss"
                })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, all) = send(app.clone(), "GET", "/api/games", &token, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(all.as_array().unwrap().len(), 3);
        // Newest first.
        assert_eq!(all[0]["game_date"], "2025-03-03");

        let (_, tennis) = send(app.clone(), "GET", "/api/games?sport=tennis", &token, None).await;
        assert_eq!(tennis.as_array().unwrap().len(), 2);

        let (status, _) = send(app, "GET", "/api/games?sport=cricket", &token, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_game_partial() {
        let (state, token) = test_state();
        let app = build_router(state);
        let rui = add_player(app.clone(), &token, "tennis", "Rui").await;

        let (_, created) = send(
            app.clone(),
            "POST",
            "/api/games",
            &token,
            Some(json!({
                "sport": "tennis",
                "game_type": "singles",
                "opponent_id": rui,
                "game_date": "2025-03-01",
                "result": "loss",
                "location": "Club A"
            })),
        )
        .await;
        let id = created["id"].as_i64().unwrap();

        let (status, updated) = send(
            app.clone(),
            "PUT",
            &format!("/api/games/{id}"),
            &token,
            Some(json!({"result": "win"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["result"], "win");
        // Untouched fields survive.
        assert_eq!(updated["location"], "Club A");

        let (status, _) = send(
            app,
            "PUT",
            "/api/games/9999",
            &token,
            Some(json!({"result": "win"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_game() {
        let (state, token) = test_state();
        let app = build_router(state);
        let rui = add_player(app.clone(), &token, "tennis", "Rui").await;

        let (_, created) = send(
            app.clone(),
            "POST",
            "/api/games",
            &token,
            Some(json!({
                "sport": "tennis",
                "game_type": "singles",
                "opponent_id": rui,
                "game_date": "2025-03-01",
                "result": "win"
            })),
        )
        .await;
        let id = created["id"].as_i64().unwrap();

        let (status, _) = send(
            app.clone(),
            "DELETE",
            &format!("/api/games/{id}"),
            &token,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            app.clone(),
            "DELETE",
            &format!("/api/games/{id}"),
            &token,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, list) = send(app, "GET", "/api/games", &token, None).await;
        assert_eq!(list.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_games_are_scoped_to_owner() {
        let (state, token) = test_state();
        let other = state
            .db
            .create_user("bob@example.com", None, None)
            .unwrap()
            .unwrap();
        let other_token = state.token_keys.issue(&other).unwrap();
        let app = build_router(state);

        let rui = add_player(app.clone(), &token, "tennis", "Rui").await;
        let (_, created) = send(
            app.clone(),
            "POST",
            "/api/games",
            &token,
            Some(json!({
                "sport": "tennis",
                "game_type": "singles",
                "opponent_id": rui,
                "game_date": "2025-03-01",
                "result": "win"
            })),
        )
        .await;
        let id = created["id"].as_i64().unwrap();

        // Another account can neither see nor touch it.
        let (_, list) = send(app.clone(), "GET", "/api/games", &other_token, None).await;
        assert_eq!(list.as_array().unwrap().len(), 0);

        let (status, _) = send(
            app,
            "DELETE",
            &format!("/api/games/{id}"),
            &other_token,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
