//! Statistics endpoint. One route, two shapes: per-sport when a `sport`
//! query parameter is given, overall otherwise.

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::{ApiError, AuthUser};
use crate::models::Sport;

#[derive(Debug, Deserialize)]
pub struct StatsParams {
    pub sport: Option<String>,
}

pub async fn statistics(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<StatsParams>,
) -> Result<Response, ApiError> {
    match params.sport.as_deref() {
        Some(raw) => {
            let sport = Sport::parse(raw)
                .ok_or_else(|| ApiError::BadRequest(format!("unknown sport: {raw}")))?;
            let stats = state.stats.sport_statistics(auth.user_id, sport)?;
            Ok(Json(stats).into_response())
        }
        None => {
            let stats = state.stats.overall_statistics(auth.user_id)?;
            Ok(Json(stats).into_response())
        }
    }
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

    async fn log_game(app: axum::Router, token: &str, sport: &str, opponent: i64, date: &str, result: &str) {
        let (status, _) = send(
            app,
            "POST",
            "/api/games",
            token,
            Some(json!({
                "sport": sport,
                "game_type": "singles",
                "opponent_id": opponent,
                "game_date": date,
                "result": result
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_overall_with_no_games() {
        let (state, token) = test_state();
        let app = build_router(state);

        let (status, json) = send(app, "GET", "/api/statistics", &token, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_games"], 0);
        assert_eq!(json["win_rate"], 0.0);
        assert_eq!(json["sports_played"].as_array().unwrap().len(), 0);
        assert_eq!(json["by_sport"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_overall_breaks_down_by_sport() {
        let (state, token) = test_state();
        let app = build_router(state);

        let (_, rui) = send(
            app.clone(),
            "POST",
            "/api/players",
            &token,
            Some(json!({"sport": "tennis", "name": "Rui"})),
        )
        .await;
        let (_, ze) = send(
            app.clone(),
            "POST",
            "/api/players",
            &token,
            Some(json!({"sport": "squash", "name": "Zé"})),
        )
        .await;
        let rui = rui["id"].as_i64().unwrap();
        let ze = ze["id"].as_i64().unwrap();

        log_game(app.clone(), &token, "tennis", rui, "2025-03-01", "win").await;
        log_game(app.clone(), &token, "tennis", rui, "2025-03-02", "loss").await;
        log_game(app.clone(), &token, "squash", ze, "2025-03-03", "win").await;

        let (status, overall) = send(app.clone(), "GET", "/api/statistics", &token, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(overall["total_games"], 3);
        assert_eq!(overall["total_wins"], 2);
        assert_eq!(overall["sports_played"], json!(["squash", "tennis"]));
        assert_eq!(overall["by_sport"].as_array().unwrap().len(), 2);

        let (status, tennis) = send(app, "GET", "/api/statistics?sport=tennis", &token, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(tennis["sport"], "tennis");
        assert_eq!(tennis["total_games"], 2);
        assert_eq!(tennis["singles_games"], 2);
        assert_eq!(tennis["doubles_games"], 0);
        assert_eq!(tennis["win_rate"], 50.0);
        assert_eq!(tennis["total_players"], 1);
    }

    #[tokio::test]
    async fn test_unknown_sport_is_rejected() {
        let (state, token) = test_state();
        let app = build_router(state);

        let (status, json) = send(app, "GET", "/api/statistics?sport=cricket", &token, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_statistics_requires_auth() {
        let (state, _) = test_state();
        let app = build_router(state);

        let request = Request::builder()
            .method("GET")
            .uri("/api/statistics")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(request).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
