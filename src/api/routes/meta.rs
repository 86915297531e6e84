//! Health check and the sports catalog. Both public.

use axum::Json;
use serde::Serialize;

use crate::models::SportInfo;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn sports() -> Json<Vec<SportInfo>> {
    Json(SportInfo::catalog())
}
