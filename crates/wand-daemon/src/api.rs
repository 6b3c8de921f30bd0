//! REST API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use wand_fleet::MAX_CONTROLLERS;

use crate::state::AppState;

/// API error response
#[derive(serde::Serialize)]
struct ApiError {
    error: String,
}

impl ApiError {
    fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

/// List the current per-slot controller status
pub async fn list_controllers(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.snapshot().await {
        Some(snapshot) => Json(snapshot).into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiError::new("Fleet is not running")),
        )
            .into_response(),
    }
}

/// Rumble request body
#[derive(Deserialize)]
pub struct RumbleRequest {
    /// Rumble strength, 0.0 to 1.0
    pub amount: f32,
}

/// Set rumble on a controller
pub async fn set_rumble(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u8>,
    Json(req): Json<RumbleRequest>,
) -> impl IntoResponse {
    if id as usize >= MAX_CONTROLLERS {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiError::new("No such controller")),
        )
            .into_response();
    }

    info!(controller = id, amount = req.amount, "Rumble requested");

    match state.set_rumble(id, req.amount).await {
        Some(true) => Json(serde_json::json!({ "status": "ok" })).into_response(),
        Some(false) => (
            StatusCode::NOT_IMPLEMENTED,
            Json(ApiError::new("Rumble not supported")),
        )
            .into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiError::new("Fleet is not running")),
        )
            .into_response(),
    }
}

/// Reset the tracked pose of a controller
pub async fn reset_pose(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u8>,
) -> impl IntoResponse {
    if id as usize >= MAX_CONTROLLERS {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiError::new("No such controller")),
        )
            .into_response();
    }

    info!(controller = id, "Pose reset requested");

    match state.reset_pose(id).await {
        Some(true) => Json(serde_json::json!({ "status": "ok" })).into_response(),
        Some(false) => (
            StatusCode::NOT_IMPLEMENTED,
            Json(ApiError::new("Pose reset not supported")),
        )
            .into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiError::new("Fleet is not running")),
        )
            .into_response(),
    }
}
