//! Authentication endpoints.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::post};
use civimod_common::AppResult;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthAdmin, middleware::AppState, response::{ApiResponse, ok}};

/// Login request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub role: String,
}

/// Sign in to a staff account and receive a fresh session token.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let session = state
        .session_service
        .login(&req.username, &req.password)
        .await?;

    Ok(ApiResponse::ok(LoginResponse {
        token: session.token,
        username: session.username,
        role: session.role,
    }))
}

/// Refresh response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub refreshed: bool,
}

/// Slide the session window of the presented token.
async fn refresh(
    AuthAdmin(session): AuthAdmin,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<RefreshResponse>> {
    let refreshed = state.session_service.refresh(&session.token).await?;

    Ok(ApiResponse::ok(RefreshResponse { refreshed }))
}

/// Destroy the presented session.
async fn logout(
    AuthAdmin(session): AuthAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    state.session_service.logout(&session.token).await?;

    Ok(ok())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
}
