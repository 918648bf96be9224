//! API middleware.

#![allow(missing_docs)]

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use civimod_core::{
    ModerationService, ReportService, SanctionService, SessionCheck, SessionService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub session_service: SessionService,
    pub report_service: ReportService,
    pub moderation_service: ModerationService,
    pub sanction_service: SanctionService,
}

/// Authentication middleware.
///
/// Attaches the admin session to the request when a valid bearer token
/// is presented. Expired and unknown tokens attach nothing, so every
/// admin endpoint rejects them with the same 401 and session existence
/// is never leaked to external callers. A backing-store fault during
/// validation is not an auth outcome and propagates as the generic
/// server error instead.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::to_string);

    if let Some(token) = token {
        match state.session_service.validate(&token).await {
            Ok(SessionCheck::Valid(session)) => {
                req.extensions_mut().insert(session);
            }
            Ok(SessionCheck::Expired | SessionCheck::NotFound) => {}
            Err(e) => return e.into_response(),
        }
    }

    next.run(req).await
}
