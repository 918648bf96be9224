//! Request extractors.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use civimod_db::entities::admin_session;

/// Authenticated admin session extractor.
///
/// Rejects with a uniform 401 whenever the auth middleware did not
/// attach a session. Missing, malformed, unknown, and expired tokens
/// are indistinguishable to external callers.
#[derive(Debug, Clone)]
pub struct AuthAdmin(pub admin_session::Model);

impl<S> FromRequestParts<S> for AuthAdmin
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Session is set by the auth middleware
        parts
            .extensions
            .get::<admin_session::Model>()
            .cloned()
            .map(AuthAdmin)
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}
