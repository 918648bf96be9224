//! Admin moderation endpoints.
//!
//! Every handler here requires a valid admin session; the auth
//! middleware plus the [`AuthAdmin`] extractor collapse missing,
//! malformed, unknown, and expired tokens into one uniform 401.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use civimod_common::{AppError, AppResult};
use civimod_core::{ModerationAction, QueueEntry, ban_active};
use civimod_db::entities::{
    content::{self, ContentStatus},
    report::{self, ReportStatus},
    user::{self, BanType},
};
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthAdmin, middleware::AppState, response::ApiResponse};

/// Report response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub id: String,
    pub content_id: String,
    pub reporter_id: String,
    pub reason: String,
    pub context: Option<String>,
    pub attachment_url: Option<String>,
    pub status: String,
    pub created_at: String,
    pub resolved_at: Option<String>,
}

impl From<report::Model> for ReportResponse {
    fn from(report: report::Model) -> Self {
        Self {
            id: report.id,
            content_id: report.content_id,
            reporter_id: report.reporter_id,
            reason: report.reason,
            context: report.context,
            attachment_url: report.attachment_url,
            status: match report.status {
                ReportStatus::Pending => "pending".to_string(),
                ReportStatus::Resolved => "resolved".to_string(),
            },
            created_at: report.created_at.to_rfc3339(),
            resolved_at: report.resolved_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Content summary response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    pub id: String,
    pub author_id: Option<String>,
    pub author_name: Option<String>,
    pub title: String,
    pub status: String,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<String>,
    pub admin_notes: Option<String>,
}

impl From<content::Model> for ContentResponse {
    fn from(content: content::Model) -> Self {
        Self {
            id: content.id,
            author_id: content.author_id,
            author_name: content.author_name,
            title: content.title,
            status: content_status_str(content.status).to_string(),
            reviewed_by: content.reviewed_by,
            reviewed_at: content.reviewed_at.map(|t| t.to_rfc3339()),
            admin_notes: content.admin_notes,
        }
    }
}

/// One row of the moderation queue.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntryResponse {
    pub report: ReportResponse,
    pub content: Option<ContentResponse>,
    pub author_banned: bool,
}

impl From<QueueEntry> for QueueEntryResponse {
    fn from(entry: QueueEntry) -> Self {
        Self {
            report: entry.report.into(),
            content: entry.content.map(Into::into),
            author_banned: entry.author_banned,
        }
    }
}

/// Ban state response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BanResponse {
    pub user_id: String,
    pub banned: bool,
    pub ban_reason: Option<String>,
    pub ban_type: Option<String>,
    pub ban_expires_at: Option<String>,
    pub banned_by: Option<String>,
}

impl From<user::Model> for BanResponse {
    fn from(user: user::Model) -> Self {
        let banned = ban_active(&user, Utc::now());
        Self {
            user_id: user.id,
            banned,
            ban_reason: user.ban_reason,
            ban_type: user.ban_type.map(|t| ban_type_str(t).to_string()),
            ban_expires_at: user.ban_expires_at.map(|t| t.to_rfc3339()),
            banned_by: user.banned_by,
        }
    }
}

/// Queue listing query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReportsQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    20
}

/// Review action request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TakeActionRequest {
    pub action: String,
    pub notes: Option<String>,
}

/// Review action response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TakeActionResponse {
    pub report: ReportResponse,
    pub content: ContentResponse,
}

/// Ban request (also used for ban edits).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BanRequest {
    pub reason: String,
    pub ban_type: String,
    /// Required for temporary bans.
    pub expires_at: Option<DateTime<Utc>>,
}

// ========== Queue ==========

/// List the moderation queue: reports joined with content and the
/// author's current ban state.
async fn list_reports(
    AuthAdmin(_session): AuthAdmin,
    State(state): State<AppState>,
    Query(query): Query<ListReportsQuery>,
) -> AppResult<ApiResponse<Vec<QueueEntryResponse>>> {
    let status = match query.status.as_deref() {
        Some("pending") => Some(ReportStatus::Pending),
        Some("resolved") => Some(ReportStatus::Resolved),
        Some(other) => {
            return Err(AppError::BadRequest(format!(
                "Unknown report status: {other}"
            )));
        }
        None => None,
    };

    let entries = state
        .moderation_service
        .queue(status, query.limit.min(100), query.offset)
        .await?;

    Ok(ApiResponse::ok(
        entries.into_iter().map(Into::into).collect(),
    ))
}

// ========== Review actions ==========

/// Take a review action (approve/reject/remove) on a report.
async fn take_action(
    AuthAdmin(session): AuthAdmin,
    State(state): State<AppState>,
    Path(report_id): Path<String>,
    Json(req): Json<TakeActionRequest>,
) -> AppResult<ApiResponse<TakeActionResponse>> {
    let action = ModerationAction::parse(&req.action)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown action: {}", req.action)))?;

    let outcome = state
        .moderation_service
        .take_action(&session.user_id, &report_id, action, req.notes)
        .await?;

    Ok(ApiResponse::ok(TakeActionResponse {
        report: outcome.report.into(),
        content: outcome.content.into(),
    }))
}

/// Ban the author of the reported content. Decoupled from resolving the
/// report; 422 when the author cannot be resolved automatically.
async fn ban_author(
    AuthAdmin(session): AuthAdmin,
    State(state): State<AppState>,
    Path(report_id): Path<String>,
    Json(req): Json<BanRequest>,
) -> AppResult<ApiResponse<BanResponse>> {
    let ban_type = parse_ban_type(&req.ban_type)?;

    let user = state
        .moderation_service
        .ban_author_from_report(&session.user_id, &report_id, req.reason, ban_type, req.expires_at)
        .await?;

    Ok(ApiResponse::ok(user.into()))
}

// ========== Sanctions ==========

/// Ban a user directly.
async fn ban_user(
    AuthAdmin(session): AuthAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<BanRequest>,
) -> AppResult<ApiResponse<BanResponse>> {
    let input = ban_input(user_id, req)?;
    let user = state.sanction_service.ban(&session.user_id, input).await?;

    Ok(ApiResponse::ok(user.into()))
}

/// Edit an existing ban's reason, type, or duration.
async fn edit_ban(
    AuthAdmin(session): AuthAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<BanRequest>,
) -> AppResult<ApiResponse<BanResponse>> {
    let input = ban_input(user_id, req)?;
    let user = state
        .sanction_service
        .edit_ban(&session.user_id, input)
        .await?;

    Ok(ApiResponse::ok(user.into()))
}

/// Lift a user's ban. Idempotent: unbanning a user who is not banned
/// still succeeds.
async fn unban_user(
    AuthAdmin(_session): AuthAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<BanResponse>> {
    let user = state.sanction_service.unban(&user_id).await?;

    Ok(ApiResponse::ok(user.into()))
}

fn ban_input(user_id: String, req: BanRequest) -> AppResult<civimod_core::BanInput> {
    Ok(civimod_core::BanInput {
        user_id,
        reason: req.reason,
        ban_type: parse_ban_type(&req.ban_type)?,
        expires_at: req.expires_at,
    })
}

fn parse_ban_type(s: &str) -> AppResult<BanType> {
    match s {
        "permanent" => Ok(BanType::Permanent),
        "temporary" => Ok(BanType::Temporary),
        other => Err(AppError::BadRequest(format!("Unknown ban type: {other}"))),
    }
}

const fn ban_type_str(ban_type: BanType) -> &'static str {
    match ban_type {
        BanType::Permanent => "permanent",
        BanType::Temporary => "temporary",
    }
}

const fn content_status_str(status: ContentStatus) -> &'static str {
    match status {
        ContentStatus::Pending => "pending",
        ContentStatus::Approved => "approved",
        ContentStatus::Rejected => "rejected",
        ContentStatus::Removed => "removed",
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        // Moderation queue
        .route("/reports", get(list_reports))
        .route("/reports/{id}/action", post(take_action))
        .route("/reports/{id}/ban-author", post(ban_author))
        // Sanctions
        .route("/users/{id}/ban", post(ban_user).put(edit_ban))
        .route("/users/{id}/unban", post(unban_user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ban_type() {
        assert!(matches!(parse_ban_type("permanent"), Ok(BanType::Permanent)));
        assert!(matches!(parse_ban_type("temporary"), Ok(BanType::Temporary)));
        assert!(parse_ban_type("forever").is_err());
    }

    #[test]
    fn test_parse_action_names() {
        assert_eq!(ModerationAction::parse("approve"), Some(ModerationAction::Approve));
        assert_eq!(ModerationAction::parse("remove"), Some(ModerationAction::Remove));
        assert_eq!(ModerationAction::parse("escalate"), None);
    }
}
