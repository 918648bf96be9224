//! Public report endpoints.

use axum::{Json, Router, extract::State, routing::post};
use civimod_common::AppResult;
use civimod_core::{SubmitOutcome, SubmitReportInput};
use serde::{Deserialize, Serialize};

use crate::{middleware::AppState, response::ApiResponse};

/// Submit report request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReportRequest {
    pub reporter_id: String,
    pub content_id: String,
    pub reason: String,
    pub context: Option<String>,
}

/// Submit report response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReportResponse {
    /// False when an open report from this reporter already covered the
    /// content ("already reported").
    pub created: bool,
    pub report_id: String,
}

impl From<SubmitOutcome> for SubmitReportResponse {
    fn from(outcome: SubmitOutcome) -> Self {
        Self {
            created: outcome.created,
            report_id: outcome.report.id,
        }
    }
}

/// Submit a report against a piece of content.
async fn submit_report(
    State(state): State<AppState>,
    Json(req): Json<SubmitReportRequest>,
) -> AppResult<ApiResponse<SubmitReportResponse>> {
    let outcome = state
        .report_service
        .submit(
            &req.reporter_id,
            SubmitReportInput {
                content_id: req.content_id,
                reason: req.reason,
                context: req.context,
                attachment: None,
            },
        )
        .await?;

    Ok(ApiResponse::ok(outcome.into()))
}

/// Revoke report request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokeReportRequest {
    pub reporter_id: String,
    pub content_id: String,
}

/// Revoke report response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokeReportResponse {
    pub revoked: bool,
}

/// Revoke an open report. 404 when there is nothing to revoke; the UI
/// surfaces that as "nothing to revoke", not a hard error.
async fn revoke_report(
    State(state): State<AppState>,
    Json(req): Json<RevokeReportRequest>,
) -> AppResult<ApiResponse<RevokeReportResponse>> {
    state
        .report_service
        .revoke(&req.reporter_id, &req.content_id)
        .await?;

    Ok(ApiResponse::ok(RevokeReportResponse { revoked: true }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_report))
        .route("/revoke", post(revoke_report))
}
