//! Report ledger service.
//!
//! Records user reports against content. At most one pending report may
//! exist per (reporter, content) pair; a duplicate submit is an
//! idempotent success ("already reported"), never an error. Revoking
//! deletes the pending report so the pair can report again later.

use std::sync::Arc;

use civimod_common::{AppError, AppResult, IdGenerator, MediaStore};
use civimod_db::{
    entities::report::{self, ReportStatus},
    repositories::{ContentRepository, ReportRepository},
};
use sea_orm::Set;
use validator::Validate;

/// An attachment supplied with a report, stored through the opaque
/// media store; only the resulting URL is persisted.
pub struct ReportAttachment {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Input for submitting a report.
#[derive(Validate)]
pub struct SubmitReportInput {
    pub content_id: String,

    #[validate(length(min = 1, max = 512))]
    pub reason: String,

    #[validate(length(max = 2000))]
    pub context: Option<String>,

    pub attachment: Option<ReportAttachment>,
}

/// Outcome of a submit: `created` is false when an open report from the
/// same reporter already covered this content.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub created: bool,
    pub report: report::Model,
}

/// Report ledger service.
#[derive(Clone)]
pub struct ReportService {
    report_repo: ReportRepository,
    content_repo: ContentRepository,
    id_gen: IdGenerator,
    media_store: Option<Arc<dyn MediaStore>>,
}

impl ReportService {
    /// Create a new report service.
    #[must_use]
    pub const fn new(report_repo: ReportRepository, content_repo: ContentRepository) -> Self {
        Self {
            report_repo,
            content_repo,
            id_gen: IdGenerator::new(),
            media_store: None,
        }
    }

    /// Set the media store used for report attachments.
    pub fn set_media_store(&mut self, media_store: Arc<dyn MediaStore>) {
        self.media_store = Some(media_store);
    }

    /// Submit a report against a piece of content.
    pub async fn submit(
        &self,
        reporter_id: &str,
        input: SubmitReportInput,
    ) -> AppResult<SubmitOutcome> {
        input.validate()?;

        let reason = input.reason.trim();
        if reason.is_empty() {
            return Err(AppError::Validation("Report reason is required".to_string()));
        }

        // Target must exist
        self.content_repo.get_by_id(&input.content_id).await?;

        // Idempotent against an open report from the same pair
        if let Some(existing) = self
            .report_repo
            .find_pending_by_reporter_and_content(reporter_id, &input.content_id)
            .await?
        {
            tracing::debug!(
                reporter_id = %reporter_id,
                content_id = %input.content_id,
                report_id = %existing.id,
                "Duplicate report submit, returning existing"
            );
            return Ok(SubmitOutcome {
                created: false,
                report: existing,
            });
        }

        let id = self.id_gen.generate();

        let attachment_url = match input.attachment {
            Some(attachment) => self.store_attachment(&id, &attachment).await?,
            None => None,
        };

        let model = report::ActiveModel {
            id: Set(id),
            content_id: Set(input.content_id),
            reporter_id: Set(reporter_id.to_string()),
            reason: Set(reason.to_string()),
            context: Set(input.context),
            attachment_url: Set(attachment_url),
            status: Set(ReportStatus::Pending),
            created_at: Set(chrono::Utc::now().into()),
            resolved_at: Set(None),
        };

        let report = self.report_repo.create(model).await?;

        tracing::info!(report_id = %report.id, content_id = %report.content_id, "Report submitted");

        Ok(SubmitOutcome {
            created: true,
            report,
        })
    }

    /// Revoke the reporter's open report on a piece of content.
    ///
    /// NotFound when there is nothing to revoke; callers surface that as
    /// an informational state, not a hard failure.
    pub async fn revoke(&self, reporter_id: &str, content_id: &str) -> AppResult<()> {
        let report = self
            .report_repo
            .find_pending_by_reporter_and_content(reporter_id, content_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No open report on content {content_id}"))
            })?;

        let report_id = report.id.clone();
        self.report_repo.delete(report).await?;

        tracing::info!(report_id = %report_id, "Report revoked");

        Ok(())
    }

    /// Get a report by ID.
    pub async fn get(&self, id: &str) -> AppResult<report::Model> {
        self.report_repo.get_by_id(id).await
    }

    /// List reports with an optional status filter, newest first.
    pub async fn list(
        &self,
        status: Option<ReportStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<report::Model>> {
        self.report_repo.list(status, limit, offset).await
    }

    /// List pending reports for the moderation queue.
    pub async fn list_pending(&self, limit: u64, offset: u64) -> AppResult<Vec<report::Model>> {
        self.report_repo
            .list(Some(ReportStatus::Pending), limit, offset)
            .await
    }

    /// Count pending reports.
    pub async fn count_pending(&self) -> AppResult<u64> {
        self.report_repo.count_pending().await
    }

    async fn store_attachment(
        &self,
        report_id: &str,
        attachment: &ReportAttachment,
    ) -> AppResult<Option<String>> {
        let Some(store) = &self.media_store else {
            tracing::warn!(report_id = %report_id, "Attachment supplied but no media store configured");
            return Ok(None);
        };

        let key = format!("reports/{report_id}");
        let stored = store
            .store(&key, &attachment.data, &attachment.content_type)
            .await?;

        Ok(Some(stored.url))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use civimod_db::entities::content::{self, ContentStatus};
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_content(id: &str) -> content::Model {
        content::Model {
            id: id.to_string(),
            author_id: Some("author1".to_string()),
            author_name: None,
            title: "Pothole on Elm St".to_string(),
            body: "Deep pothole near the crossing.".to_string(),
            status: ContentStatus::Approved,
            reviewed_by: None,
            reviewed_at: None,
            admin_notes: None,
            created_at: Utc::now().into(),
        }
    }

    fn create_test_report(id: &str, reporter_id: &str, content_id: &str) -> report::Model {
        report::Model {
            id: id.to_string(),
            content_id: content_id.to_string(),
            reporter_id: reporter_id.to_string(),
            reason: "Spam".to_string(),
            context: None,
            attachment_url: None,
            status: ReportStatus::Pending,
            created_at: Utc::now().into(),
            resolved_at: None,
        }
    }

    fn service_with(
        report_db: Arc<sea_orm::DatabaseConnection>,
        content_db: Arc<sea_orm::DatabaseConnection>,
    ) -> ReportService {
        ReportService::new(
            ReportRepository::new(report_db),
            ContentRepository::new(content_db),
        )
    }

    #[tokio::test]
    async fn test_duplicate_submit_returns_existing() {
        let existing = create_test_report("report1", "u1", "c1");

        let report_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing.clone()]])
                .into_connection(),
        );
        let content_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_content("c1")]])
                .into_connection(),
        );

        let service = service_with(report_db, content_db);
        let outcome = service
            .submit(
                "u1",
                SubmitReportInput {
                    content_id: "c1".to_string(),
                    reason: "Spam".to_string(),
                    context: None,
                    attachment: None,
                },
            )
            .await
            .unwrap();

        assert!(!outcome.created);
        assert_eq!(outcome.report.id, "report1");
    }

    #[tokio::test]
    async fn test_submit_rejects_blank_reason() {
        let report_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let content_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service_with(report_db, content_db);
        let result = service
            .submit(
                "u1",
                SubmitReportInput {
                    content_id: "c1".to_string(),
                    reason: "  ".to_string(),
                    context: None,
                    attachment: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_submit_unknown_content_is_not_found() {
        let report_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let content_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<content::Model>::new()])
                .into_connection(),
        );

        let service = service_with(report_db, content_db);
        let result = service
            .submit(
                "u1",
                SubmitReportInput {
                    content_id: "ghost".to_string(),
                    reason: "Spam".to_string(),
                    context: None,
                    attachment: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::ContentNotFound(_))));
    }

    #[tokio::test]
    async fn test_revoke_without_open_report_is_not_found() {
        let report_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<report::Model>::new()])
                .into_connection(),
        );
        let content_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service_with(report_db, content_db);
        let result = service.revoke("u1", "c1").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_revoke_then_resubmit_creates_anew() {
        let old = create_test_report("report1", "u1", "c1");
        let fresh = create_test_report("report2", "u1", "c1");

        let report_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    vec![old],
                    Vec::<report::Model>::new(),
                    vec![fresh],
                ])
                .append_exec_results([sea_orm::MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let content_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_content("c1")]])
                .into_connection(),
        );

        let service = service_with(report_db, content_db);
        service.revoke("u1", "c1").await.unwrap();

        let outcome = service
            .submit(
                "u1",
                SubmitReportInput {
                    content_id: "c1".to_string(),
                    reason: "Spam".to_string(),
                    context: None,
                    attachment: None,
                },
            )
            .await
            .unwrap();

        assert!(outcome.created);
        assert_eq!(outcome.report.id, "report2");
    }
}
