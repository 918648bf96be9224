//! Moderation workflow service.
//!
//! Drives a report and its target content through review. Approve,
//! reject, and remove are terminal for the report; the content can be
//! re-reported afterward, opening a new cycle. Banning the author is a
//! separate, explicit action, decoupled from resolving the report.
//! The "resolve, then maybe ban" sequence is sequenced, not atomic;
//! a crash between the steps leaves a valid state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use civimod_common::{AppError, AppResult};
use civimod_db::{
    entities::{
        content::{self, ContentStatus},
        report::{self, ReportStatus},
        user::BanType,
    },
    repositories::{ContentRepository, ReportRepository, UserRepository},
};
use sea_orm::Set;

use crate::services::{
    notifier::{ModerationEvent, Notifier},
    sanction::{BanInput, SanctionService, ban_active},
};

/// Admin-visible review actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationAction {
    Approve,
    Reject,
    Remove,
}

impl ModerationAction {
    /// The content status this action results in.
    #[must_use]
    pub const fn content_status(self) -> ContentStatus {
        match self {
            Self::Approve => ContentStatus::Approved,
            Self::Reject => ContentStatus::Rejected,
            Self::Remove => ContentStatus::Removed,
        }
    }

    /// Parse an action name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "approve" => Some(Self::Approve),
            "reject" => Some(Self::Reject),
            "remove" => Some(Self::Remove),
            _ => None,
        }
    }
}

/// Result of a review action.
#[derive(Debug, Clone)]
pub struct ModerationOutcome {
    pub report: report::Model,
    pub content: content::Model,
}

/// One row of the admin moderation queue.
#[derive(Debug, Clone)]
pub struct QueueEntry {
    pub report: report::Model,
    /// Missing when the content row was deleted out from under the report.
    pub content: Option<content::Model>,
    pub author_banned: bool,
}

/// Moderation workflow service.
#[derive(Clone)]
pub struct ModerationService {
    report_repo: ReportRepository,
    content_repo: ContentRepository,
    user_repo: UserRepository,
    sanctions: SanctionService,
    notifier: Option<Arc<dyn Notifier>>,
}

impl ModerationService {
    /// Create a new moderation service.
    #[must_use]
    pub const fn new(
        report_repo: ReportRepository,
        content_repo: ContentRepository,
        user_repo: UserRepository,
        sanctions: SanctionService,
    ) -> Self {
        Self {
            report_repo,
            content_repo,
            user_repo,
            sanctions,
            notifier: None,
        }
    }

    /// Set the notification sink.
    pub fn set_notifier(&mut self, notifier: Arc<dyn Notifier>) {
        self.notifier = Some(notifier);
    }

    /// Take a review action on a pending report.
    ///
    /// Marks the content reviewed, sets its status, and resolves the
    /// report. A report can only be resolved once.
    pub async fn take_action(
        &self,
        moderator_id: &str,
        report_id: &str,
        action: ModerationAction,
        notes: Option<String>,
    ) -> AppResult<ModerationOutcome> {
        let report = self.report_repo.get_by_id(report_id).await?;

        if report.status != ReportStatus::Pending {
            return Err(AppError::InvalidTransition(format!(
                "Report {report_id} is already resolved"
            )));
        }

        let content = self.content_repo.get_by_id(&report.content_id).await?;
        let now: DateTime<Utc> = Utc::now();

        let mut content_active: content::ActiveModel = content.into();
        content_active.status = Set(action.content_status());
        content_active.reviewed_by = Set(Some(moderator_id.to_string()));
        content_active.reviewed_at = Set(Some(now.into()));
        content_active.admin_notes = Set(notes);
        let content = self.content_repo.update(content_active).await?;

        let mut report_active: report::ActiveModel = report.into();
        report_active.status = Set(ReportStatus::Resolved);
        report_active.resolved_at = Set(Some(now.into()));
        let report = self.report_repo.update(report_active).await?;

        tracing::info!(
            report_id = %report.id,
            content_id = %content.id,
            action = ?action,
            moderator_id = %moderator_id,
            "Report resolved"
        );

        if let Some(author_id) = content.author_id.clone() {
            self.notify(
                &author_id,
                ModerationEvent::ContentReviewed {
                    content_id: content.id.clone(),
                    status: content.status,
                },
            )
            .await;
        }

        Ok(ModerationOutcome { report, content })
    }

    /// Ban the author of the content a report targets.
    ///
    /// Fails with `AmbiguousTarget` when the content carries no resolvable
    /// author id, in which case the admin has to pick the user manually.
    pub async fn ban_author_from_report(
        &self,
        moderator_id: &str,
        report_id: &str,
        reason: String,
        ban_type: BanType,
        expires_at: Option<DateTime<Utc>>,
    ) -> AppResult<civimod_db::entities::user::Model> {
        let report = self.report_repo.get_by_id(report_id).await?;
        let content = self.content_repo.get_by_id(&report.content_id).await?;

        let author_id = content.author_id.ok_or_else(|| {
            AppError::AmbiguousTarget(format!(
                "Content {} has no resolvable author; select the user manually",
                content.id
            ))
        })?;

        let user = self
            .sanctions
            .ban(
                moderator_id,
                BanInput {
                    user_id: author_id.clone(),
                    reason: reason.clone(),
                    ban_type,
                    expires_at,
                },
            )
            .await?;

        self.notify(&author_id, ModerationEvent::Banned { reason }).await;

        Ok(user)
    }

    /// The admin moderation queue: reports joined with their content and
    /// the author's current ban state. Read-only; issues no writes.
    pub async fn queue(
        &self,
        status: Option<ReportStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<QueueEntry>> {
        let reports = self.report_repo.list(status, limit, offset).await?;

        let content_ids: Vec<String> = reports.iter().map(|r| r.content_id.clone()).collect();
        let contents = self.content_repo.find_by_ids(&content_ids).await?;

        let author_ids: Vec<String> = contents
            .iter()
            .filter_map(|c| c.author_id.clone())
            .collect();
        let authors = self.user_repo.find_by_ids(&author_ids).await?;

        let now = Utc::now();
        let entries = reports
            .into_iter()
            .map(|report| {
                let content = contents.iter().find(|c| c.id == report.content_id).cloned();
                let author_banned = content
                    .as_ref()
                    .and_then(|c| c.author_id.as_ref())
                    .and_then(|author_id| authors.iter().find(|u| &u.id == author_id))
                    .is_some_and(|user| ban_active(user, now));

                QueueEntry {
                    report,
                    content,
                    author_banned,
                }
            })
            .collect();

        Ok(entries)
    }

    /// Fire-and-forget notification; failures are logged, never propagated.
    async fn notify(&self, user_id: &str, event: ModerationEvent) {
        if let Some(notifier) = &self.notifier {
            if let Err(e) = notifier.notify(user_id, event).await {
                tracing::warn!(user_id = %user_id, error = %e, "Notification delivery failed");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use civimod_db::entities::user::{self, UserRole};
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_report(id: &str, status: ReportStatus) -> report::Model {
        report::Model {
            id: id.to_string(),
            content_id: "c1".to_string(),
            reporter_id: "u1".to_string(),
            reason: "Spam".to_string(),
            context: None,
            attachment_url: None,
            status,
            created_at: Utc::now().into(),
            resolved_at: None,
        }
    }

    fn create_test_content(id: &str, author_id: Option<&str>) -> content::Model {
        content::Model {
            id: id.to_string(),
            author_id: author_id.map(str::to_string),
            author_name: None,
            title: "Graffiti report".to_string(),
            body: "Tagging on the underpass.".to_string(),
            status: ContentStatus::Approved,
            reviewed_by: None,
            reviewed_at: None,
            admin_notes: None,
            created_at: Utc::now().into(),
        }
    }

    fn create_test_user(id: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: format!("user_{id}"),
            username_lower: format!("user_{id}"),
            display_name: None,
            password_hash: None,
            role: UserRole::Resident,
            ban_reason: None,
            ban_type: None,
            banned_at: None,
            ban_expires_at: None,
            banned_by: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service_with(
        report_db: Arc<sea_orm::DatabaseConnection>,
        content_db: Arc<sea_orm::DatabaseConnection>,
        user_db: Arc<sea_orm::DatabaseConnection>,
    ) -> ModerationService {
        let user_repo = UserRepository::new(Arc::clone(&user_db));
        ModerationService::new(
            ReportRepository::new(report_db),
            ContentRepository::new(content_db),
            user_repo.clone(),
            SanctionService::new(user_repo),
        )
    }

    #[tokio::test]
    async fn test_take_action_on_resolved_report_is_invalid_transition() {
        let resolved = create_test_report("report1", ReportStatus::Resolved);

        let report_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[resolved]])
                .into_connection(),
        );
        let content_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let user_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service_with(report_db, content_db, user_db);
        let result = service
            .take_action("admin1", "report1", ModerationAction::Remove, None)
            .await;

        assert!(matches!(result, Err(AppError::InvalidTransition(_))));
    }

    #[tokio::test]
    async fn test_second_take_action_is_rejected_and_leaves_review_stamp() {
        let now = Utc::now();
        let pending = create_test_report("report1", ReportStatus::Pending);
        let mut resolved = pending.clone();
        resolved.status = ReportStatus::Resolved;
        resolved.resolved_at = Some(now.into());
        let content = create_test_content("c1", Some("author1"));
        let mut reviewed = content.clone();
        reviewed.status = ContentStatus::Removed;
        reviewed.reviewed_by = Some("admin1".to_string());
        reviewed.reviewed_at = Some(now.into());

        let report_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    vec![pending],
                    vec![resolved.clone()],
                    vec![resolved],
                ])
                .into_connection(),
        );
        // The content row gets exactly one lookup and one write; any
        // second write attempt would trip the mock rather than resolve.
        let content_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![content], vec![reviewed.clone()]])
                .into_connection(),
        );
        let user_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service_with(report_db, content_db, user_db);

        let outcome = service
            .take_action("admin1", "report1", ModerationAction::Remove, None)
            .await
            .unwrap();
        let first_reviewed_at = outcome.content.reviewed_at.unwrap();

        let second = service
            .take_action("admin2", "report1", ModerationAction::Approve, None)
            .await;

        assert!(matches!(second, Err(AppError::InvalidTransition(_))));
        assert_eq!(first_reviewed_at, reviewed.reviewed_at.unwrap());
    }

    #[tokio::test]
    async fn test_ban_author_without_author_id_is_ambiguous() {
        let pending = create_test_report("report1", ReportStatus::Pending);
        let anonymous = create_test_content("c1", None);

        let report_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[pending]])
                .into_connection(),
        );
        let content_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[anonymous]])
                .into_connection(),
        );
        let user_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service_with(report_db, content_db, user_db);
        let result = service
            .ban_author_from_report(
                "admin1",
                "report1",
                "Repeat spam".to_string(),
                BanType::Permanent,
                None,
            )
            .await;

        assert!(matches!(result, Err(AppError::AmbiguousTarget(_))));
    }

    #[tokio::test]
    async fn test_queue_joins_reports_with_content_and_ban_state() {
        let report = create_test_report("report1", ReportStatus::Pending);
        let content = create_test_content("c1", Some("author1"));
        let mut author = create_test_user("author1");
        author.ban_reason = Some("Spam".to_string());
        author.ban_type = Some(BanType::Permanent);
        author.banned_at = Some(Utc::now().into());
        author.banned_by = Some("admin1".to_string());

        let report_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[report]])
                .into_connection(),
        );
        let content_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[content]])
                .into_connection(),
        );
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[author]])
                .into_connection(),
        );

        let service = service_with(report_db, content_db, user_db);
        let queue = service
            .queue(Some(ReportStatus::Pending), 10, 0)
            .await
            .unwrap();

        assert_eq!(queue.len(), 1);
        assert!(queue[0].author_banned);
        assert_eq!(queue[0].content.as_ref().unwrap().id, "c1");
    }

    #[tokio::test]
    async fn test_queue_tolerates_missing_content() {
        let report = create_test_report("report1", ReportStatus::Pending);

        let report_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[report]])
                .into_connection(),
        );
        let content_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<content::Model>::new()])
                .into_connection(),
        );
        let user_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service_with(report_db, content_db, user_db);
        let queue = service
            .queue(Some(ReportStatus::Pending), 10, 0)
            .await
            .unwrap();

        assert_eq!(queue.len(), 1);
        assert!(queue[0].content.is_none());
        assert!(!queue[0].author_banned);
    }

    /// Full lifecycle over the services: duplicate submit is idempotent,
    /// removal resolves the report, a 7-day ban lapses with no unban call.
    #[tokio::test]
    async fn test_report_to_ban_lifecycle() {
        use crate::services::report::{ReportService, SubmitReportInput};

        let now = Utc::now();
        let content = create_test_content("c1", Some("author1"));
        let pending = create_test_report("report1", ReportStatus::Pending);
        let mut resolved = pending.clone();
        resolved.status = ReportStatus::Resolved;
        resolved.resolved_at = Some(now.into());
        let mut removed = content.clone();
        removed.status = ContentStatus::Removed;
        removed.reviewed_by = Some("admin1".to_string());
        removed.reviewed_at = Some(now.into());
        let author = create_test_user("author1");
        let mut banned = author.clone();
        banned.ban_reason = Some("Repeat spam".to_string());
        banned.ban_type = Some(BanType::Temporary);
        banned.banned_at = Some(now.into());
        banned.ban_expires_at = Some((now + chrono::Duration::days(7)).into());
        banned.banned_by = Some("admin1".to_string());

        let report_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    Vec::<report::Model>::new(),
                    vec![pending.clone()],
                    vec![pending.clone()],
                    vec![pending.clone()],
                    vec![resolved.clone()],
                    vec![resolved],
                ])
                .into_connection(),
        );
        let content_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    vec![content.clone()],
                    vec![content.clone()],
                    vec![content],
                    vec![removed.clone()],
                    vec![removed],
                ])
                .into_connection(),
        );
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![author], vec![banned]])
                .into_connection(),
        );

        let report_repo = ReportRepository::new(Arc::clone(&report_db));
        let content_repo = ContentRepository::new(Arc::clone(&content_db));
        let user_repo = UserRepository::new(Arc::clone(&user_db));
        let reports = ReportService::new(report_repo.clone(), content_repo.clone());
        let moderation = ModerationService::new(
            report_repo,
            content_repo,
            user_repo.clone(),
            SanctionService::new(user_repo),
        );

        let first = reports
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
        assert!(first.created);

        let second = reports
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
        assert!(!second.created);
        assert_eq!(second.report.id, first.report.id);

        let outcome = moderation
            .take_action(
                "admin1",
                "report1",
                ModerationAction::Remove,
                Some("policy violation".to_string()),
            )
            .await
            .unwrap();
        assert_eq!(outcome.report.status, ReportStatus::Resolved);
        assert_eq!(outcome.content.status, ContentStatus::Removed);

        let user = moderation
            .ban_author_from_report(
                "admin1",
                "report1",
                "Repeat spam".to_string(),
                BanType::Temporary,
                Some(now + chrono::Duration::days(7)),
            )
            .await
            .unwrap();

        assert!(ban_active(&user, now));
        // Seven days later the ban has lapsed without any unban write.
        assert!(!ban_active(&user, now + chrono::Duration::days(8)));
    }
}
