//! Report entity: a user's flag of a piece of content for review.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Report status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[derive(Default)]
pub enum ReportStatus {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "resolved")]
    Resolved,
}

/// Report model.
///
/// At most one pending report may exist per (reporter, content) pair;
/// submitting again while pending returns the existing report.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "report")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The content being reported.
    pub content_id: String,

    /// The user who submitted the report.
    pub reporter_id: String,

    /// Reason for the report.
    pub reason: String,

    /// Optional free-text context.
    #[sea_orm(column_type = "Text", nullable)]
    pub context: Option<String>,

    /// URL of an attachment stored through the media store.
    #[sea_orm(nullable)]
    pub attachment_url: Option<String>,

    pub status: ReportStatus,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub resolved_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
