//! Content entity: a moderated community post.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Content moderation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[derive(Default)]
pub enum ContentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Visible. Content is implicitly approved at creation unless a
    /// report escalates it.
    #[sea_orm(string_value = "approved")]
    #[default]
    Approved,
    /// Hidden from default feeds but not deleted.
    #[sea_orm(string_value = "rejected")]
    Rejected,
    /// Hard-hidden; not reversible by a normal admin action.
    #[sea_orm(string_value = "removed")]
    Removed,
}

/// Content model.
///
/// `status` only changes through the moderation workflow.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "content")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Author user id; NULL for anonymous submissions.
    #[sea_orm(nullable)]
    pub author_id: Option<String>,

    /// Display name at submission time (may exist without an author id).
    #[sea_orm(nullable)]
    pub author_name: Option<String>,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub body: String,

    pub status: ContentStatus,

    /// Admin who last reviewed this content.
    #[sea_orm(nullable)]
    pub reviewed_by: Option<String>,

    /// When this content was last reviewed.
    #[sea_orm(nullable)]
    pub reviewed_at: Option<DateTimeWithTimeZone>,

    /// Notes left by the reviewing admin.
    #[sea_orm(column_type = "Text", nullable)]
    pub admin_notes: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
