//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[derive(Default)]
pub enum UserRole {
    #[sea_orm(string_value = "resident")]
    #[default]
    Resident,
    #[sea_orm(string_value = "moderator")]
    Moderator,
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl UserRole {
    /// Whether this role may hold an admin session.
    #[must_use]
    pub const fn is_staff(self) -> bool {
        matches!(self, Self::Moderator | Self::Admin)
    }

    /// Role name as stored on sessions.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resident => "resident",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        }
    }
}

/// Ban type: permanent or temporary with an expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum BanType {
    #[sea_orm(string_value = "permanent")]
    Permanent,
    #[sea_orm(string_value = "temporary")]
    Temporary,
}

/// User model.
///
/// There is no stored `is_banned` boolean; whether a user is banned is
/// derived from the ban fields at read time (see `civimod-core`'s
/// sanction service). A temporary ban whose expiry has passed reads as
/// not-banned without any write.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub username: String,

    pub username_lower: String,

    /// Display name
    #[sea_orm(nullable)]
    pub display_name: Option<String>,

    /// Argon2 password hash (staff accounts only)
    #[sea_orm(nullable)]
    pub password_hash: Option<String>,

    /// Role of this user
    pub role: UserRole,

    /// Reason for the current ban
    #[sea_orm(nullable)]
    pub ban_reason: Option<String>,

    /// Type of the current ban
    #[sea_orm(nullable)]
    pub ban_type: Option<BanType>,

    /// When the current ban was placed
    #[sea_orm(nullable)]
    pub banned_at: Option<DateTimeWithTimeZone>,

    /// When a temporary ban expires (NULL for permanent bans)
    #[sea_orm(nullable)]
    pub ban_expires_at: Option<DateTimeWithTimeZone>,

    /// Admin who placed the current ban
    #[sea_orm(nullable)]
    pub banned_by: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
