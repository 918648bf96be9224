//! Admin session entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Admin session model.
///
/// A session is valid iff `now - issued_at` is within the configured
/// sliding window (24h by default). Validity is computed lazily on each
/// check; there is no background sweep and no revocation list. Refresh
/// rewrites `issued_at`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "admin_session")]
pub struct Model {
    /// Opaque, unguessable bearer token.
    #[sea_orm(primary_key, auto_increment = false)]
    pub token: String,

    /// The staff user this session belongs to.
    pub user_id: String,

    pub username: String,

    /// Role snapshot at login time.
    pub role: String,

    pub issued_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
