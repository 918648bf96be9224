//! Sanction service: the authoritative state for user bans.
//!
//! Whether a user is banned is never stored as a boolean of record; it
//! is derived from the ban fields at read time via [`ban_active`]. A
//! temporary ban whose expiry has passed reads as not-banned without
//! any write; the write-back `unban` only clears the stored fields.

use chrono::{DateTime, Utc};
use civimod_common::{AppError, AppResult};
use civimod_db::{
    entities::user::{self, BanType},
    repositories::UserRepository,
};
use sea_orm::Set;
use validator::Validate;

/// Input for placing or editing a ban.
#[derive(Debug, Clone, Validate)]
pub struct BanInput {
    pub user_id: String,

    #[validate(length(min = 1, max = 512))]
    pub reason: String,
    pub ban_type: BanType,
    /// Required (and strictly in the future) for temporary bans;
    /// ignored for permanent ones.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Sanction service.
#[derive(Clone)]
pub struct SanctionService {
    user_repo: UserRepository,
}

impl SanctionService {
    /// Create a new sanction service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// Ban a user.
    ///
    /// Overwrites any prior ban unconditionally; re-banning an already
    /// banned user replaces the previous ban (last writer wins).
    pub async fn ban(&self, moderator_id: &str, input: BanInput) -> AppResult<user::Model> {
        let now = Utc::now();
        validate_ban_input(&input, now)?;

        let user = self.user_repo.get_by_id(&input.user_id).await?;

        let mut active: user::ActiveModel = user.into();
        active.ban_reason = Set(Some(input.reason.trim().to_string()));
        active.ban_type = Set(Some(input.ban_type));
        active.banned_at = Set(Some(now.into()));
        active.ban_expires_at = Set(match input.ban_type {
            BanType::Temporary => input.expires_at.map(Into::into),
            BanType::Permanent => None,
        });
        active.banned_by = Set(Some(moderator_id.to_string()));
        active.updated_at = Set(Some(now.into()));

        let user = self.user_repo.update(active).await?;

        tracing::info!(
            user_id = %user.id,
            moderator_id = %moderator_id,
            ban_type = ?input.ban_type,
            "User banned"
        );

        Ok(user)
    }

    /// Edit a ban's reason, type, or duration.
    ///
    /// Deliberately permissive: an edit does not require an active ban to
    /// exist. When none does, the edit stamps `banned_at`/`banned_by` so
    /// the written record stays internally consistent.
    pub async fn edit_ban(&self, moderator_id: &str, input: BanInput) -> AppResult<user::Model> {
        let now = Utc::now();
        validate_ban_input(&input, now)?;

        let user = self.user_repo.get_by_id(&input.user_id).await?;

        let banned_at = user.banned_at.unwrap_or_else(|| now.into());
        let banned_by = user
            .banned_by
            .clone()
            .unwrap_or_else(|| moderator_id.to_string());

        let mut active: user::ActiveModel = user.into();
        active.ban_reason = Set(Some(input.reason.trim().to_string()));
        active.ban_type = Set(Some(input.ban_type));
        active.banned_at = Set(Some(banned_at));
        active.ban_expires_at = Set(match input.ban_type {
            BanType::Temporary => input.expires_at.map(Into::into),
            BanType::Permanent => None,
        });
        active.banned_by = Set(Some(banned_by));
        active.updated_at = Set(Some(now.into()));

        let user = self.user_repo.update(active).await?;

        tracing::info!(user_id = %user.id, moderator_id = %moderator_id, "Ban edited");

        Ok(user)
    }

    /// Lift a ban. Idempotent: unbanning a user who is not banned is a
    /// no-op success and performs no write.
    pub async fn unban(&self, user_id: &str) -> AppResult<user::Model> {
        let user = self.user_repo.get_by_id(user_id).await?;

        if user.banned_at.is_none() {
            return Ok(user);
        }

        let mut active: user::ActiveModel = user.into();
        active.ban_reason = Set(None);
        active.ban_type = Set(None);
        active.banned_at = Set(None);
        active.ban_expires_at = Set(None);
        active.banned_by = Set(None);
        active.updated_at = Set(Some(Utc::now().into()));

        let user = self.user_repo.update(active).await?;

        tracing::info!(user_id = %user.id, "User unbanned");

        Ok(user)
    }

    /// Whether the user is currently banned. Pure read; never mutates
    /// state, so it is safe on every content-visibility check.
    pub async fn is_banned(&self, user_id: &str) -> AppResult<bool> {
        let user = self.user_repo.get_by_id(user_id).await?;
        Ok(ban_active(&user, Utc::now()))
    }
}

/// Derived ban state: banned iff a ban was placed and it is permanent
/// or its expiry is still in the future.
#[must_use]
pub fn ban_active(user: &user::Model, now: DateTime<Utc>) -> bool {
    if user.banned_at.is_none() {
        return false;
    }

    match user.ban_type {
        Some(BanType::Permanent) => true,
        Some(BanType::Temporary) => user
            .ban_expires_at
            .is_some_and(|expiry| now < expiry.with_timezone(&Utc)),
        None => false,
    }
}

fn validate_ban_input(input: &BanInput, now: DateTime<Utc>) -> AppResult<()> {
    input.validate()?;

    if input.reason.trim().is_empty() {
        return Err(AppError::Validation("Ban reason is required".to_string()));
    }

    if input.ban_type == BanType::Temporary {
        match input.expires_at {
            None => {
                return Err(AppError::Validation(
                    "Temporary bans require an expiry date".to_string(),
                ));
            }
            Some(expiry) if expiry <= now => {
                return Err(AppError::Validation(
                    "Ban expiry must be in the future".to_string(),
                ));
            }
            Some(_) => {}
        }
    }

    Ok(())
}
