//! Admin session service.
//!
//! Sessions are opaque bearer tokens with a sliding expiry window
//! (24h by default). Expiry is evaluated lazily on each validation;
//! there is no background sweep. An expired session is deleted when
//! detected and reported as [`SessionCheck::Expired`] so callers can
//! distinguish "never logged in" from "log in again". The API façade
//! collapses both to a uniform 401.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Duration, Utc};
use civimod_common::{AppError, AppResult, Config, IdGenerator};
use civimod_db::{
    entities::admin_session,
    repositories::{SessionRepository, UserRepository},
};
use sea_orm::Set;

/// Default sliding session lifetime.
pub const DEFAULT_SESSION_TIMEOUT_HOURS: i64 = 24;

/// Outcome of a session validation.
///
/// `Expired` and `NotFound` are deliberately distinct: a record that
/// existed but aged out is not the same as a token that was never issued.
#[derive(Debug, Clone)]
pub enum SessionCheck {
    /// The session is valid.
    Valid(admin_session::Model),
    /// A session existed but its sliding window has elapsed; the record
    /// has been destroyed and the caller must re-authenticate.
    Expired,
    /// No session with this token exists.
    NotFound,
}

/// Admin session service.
#[derive(Clone)]
pub struct SessionService {
    session_repo: SessionRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
    timeout: Duration,
}

impl SessionService {
    /// Create a new session service.
    #[must_use]
    pub fn new(session_repo: SessionRepository, user_repo: UserRepository, config: &Config) -> Self {
        Self {
            session_repo,
            user_repo,
            id_gen: IdGenerator::new(),
            timeout: Duration::hours(config.session.timeout_hours),
        }
    }

    /// Authenticate a staff user and issue a fresh session.
    ///
    /// Tokens are never reused; every login mints a new one.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<admin_session::Model> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let password_hash = user.password_hash.as_deref().ok_or(AppError::Unauthorized)?;
        if !verify_password(password, password_hash)? {
            return Err(AppError::Unauthorized);
        }

        if !user.role.is_staff() {
            return Err(AppError::Forbidden(
                "Only staff accounts can hold admin sessions".to_string(),
            ));
        }

        let session = self.issue(&user.id, &user.username, user.role.as_str()).await?;

        tracing::info!(user_id = %session.user_id, "Admin session issued");

        Ok(session)
    }

    /// Issue a fresh session for an already-authenticated identity.
    pub async fn issue(
        &self,
        user_id: &str,
        username: &str,
        role: &str,
    ) -> AppResult<admin_session::Model> {
        let model = admin_session::ActiveModel {
            token: Set(self.id_gen.generate_token()),
            user_id: Set(user_id.to_string()),
            username: Set(username.to_string()),
            role: Set(role.to_string()),
            issued_at: Set(Utc::now().into()),
        };

        self.session_repo.create(model).await
    }

    /// Validate a bearer token.
    ///
    /// Lazy expiry: an aged-out record is deleted here and reported as
    /// [`SessionCheck::Expired`]; no sweeper ever runs.
    pub async fn validate(&self, token: &str) -> AppResult<SessionCheck> {
        let Some(session) = self.session_repo.find_by_token(token).await? else {
            return Ok(SessionCheck::NotFound);
        };

        if is_expired(session.issued_at.into(), Utc::now(), self.timeout) {
            // Expiry is destruction: the caller must log in again.
            self.session_repo.delete(session).await?;
            return Ok(SessionCheck::Expired);
        }

        Ok(SessionCheck::Valid(session))
    }

    /// Slide the session window by rewriting `issued_at` to now.
    ///
    /// Returns `false` without writing if the session is already expired
    /// or unknown.
    pub async fn refresh(&self, token: &str) -> AppResult<bool> {
        match self.validate(token).await? {
            SessionCheck::Valid(session) => {
                let mut active: admin_session::ActiveModel = session.into();
                active.issued_at = Set(Utc::now().into());
                self.session_repo.update(active).await?;
                Ok(true)
            }
            SessionCheck::Expired | SessionCheck::NotFound => Ok(false),
        }
    }

    /// Destroy a session. Idempotent.
    pub async fn logout(&self, token: &str) -> AppResult<()> {
        self.session_repo.delete_by_token(token).await
    }
}

/// Whether a session issued at `issued_at` has aged out at `now`.
#[must_use]
pub fn is_expired(issued_at: DateTime<Utc>, now: DateTime<Utc>, timeout: Duration) -> bool {
    now - issued_at > timeout
}

/// Hash a password with Argon2.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against an Argon2 hash.
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
