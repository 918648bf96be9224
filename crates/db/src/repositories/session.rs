//! Admin session repository.

use std::sync::Arc;

use crate::entities::{AdminSession, admin_session};
use civimod_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait};

/// Admin session repository for database operations.
#[derive(Clone)]
pub struct SessionRepository {
    db: Arc<DatabaseConnection>,
}

impl SessionRepository {
    /// Create a new session repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a session by token.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<admin_session::Model>> {
        AdminSession::find_by_id(token)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a session.
    pub async fn create(
        &self,
        model: admin_session::ActiveModel,
    ) -> AppResult<admin_session::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a session.
    pub async fn update(
        &self,
        model: admin_session::ActiveModel,
    ) -> AppResult<admin_session::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a session.
    pub async fn delete(&self, model: admin_session::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a session by token if it exists.
    pub async fn delete_by_token(&self, token: &str) -> AppResult<()> {
        AdminSession::delete_by_id(token)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
