//! Content repository.

use std::sync::Arc;

use crate::entities::{Content, content};
use civimod_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Content repository for database operations.
#[derive(Clone)]
pub struct ContentRepository {
    db: Arc<DatabaseConnection>,
}

impl ContentRepository {
    /// Create a new content repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find content by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<content::Model>> {
        Content::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find content by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<content::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ContentNotFound(id.to_string()))
    }

    /// Find content rows by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<content::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Content::find()
            .filter(content::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create content.
    pub async fn create(&self, model: content::ActiveModel) -> AppResult<content::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update content.
    pub async fn update(&self, model: content::ActiveModel) -> AppResult<content::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::content::ContentStatus;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_content(id: &str, author_id: Option<&str>) -> content::Model {
        content::Model {
            id: id.to_string(),
            author_id: author_id.map(str::to_string),
            author_name: None,
            title: "Broken streetlight".to_string(),
            body: "The light at 5th and Main is out.".to_string(),
            status: ContentStatus::Approved,
            reviewed_by: None,
            reviewed_at: None,
            admin_notes: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_get_by_id_found() {
        let content = create_test_content("content1", Some("user1"));

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[content]])
                .into_connection(),
        );

        let repo = ContentRepository::new(db);
        let result = repo.get_by_id("content1").await.unwrap();

        assert_eq!(result.status, ContentStatus::Approved);
    }

    #[tokio::test]
    async fn test_find_by_ids_empty_short_circuits() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = ContentRepository::new(db);
        let result = repo.find_by_ids(&[]).await.unwrap();

        assert!(result.is_empty());
    }
}
