use async_trait::async_trait;

use crate::domain::entities::Group;

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    #[error("Database error: {0}")]
    Database(String),
}

/// Group repository trait
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Find group by slug
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepositoryError>;

    /// Insert a new group. Fails with AlreadyExists on a slug collision.
    async fn insert(&self, group: &Group) -> Result<(), RepositoryError>;
}
