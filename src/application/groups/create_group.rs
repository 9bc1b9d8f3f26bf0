use std::sync::Arc;

use crate::domain::entities::Group;
use crate::domain::repositories::{GroupRepository, RepositoryError};

/// Create group input
pub struct CreateGroupInput {
    pub name: String,
}

/// Create group output
pub struct CreateGroupOutput {
    pub group: Group,
}

/// Create group use case
pub struct CreateGroup<G: GroupRepository> {
    group_repo: Arc<G>,
}

impl<G: GroupRepository> CreateGroup<G> {
    pub fn new(group_repo: Arc<G>) -> Self {
        Self { group_repo }
    }

    pub async fn execute(
        &self,
        input: CreateGroupInput,
    ) -> Result<CreateGroupOutput, CreateGroupError> {
        if input.name.trim().is_empty() {
            return Err(CreateGroupError::Validation(
                "Group name is required".into(),
            ));
        }

        let group = Group::new(input.name);

        match self.group_repo.insert(&group).await {
            Ok(()) => {}
            // The random suffix keeps collisions rare, not impossible.
            Err(RepositoryError::AlreadyExists(slug)) => {
                return Err(CreateGroupError::SlugTaken(slug));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!("Created group '{}' with slug {}", group.name, group.slug);

        Ok(CreateGroupOutput { group })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CreateGroupError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Slug already taken: {0}")]
    SlugTaken(String),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
