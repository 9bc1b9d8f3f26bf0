use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::Player;
use crate::domain::repositories::{GroupRepository, PlayerRepository, RepositoryError};

/// Join group input
pub struct JoinGroupInput {
    pub group_slug: String,
    pub name: String,
}

/// Join group output
pub struct JoinGroupOutput {
    pub player: Player,
}

/// Join group use case - inserts a new surviving player. The returned id is
/// the capability token the joining browser holds on to.
pub struct JoinGroup<G: GroupRepository, P: PlayerRepository> {
    group_repo: Arc<G>,
    player_repo: Arc<P>,
}

impl<G: GroupRepository, P: PlayerRepository> JoinGroup<G, P> {
    pub fn new(group_repo: Arc<G>, player_repo: Arc<P>) -> Self {
        Self {
            group_repo,
            player_repo,
        }
    }

    pub async fn execute(&self, input: JoinGroupInput) -> Result<JoinGroupOutput, JoinGroupError> {
        if input.name.trim().is_empty() {
            return Err(JoinGroupError::Validation(
                "Player name is required".into(),
            ));
        }

        self.group_repo
            .find_by_slug(&input.group_slug)
            .await?
            .ok_or(JoinGroupError::GroupNotFound)?;

        let player = Player::new(
            Uuid::new_v4().to_string(),
            input.group_slug,
            input.name,
        );

        self.player_repo.insert(&player).await?;

        tracing::info!(
            "Player '{}' joined group {} as {}",
            player.name,
            player.group_slug,
            player.id
        );

        Ok(JoinGroupOutput { player })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JoinGroupError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Group not found")]
    GroupNotFound,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
