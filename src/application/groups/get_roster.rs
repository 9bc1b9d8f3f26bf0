use std::sync::Arc;

use crate::domain::entities::{Group, Player};
use crate::domain::repositories::{GroupRepository, PlayerRepository, RepositoryError};

/// Get roster input
pub struct GetRosterInput {
    pub group_slug: String,
}

/// Get roster output. An unknown slug is not an error: the group is simply
/// absent while the (empty) player list still loads, matching the group
/// page's behavior of showing a placeholder title.
pub struct GetRosterOutput {
    pub group: Option<Group>,
    pub players: Vec<Player>,
}

/// Get roster use case - one full snapshot of a group's state
pub struct GetRoster<G: GroupRepository, P: PlayerRepository> {
    group_repo: Arc<G>,
    player_repo: Arc<P>,
}

impl<G: GroupRepository, P: PlayerRepository> GetRoster<G, P> {
    pub fn new(group_repo: Arc<G>, player_repo: Arc<P>) -> Self {
        Self {
            group_repo,
            player_repo,
        }
    }

    pub async fn execute(&self, input: GetRosterInput) -> Result<GetRosterOutput, GetRosterError> {
        let group = self.group_repo.find_by_slug(&input.group_slug).await?;
        let players = self.player_repo.find_by_group(&input.group_slug).await?;

        Ok(GetRosterOutput { group, players })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GetRosterError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
