use std::sync::Arc;

use crate::domain::entities::Player;
use crate::domain::repositories::{PlayerRepository, RepositoryError};

/// Report defeat input
pub struct ReportDefeatInput {
    pub player_id: String,
}

/// Report defeat output
pub struct ReportDefeatOutput {
    pub player: Player,
    /// False when the player was already whammed. The stored whammed_at is
    /// untouched in that case and no change event should be published.
    pub changed: bool,
}

/// Report defeat use case - the one-way alive -> whammed transition
pub struct ReportDefeat<P: PlayerRepository> {
    player_repo: Arc<P>,
}

impl<P: PlayerRepository> ReportDefeat<P> {
    pub fn new(player_repo: Arc<P>) -> Self {
        Self { player_repo }
    }

    pub async fn execute(
        &self,
        input: ReportDefeatInput,
    ) -> Result<ReportDefeatOutput, ReportDefeatError> {
        self.player_repo
            .find_by_id(&input.player_id)
            .await?
            .ok_or(ReportDefeatError::PlayerNotFound)?;

        let now = chrono::Utc::now().timestamp();
        let changed = self.player_repo.mark_whammed(&input.player_id, now).await?;

        if changed {
            tracing::info!("Player {} got whammed", input.player_id);
        } else {
            tracing::debug!(
                "Player {} already whammed, ignoring repeat report",
                input.player_id
            );
        }

        // Re-read so the response carries the stored row, not what this
        // request tried to write.
        let player = self
            .player_repo
            .find_by_id(&input.player_id)
            .await?
            .ok_or(ReportDefeatError::PlayerNotFound)?;

        Ok(ReportDefeatOutput { player, changed })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportDefeatError {
    #[error("Player not found")]
    PlayerNotFound,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
