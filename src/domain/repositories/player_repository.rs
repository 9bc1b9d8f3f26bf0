use async_trait::async_trait;

use crate::domain::entities::Player;
use crate::domain::repositories::RepositoryError;

/// Player repository trait
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    /// Find player by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<Player>, RepositoryError>;

    /// Get all players of a group in display order: survivors first,
    /// then fallen players by elimination time descending.
    async fn find_by_group(&self, group_slug: &str) -> Result<Vec<Player>, RepositoryError>;

    /// Insert a new player
    async fn insert(&self, player: &Player) -> Result<(), RepositoryError>;

    /// Flip a player to whammed, first write wins. Returns true if the row
    /// changed, false if the player was already whammed (whammed_at untouched).
    async fn mark_whammed(&self, id: &str, whammed_at: i64) -> Result<bool, RepositoryError>;
}
