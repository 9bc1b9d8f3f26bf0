use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::entities::{Player, PlayerStatus};
use crate::domain::repositories::{PlayerRepository, RepositoryError};

/// SQLite implementation of PlayerRepository
pub struct SqlitePlayerRepository {
    pool: SqlitePool,
}

impl SqlitePlayerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_player(row: &sqlx::sqlite::SqliteRow) -> Player {
        use sqlx::Row;

        let status_str: String = row.get("status");

        Player {
            id: row.get("id"),
            group_slug: row.get("group_slug"),
            name: row.get("name"),
            status: PlayerStatus::from_str(&status_str).unwrap_or(PlayerStatus::Alive),
            whammed_at: row.get("whammed_at"),
            created_at: row.get("created_at"),
        }
    }
}

#[async_trait]
impl PlayerRepository for SqlitePlayerRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Player>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM players WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(row.as_ref().map(Self::row_to_player))
    }

    async fn find_by_group(&self, group_slug: &str) -> Result<Vec<Player>, RepositoryError> {
        // Survivors (whammed_at NULL) first, then the fallen newest-first.
        let rows = sqlx::query(
            r#"
            SELECT * FROM players
            WHERE group_slug = ?
            ORDER BY CASE WHEN whammed_at IS NULL THEN 0 ELSE 1 END, whammed_at DESC
            "#,
        )
        .bind(group_slug)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(rows.iter().map(Self::row_to_player).collect())
    }

    async fn insert(&self, player: &Player) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO players (id, group_slug, name, status, whammed_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&player.id)
        .bind(&player.group_slug)
        .bind(&player.name)
        .bind(player.status.as_str())
        .bind(player.whammed_at)
        .bind(player.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }

    async fn mark_whammed(&self, id: &str, whammed_at: i64) -> Result<bool, RepositoryError> {
        // Guarded on status so the first report wins and whammed_at never moves.
        let result = sqlx::query(
            "UPDATE players SET status = 'whammed', whammed_at = ? WHERE id = ? AND status = 'alive'",
        )
        .bind(whammed_at)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
