use std::str::FromStr;
use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::infrastructure::database;
use crate::infrastructure::database::repositories::{
    SqliteGroupRepository, SqlitePlayerRepository,
};
use crate::infrastructure::services::ChangeFeed;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Group repository
    pub group_repo: Arc<SqliteGroupRepository>,

    /// Player repository
    pub player_repo: Arc<SqlitePlayerRepository>,

    /// Per-group change broadcaster backing the SSE feed
    pub change_feed: Arc<ChangeFeed>,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        // Get database path from environment
        let db_path = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("DB_PATH"))
            .unwrap_or_else(|_| "sqlite:./data/whamageddon.db".to_string());

        // Ensure path has sqlite: prefix
        let db_url = if db_path.starts_with("sqlite:") {
            db_path
        } else {
            format!("sqlite:{}", db_path)
        };

        tracing::info!("Connecting to database: {}", db_url);

        let options = SqliteConnectOptions::from_str(&db_url)?.create_if_missing(true);
        // A :memory: database exists per connection, so the pool must not
        // grow past one for tests to see a single store.
        let max_connections = if db_url.contains(":memory:") { 1 } else { 5 };
        let db = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        database::init_schema(&db).await?;

        let group_repo = Arc::new(SqliteGroupRepository::new(db.clone()));
        let player_repo = Arc::new(SqlitePlayerRepository::new(db.clone()));
        let change_feed = Arc::new(ChangeFeed::new());

        Ok(Self {
            db,
            group_repo,
            player_repo,
            change_feed,
        })
    }
}
