pub mod repositories;

use sqlx::SqlitePool;

/// Create the schema if it is not there yet. Statements are idempotent so
/// every startup can run them against a fresh or existing database.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS groups (
            slug TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            created_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS players (
            id TEXT PRIMARY KEY,
            group_slug TEXT NOT NULL REFERENCES groups(slug),
            name TEXT NOT NULL,
            status TEXT NOT NULL,
            whammed_at INTEGER,
            created_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_players_group_slug ON players(group_slug)")
        .execute(pool)
        .await?;

    Ok(())
}
