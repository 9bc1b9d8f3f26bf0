use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::entities::Group;
use crate::domain::repositories::{GroupRepository, RepositoryError};

/// SQLite implementation of GroupRepository
pub struct SqliteGroupRepository {
    pool: SqlitePool,
}

impl SqliteGroupRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_group(row: &sqlx::sqlite::SqliteRow) -> Group {
        use sqlx::Row;

        Group {
            slug: row.get("slug"),
            name: row.get("name"),
            created_at: row.get("created_at"),
        }
    }
}

#[async_trait]
impl GroupRepository for SqliteGroupRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM groups WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(row.as_ref().map(Self::row_to_group))
    }

    async fn insert(&self, group: &Group) -> Result<(), RepositoryError> {
        let result = sqlx::query("INSERT INTO groups (slug, name, created_at) VALUES (?, ?, ?)")
            .bind(&group.slug)
            .bind(&group.name)
            .bind(group.created_at)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(RepositoryError::AlreadyExists(group.slug.clone()))
            }
            Err(e) => Err(RepositoryError::Database(e.to_string())),
        }
    }
}
