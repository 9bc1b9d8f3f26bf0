mod group_repo;
mod player_repo;

pub use group_repo::SqliteGroupRepository;
pub use player_repo::SqlitePlayerRepository;
