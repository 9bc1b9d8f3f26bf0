mod group_repository;
mod player_repository;

pub use group_repository::*;
pub use player_repository::*;
