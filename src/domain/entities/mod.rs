mod group;
mod player;

pub use group::*;
pub use player::*;
