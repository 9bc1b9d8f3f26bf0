pub mod groups;
pub mod players;
