mod create_group;
mod get_roster;

pub use create_group::{CreateGroup, CreateGroupError, CreateGroupInput, CreateGroupOutput};
pub use get_roster::{GetRoster, GetRosterError, GetRosterInput, GetRosterOutput};
