//! The browser-tab side of the tracker: durable identity resolution and
//! roster synchronization against a running backend.

pub mod events;
pub mod identity;
pub mod roster;

pub use identity::IdentityStore;
pub use roster::{ClientError, Roster, RosterClient, Subscription};
