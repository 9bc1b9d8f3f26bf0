//! Roster derivation - the client-visible view of a group's player list.
//!
//! Everything here is a pure function of the loaded list. Views are recomputed
//! on every call instead of cached, so a reload always wins over stale state.

use crate::domain::entities::Player;

/// De-duplicate a player list by id.
///
/// The store never returns duplicates, but a list assembled from events or a
/// racing reload can. A duplicate keeps its first position in the list while
/// the later occurrence wins on conflicting fields, so no player ever counts
/// twice in a partition.
pub fn dedup_by_id(players: Vec<Player>) -> Vec<Player> {
    use std::collections::HashMap;

    let mut by_id: HashMap<String, usize> = HashMap::with_capacity(players.len());
    let mut result: Vec<Player> = Vec::with_capacity(players.len());

    for player in players {
        match by_id.get(&player.id) {
            Some(&idx) => result[idx] = player,
            None => {
                by_id.insert(player.id.clone(), result.len());
                result.push(player);
            }
        }
    }

    result
}

/// Sort players for display: survivors ahead of the fallen, and the fallen
/// ordered by elimination time descending (most recent loss first).
pub fn sort_for_display(players: &mut [Player]) {
    players.sort_by(|a, b| match (a.whammed_at, b.whammed_at) {
        (None, None) => std::cmp::Ordering::Equal,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (Some(_), None) => std::cmp::Ordering::Greater,
        (Some(a_ts), Some(b_ts)) => b_ts.cmp(&a_ts),
    });
}

/// The two display partitions plus the viewer's own record
#[derive(Debug, Clone)]
pub struct RosterView {
    pub survivors: Vec<Player>,
    pub fallen: Vec<Player>,
    pub me: Option<Player>,
}

impl RosterView {
    /// Partition a player list into survivors and fallen, resolving the
    /// viewer by id. The input may arrive unordered or with duplicates.
    pub fn derive(players: &[Player], my_player_id: Option<&str>) -> Self {
        let mut players = dedup_by_id(players.to_vec());
        sort_for_display(&mut players);

        let me = my_player_id.and_then(|id| players.iter().find(|p| p.id == id).cloned());

        let (survivors, fallen) = players.into_iter().partition(Player::is_alive);

        Self {
            survivors,
            fallen,
            me,
        }
    }
}
