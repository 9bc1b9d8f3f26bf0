use std::collections::HashMap;
use std::sync::RwLock;

use async_broadcast::{broadcast, InactiveReceiver, Receiver, Sender, TrySendError};

/// Kind of mutation on the players table
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Insert,
    Update,
    Delete,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Insert => "insert",
            ChangeType::Update => "update",
            ChangeType::Delete => "delete",
        }
    }
}

/// Change notification for one player row, delivered to every subscriber of
/// the row's group. Subscribers treat it as a reload trigger; the payload is
/// informational.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerChange {
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    pub group_slug: String,
    pub player_id: String,
    pub timestamp: i64,
}

impl PlayerChange {
    pub fn new(change_type: ChangeType, group_slug: &str, player_id: &str) -> Self {
        Self {
            change_type,
            group_slug: group_slug.to_string(),
            player_id: player_id.to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

struct GroupChannel {
    sender: Sender<PlayerChange>,
    // Keeps the channel open while no SSE client is connected.
    _keep_alive: InactiveReceiver<PlayerChange>,
}

/// Per-group change broadcaster.
///
/// One bounded broadcast channel per group slug, created lazily on first use.
/// Overflow is enabled: a slow subscriber loses the oldest events, which only
/// coalesces its reloads.
pub struct ChangeFeed {
    channels: RwLock<HashMap<String, GroupChannel>>,
}

impl ChangeFeed {
    const CHANNEL_CAPACITY: usize = 256;

    pub fn new() -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
        }
    }

    fn with_channel<T>(&self, group_slug: &str, f: impl FnOnce(&GroupChannel) -> T) -> T {
        {
            let channels = self.channels.read().unwrap();
            if let Some(channel) = channels.get(group_slug) {
                return f(channel);
            }
        }

        let mut channels = self.channels.write().unwrap();
        let channel = channels.entry(group_slug.to_string()).or_insert_with(|| {
            let (mut sender, receiver) = broadcast(Self::CHANNEL_CAPACITY);
            sender.set_overflow(true);
            GroupChannel {
                sender,
                _keep_alive: receiver.deactivate(),
            }
        });
        f(channel)
    }

    /// Open a subscription to one group's changes
    pub fn subscribe(&self, group_slug: &str) -> Receiver<PlayerChange> {
        self.with_channel(group_slug, |channel| channel.sender.new_receiver())
    }

    /// Publish a change to every subscriber of its group
    pub fn publish(&self, event: PlayerChange) {
        let group_slug = event.group_slug.clone();
        self.with_channel(&group_slug, |channel| {
            let receiver_count = channel.sender.receiver_count();
            tracing::debug!(
                "Broadcasting {} for player {} to {} receivers",
                event.change_type.as_str(),
                event.player_id,
                receiver_count
            );
            match channel.sender.try_broadcast(event) {
                Ok(None) => {}
                Ok(Some(_)) => {
                    tracing::debug!("Change feed overflowed, oldest event dropped");
                }
                Err(TrySendError::Inactive(_)) => {
                    tracing::debug!("No subscribers for this group, change dropped");
                }
                Err(e) => {
                    tracing::warn!("Failed to broadcast change: {:?}", e);
                }
            }
        });
    }

    /// Number of live subscribers for a group
    pub fn subscriber_count(&self, group_slug: &str) -> usize {
        let channels = self.channels.read().unwrap();
        channels
            .get(group_slug)
            .map(|c| c.sender.receiver_count())
            .unwrap_or(0)
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}
