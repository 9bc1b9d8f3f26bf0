//! Durable local identity - which player this device is, per group.
//!
//! The analog of the group page's localStorage entry: one JSON file mapping
//! `wham_player_<slug>` keys to player ids. Possession of the id is the whole
//! identity model; there is no account behind it.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use tokio::fs;

fn storage_key(group_slug: &str) -> String {
    format!("wham_player_{}", group_slug)
}

/// File-backed (browser, group) -> player id map
pub struct IdentityStore {
    path: PathBuf,
    ids: HashMap<String, String>,
}

impl IdentityStore {
    /// Open the store at `path`. A missing file is a fresh store, not an
    /// error; an unreadable one is logged and treated the same way.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let ids = match fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(ids) => ids,
                Err(e) => {
                    tracing::warn!("Ignoring corrupt identity file {:?}: {}", path, e);
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        Self { path, ids }
    }

    /// Who am I in this group? No I/O, no error path - an unbound group is a
    /// normal outcome.
    pub fn resolve(&self, group_slug: &str) -> Option<String> {
        self.ids.get(&storage_key(group_slug)).cloned()
    }

    /// Bind a player id for a group, overwriting any prior binding, and
    /// persist so `resolve` keeps answering across restarts.
    pub async fn bind(&mut self, group_slug: &str, player_id: &str) -> io::Result<()> {
        self.ids
            .insert(storage_key(group_slug), player_id.to_string());
        self.save().await
    }

    async fn save(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(&self.ids)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, json).await
    }
}
