//! Roster synchronization - one browser tab's view of a group.
//!
//! The client keeps no incremental state: `load` replaces the whole snapshot,
//! a subscription's only job is to say "reload now", and the derived
//! partitions are recomputed from the snapshot on every call.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::StreamExt;
use serde::Deserialize;

use crate::client::events::SseDecoder;
use crate::client::identity::IdentityStore;
use crate::domain::entities::{Group, Player, PlayerStatus};
use crate::domain::services::roster::RosterView;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{error} ({code})")]
    Api { code: String, error: String },
}

// ============================================================================
// Wire DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
struct PlayerDto {
    id: String,
    #[serde(rename = "groupSlug")]
    group_slug: String,
    name: String,
    status: String,
    #[serde(rename = "whammedAt")]
    whammed_at: Option<String>,
    #[serde(rename = "joinedAt")]
    joined_at: Option<String>,
}

impl PlayerDto {
    fn into_player(self) -> Player {
        Player {
            id: self.id,
            group_slug: self.group_slug,
            name: self.name,
            status: PlayerStatus::from_str(&self.status).unwrap_or(PlayerStatus::Alive),
            whammed_at: self.whammed_at.as_deref().and_then(parse_rfc3339),
            created_at: self.joined_at.as_deref().and_then(parse_rfc3339).unwrap_or(0),
        }
    }
}

fn parse_rfc3339(raw: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.timestamp())
}

#[derive(Debug, Deserialize)]
struct GroupDto {
    slug: String,
    name: String,
    #[serde(rename = "createdAt")]
    created_at: Option<String>,
}

impl GroupDto {
    fn into_group(self) -> Group {
        Group {
            slug: self.slug,
            name: self.name,
            created_at: self.created_at.as_deref().and_then(parse_rfc3339).unwrap_or(0),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateGroupDto {
    group: GroupDto,
}

#[derive(Debug, Deserialize)]
struct RosterDto {
    #[serde(rename = "groupName")]
    group_name: Option<String>,
    players: Vec<PlayerDto>,
}

#[derive(Debug, Deserialize)]
struct JoinDto {
    player: PlayerDto,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDto {
    error: String,
    code: String,
}

// ============================================================================
// Roster snapshot
// ============================================================================

/// One atomically loaded snapshot of a group's state
#[derive(Debug, Clone)]
pub struct Roster {
    /// None when the slug resolved to nothing; the page keeps showing its
    /// loading placeholder in that case.
    pub group_name: Option<String>,
    players: Vec<Player>,
}

impl Roster {
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Derive the display partitions and the viewer's record
    pub fn view(&self, my_player_id: Option<&str>) -> RosterView {
        RosterView::derive(&self.players, my_player_id)
    }

    pub fn survivors(&self) -> Vec<Player> {
        self.view(None).survivors
    }

    pub fn fallen(&self) -> Vec<Player> {
        self.view(None).fallen
    }
}

// ============================================================================
// Subscription handle
// ============================================================================

/// Handle on a standing change subscription. Disposing stops callbacks and
/// releases the stream; disposal is idempotent and `Drop` disposes too, so
/// the channel cannot outlive the view that opened it.
pub struct Subscription {
    active: Arc<AtomicBool>,
    task: tokio::task::JoinHandle<()>,
}

impl Subscription {
    pub fn unsubscribe(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            self.task.abort();
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst) && !self.task.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

// ============================================================================
// Roster client
// ============================================================================

/// HTTP client for one tracker backend plus the device's durable identity
pub struct RosterClient {
    base_url: String,
    http: reqwest::Client,
    identity: IdentityStore,
}

impl RosterClient {
    /// Connect to a backend, loading this device's identity file
    pub async fn connect(base_url: impl Into<String>, identity_path: impl Into<PathBuf>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            identity: IdentityStore::open(identity_path).await,
        }
    }

    /// The player id this device holds for a group, if it ever joined
    pub fn my_player_id(&self, group_slug: &str) -> Option<String> {
        self.identity.resolve(group_slug)
    }

    /// The creation page's operation: persist a new group and return it, slug
    /// included, for the redirect to `/{slug}`.
    pub async fn create_group(&self, name: &str) -> Result<Group, ClientError> {
        let url = format!("{}/api/groups", self.base_url);
        let resp = check(
            self.http
                .post(&url)
                .json(&serde_json::json!({ "name": name }))
                .send()
                .await?,
        )
        .await?;
        let dto: CreateGroupDto = resp.json().await?;
        Ok(dto.group.into_group())
    }

    /// Fetch a full roster snapshot, replacing whatever the caller held.
    /// An unknown group is not an error: the name comes back unset.
    pub async fn load(&self, group_slug: &str) -> Result<Roster, ClientError> {
        let url = format!("{}/api/groups/{}", self.base_url, group_slug);
        let resp = check(self.http.get(&url).send().await?).await?;
        let dto: RosterDto = resp.json().await?;

        Ok(Roster {
            group_name: dto.group_name,
            players: dto.players.into_iter().map(PlayerDto::into_player).collect(),
        })
    }

    /// Join a group. On success the returned player id becomes this device's
    /// identity for the group; on failure nothing is bound and the error goes
    /// back to the caller for its alert.
    pub async fn join(&mut self, group_slug: &str, name: &str) -> Result<Player, ClientError> {
        let url = format!("{}/api/groups/{}/players", self.base_url, group_slug);
        let resp = check(
            self.http
                .post(&url)
                .json(&serde_json::json!({ "name": name }))
                .send()
                .await?,
        )
        .await?;
        let dto: JoinDto = resp.json().await?;
        let player = dto.player.into_player();

        if let Err(e) = self.identity.bind(group_slug, &player.id).await {
            tracing::warn!("Joined but failed to persist identity: {}", e);
        }

        Ok(player)
    }

    /// Report a player's defeat. Irreversible - callers must have confirmed
    /// with the user before calling. Failures are logged and swallowed; the
    /// visible transition only ever comes from the next reload.
    pub async fn report_defeat(&self, player_id: &str) {
        let url = format!("{}/api/players/{}/whammed", self.base_url, player_id);
        match self.http.post(&url).send().await {
            Ok(resp) => {
                if let Err(e) = check(resp).await {
                    tracing::warn!("Defeat report for {} rejected: {}", player_id, e);
                }
            }
            Err(e) => {
                tracing::warn!("Defeat report for {} failed: {}", player_id, e);
            }
        }
    }

    /// Open a standing change subscription for a group. Every change event
    /// invokes `on_change`; the callback is expected to trigger a full
    /// `load`, never to patch state incrementally.
    pub fn subscribe(
        &self,
        group_slug: &str,
        on_change: impl Fn() + Send + 'static,
    ) -> Subscription {
        let url = format!("{}/api/groups/{}/events", self.base_url, group_slug);
        let http = self.http.clone();
        let slug = group_slug.to_string();
        let active = Arc::new(AtomicBool::new(true));

        let task = tokio::spawn(async move {
            let resp = match http.get(&url).send().await {
                Ok(resp) => resp,
                Err(e) => {
                    tracing::warn!("Change subscription for {} failed to open: {}", slug, e);
                    return;
                }
            };

            let mut stream = resp.bytes_stream();
            let mut decoder = SseDecoder::new();

            while let Some(chunk) = stream.next().await {
                match chunk {
                    Ok(bytes) => {
                        for event in decoder.push(&bytes) {
                            if event.event == "change" {
                                on_change();
                            }
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Change stream for {} broke: {}", slug, e);
                        break;
                    }
                }
            }

            tracing::debug!("Change stream for {} ended", slug);
        });

        Subscription { active, task }
    }
}

async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    if resp.status().is_success() {
        return Ok(resp);
    }

    let status = resp.status();
    match resp.json::<ApiErrorDto>().await {
        Ok(body) => Err(ClientError::Api {
            code: body.code,
            error: body.error,
        }),
        Err(_) => Err(ClientError::Api {
            code: status.as_u16().to_string(),
            error: "Request failed".to_string(),
        }),
    }
}
