use serde::{Deserialize, Serialize};

/// Player status - the only transition is alive -> whammed, never back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    Alive,
    Whammed,
}

impl PlayerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerStatus::Alive => "alive",
            PlayerStatus::Whammed => "whammed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "alive" => Some(PlayerStatus::Alive),
            "whammed" => Some(PlayerStatus::Whammed),
            _ => None,
        }
    }
}

/// Player entity - one participant in one group
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub group_slug: String,
    pub name: String,
    pub status: PlayerStatus,
    /// Set exactly once, when the player reports defeat. Non-null iff whammed.
    pub whammed_at: Option<i64>,
    pub created_at: i64,
}

impl Player {
    /// Create a new surviving player
    pub fn new(id: String, group_slug: String, name: String) -> Self {
        Self {
            id,
            group_slug,
            name,
            status: PlayerStatus::Alive,
            whammed_at: None,
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.status == PlayerStatus::Alive
    }
}
