use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::application::groups::{
    CreateGroup, CreateGroupError, CreateGroupInput, GetRoster, GetRosterInput,
};
use crate::domain::entities::Player;

/// Convert timestamp to ISO 8601 string
pub fn timestamp_to_rfc3339(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| "1970-01-01T00:00:00Z".to_string())
}

// ============================================================================
// Request/Response DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GroupResponse {
    pub slug: String,
    pub name: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct CreateGroupResponse {
    pub success: bool,
    pub group: GroupResponse,
}

#[derive(Debug, Serialize)]
pub struct PlayerResponse {
    pub id: String,
    #[serde(rename = "groupSlug")]
    pub group_slug: String,
    pub name: String,
    pub status: String,
    #[serde(rename = "whammedAt")]
    pub whammed_at: Option<String>,
    #[serde(rename = "joinedAt")]
    pub joined_at: String,
}

impl PlayerResponse {
    pub fn from_player(player: &Player) -> Self {
        Self {
            id: player.id.clone(),
            group_slug: player.group_slug.clone(),
            name: player.name.clone(),
            status: player.status.as_str().to_string(),
            whammed_at: player.whammed_at.map(timestamp_to_rfc3339),
            joined_at: timestamp_to_rfc3339(player.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RosterResponse {
    pub success: bool,
    /// Null when the slug does not resolve to a group. The page keeps its
    /// loading placeholder in that case instead of a dedicated error state.
    #[serde(rename = "groupName")]
    pub group_name: Option<String>,
    pub players: Vec<PlayerResponse>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /api/groups - Create a new group
pub async fn create_group(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<CreateGroupResponse>), (StatusCode, Json<ErrorResponse>)> {
    let name = body.name.unwrap_or_default();
    if name.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Group name is required".to_string(),
                code: "MISSING_GROUP_NAME".to_string(),
                details: None,
            }),
        ));
    }

    let use_case = CreateGroup::new(state.group_repo.clone());
    let result = use_case
        .execute(CreateGroupInput { name })
        .await
        .map_err(|e| match e {
            CreateGroupError::SlugTaken(slug) => (
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: "Group slug already taken".to_string(),
                    code: "SLUG_TAKEN".to_string(),
                    details: Some(slug),
                }),
            ),
            e => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create group".to_string(),
                    code: "CREATE_GROUP_ERROR".to_string(),
                    details: Some(e.to_string()),
                }),
            ),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(CreateGroupResponse {
            success: true,
            group: GroupResponse {
                slug: result.group.slug,
                name: result.group.name,
                created_at: timestamp_to_rfc3339(result.group.created_at),
            },
        }),
    ))
}

/// GET /api/groups/:slug - Group name and full player roster
pub async fn get_roster(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<RosterResponse>, (StatusCode, Json<ErrorResponse>)> {
    let use_case = GetRoster::new(state.group_repo.clone(), state.player_repo.clone());
    let result = use_case
        .execute(GetRosterInput { group_slug: slug })
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to load roster".to_string(),
                    code: "GET_ROSTER_ERROR".to_string(),
                    details: Some(e.to_string()),
                }),
            )
        })?;

    Ok(Json(RosterResponse {
        success: true,
        group_name: result.group.map(|g| g.name),
        players: result.players.iter().map(PlayerResponse::from_player).collect(),
    }))
}
