use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::api::routes::groups::{ErrorResponse, PlayerResponse};
use crate::api::AppState;
use crate::application::players::{
    JoinGroup, JoinGroupError, JoinGroupInput, ReportDefeat, ReportDefeatError, ReportDefeatInput,
};
use crate::infrastructure::services::{ChangeType, PlayerChange};

// ============================================================================
// Request/Response DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct JoinGroupRequest {
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JoinGroupResponse {
    pub success: bool,
    pub player: PlayerResponse,
}

#[derive(Debug, Serialize)]
pub struct ReportDefeatResponse {
    pub success: bool,
    /// False for a repeat report: the stored elimination time stands.
    pub changed: bool,
    pub player: PlayerResponse,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /api/groups/:slug/players - Join a group
pub async fn join_group(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(body): Json<JoinGroupRequest>,
) -> Result<(StatusCode, Json<JoinGroupResponse>), (StatusCode, Json<ErrorResponse>)> {
    let name = body.name.unwrap_or_default();
    if name.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Player name is required".to_string(),
                code: "MISSING_PLAYER_NAME".to_string(),
                details: None,
            }),
        ));
    }

    let use_case = JoinGroup::new(state.group_repo.clone(), state.player_repo.clone());
    let result = use_case
        .execute(JoinGroupInput {
            group_slug: slug,
            name,
        })
        .await
        .map_err(|e| match e {
            JoinGroupError::GroupNotFound => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Group not found".to_string(),
                    code: "GROUP_NOT_FOUND".to_string(),
                    details: None,
                }),
            ),
            e => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to join group".to_string(),
                    code: "JOIN_GROUP_ERROR".to_string(),
                    details: Some(e.to_string()),
                }),
            ),
        })?;

    state.change_feed.publish(PlayerChange::new(
        ChangeType::Insert,
        &result.player.group_slug,
        &result.player.id,
    ));

    Ok((
        StatusCode::CREATED,
        Json(JoinGroupResponse {
            success: true,
            player: PlayerResponse::from_player(&result.player),
        }),
    ))
}

/// POST /api/players/:playerId/whammed - Report a player's defeat
pub async fn report_whammed(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<String>,
) -> Result<Json<ReportDefeatResponse>, (StatusCode, Json<ErrorResponse>)> {
    let use_case = ReportDefeat::new(state.player_repo.clone());
    let result = use_case
        .execute(ReportDefeatInput { player_id })
        .await
        .map_err(|e| match e {
            ReportDefeatError::PlayerNotFound => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Player not found".to_string(),
                    code: "PLAYER_NOT_FOUND".to_string(),
                    details: None,
                }),
            ),
            e => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to report defeat".to_string(),
                    code: "REPORT_DEFEAT_ERROR".to_string(),
                    details: Some(e.to_string()),
                }),
            ),
        })?;

    if result.changed {
        state.change_feed.publish(PlayerChange::new(
            ChangeType::Update,
            &result.player.group_slug,
            &result.player.id,
        ));
    }

    Ok(Json(ReportDefeatResponse {
        success: true,
        changed: result.changed,
        player: PlayerResponse::from_player(&result.player),
    }))
}
