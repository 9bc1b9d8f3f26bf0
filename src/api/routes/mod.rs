pub mod groups;
pub mod health;
pub mod players;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::{sse, AppState};

/// Create the main API router
pub fn create_api_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/groups", post(groups::create_group))
        .route("/groups/:slug", get(groups::get_roster))
        .route("/groups/:slug/players", post(players::join_group))
        .route("/groups/:slug/events", get(sse::group_events_handler))
        .route("/players/:playerId/whammed", post(players::report_whammed))
        .route("/health", get(health::health_handler))
        .with_state(state)
}
