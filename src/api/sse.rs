use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;

use crate::api::AppState;

/// GET /api/groups/:slug/events - the group-scoped change feed.
///
/// One long-lived stream per connected tab. Any insert/update/delete on the
/// group's players arrives as a `change` event; subscribers respond with a
/// full roster reload. Dropping the connection releases the subscription.
pub async fn group_events_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut receiver = state.change_feed.subscribe(&slug);

    let stream = async_stream::stream! {
        tracing::debug!("SSE stream started for group {}", slug);

        // Send initial connected event
        yield Ok(Event::default()
            .event("connected")
            .data(serde_json::json!({
                "groupSlug": slug,
                "timestamp": chrono::Utc::now().timestamp_millis()
            }).to_string()));

        let mut heartbeat_interval = tokio::time::interval(Duration::from_secs(20));

        loop {
            tokio::select! {
                _ = heartbeat_interval.tick() => {
                    tracing::trace!("SSE heartbeat");
                    // Send heartbeat comment (not a real event)
                    yield Ok(Event::default().comment("heartbeat"));
                }
                result = receiver.recv() => {
                    match result {
                        Ok(change) => {
                            tracing::debug!(
                                "SSE forwarding {} for player {}",
                                change.change_type.as_str(),
                                change.player_id
                            );
                            let json = serde_json::to_string(&change).unwrap_or_default();
                            yield Ok(Event::default()
                                .event("change")
                                .data(json));
                        }
                        Err(async_broadcast::RecvError::Overflowed(missed)) => {
                            // Skipped events coalesce into whatever reload the
                            // next delivered event triggers.
                            tracing::debug!("SSE consumer lagging, skipped {} events", missed);
                        }
                        Err(e) => {
                            tracing::warn!("SSE receiver error: {:?}, closing stream", e);
                            break;
                        }
                    }
                }
            }
        }

        tracing::debug!("SSE stream ended for group {}", slug);
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
