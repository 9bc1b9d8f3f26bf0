//! End-to-end tests for the roster client against a live server.
//!
//! Each test boots the backend on an ephemeral port and drives it the way a
//! browser tab does: resolve identity, load, join, report defeat, and watch
//! the change feed.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;

use whamageddon_backend::api;
use whamageddon_backend::client::RosterClient;
use whamageddon_backend::domain::entities::PlayerStatus;
use whamageddon_backend::infrastructure::app_state::AppState;

/// Boot a backend on an ephemeral port, returning its base URL
async fn spawn_server() -> String {
    std::env::set_var("DATABASE_URL", "sqlite::memory:");

    let state = Arc::new(AppState::new().await.expect("Failed to create app state"));
    let app = Router::new()
        .nest("/api", api::routes::create_api_router(state.clone()))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn temp_identity_path() -> PathBuf {
    std::env::temp_dir().join(format!("wham-client-{}.json", uuid::Uuid::new_v4()))
}

#[tokio::test]
async fn test_full_survival_arc() {
    let base = spawn_server().await;
    let identity_path = temp_identity_path();

    let mut client = RosterClient::connect(&base, &identity_path).await;

    // Create a group from the landing page flow.
    let group = client.create_group("Accounts Payable").await.unwrap();
    assert!(group.slug.starts_with("accounts-payable-"));

    // Fresh tab: no identity, empty roster, group name resolves.
    assert_eq!(client.my_player_id(&group.slug), None);
    let roster = client.load(&group.slug).await.unwrap();
    assert_eq!(roster.group_name.as_deref(), Some("Accounts Payable"));
    assert!(roster.players().is_empty());

    // Join: the returned id becomes this tab's identity.
    let player = client.join(&group.slug, "Alex").await.unwrap();
    assert_eq!(client.my_player_id(&group.slug), Some(player.id.clone()));

    let roster = client.load(&group.slug).await.unwrap();
    let view = roster.view(client.my_player_id(&group.slug).as_deref());
    assert_eq!(view.survivors.len(), 1);
    assert!(view.fallen.is_empty());
    assert_eq!(view.me.as_ref().unwrap().status, PlayerStatus::Alive);

    // Defeat: no optimistic update, the next load shows the transition.
    client.report_defeat(&player.id).await;

    let roster = client.load(&group.slug).await.unwrap();
    let view = roster.view(client.my_player_id(&group.slug).as_deref());
    assert!(view.survivors.is_empty());
    assert_eq!(view.fallen.len(), 1);
    let me = view.me.unwrap();
    assert_eq!(me.status, PlayerStatus::Whammed);
    assert!(me.whammed_at.is_some());

    // Identity survives a "reload" of the tab.
    drop(client);
    let client = RosterClient::connect(&base, &identity_path).await;
    assert_eq!(client.my_player_id(&group.slug), Some(player.id));

    let _ = tokio::fs::remove_file(&identity_path).await;
}

#[tokio::test]
async fn test_unknown_group_loads_silently() {
    let base = spawn_server().await;
    let client = RosterClient::connect(&base, temp_identity_path()).await;

    let roster = client.load("no-such-group-1").await.unwrap();
    assert_eq!(roster.group_name, None);
    assert!(roster.players().is_empty());
}

#[tokio::test]
async fn test_defeat_report_failure_is_swallowed() {
    let base = spawn_server().await;
    let client = RosterClient::connect(&base, temp_identity_path()).await;

    // Unknown player: the server rejects it, the client shrugs.
    client.report_defeat("no-such-player").await;
}

#[tokio::test]
async fn test_subscription_sees_the_other_tabs_writes() {
    let base = spawn_server().await;

    let mut tab_a = RosterClient::connect(&base, temp_identity_path()).await;
    let tab_b = RosterClient::connect(&base, temp_identity_path()).await;

    let group = tab_a.create_group("Office").await.unwrap();

    // Tab B subscribes and never writes.
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let subscription = tab_b.subscribe(&group.slug, move || {
        let _ = tx.send(());
    });

    // Let the stream connect before the first write lands.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(subscription.is_active());

    let player = tab_a.join(&group.slug, "Alex").await.unwrap();
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("join should trigger tab B's reload")
        .unwrap();

    tab_a.report_defeat(&player.id).await;
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("defeat should trigger tab B's reload")
        .unwrap();

    // Tab B's next load now shows the fallen player without tab B writing.
    let roster = tab_b.load(&group.slug).await.unwrap();
    assert_eq!(roster.fallen().len(), 1);
    assert_eq!(roster.fallen()[0].id, player.id);

    // Disposal is idempotent and stops callbacks.
    subscription.unsubscribe();
    subscription.unsubscribe();
    assert!(!subscription.is_active());
}
