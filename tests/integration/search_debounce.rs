//! Integration tests for debounced search: a keystroke burst produces a
//! single filtered fetch after the quiet period, and clearing the box
//! restores the unfiltered snapshot.

mod support;

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use taskdeck::api::ApiClient;
use taskdeck::app::App;
use taskdeck::config::ClientConfig;
use taskdeck::storage::Storage;
use taskdeck::worker::{ApiCommand, ApiEvent};
use taskdeck_api::auth::Registration;
use taskdeck_api::task::TaskDraft;
use taskdeck_api::user::User;

async fn logged_in_client() -> ApiClient {
    let (addr, _state, _handle) = support::start_server().await;
    let mut api = ApiClient::new(&support::base_url(addr));
    api.register(&Registration {
        username: "alice".to_string(),
        email: "alice@example.com".to_string(),
        password: "secret".to_string(),
    })
    .await
    .unwrap();
    let resp = api
        .login(&taskdeck_api::auth::Credentials {
            username: "alice".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();
    api.set_token(Some(resp.access_token));
    api
}

fn board_app() -> (tempfile::TempDir, App) {
    let dir = tempfile::tempdir().unwrap();
    let storage = Storage::at_path(dir.path().join("storage.toml"));
    let mut app = App::new(&ClientConfig::default(), storage);
    app.apply_event(ApiEvent::SessionStarted(User {
        id: 1,
        username: "alice".to_string(),
        email: None,
        avatar: None,
        created_at: None,
    }));
    (dir, app)
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[tokio::test]
async fn server_filters_by_query_text() {
    let api = logged_in_client().await;
    api.create_task(&TaskDraft::new("Fix login bug".to_string()))
        .await
        .unwrap();
    api.create_task(&TaskDraft::new("Write docs".to_string()))
        .await
        .unwrap();

    let filter = taskdeck_api::task::TaskFilter {
        search: Some("login".to_string()),
        ..Default::default()
    };
    let tasks = api.list_tasks(&filter).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Fix login bug");
}

#[tokio::test]
async fn query_matches_description_too() {
    let api = logged_in_client().await;
    let mut draft = TaskDraft::new("Opaque title".to_string());
    draft.description = Some("refactor the parser".to_string());
    api.create_task(&draft).await.unwrap();

    let filter = taskdeck_api::task::TaskFilter {
        search: Some("parser".to_string()),
        ..Default::default()
    };
    let tasks = api.list_tasks(&filter).await.unwrap();
    assert_eq!(tasks.len(), 1);
}

#[tokio::test]
async fn burst_of_keystrokes_yields_single_refresh() {
    let (_dir, mut app) = board_app();
    app.handle_key_event(key(KeyCode::Char('/')));
    for c in "login".chars() {
        let cmds = app.handle_key_event(key(KeyCode::Char(c)));
        assert!(cmds.is_empty(), "keystrokes must not refresh eagerly");
    }

    // Mid-burst poll: still quiet.
    assert!(app.tick(Instant::now()).is_none());

    let after_quiet = Instant::now() + Duration::from_millis(301);
    let fired = app.tick(after_quiet);
    match fired {
        Some(ApiCommand::Refresh { filter }) => {
            assert_eq!(filter.search.as_deref(), Some("login"));
        }
        other => panic!("expected one refresh, got {other:?}"),
    }
    // Exactly one: the pipeline is drained.
    assert!(app.tick(after_quiet + Duration::from_secs(1)).is_none());
}

#[tokio::test]
async fn cleared_search_refreshes_without_filter() {
    let (_dir, mut app) = board_app();
    app.handle_key_event(key(KeyCode::Char('/')));
    app.handle_key_event(key(KeyCode::Char('x')));
    let after_quiet = Instant::now() + Duration::from_millis(301);
    app.tick(after_quiet);

    app.handle_key_event(key(KeyCode::Backspace));
    let later = after_quiet + Duration::from_millis(301);
    match app.tick(later) {
        Some(ApiCommand::Refresh { filter }) => assert!(filter.search.is_none()),
        other => panic!("expected unfiltered refresh, got {other:?}"),
    }
}

#[tokio::test]
async fn escape_cancels_pending_search() {
    let (_dir, mut app) = board_app();
    app.handle_key_event(key(KeyCode::Char('/')));
    app.handle_key_event(key(KeyCode::Char('z')));
    app.handle_key_event(key(KeyCode::Esc));

    let after_quiet = Instant::now() + Duration::from_millis(301);
    assert!(app.tick(after_quiet).is_none());
}

#[tokio::test]
async fn end_to_end_debounced_search_hits_the_server() {
    let api = logged_in_client().await;
    api.create_task(&TaskDraft::new("Deploy service".to_string()))
        .await
        .unwrap();
    api.create_task(&TaskDraft::new("Groom backlog".to_string()))
        .await
        .unwrap();

    let (_dir, mut app) = board_app();
    app.handle_key_event(key(KeyCode::Char('/')));
    for c in "deploy".chars() {
        app.handle_key_event(key(KeyCode::Char(c)));
    }
    let Some(ApiCommand::Refresh { filter }) =
        app.tick(Instant::now() + Duration::from_millis(301))
    else {
        panic!("expected refresh");
    };

    let tasks = api.list_tasks(&filter).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Deploy service");

    app.apply_event(ApiEvent::Tasks(tasks));
    assert_eq!(app.store.len(), 1);
}
