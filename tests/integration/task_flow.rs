//! Integration tests for the task CRUD flow through the background
//! worker: every successful mutation is followed by a server re-fetch, so
//! the snapshot events always reflect server state.

mod support;

use std::time::Duration;

use tokio::sync::mpsc;

use taskdeck::api::ApiClient;
use taskdeck::session::SessionGuard;
use taskdeck::storage::Storage;
use taskdeck::worker::{ApiCommand, ApiEvent, WorkerConfig, spawn_worker};
use taskdeck_api::task::{TaskDraft, TaskFilter, TaskPatch, TaskStatus};

struct Harness {
    cmd_tx: mpsc::Sender<ApiCommand>,
    evt_rx: mpsc::Receiver<ApiEvent>,
    _dir: tempfile::TempDir,
}

impl Harness {
    async fn recv(&mut self) -> ApiEvent {
        tokio::time::timeout(Duration::from_secs(5), self.evt_rx.recv())
            .await
            .expect("timed out waiting for event")
            .expect("worker channel closed")
    }

    async fn send(&self, cmd: ApiCommand) {
        self.cmd_tx.send(cmd).await.expect("worker alive");
    }

    /// Skips events until a task snapshot arrives.
    async fn next_snapshot(&mut self) -> Vec<taskdeck_api::task::Task> {
        loop {
            if let ApiEvent::Tasks(tasks) = self.recv().await {
                return tasks;
            }
        }
    }
}

async fn logged_in_harness() -> (Harness, support::SharedState) {
    let (addr, state, _handle) = support::start_server().await;
    let api = ApiClient::new(&support::base_url(addr));
    let dir = tempfile::tempdir().unwrap();
    let storage = Storage::at_path(dir.path().join("storage.toml"));
    let guard = SessionGuard::new(storage);

    let (cmd_tx, evt_rx) = spawn_worker(
        api,
        guard,
        WorkerConfig {
            activity_limit: 50,
            download_dir: dir.path().to_path_buf(),
        },
    );
    let mut harness = Harness {
        cmd_tx,
        evt_rx,
        _dir: dir,
    };

    harness
        .send(ApiCommand::Register {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret".to_string(),
        })
        .await;
    match harness.recv().await {
        ApiEvent::SessionStarted(user) => assert_eq!(user.username, "alice"),
        other => panic!("expected session start, got {other:?}"),
    }
    (harness, state)
}

fn draft(title: &str) -> TaskDraft {
    TaskDraft::new(title.to_string())
}

#[tokio::test]
async fn create_is_followed_by_fresh_snapshot() {
    let (mut h, _state) = logged_in_harness().await;

    h.send(ApiCommand::CreateTask(draft("Write the report"))).await;
    let tasks = h.next_snapshot().await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Write the report");
    assert_eq!(tasks[0].status, TaskStatus::Todo);

    // The mutation also refreshes the activity feed.
    loop {
        if let ApiEvent::Activities(activities) = h.recv().await {
            assert!(!activities.is_empty());
            break;
        }
    }
}

#[tokio::test]
async fn update_reflects_in_next_snapshot() {
    let (mut h, _state) = logged_in_harness().await;

    h.send(ApiCommand::CreateTask(draft("Draft"))).await;
    let tasks = h.next_snapshot().await;
    let id = tasks[0].id;

    h.send(ApiCommand::UpdateTask {
        id,
        patch: TaskPatch {
            title: Some("Final".to_string()),
            priority: Some(2),
            ..Default::default()
        },
    })
    .await;
    let tasks = h.next_snapshot().await;
    assert_eq!(tasks[0].title, "Final");
    assert_eq!(tasks[0].priority, 2);
}

#[tokio::test]
async fn delete_removes_task_from_snapshot() {
    let (mut h, _state) = logged_in_harness().await;

    h.send(ApiCommand::CreateTask(draft("Keep"))).await;
    h.next_snapshot().await;
    h.send(ApiCommand::CreateTask(draft("Drop"))).await;
    let tasks = h.next_snapshot().await;
    assert_eq!(tasks.len(), 2);
    let drop_id = tasks.iter().find(|t| t.title == "Drop").unwrap().id;

    h.send(ApiCommand::DeleteTask(drop_id)).await;
    let tasks = h.next_snapshot().await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Keep");
}

#[tokio::test]
async fn validation_failure_surfaces_server_message() {
    let (mut h, _state) = logged_in_harness().await;

    h.send(ApiCommand::CreateTask(draft("   "))).await;
    match h.recv().await {
        ApiEvent::Error(msg) => assert_eq!(msg, "Title is required"),
        other => panic!("expected error, got {other:?}"),
    }
}

#[tokio::test]
async fn deleting_missing_task_is_an_error_not_a_session_end() {
    let (mut h, _state) = logged_in_harness().await;

    h.send(ApiCommand::DeleteTask(999)).await;
    match h.recv().await {
        ApiEvent::Error(msg) => assert_eq!(msg, "not found"),
        other => panic!("expected error, got {other:?}"),
    }
}

#[tokio::test]
async fn revoked_token_ends_session_on_any_call() {
    let (mut h, state) = logged_in_harness().await;
    state.lock().unwrap().revoke_all_tokens();

    h.send(ApiCommand::Refresh {
        filter: TaskFilter::default(),
    })
    .await;
    match h.recv().await {
        ApiEvent::SessionEnded => {}
        other => panic!("expected session end, got {other:?}"),
    }
}

#[tokio::test]
async fn csv_export_writes_file() {
    let (mut h, _state) = logged_in_harness().await;

    h.send(ApiCommand::CreateTask(draft("Exported task"))).await;
    h.next_snapshot().await;

    h.send(ApiCommand::ExportCsv).await;
    loop {
        match h.recv().await {
            ApiEvent::CsvExported(path) => {
                let contents = std::fs::read_to_string(&path).unwrap();
                assert!(contents.starts_with("id,title,status"));
                assert!(contents.contains("Exported task"));
                break;
            }
            ApiEvent::Tasks(_) | ApiEvent::Activities(_) => {}
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
