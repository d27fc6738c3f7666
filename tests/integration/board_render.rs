//! Integration tests for board projection over live server data: column
//! partitioning, stat aggregates, and text sanitization survive a full
//! round trip through the API.

mod support;

use chrono::NaiveDate;

use taskdeck::api::ApiClient;
use taskdeck::board::BoardView;
use taskdeck_api::auth::Registration;
use taskdeck_api::task::{MoveRequest, TaskDraft, TaskFilter, TaskPatch, TaskStatus};
use taskdeck_api::user::UserDirectory;

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

async fn seed(api: &ApiClient, title: &str, status: TaskStatus) -> i64 {
    let task = api
        .create_task(&TaskDraft::new(title.to_string()))
        .await
        .unwrap();
    if status != TaskStatus::Todo {
        api.move_task(
            task.id,
            MoveRequest {
                status,
                position: 0,
            },
        )
        .await
        .unwrap();
    }
    task.id
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[tokio::test]
async fn columns_partition_fetched_tasks() {
    let api = logged_in_client().await;
    seed(&api, "plan", TaskStatus::Todo).await;
    seed(&api, "build", TaskStatus::InProgress).await;
    seed(&api, "check", TaskStatus::Review).await;
    seed(&api, "shipped", TaskStatus::Done).await;
    seed(&api, "more planning", TaskStatus::Todo).await;

    let tasks = api.list_tasks(&TaskFilter::default()).await.unwrap();
    let board = BoardView::project(&tasks, today(), &UserDirectory::default());

    assert_eq!(board.column(TaskStatus::Todo).unwrap().count(), 2);
    assert_eq!(board.column(TaskStatus::InProgress).unwrap().count(), 1);
    assert_eq!(board.column(TaskStatus::Review).unwrap().count(), 1);
    assert_eq!(board.column(TaskStatus::Done).unwrap().count(), 1);
    assert_eq!(board.stats.total, 5);
    assert_eq!(board.stats.in_progress, 1);
    assert_eq!(board.stats.done, 1);
}

#[tokio::test]
async fn overdue_stat_excludes_done_tasks() {
    let api = logged_in_client().await;
    let late = seed(&api, "late", TaskStatus::Todo).await;
    let done_late = seed(&api, "done late", TaskStatus::Done).await;
    let past = today().pred_opt().unwrap();
    for id in [late, done_late] {
        api.update_task(
            id,
            &TaskPatch {
                due_date: Some(past),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }

    let tasks = api.list_tasks(&TaskFilter::default()).await.unwrap();
    let board = BoardView::project(&tasks, today(), &UserDirectory::default());
    assert_eq!(board.stats.overdue, 1);

    let todo = board.column(TaskStatus::Todo).unwrap();
    assert!(todo.cards[0].overdue);
    let done = board.column(TaskStatus::Done).unwrap();
    assert!(!done.cards[0].overdue);
}

#[tokio::test]
async fn hostile_titles_render_inert() {
    let api = logged_in_client().await;
    seed(&api, "<script>alert(1)</script>", TaskStatus::Todo).await;
    seed(&api, "esc\u{1b}[2Jwipe", TaskStatus::Todo).await;

    let tasks = api.list_tasks(&TaskFilter::default()).await.unwrap();
    let board = BoardView::project(&tasks, today(), &UserDirectory::default());
    let titles: Vec<&str> = board
        .column(TaskStatus::Todo)
        .unwrap()
        .cards
        .iter()
        .map(|c| c.title.as_str())
        .collect();

    // Markup stays literal text; the escape byte is gone.
    assert!(titles.contains(&"<script>alert(1)</script>"));
    assert!(titles.contains(&"esc[2Jwipe"));
}

#[tokio::test]
async fn projection_is_stable_across_refetches() {
    let api = logged_in_client().await;
    seed(&api, "steady", TaskStatus::Review).await;

    let first = api.list_tasks(&TaskFilter::default()).await.unwrap();
    let second = api.list_tasks(&TaskFilter::default()).await.unwrap();
    let users = UserDirectory::default();
    assert_eq!(
        BoardView::project(&first, today(), &users),
        BoardView::project(&second, today(), &users)
    );
}

#[tokio::test]
async fn status_filter_narrows_the_snapshot() {
    let api = logged_in_client().await;
    seed(&api, "one", TaskStatus::Todo).await;
    seed(&api, "two", TaskStatus::Done).await;

    let filter = TaskFilter {
        status: Some(TaskStatus::Done),
        ..Default::default()
    };
    let tasks = api.list_tasks(&filter).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].status, TaskStatus::Done);
}
