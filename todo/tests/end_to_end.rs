//! Full round trips: a real server on an ephemeral port, the HTTP client,
//! and the synchronized view store.

#![allow(clippy::unwrap_used)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use todo_store::view::{
    render, synchronize, SyncError, ViewAction, ViewEnvironment, ViewReducer, ViewState,
    DEFAULT_HEADER,
};
use todo_store::{new_store, server::app, Snapshot, TodoApi, TodoClient, TodoStore, ViewStore};
use todo_store_core::environment::Clock;
use todo_store_runtime::Store;
use todo_store_testing::test_clock;

const SETTLE: Duration = Duration::from_secs(5);

async fn spawn_server() -> (SocketAddr, TodoStore) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let store = new_store();
    let router = app(store.clone(), None);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (address, store)
}

fn view_store(address: SocketAddr) -> ViewStore<TodoClient> {
    let client = TodoClient::new(format!("http://{address}"));
    let env = ViewEnvironment::new(Arc::new(client), Arc::new(test_clock()));
    Store::new(ViewState::new(), ViewReducer::new(), env)
}

#[tokio::test]
async fn client_round_trip() {
    let (address, store) = spawn_server().await;
    let client = TodoClient::new(format!("http://{address}"));

    assert_eq!(client.list().await.unwrap(), Snapshot::new());

    client.add("Buy milk".to_string(), false).await.unwrap();
    client.toggle("Buy milk".to_string()).await.unwrap();
    client.toggle("Walk dog".to_string()).await.unwrap();

    let expected = Snapshot::from([
        ("Buy milk".to_string(), true),
        ("Walk dog".to_string(), true),
    ]);
    assert_eq!(client.list().await.unwrap(), expected);
    assert_eq!(store.state(todo_store::TodoState::snapshot).await, expected);
}

#[tokio::test]
async fn view_converges_on_server_state() {
    let (address, server_store) = spawn_server().await;
    server_store
        .send(todo_store::TodoAction::AddTodo {
            name: "Walk dog".to_string(),
            completed: true,
        })
        .await
        .unwrap();

    let view = view_store(address);
    view.send(ViewAction::AddTodo {
        name: "Buy milk".to_string(),
        completed: false,
    })
    .await
    .unwrap();
    view.wait_until_idle(SETTLE).await.unwrap();

    let state = view.state(Clone::clone).await;
    assert_eq!(state.pending(), 0);
    assert_eq!(state.last_error, None);
    assert_eq!(state.last_synced_at, Some(test_clock().now()));
    assert_eq!(
        render(&state, DEFAULT_HEADER),
        "Learn full stack development todos:\n- [ ] Buy milk\n- [x] Walk dog\n"
    );
}

#[tokio::test]
async fn view_toggle_reaches_server() {
    let (address, server_store) = spawn_server().await;
    let view = view_store(address);

    view.send(ViewAction::ToggleTodo {
        name: "Buy milk".to_string(),
    })
    .await
    .unwrap();
    view.wait_until_idle(SETTLE).await.unwrap();

    assert_eq!(server_store.state(|s| s.get("Buy milk")).await, Some(true));
    assert_eq!(view.state(|s| s.todos.get("Buy milk")).await, Some(true));
}

#[tokio::test]
async fn view_reports_unreachable_server() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let view = view_store(address);
    view.send(ViewAction::AddTodo {
        name: "Buy milk".to_string(),
        completed: false,
    })
    .await
    .unwrap();
    view.wait_until_idle(SETTLE).await.unwrap();

    let state = view.state(Clone::clone).await;
    assert_eq!(state.pending(), 0);
    assert!(state.sync_error().is_some());
    assert_eq!(state.last_synced_at, None);
}

#[tokio::test]
async fn queued_mutations_reach_server_in_order() {
    let (address, server_store) = spawn_server().await;
    let view = view_store(address);

    view.send(ViewAction::AddTodo {
        name: "Buy milk".to_string(),
        completed: false,
    })
    .await
    .unwrap();
    view.send(ViewAction::ToggleTodo {
        name: "Buy milk".to_string(),
    })
    .await
    .unwrap();
    view.send(ViewAction::AddTodo {
        name: "Walk dog".to_string(),
        completed: true,
    })
    .await
    .unwrap();
    view.wait_until_idle(SETTLE).await.unwrap();

    let expected = Snapshot::from([
        ("Buy milk".to_string(), true),
        ("Walk dog".to_string(), true),
    ]);
    assert_eq!(server_store.state(todo_store::TodoState::snapshot).await, expected);
    assert_eq!(view.state(|s| s.todos.snapshot()).await, expected);
}

#[tokio::test]
async fn rejected_mutation_fails_synchronization() {
    let (address, server_store) = spawn_server().await;
    server_store.shutdown(Duration::from_secs(1)).await.unwrap();

    let view = view_store(address);
    let error = synchronize(
        &view,
        ViewAction::AddTodo {
            name: "Buy milk".to_string(),
            completed: false,
        },
        SETTLE,
    )
    .await
    .unwrap_err();

    assert!(matches!(error, SyncError::Failed(ref message) if message.contains("503")));
    // The refresh after the rejection still succeeded and rolled the add back.
    let state = view.state(Clone::clone).await;
    assert!(state.todos.is_empty());
    assert_eq!(state.last_error, None);
}

#[tokio::test]
async fn synchronize_lists_server_todos() {
    let (address, server_store) = spawn_server().await;
    server_store
        .send(todo_store::TodoAction::AddTodo {
            name: "Walk dog".to_string(),
            completed: true,
        })
        .await
        .unwrap();

    let state = synchronize(&view_store(address), ViewAction::Refresh, SETTLE)
        .await
        .unwrap();

    assert_eq!(
        render(&state, DEFAULT_HEADER),
        "Learn full stack development todos:\n- [x] Walk dog\n"
    );
}
