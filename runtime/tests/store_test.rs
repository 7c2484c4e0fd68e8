//! Integration tests for the Store runtime: state ownership, the effect
//! feedback loop, health and shutdown.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::time::Duration;
use todo_store_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
use todo_store_runtime::{HealthStatus, Store, StoreError};

#[derive(Clone, Debug, Default)]
struct TallyState {
    count: u32,
    pongs: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum TallyAction {
    Bump,
    Ping,
    Pong,
    Stall(Duration),
}

#[derive(Clone)]
struct TallyReducer;

impl Reducer for TallyReducer {
    type State = TallyState;
    type Action = TallyAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut TallyState,
        action: TallyAction,
        _env: &(),
    ) -> SmallVec<[Effect<TallyAction>; 4]> {
        match action {
            TallyAction::Bump => {
                state.count += 1;
                SmallVec::new()
            },
            TallyAction::Ping => smallvec![Effect::future(async { Some(TallyAction::Pong) })],
            TallyAction::Pong => {
                state.pongs += 1;
                SmallVec::new()
            },
            TallyAction::Stall(duration) => smallvec![Effect::future(async move {
                tokio::time::sleep(duration).await;
                None
            })],
        }
    }
}

fn tally_store() -> Store<TallyState, TallyAction, (), TallyReducer> {
    Store::new(TallyState::default(), TallyReducer, ())
}

#[tokio::test]
async fn send_updates_state() {
    let store = tally_store();

    store.send(TallyAction::Bump).await.unwrap();
    store.send(TallyAction::Bump).await.unwrap();

    assert_eq!(store.state(|s| s.count).await, 2);
}

#[tokio::test]
async fn clones_share_state() {
    let store = tally_store();
    let other = store.clone();

    other.send(TallyAction::Bump).await.unwrap();

    assert_eq!(store.state(|s| s.count).await, 1);
}

#[tokio::test]
async fn concurrent_sends_are_all_applied() {
    let store = tally_store();

    let handles: Vec<_> = (0..25)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.send(TallyAction::Bump).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(store.state(|s| s.count).await, 25);
}

#[tokio::test]
async fn effect_actions_feed_back_into_reducer() {
    let store = tally_store();

    let result = store
        .send_and_wait_for(
            TallyAction::Ping,
            |a| matches!(a, TallyAction::Pong),
            Duration::from_secs(2),
        )
        .await
        .unwrap();

    assert_eq!(result, TallyAction::Pong);

    // The broadcast happens before the feedback send completes.
    store.wait_until_idle(Duration::from_secs(2)).await.unwrap();
    assert_eq!(store.state(|s| s.pongs).await, 1);
}

#[tokio::test]
async fn subscribers_see_effect_actions_only() {
    let store = tally_store();
    let mut rx = store.subscribe();

    store.send(TallyAction::Bump).await.unwrap();
    store.send(TallyAction::Ping).await.unwrap();

    let observed = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(observed, TallyAction::Pong);
}

#[tokio::test]
async fn wait_for_times_out_without_matching_action() {
    let store = tally_store();

    let result = store
        .send_and_wait_for(
            TallyAction::Bump,
            |a| matches!(a, TallyAction::Pong),
            Duration::from_millis(50),
        )
        .await;

    assert!(matches!(result, Err(StoreError::Timeout)));
}

#[tokio::test]
async fn shutdown_rejects_new_actions() {
    let store = tally_store();

    assert_eq!(store.health().status, HealthStatus::Healthy);

    store.shutdown(Duration::from_secs(1)).await.unwrap();

    let result = store.send(TallyAction::Bump).await;
    assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
    assert_eq!(store.health().status, HealthStatus::Unhealthy);
    assert_eq!(store.state(|s| s.count).await, 0);
}

#[tokio::test]
async fn shutdown_waits_for_pending_effects() {
    let store = tally_store();

    store
        .send(TallyAction::Stall(Duration::from_millis(50)))
        .await
        .unwrap();
    assert_eq!(store.pending_effects(), 1);

    store.shutdown(Duration::from_secs(2)).await.unwrap();
    assert_eq!(store.pending_effects(), 0);
}

#[tokio::test]
async fn shutdown_times_out_on_slow_effects() {
    let store = tally_store();

    store
        .send(TallyAction::Stall(Duration::from_secs(30)))
        .await
        .unwrap();

    let result = store.shutdown(Duration::from_millis(50)).await;
    assert!(matches!(result, Err(StoreError::ShutdownTimeout(1))));
}

#[tokio::test]
async fn health_reports_pending_effects() {
    let store = tally_store();

    let health = store.health();
    assert!(health.status.is_healthy());
    assert!(health
        .metadata
        .iter()
        .any(|(key, value)| key == "pending_effects" && value == "0"));
}

#[tokio::test]
async fn wait_until_idle_keeps_store_open() {
    let store = tally_store();

    store
        .send(TallyAction::Stall(Duration::from_millis(30)))
        .await
        .unwrap();
    store.wait_until_idle(Duration::from_secs(2)).await.unwrap();

    store.send(TallyAction::Bump).await.unwrap();
    assert_eq!(store.state(|s| s.count).await, 1);
}

#[tokio::test]
async fn wait_until_idle_times_out() {
    let store = tally_store();

    store
        .send(TallyAction::Stall(Duration::from_secs(30)))
        .await
        .unwrap();

    let result = store.wait_until_idle(Duration::from_millis(50)).await;
    assert!(matches!(result, Err(StoreError::Timeout)));
}
