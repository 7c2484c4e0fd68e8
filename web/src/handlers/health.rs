//! Health check endpoints.

use axum::{extract::State, http::StatusCode, Json};
use todo_store_core::reducer::Reducer;
use todo_store_runtime::{HealthCheck, Store};

/// Liveness probe.
///
/// ```text
/// GET /health  ->  200 "ok"
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// Readiness probe backed by [`Store::health`].
///
/// Returns 200 while the store is healthy or degraded and 503 once it is
/// shutting down.
///
/// ```text
/// GET /health/ready
/// ```
///
/// ```json
/// {
///   "component": "store",
///   "status": "healthy",
///   "message": null,
///   "metadata": [["pending_effects", "0"]]
/// }
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check_with_store<S, A, E, R>(
    State(store): State<Store<S, A, E, R>>,
) -> (StatusCode, Json<HealthCheck>)
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    S: Send + Sync + 'static,
    A: Send + Clone + 'static,
    E: Send + Sync + 'static,
{
    let health = store.health();

    let status = if health.status.is_unhealthy() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (status, Json(health))
}
