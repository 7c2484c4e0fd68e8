//! Client-side view of a remote todo store.
//!
//! The view keeps a local mirror of the server's todos. Mutations apply to
//! the mirror at once and queue in an outbox; the outbox is sent to the
//! server one mutation at a time, in the order the user made them. Once it
//! drains, a fresh `/list` brings the mirror back in line with the server.

use crate::client::TodoApi;
use crate::types::{Snapshot, TodoState};
use crate::ViewStore;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use todo_store_core::{effect::Effect, environment::Clock, reducer::Reducer, smallvec, SmallVec};
use todo_store_runtime::StoreError;

/// Header printed above the list by default.
pub const DEFAULT_HEADER: &str = "Learn full stack development todos:";

/// A local change waiting for the server
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    /// Store a todo
    Add {
        /// Todo name
        name: String,
        /// Completion flag
        completed: bool,
    },
    /// Flip a todo
    Toggle {
        /// Todo name
        name: String,
    },
}

impl Mutation {
    /// Name of the todo being changed
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Add { name, .. } | Self::Toggle { name } => name,
        }
    }

    /// Applies the change with server semantics, toggle quirk included.
    fn apply(&self, todos: &mut TodoState) {
        match self {
            Self::Add { name, completed } => todos.add(name.clone(), *completed),
            Self::Toggle { name } => {
                todos.toggle(name);
            },
        }
    }
}

/// State of the synchronized view
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Local mirror of the server's todos
    pub todos: TodoState,
    /// Unacknowledged mutations, oldest first. Only the front is in flight.
    pub outbox: VecDeque<Mutation>,
    /// Most recent refresh failure, cleared by a successful refresh
    pub last_error: Option<String>,
    /// Most recent mutation the server did not accept. Refreshes keep it.
    pub last_mutation_error: Option<String>,
    /// When the last server snapshot arrived
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl ViewState {
    /// Creates an empty, never-synced view
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of mutations not yet acknowledged
    #[must_use]
    pub fn pending(&self) -> usize {
        self.outbox.len()
    }

    /// The failure to report, if synchronization went wrong.
    ///
    /// A rejected mutation wins over a refresh failure.
    #[must_use]
    pub fn sync_error(&self) -> Option<&str> {
        self.last_mutation_error
            .as_deref()
            .or(self.last_error.as_deref())
    }
}

/// Commands and events for the view
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewAction {
    // ========== Commands ==========
    /// Command: Reload the mirror from the server
    Refresh,

    /// Command: Store a todo locally and on the server
    AddTodo {
        /// Todo name
        name: String,
        /// Completion flag
        completed: bool,
    },

    /// Command: Toggle a todo locally and on the server
    ToggleTodo {
        /// Todo name
        name: String,
    },

    // ========== Events ==========
    /// Event: Server snapshot arrived
    SnapshotLoaded {
        /// Every todo on the server
        todos: Snapshot,
    },

    /// Event: Server snapshot could not be fetched
    RefreshFailed {
        /// Failure message
        error: String,
    },

    /// Event: Server accepted the mutation at the front of the outbox
    MutationAcknowledged {
        /// Todo name
        name: String,
    },

    /// Event: Server did not accept the mutation at the front of the outbox
    MutationFailed {
        /// Todo name
        name: String,
        /// Failure message
        error: String,
    },
}

/// Environment dependencies for the view reducer
pub struct ViewEnvironment<C> {
    /// Remote todo API
    pub api: Arc<C>,
    /// Clock for sync timestamps
    pub clock: Arc<dyn Clock>,
}

impl<C> ViewEnvironment<C> {
    /// Creates a new `ViewEnvironment`
    #[must_use]
    pub fn new(api: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self { api, clock }
    }
}

impl<C> Clone for ViewEnvironment<C> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            clock: Arc::clone(&self.clock),
        }
    }
}

/// Reducer for the synchronized view
pub struct ViewReducer<C> {
    _api: PhantomData<fn() -> C>,
}

impl<C> ViewReducer<C> {
    /// Creates a new `ViewReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self { _api: PhantomData }
    }
}

impl<C> Default for ViewReducer<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for ViewReducer<C> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<C: TodoApi> ViewReducer<C> {
    fn fetch(env: &ViewEnvironment<C>) -> Effect<ViewAction> {
        let api = Arc::clone(&env.api);
        Effect::future(async move {
            Some(match api.list().await {
                Ok(todos) => ViewAction::SnapshotLoaded { todos },
                Err(error) => ViewAction::RefreshFailed {
                    error: error.to_string(),
                },
            })
        })
    }

    fn transmit(mutation: Mutation, env: &ViewEnvironment<C>) -> Effect<ViewAction> {
        let api = Arc::clone(&env.api);
        Effect::future(async move {
            let result = match &mutation {
                Mutation::Add { name, completed } => api.add(name.clone(), *completed).await,
                Mutation::Toggle { name } => api.toggle(name.clone()).await,
            };

            let name = mutation.name().to_string();
            Some(match result {
                Ok(()) => ViewAction::MutationAcknowledged { name },
                Err(error) => ViewAction::MutationFailed {
                    name,
                    error: error.to_string(),
                },
            })
        })
    }

    /// Applies a mutation locally and sends it unless another is in flight.
    fn enqueue(
        state: &mut ViewState,
        mutation: Mutation,
        env: &ViewEnvironment<C>,
    ) -> SmallVec<[Effect<ViewAction>; 4]> {
        mutation.apply(&mut state.todos);
        state.outbox.push_back(mutation.clone());

        if state.outbox.len() == 1 {
            smallvec![Self::transmit(mutation, env)]
        } else {
            tracing::debug!(queued = state.outbox.len(), "Mutation queued behind in-flight request");
            SmallVec::new()
        }
    }

    /// Sends the next queued mutation, or refreshes once the outbox is empty.
    fn advance(state: &mut ViewState, env: &ViewEnvironment<C>) -> SmallVec<[Effect<ViewAction>; 4]> {
        state.outbox.pop_front();

        match state.outbox.front() {
            Some(next) => smallvec![Self::transmit(next.clone(), env)],
            None => smallvec![Self::fetch(env)],
        }
    }
}

impl<C: TodoApi> Reducer for ViewReducer<C> {
    type State = ViewState;
    type Action = ViewAction;
    type Environment = ViewEnvironment<C>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            ViewAction::Refresh => smallvec![Self::fetch(env)],

            ViewAction::AddTodo { name, completed } => {
                Self::enqueue(state, Mutation::Add { name, completed }, env)
            },

            ViewAction::ToggleTodo { name } => Self::enqueue(state, Mutation::Toggle { name }, env),

            // ========== Events ==========
            ViewAction::SnapshotLoaded { todos } => {
                state.todos = TodoState::from(todos);
                // Changes the server has not seen yet stay visible.
                for mutation in &state.outbox {
                    mutation.apply(&mut state.todos);
                }
                state.last_error = None;
                state.last_synced_at = Some(env.clock.now());
                SmallVec::new()
            },

            ViewAction::RefreshFailed { error } => {
                tracing::warn!(%error, "Refresh failed");
                state.last_error = Some(error);
                SmallVec::new()
            },

            ViewAction::MutationAcknowledged { name } => {
                tracing::debug!(name = %name, "Mutation acknowledged");
                Self::advance(state, env)
            },

            ViewAction::MutationFailed { name, error } => {
                tracing::warn!(name = %name, %error, "Mutation failed");
                state.last_mutation_error = Some(error);
                Self::advance(state, env)
            },
        }
    }
}

/// Why a synchronization did not complete
#[derive(Error, Debug)]
pub enum SyncError {
    /// The view store gave up waiting or refused the command
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The server rejected a mutation or could not be reached
    #[error("synchronization failed: {0}")]
    Failed(String),
}

/// Sends `action` and waits until the view has loaded the resulting snapshot.
///
/// Each wait (for the snapshot, then for the store to settle) is bounded by
/// `timeout`. Returns the settled state, or the error the view recorded.
///
/// # Errors
///
/// - [`SyncError::Store`]: timed out, or the store is shutting down
/// - [`SyncError::Failed`]: a mutation was rejected or the refresh failed
pub async fn synchronize<C: TodoApi>(
    store: &ViewStore<C>,
    action: ViewAction,
    timeout: Duration,
) -> Result<ViewState, SyncError> {
    let settled = |action: &ViewAction| {
        matches!(
            action,
            ViewAction::SnapshotLoaded { .. } | ViewAction::RefreshFailed { .. }
        )
    };
    store.send_and_wait_for(action, settled, timeout).await?;
    // The snapshot is broadcast before it is reduced.
    store.wait_until_idle(timeout).await?;

    let state = store.state(Clone::clone).await;
    match state.sync_error() {
        Some(error) => Err(SyncError::Failed(error.to_string())),
        None => Ok(state),
    }
}

/// Text rendering of a view.
///
/// One line per todo, sorted by name, `- [x] name` when completed and
/// `- [ ] name` otherwise.
pub struct Rendered<'a> {
    state: &'a ViewState,
    header: &'a str,
}

impl<'a> Rendered<'a> {
    /// Renders `state` under `header`
    #[must_use]
    pub const fn new(state: &'a ViewState, header: &'a str) -> Self {
        Self { state, header }
    }
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;

        if self.state.todos.is_empty() {
            return writeln!(f, "(no todos)");
        }

        let mut todos: Vec<(&String, &bool)> = self.state.todos.todos.iter().collect();
        todos.sort_by(|a, b| a.0.cmp(b.0));

        for (name, completed) in todos {
            let mark = if *completed { 'x' } else { ' ' };
            writeln!(f, "- [{mark}] {name}")?;
        }

        Ok(())
    }
}

/// Render the view as text.
///
/// ```
/// use todo_store::view::{render, ViewState, DEFAULT_HEADER};
///
/// let mut state = ViewState::new();
/// state.todos.add("Walk dog", true);
/// state.todos.add("Buy milk", false);
///
/// assert_eq!(
///     render(&state, DEFAULT_HEADER),
///     "Learn full stack development todos:\n- [ ] Buy milk\n- [x] Walk dog\n"
/// );
/// ```
#[must_use]
pub fn render(state: &ViewState, header: &str) -> String {
    Rendered::new(state, header).to_string()
}
