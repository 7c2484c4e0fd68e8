//! Reducer logic for the todo store.
//!
//! Commands are never rejected: `AddTodo` and `ToggleTodo` always produce an
//! event, and the event is applied immediately. No effects are returned.

use crate::types::{TodoAction, TodoState};
use todo_store_core::{effect::Effect, reducer::Reducer, SmallVec};

/// Environment dependencies for the todo reducer
///
/// The server-side store needs nothing from the outside world.
#[derive(Clone, Copy, Debug, Default)]
pub struct TodoEnvironment;

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Reducer for the todo store
#[derive(Clone, Copy, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Applies an event to state
    fn apply_event(state: &mut TodoState, action: &TodoAction) {
        match action {
            TodoAction::TodoAdded { name, completed }
            | TodoAction::TodoToggled { name, completed } => {
                state.add(name.clone(), *completed);
            },
            // Commands are not applied to state
            TodoAction::AddTodo { .. } | TodoAction::ToggleTodo { .. } => {},
        }
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            TodoAction::AddTodo { name, completed } => {
                tracing::debug!(name = %name, completed, "Adding todo");
                metrics::counter!("todo.added").increment(1);

                Self::apply_event(state, &TodoAction::TodoAdded { name, completed });
                SmallVec::new()
            },

            TodoAction::ToggleTodo { name } => {
                if state.get(&name).is_none() {
                    tracing::debug!(name = %name, "Toggling unknown todo, inserting as completed");
                    metrics::counter!("todo.toggled_absent").increment(1);
                }
                let completed = state.toggled_value(&name);
                metrics::counter!("todo.toggled").increment(1);

                Self::apply_event(state, &TodoAction::TodoToggled { name, completed });
                SmallVec::new()
            },

            // ========== Events ==========
            TodoAction::TodoAdded { .. } | TodoAction::TodoToggled { .. } => {
                Self::apply_event(state, &action);
                SmallVec::new()
            },
        }
    }
}
