//! Domain types for the todo store.
//!
//! A todo is identified by its name alone; the store is a mapping from name
//! to completion flag. Adding an existing name overwrites it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Point-in-time copy of every todo, keyed by name.
pub type Snapshot = HashMap<String, bool>;

/// State of the todo store
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoState {
    /// Completion flag of every todo, keyed by name
    pub todos: HashMap<String, bool>,
}

impl TodoState {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every todo
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.todos.clone()
    }

    /// Sets `name` to `completed`, overwriting any previous value
    pub fn add(&mut self, name: impl Into<String>, completed: bool) {
        self.todos.insert(name.into(), completed);
    }

    /// The flag `name` would have after a toggle.
    ///
    /// An absent name counts as not completed, so toggling it yields `true`.
    #[must_use]
    pub fn toggled_value(&self, name: &str) -> bool {
        !self.get(name).unwrap_or(false)
    }

    /// Negates the flag of `name` and returns the new value
    pub fn toggle(&mut self, name: &str) -> bool {
        let completed = self.toggled_value(name);
        self.todos.insert(name.to_string(), completed);
        completed
    }

    /// Returns the flag of `name`, if present
    #[must_use]
    pub fn get(&self, name: &str) -> Option<bool> {
        self.todos.get(name).copied()
    }

    /// Returns the number of todos
    #[must_use]
    pub fn count(&self) -> usize {
        self.todos.len()
    }

    /// Returns true when there are no todos
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }
}

impl From<Snapshot> for TodoState {
    fn from(todos: Snapshot) -> Self {
        Self { todos }
    }
}

/// Commands and events for the todo store
///
/// Commands express intent and are turned into events by the reducer.
/// Events describe what happened and are applied to state as-is, so they can
/// be replayed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoAction {
    // ========== Commands ==========
    /// Command: Set a todo's completion flag
    AddTodo {
        /// Todo name
        name: String,
        /// Completion flag to store
        completed: bool,
    },

    /// Command: Flip a todo's completion flag
    ToggleTodo {
        /// Todo name
        name: String,
    },

    // ========== Events ==========
    /// Event: Todo was stored
    TodoAdded {
        /// Todo name
        name: String,
        /// Stored completion flag
        completed: bool,
    },

    /// Event: Todo was toggled
    TodoToggled {
        /// Todo name
        name: String,
        /// Completion flag after the toggle
        completed: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_state_count() {
        let mut state = TodoState::new();
        assert_eq!(state.count(), 0);
        assert!(state.is_empty());

        state.add("Buy milk", false);
        state.add("Walk dog", true);

        assert_eq!(state.count(), 2);
        assert!(!state.is_empty());
    }

    #[test]
    fn add_overwrites() {
        let mut state = TodoState::new();
        state.add("Buy milk", true);
        state.add("Buy milk", false);

        assert_eq!(state.count(), 1);
        assert_eq!(state.get("Buy milk"), Some(false));
    }

    #[test]
    fn toggle_negates() {
        let mut state = TodoState::new();
        state.add("Buy milk", false);

        assert!(state.toggle("Buy milk"));
        assert!(!state.toggle("Buy milk"));
    }

    #[test]
    fn toggle_absent_inserts_completed() {
        let mut state = TodoState::new();

        assert!(state.toggled_value("Walk dog"));
        assert!(state.toggle("Walk dog"));
        assert_eq!(state.get("Walk dog"), Some(true));
    }

    #[test]
    fn empty_name_is_a_todo() {
        let mut state = TodoState::new();
        state.add("", true);

        assert_eq!(state.get(""), Some(true));
    }

    #[test]
    fn snapshot_is_detached() {
        let mut state = TodoState::new();
        state.add("Buy milk", false);

        let snapshot = state.snapshot();
        state.toggle("Buy milk");

        assert_eq!(snapshot.get("Buy milk"), Some(&false));
    }
}
