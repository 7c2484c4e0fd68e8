//! In-memory todo store served over HTTP.
//!
//! A todo is a name and a completion flag. The server keeps every todo in a
//! single [`TodoStore`] and exposes three operations:
//!
//! - `GET /list` - every todo and its flag
//! - `POST /add` - set a todo's flag, overwriting an existing one
//! - `POST /toggle` - flip a todo's flag (unknown names become completed)
//!
//! Nothing is persisted; a restart starts from an empty store.
//!
//! On the client side, [`client::TodoClient`] speaks the HTTP API and
//! [`view`] keeps a synchronized local mirror driven by the same runtime.
//!
//! # Quick Start
//!
//! ```no_run
//! use todo_store::{new_store, TodoAction};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = new_store();
//!
//! store.send(TodoAction::AddTodo {
//!     name: "Buy milk".to_string(),
//!     completed: false,
//! }).await?;
//! store.send(TodoAction::ToggleTodo { name: "Buy milk".to_string() }).await?;
//!
//! assert_eq!(store.state(|s| s.get("Buy milk")).await, Some(true));
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod handlers;
pub mod reducer;
pub mod router;
pub mod server;
pub mod types;
pub mod view;

use todo_store_runtime::Store;

// Re-export commonly used types
pub use client::{ClientError, TodoApi, TodoClient};
pub use config::{Config, ConfigError};
pub use reducer::{TodoEnvironment, TodoReducer};
pub use types::{Snapshot, TodoAction, TodoState};

/// The server-side todo store.
pub type TodoStore = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

/// Client-side synchronized view over any [`TodoApi`].
pub type ViewStore<C> = Store<view::ViewState, view::ViewAction, view::ViewEnvironment<C>, view::ViewReducer<C>>;

/// Create an empty todo store.
#[must_use]
pub fn new_store() -> TodoStore {
    Store::new(TodoState::new(), TodoReducer::new(), TodoEnvironment::new())
}
