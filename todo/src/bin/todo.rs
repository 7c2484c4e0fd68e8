//! Command-line client for the todo server.
//!
//! ```bash
//! todo list
//! todo add "Buy milk"
//! todo add "Walk dog" --completed
//! todo toggle "Buy milk"
//! TODO_URL=http://10.0.0.5:3001 todo list
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use todo_store::view::{
    render, synchronize, ViewAction, ViewEnvironment, ViewReducer, ViewState, DEFAULT_HEADER,
};
use todo_store::{TodoClient, ViewStore};
use todo_store_core::environment::SystemClock;
use todo_store_runtime::Store;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How long to wait for the server before giving up
const SYNC_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Parser)]
#[command(name = "todo", version, about = "Manage todos on a todo server")]
struct Cli {
    /// Base URL of the todo server
    #[arg(long, env = "TODO_URL", default_value = "http://127.0.0.1:3001")]
    url: String,

    /// Header printed above the list
    #[arg(long, default_value = DEFAULT_HEADER)]
    header: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show every todo
    List,
    /// Add a todo, replacing one with the same name
    Add {
        /// Todo name
        name: String,
        /// Mark the todo as completed
        #[arg(long)]
        completed: bool,
    },
    /// Flip a todo between completed and not completed
    Toggle {
        /// Todo name
        name: String,
    },
}

impl Command {
    fn into_action(self) -> ViewAction {
        match self {
            Self::List => ViewAction::Refresh,
            Self::Add { name, completed } => ViewAction::AddTodo { name, completed },
            Self::Toggle { name } => ViewAction::ToggleTodo { name },
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "error".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let env = ViewEnvironment::new(Arc::new(TodoClient::new(cli.url)), Arc::new(SystemClock));
    let store: ViewStore<TodoClient> = Store::new(ViewState::new(), ViewReducer::new(), env);

    let state = synchronize(&store, cli.command.into_action(), SYNC_TIMEOUT)
        .await
        .context("could not synchronize with the todo server")?;

    print!("{}", render(&state, &cli.header));
    Ok(())
}
