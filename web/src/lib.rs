//! Axum glue for stores built on `todo-store-runtime`.
//!
//! Handlers stay thin: parse the request, build an action, send it through
//! the `Store`, and map the outcome to a response.
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives at an Axum handler
//! 2. **Extract data** from the request (JSON body, correlation id)
//! 3. **Build Action** from extracted data
//! 4. **Send** the action through the `Store`
//! 5. **Map result** to an HTTP response, errors via [`AppError`]
//!
//! # Example
//!
//! ```ignore
//! use todo_store_web::{AppError, WebResult};
//! use axum::{extract::State, Json};
//!
//! async fn add_todo(
//!     State(store): State<TodoStore>,
//!     payload: Result<Json<AddTodoRequest>, JsonRejection>,
//! ) -> WebResult<Json<Ack>> {
//!     let Json(request) = payload?;
//!     store.send(request.into_action()).await?;
//!     Ok(Json(Ack::ok()))
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;

pub use error::AppError;
pub use extractors::CorrelationId;
pub use middleware::{correlation_id_layer, CORRELATION_ID_HEADER};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
