//! HTTP client for the todo API.

use crate::handlers::{Ack, AddTodoRequest, ListResponse, ToggleTodoRequest};
use crate::types::Snapshot;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::future::Future;
use thiserror::Error;

/// Errors that can occur when talking to the todo API
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response parsing failed
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// API returned a non-success status
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// API acknowledged the request with an error
    #[error("Request rejected: {0}")]
    Rejected(String),
}

/// Remote todo operations.
///
/// Implemented by [`TodoClient`]; tests substitute in-memory fakes.
pub trait TodoApi: Send + Sync + 'static {
    /// Fetch every todo
    fn list(&self) -> impl Future<Output = Result<Snapshot, ClientError>> + Send;

    /// Store a todo
    fn add(
        &self,
        name: String,
        completed: bool,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// Flip a todo's completion flag
    fn toggle(&self, name: String) -> impl Future<Output = Result<(), ClientError>> + Send;
}

/// Todo API client
#[derive(Clone, Debug)]
pub struct TodoClient {
    client: Client,
    base_url: String,
}

impl TodoClient {
    /// Create a client for the server at `base_url` (e.g. `http://127.0.0.1:3001`)
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch every todo (`GET /list`)
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or parsing failures
    pub async fn list_todos(&self) -> Result<Snapshot, ClientError> {
        let response = self
            .client
            .get(format!("{}/list", self.base_url))
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        let list: ListResponse = Self::decode(response).await?;
        Ok(list.todos)
    }

    /// Store a todo (`POST /add`)
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, parsing failures, or
    /// an acknowledgement carrying an error
    pub async fn add_todo(&self, name: &str, completed: bool) -> Result<(), ClientError> {
        let request = AddTodoRequest {
            name: name.to_string(),
            completed,
        };
        let response = self
            .client
            .post(format!("{}/add", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        Self::acknowledge(response).await
    }

    /// Flip a todo's completion flag (`POST /toggle`)
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, parsing failures, or
    /// an acknowledgement carrying an error
    pub async fn toggle_todo(&self, name: &str) -> Result<(), ClientError> {
        let request = ToggleTodoRequest {
            name: name.to_string(),
        };
        let response = self
            .client
            .post(format!("{}/toggle", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        Self::acknowledge(response).await
    }

    async fn acknowledge(response: Response) -> Result<(), ClientError> {
        let ack: Ack = Self::decode(response).await?;
        match ack.error {
            None => Ok(()),
            Some(message) => Err(ClientError::Rejected(message)),
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Error bodies share the acknowledgement's `error` field.
            let message = serde_json::from_str::<Ack>(&body)
                .ok()
                .and_then(|ack| ack.error)
                .unwrap_or(body);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::ResponseParseFailed(e.to_string()))
    }
}

impl TodoApi for TodoClient {
    fn list(&self) -> impl Future<Output = Result<Snapshot, ClientError>> + Send {
        self.list_todos()
    }

    fn add(
        &self,
        name: String,
        completed: bool,
    ) -> impl Future<Output = Result<(), ClientError>> + Send {
        async move { self.add_todo(&name, completed).await }
    }

    fn toggle(&self, name: String) -> impl Future<Output = Result<(), ClientError>> + Send {
        async move { self.toggle_todo(&name).await }
    }
}
