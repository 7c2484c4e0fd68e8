//! Custom Axum extractors.
//!
//! # Examples
//!
//! ```ignore
//! use todo_store_web::extractors::CorrelationId;
//!
//! async fn handler(correlation_id: CorrelationId) -> Json<Ack> {
//!     tracing::info!(correlation_id = %correlation_id.0, "Processing request");
//!     Json(Ack::ok())
//! }
//! ```

use crate::middleware::correlation_id_from_headers;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

/// Correlation ID for request tracing.
///
/// Uses the id stored by `correlation_id_layer()` when the layer is
/// installed, so the handler, the request span and the response header
/// agree. Without the layer, the `X-Correlation-ID` header is parsed or a
/// new UUID v4 is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelationId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts.extensions.get::<Self>() {
            return Ok(*id);
        }

        Ok(Self(correlation_id_from_headers(&parts.headers)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::middleware::CORRELATION_ID_HEADER;
    use axum::http::Request;

    #[tokio::test]
    async fn test_correlation_id_from_header() {
        let uuid = Uuid::new_v4();
        let req = Request::builder()
            .header(CORRELATION_ID_HEADER, uuid.to_string())
            .body(())
            .unwrap();

        let (mut parts, ()) = req.into_parts();
        let correlation_id = CorrelationId::from_request_parts(&mut parts, &())
            .await
            .unwrap();

        assert_eq!(correlation_id.0, uuid);
    }

    #[tokio::test]
    async fn test_correlation_id_prefers_extension() {
        let stored = Uuid::new_v4();
        let req = Request::builder()
            .header(CORRELATION_ID_HEADER, Uuid::new_v4().to_string())
            .body(())
            .unwrap();

        let (mut parts, ()) = req.into_parts();
        parts.extensions.insert(CorrelationId(stored));

        let correlation_id = CorrelationId::from_request_parts(&mut parts, &())
            .await
            .unwrap();

        assert_eq!(correlation_id.0, stored);
    }

    #[tokio::test]
    async fn test_correlation_id_generated() {
        let req = Request::builder().body(()).unwrap();

        let (mut parts, ()) = req.into_parts();
        let correlation_id = CorrelationId::from_request_parts(&mut parts, &())
            .await
            .unwrap();

        assert_ne!(correlation_id.0, Uuid::nil());
    }
}
