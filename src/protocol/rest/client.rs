//! # API Client Seam
//!
//! Path-based HTTP verbs returning a status code and body.

use crate::domain::errors::{HarnessError, HarnessResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Response from an API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl ApiResponse {
    /// Creates a response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx status codes.
    #[inline]
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Deserializes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::TransportFailure` if the body is not valid
    /// JSON for the target type.
    pub fn json<T: DeserializeOwned>(&self) -> HarnessResult<T> {
        serde_json::from_str(&self.body).map_err(|e| {
            HarnessError::TransportFailure(format!("invalid JSON response body: {}", e))
        })
    }
}

/// Path-based API client seam.
///
/// Implementations add base URLs, authentication headers, and retries;
/// the engine only issues verbs against paths.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Performs a GET request.
    async fn get(&self, path: &str) -> HarnessResult<ApiResponse>;

    /// Performs a POST request with a JSON body.
    async fn post(&self, path: &str, body: &serde_json::Value) -> HarnessResult<ApiResponse>;

    /// Performs a PUT request with a JSON body.
    async fn put(&self, path: &str, body: &serde_json::Value) -> HarnessResult<ApiResponse>;

    /// Performs a DELETE request.
    async fn delete(&self, path: &str) -> HarnessResult<ApiResponse>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn success_range() {
        assert!(ApiResponse::new(200, "").is_success());
        assert!(ApiResponse::new(204, "").is_success());
        assert!(!ApiResponse::new(301, "").is_success());
        assert!(!ApiResponse::new(404, "").is_success());
        assert!(!ApiResponse::new(500, "").is_success());
    }

    #[test]
    fn json_deserializes_body() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Fill {
            symbol: String,
            quantity: u64,
        }

        let response = ApiResponse::new(200, r#"{"symbol":"AAPL","quantity":100}"#);
        let fill: Fill = response.json().unwrap();
        assert_eq!(
            fill,
            Fill {
                symbol: "AAPL".to_string(),
                quantity: 100
            }
        );
    }

    #[test]
    fn invalid_json_is_transport_failure() {
        let response = ApiResponse::new(200, "not-json");
        let result: HarnessResult<serde_json::Value> = response.json();
        assert!(matches!(result, Err(HarnessError::TransportFailure(_))));
    }
}
