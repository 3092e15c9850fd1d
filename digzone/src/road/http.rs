//! HTTP client abstraction for testability

use super::RoadSnapError;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Default request timeout for road snapping calls.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// User-Agent sent with every request.
const DEFAULT_USER_AGENT: &str = concat!("digzone/", env!("CARGO_PKG_VERSION"));

/// Trait for asynchronous HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait AsyncHttpClient: Send + Sync + 'static {
    /// Performs an async HTTP GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    ///
    /// # Returns
    ///
    /// The response body as bytes or an error.
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, RoadSnapError>> + Send;
}

/// Async HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct AsyncReqwestClient {
    client: reqwest::Client,
}

impl AsyncReqwestClient {
    /// Creates a new AsyncReqwestClient with the default timeout.
    pub fn new() -> Result<Self, RoadSnapError> {
        Self::with_timeout(DEFAULT_HTTP_TIMEOUT_SECS)
    }

    /// Creates a new AsyncReqwestClient with custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, RoadSnapError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|e| RoadSnapError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, RoadSnapError> {
        trace!("HTTP GET request starting");

        let response = match self.client.get(url).send().await {
            Ok(resp) => {
                debug!(status = resp.status().as_u16(), "HTTP response received");
                resp
            }
            Err(e) => {
                // URLs carry the API key, so log the error without them
                let e = e.without_url();
                warn!(
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(RoadSnapError::Http(format!("Request failed: {}", e)));
            }
        };

        if !response.status().is_success() {
            warn!(status = response.status().as_u16(), "HTTP error status");
            return Err(RoadSnapError::Http(format!("HTTP {}", response.status())));
        }

        match response.bytes().await {
            Ok(bytes) => {
                trace!(bytes = bytes.len(), "HTTP response body read");
                Ok(bytes.to_vec())
            }
            Err(e) => {
                let e = e.without_url();
                warn!(error = %e, "Failed to read response body");
                Err(RoadSnapError::Http(format!(
                    "Failed to read response: {}",
                    e
                )))
            }
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock async HTTP client for testing.
    ///
    /// Records every requested URL so tests can assert on query strings.
    #[derive(Clone)]
    pub struct MockAsyncHttpClient {
        pub response: Result<Vec<u8>, RoadSnapError>,
        pub requests: Arc<Mutex<Vec<String>>>,
    }

    impl MockAsyncHttpClient {
        pub fn new(response: Result<Vec<u8>, RoadSnapError>) -> Self {
            Self {
                response,
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn json(body: &str) -> Self {
            Self::new(Ok(body.as_bytes().to_vec()))
        }

        pub fn last_url(&self) -> Option<String> {
            self.requests.lock().unwrap().last().cloned()
        }
    }

    impl AsyncHttpClient for MockAsyncHttpClient {
        async fn get(&self, url: &str) -> Result<Vec<u8>, RoadSnapError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.response.clone()
        }
    }

    #[tokio::test]
    async fn test_mock_async_client_success() {
        let mock = MockAsyncHttpClient::new(Ok(vec![1, 2, 3, 4]));

        let result = mock.get("http://example.com").await;
        assert_eq!(result.unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(mock.last_url().as_deref(), Some("http://example.com"));
    }

    #[tokio::test]
    async fn test_mock_async_client_error() {
        let mock = MockAsyncHttpClient::new(Err(RoadSnapError::Http("Test error".to_string())));

        let result = mock.get("http://example.com").await;
        assert!(result.is_err());
    }

    #[test]
    fn test_reqwest_client_builds() {
        assert!(AsyncReqwestClient::with_timeout(5).is_ok());
    }
}
