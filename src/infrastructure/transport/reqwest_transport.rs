//! reqwest-backed transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::domain::errors::ClientError;
use crate::domain::ports::HttpTransportPort;

const USER_AGENT: &str = concat!("plannerx/", env!("CARGO_PKG_VERSION"));

/// Production transport executing requests with a shared [`Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates transport with no client-wide timeout.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new() -> Result<Self, ClientError> {
        Self::with_timeout(None)
    }

    /// Creates transport with an optional client-wide timeout.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| ClientError::unexpected(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransportPort for ReqwestTransport {
    async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response, reqwest::Error> {
        self.client.execute(request).await
    }
}
