//! HTTP transport port definition.

use async_trait::async_trait;

/// Port for executing fully built HTTP requests.
///
/// Implementations must not alter the request; the API client has already
/// applied the authorization rule.
#[async_trait]
pub trait HttpTransportPort: Send + Sync {
    /// Sends the request and returns the transport's response or error.
    async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response, reqwest::Error>;
}
