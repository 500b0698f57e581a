//! API client that applies the authorization rule to every request.

use std::sync::Arc;
use std::time::Duration;

use http::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Body, Method, Request, Response};
use serde::Serialize;
use tracing::debug;
use url::Url;

use super::formatting::FormMap;
use super::token_store::TokenStore;
use crate::domain::errors::ClientError;
use crate::domain::ports::HttpTransportPort;
use crate::domain::services::{AuthVariant, RequestAuthorizer};

/// Everything about a request other than its path.
///
/// The client forwards all of it untouched, apart from setting
/// `Authorization` on protected paths.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// HTTP method.
    pub method: Method,
    /// Caller headers; `Authorization` is replaced on protected paths.
    pub headers: HeaderMap,
    /// Query pairs appended to the URL.
    pub query: Vec<(String, String)>,
    /// Raw request body.
    pub body: Option<Vec<u8>>,
    /// Per-request timeout.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    /// Options for a bodyless request.
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Sets a header, replacing any previous value.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Appends a query pair.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the raw body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serializes `value` as the JSON body.
    ///
    /// `Content-Type` is only set when the caller has not set one.
    ///
    /// # Errors
    /// Returns error if `value` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, ClientError> {
        let body = serde_json::to_vec(value).map_err(|e| ClientError::encoding(e.to_string()))?;
        self.headers
            .entry(CONTENT_TYPE)
            .or_insert(HeaderValue::from_static("application/json"));
        self.body = Some(body);
        Ok(self)
    }

    /// Encodes `fields` as an `application/x-www-form-urlencoded` body.
    #[must_use]
    pub fn form(mut self, fields: &FormMap) -> Self {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields.iter())
            .finish();
        self.headers
            .entry(CONTENT_TYPE)
            .or_insert(HeaderValue::from_static("application/x-www-form-urlencoded"));
        self.body = Some(body.into_bytes());
        self
    }
}

/// HTTP client that attaches the credential to protected requests.
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    authorizer: RequestAuthorizer,
    tokens: Arc<TokenStore>,
    transport: Arc<dyn HttpTransportPort>,
}

impl ApiClient {
    /// Creates a client attaching the credential from `tokens` per `variant`.
    #[must_use]
    pub fn new(
        base_url: Url,
        variant: AuthVariant,
        tokens: Arc<TokenStore>,
        transport: Arc<dyn HttpTransportPort>,
    ) -> Self {
        Self {
            base_url,
            authorizer: RequestAuthorizer::new(variant),
            tokens,
            transport,
        }
    }

    /// Backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Active authorization rule.
    #[must_use]
    pub fn auth_variant(&self) -> AuthVariant {
        self.authorizer.variant()
    }

    /// Credential store shared with the facade.
    #[must_use]
    pub fn tokens(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    /// Builds the request for `path` with the authorization rule applied.
    ///
    /// `path` is matched against the allowlist exactly as given, then
    /// resolved against the base URL.
    ///
    /// # Errors
    /// Returns error if the URL cannot be resolved or the credential cannot be
    /// encoded as a header value.
    pub fn prepare(&self, path: &str, options: RequestOptions) -> Result<Request, ClientError> {
        let RequestOptions {
            method,
            mut headers,
            query,
            body,
            timeout,
        } = options;

        let decision = self
            .authorizer
            .authorize(path, &self.tokens.token(), &mut headers)
            .map_err(|e| ClientError::invalid_header(format!("authorization: {e}")))?;

        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ClientError::invalid_url(path, e))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        debug!(%method, path, ?decision, "Prepared request");

        let mut request = Request::new(method, url);
        *request.headers_mut() = headers;
        *request.body_mut() = body.map(Body::from);
        *request.timeout_mut() = timeout;

        Ok(request)
    }

    /// Sends a request and returns the transport's response unchanged.
    ///
    /// # Errors
    /// Returns error if the request cannot be built or the transport fails.
    pub async fn fetch(&self, path: &str, options: RequestOptions) -> Result<Response, ClientError> {
        let request = self.prepare(path, options)?;
        Ok(self.transport.execute(request).await?)
    }

    /// Sends `GET path`.
    ///
    /// # Errors
    /// See [`ApiClient::fetch`].
    pub async fn get(&self, path: &str) -> Result<Response, ClientError> {
        self.fetch(path, RequestOptions::new(Method::GET)).await
    }

    /// Sends `DELETE path`.
    ///
    /// # Errors
    /// See [`ApiClient::fetch`].
    pub async fn delete(&self, path: &str) -> Result<Response, ClientError> {
        self.fetch(path, RequestOptions::new(Method::DELETE)).await
    }

    /// Sends `POST path` with a JSON body.
    ///
    /// # Errors
    /// See [`ApiClient::fetch`].
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Response, ClientError> {
        self.fetch(path, RequestOptions::new(Method::POST).json(body)?)
            .await
    }

    /// Sends `PUT path` with a JSON body.
    ///
    /// # Errors
    /// See [`ApiClient::fetch`].
    pub async fn put_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Response, ClientError> {
        self.fetch(path, RequestOptions::new(Method::PUT).json(body)?)
            .await
    }

    /// Sends `PATCH path` with a JSON body.
    ///
    /// # Errors
    /// See [`ApiClient::fetch`].
    pub async fn patch_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Response, ClientError> {
        self.fetch(path, RequestOptions::new(Method::PATCH).json(body)?)
            .await
    }

    /// Sends `POST path` with a url-encoded form body.
    ///
    /// # Errors
    /// See [`ApiClient::fetch`].
    pub async fn post_form(&self, path: &str, fields: &FormMap) -> Result<Response, ClientError> {
        self.fetch(path, RequestOptions::new(Method::POST).form(fields))
            .await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("variant", &self.authorizer.variant())
            .finish_non_exhaustive()
    }
}
