//! Transport and credential seams
//!
//! The connector never speaks HTTP itself: the host application plugs
//! in an `HttpTransport` (and a `TokenProvider` for bearer
//! credentials), and the client describes each call as an
//! `ApiRequest`. Token refresh on expiry is the provider's contract.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::api::errors::QueryError;

/// Connection or HTTP-layer failure reported by a transport
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<TransportError> for QueryError {
    fn from(err: TransportError) -> Self {
        QueryError::Transport(err.0)
    }
}

/// HTTP method of an API request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One API request
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Full request URL, without a query string
    pub url: String,
    /// Query-string parameters
    pub params: Vec<(String, String)>,
    /// JSON body for POST requests
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Builds a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            params: Vec::new(),
            body: None,
        }
    }

    /// Builds a POST request with a JSON body
    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            params: Vec::new(),
            body: Some(body),
        }
    }

    /// Appends a query-string parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }
}

/// One API response, status plus raw body
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Returns true for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// External HTTP transport collaborator.
///
/// Implementations carry their own connection pooling and TLS; the
/// connector only supplies the request description and bearer token.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends one request, authorized with the given bearer token.
    async fn send(&self, request: ApiRequest, bearer: &str) -> Result<ApiResponse, TransportError>;
}

/// External bearer-credential collaborator.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns a currently valid bearer token, refreshing if expired.
    async fn bearer_token(&self) -> Result<String, TransportError>;
}

/// Token provider serving one fixed credential. Useful for service
/// environments that inject a long-lived token, and for tests.
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn bearer_token(&self) -> Result<String, TransportError> {
        Ok(self.token.clone())
    }
}
