//! Shared test fixtures
//!
//! An in-memory transport serving scripted responses, plus client
//! construction helpers.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use bqstream::client::{
    ApiRequest, ApiResponse, ClientConfig, HttpTransport, QueryClient, StaticTokenProvider,
    TransportError,
};

/// Transport that serves a scripted sequence of responses and records
/// every request it sees.
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<ApiResponse, TransportError>>>,
    requests: Mutex<Vec<ApiRequest>>,
    bearers: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new(responses: Vec<Result<ApiResponse, TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
            bearers: Mutex::new(Vec::new()),
        })
    }

    /// Scripts a sequence of 200 responses with the given JSON bodies.
    pub fn ok(bodies: &[&str]) -> Arc<Self> {
        Self::new(bodies.iter().map(|body| Ok(status(200, body))).collect::<Vec<_>>())
    }

    /// Number of requests the transport has served
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Copy of the i-th recorded request
    pub fn request_at(&self, index: usize) -> ApiRequest {
        self.requests.lock().unwrap()[index].clone()
    }

    /// Bearer token presented with the i-th request
    pub fn bearer_at(&self, index: usize) -> String {
        self.bearers.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: ApiRequest, bearer: &str) -> Result<ApiResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.bearers.lock().unwrap().push(bearer.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("transport called past end of script")
    }
}

/// Builds a response with the given status and body
pub fn status(status: u16, body: &str) -> ApiResponse {
    ApiResponse {
        status,
        body: body.as_bytes().to_vec(),
    }
}

/// Builds a client over the mock transport with fixed test credentials
pub fn test_client(transport: Arc<MockTransport>) -> QueryClient {
    let config = ClientConfig::new("test_project", "test_dataset")
        .with_base_url("http://bigquery.test/v2");
    QueryClient::new(
        transport,
        Arc::new(StaticTokenProvider::new("test-token")),
        config,
    )
}
