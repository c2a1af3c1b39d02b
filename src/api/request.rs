//! API request types
//!
//! The JSON envelope posted to the query endpoint. Legacy SQL is never
//! used; the compiler emits standard SQL.

use serde::Serialize;

/// Query request envelope
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub query: String,
    pub use_legacy_sql: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
}

impl QueryRequest {
    /// Builds a standard-SQL query envelope
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            use_legacy_sql: false,
            max_results: None,
            dry_run: None,
        }
    }

    /// Caps the number of rows returned per page
    pub fn with_max_results(mut self, max_results: u64) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// Marks the request as a dry run (cost estimate only, no execution)
    pub fn dry_run(mut self) -> Self {
        self.dry_run = Some(true);
        self
    }
}
