//! Client configuration

/// Connection settings for a query client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service base URL, without a trailing slash
    pub base_url: String,
    /// Billing project the queries run under
    pub project_id: String,
    /// Default dataset for table and field listings
    pub dataset_id: String,
    /// Per-page row cap sent with query requests
    pub max_results: Option<u64>,
}

impl ClientConfig {
    /// Creates a config against the public service endpoint
    pub fn new(project_id: impl Into<String>, dataset_id: impl Into<String>) -> Self {
        Self {
            base_url: "https://www.googleapis.com/bigquery/v2".to_string(),
            project_id: project_id.into(),
            dataset_id: dataset_id.into(),
            max_results: None,
        }
    }

    /// Overrides the service base URL (emulators, regional endpoints)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Caps rows per page
    pub fn with_max_results(mut self, max_results: u64) -> Self {
        self.max_results = Some(max_results);
        self
    }
}
