//! Query client
//!
//! Orchestrates compilation, transport, decoding and pagination for
//! the three public operations: query execution (paginated or
//! dry-run), table listing, and field listing. Each call owns its own
//! paginated source; nothing is shared across concurrent invocations
//! apart from the transport and credential collaborators.

use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::{self, Stream};
use tracing::debug;

use super::config::ClientConfig;
use super::transport::{ApiRequest, ApiResponse, HttpTransport, TokenProvider};
use crate::api::decode::{self, FieldInfo, Row, TableInfo};
use crate::api::errors::{snippet, QueryError, QueryResult};
use crate::api::request::QueryRequest;
use crate::api::response::{QueryResponse, TableGetResponse, TableListResponse};
use crate::query::{compile, SelectQuery};
use crate::stream::pages::{row_stream, Page, PageFetcher};

/// Boxed lazy row sequence returned by `execute_query`
pub type RowStream = Pin<Box<dyn Stream<Item = QueryResult<Row>> + Send>>;

/// Client for one project/dataset pair
#[derive(Clone)]
pub struct QueryClient {
    transport: Arc<dyn HttpTransport>,
    tokens: Arc<dyn TokenProvider>,
    config: ClientConfig,
}

impl QueryClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        tokens: Arc<dyn TokenProvider>,
        config: ClientConfig,
    ) -> Self {
        Self {
            transport,
            tokens,
            config,
        }
    }

    /// Executes a select query and returns its lazy row stream.
    ///
    /// With `dry_run` set, performs a single non-paginated fetch and
    /// returns the synthetic two-row cost estimate instead. Transport
    /// and decode failures during pagination surface as stream items
    /// after any rows already produced.
    pub async fn execute_query(&self, query: &SelectQuery, dry_run: bool) -> QueryResult<RowStream> {
        let sql = compile(query);
        debug!(%sql, dry_run, "executing query");

        if dry_run {
            let envelope = QueryRequest::new(sql).dry_run();
            let response = self
                .send(ApiRequest::post(self.queries_url(), encode_body(&envelope)?))
                .await?;
            if !response.is_success() {
                return Err(status_error(&response));
            }
            let decoded: QueryResponse = decode::parse_body(&response.body)?;
            let rows = decode::dry_run_rows(&decoded);
            return Ok(Box::pin(stream::iter(
                rows.into_iter().map(Ok::<_, QueryError>),
            )));
        }

        let mut envelope = QueryRequest::new(sql);
        if let Some(max) = self.config.max_results {
            envelope = envelope.with_max_results(max);
        }
        let fetcher = QueryPageFetcher {
            client: self.clone(),
            request: envelope,
        };
        Ok(Box::pin(row_stream(fetcher)))
    }

    /// Lists the tables of the configured dataset, accumulating across
    /// listing pages.
    pub async fn list_tables(&self) -> QueryResult<Vec<TableInfo>> {
        let mut tables = Vec::new();
        let mut token: Option<String> = None;
        loop {
            let mut request = ApiRequest::get(self.tables_url());
            if let Some(t) = &token {
                request = request.with_param("pageToken", t.clone());
            }
            let response = self.send(request).await?;
            if !response.is_success() {
                return Err(status_error(&response));
            }
            let decoded: TableListResponse = decode::parse_body(&response.body)?;
            tables.extend(decode::table_infos(&decoded));
            match decoded.next_page_token {
                Some(t) => token = Some(t),
                None => break,
            }
        }
        debug!(count = tables.len(), "listed tables");
        Ok(tables)
    }

    /// Lists the fields of the named table. A 404 from the service
    /// becomes `QueryError::NotFound` carrying the table name.
    pub async fn list_fields(&self, table: &str) -> QueryResult<Vec<FieldInfo>> {
        let response = self
            .send(ApiRequest::get(format!("{}/{}", self.tables_url(), table)))
            .await?;
        if response.status == 404 {
            return Err(QueryError::NotFound(table.to_string()));
        }
        if !response.is_success() {
            return Err(status_error(&response));
        }
        let decoded: TableGetResponse = decode::parse_body(&response.body)?;
        decode::field_infos(&decoded, &response.body)
    }

    /// Sends one request with a fresh bearer token.
    async fn send(&self, request: ApiRequest) -> QueryResult<ApiResponse> {
        let bearer = self.tokens.bearer_token().await?;
        let response = self.transport.send(request, &bearer).await?;
        Ok(response)
    }

    fn queries_url(&self) -> String {
        format!(
            "{}/projects/{}/queries",
            self.config.base_url, self.config.project_id
        )
    }

    fn tables_url(&self) -> String {
        format!(
            "{}/projects/{}/datasets/{}/tables",
            self.config.base_url, self.config.project_id, self.config.dataset_id
        )
    }
}

fn encode_body(request: &QueryRequest) -> QueryResult<serde_json::Value> {
    serde_json::to_value(request)
        .map_err(|e| QueryError::Generic(format!("failed to encode request: {}", e)))
}

fn status_error(response: &ApiResponse) -> QueryError {
    QueryError::Generic(format!(
        "service returned status {}: {}",
        response.status,
        snippet(&response.body)
    ))
}

/// Continuation state threaded between query result pages
struct QueryCursor {
    job_id: String,
    token: String,
}

/// Page fetcher for the tabular query path: first page via POST, later
/// pages via GET against the job the first response named.
struct QueryPageFetcher {
    client: QueryClient,
    request: QueryRequest,
}

#[async_trait]
impl PageFetcher for QueryPageFetcher {
    type Cursor = QueryCursor;

    async fn fetch(&self, cursor: Option<QueryCursor>) -> QueryResult<Page<QueryCursor>> {
        let request = match &cursor {
            None => ApiRequest::post(self.client.queries_url(), encode_body(&self.request)?),
            Some(c) => {
                let mut request =
                    ApiRequest::get(format!("{}/{}", self.client.queries_url(), c.job_id))
                        .with_param("pageToken", c.token.clone());
                if let Some(max) = self.client.config.max_results {
                    request = request.with_param("maxResults", max.to_string());
                }
                request
            }
        };

        let response = self.client.send(request).await?;
        if !response.is_success() {
            return Err(status_error(&response));
        }
        let decoded: QueryResponse = decode::parse_body(&response.body)?;

        let columns = decode::page_columns(&decoded);
        let rows = decode::page_rows(&decoded);
        let job_id = decoded
            .job_reference
            .as_ref()
            .and_then(|j| j.job_id.clone())
            .or_else(|| cursor.map(|c| c.job_id));
        let next = match decoded.page_token {
            Some(token) => {
                let job_id = job_id.ok_or_else(|| {
                    QueryError::Decode("continuation token without job reference".into())
                })?;
                Some(QueryCursor { job_id, token })
            }
            None => None,
        };
        Ok(Page {
            columns,
            rows,
            next,
        })
    }
}
