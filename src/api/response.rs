//! API response types
//!
//! Wire-exact serde shapes for the `jobs.query`, `tables.list` and
//! `tables.get` responses. Every member the service may omit is
//! optional or defaulted, so partial envelopes decode rather than fail.

use serde::Deserialize;
use serde_json::Value;

/// Response to a query request (`jobs.query` / `jobs.getQueryResults`)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    /// Result schema; absent when the page carries no rows
    #[serde(default)]
    pub schema: Option<TableSchema>,
    /// Result rows; absent when the page carries no rows
    #[serde(default)]
    pub rows: Option<Vec<TableRow>>,
    /// Continuation token for the next page
    #[serde(default)]
    pub page_token: Option<String>,
    /// Identity of the job serving this result
    #[serde(default)]
    pub job_reference: Option<JobReference>,
    #[serde(default)]
    pub job_complete: Option<bool>,
    /// Stringified int64 on the wire
    #[serde(default)]
    pub total_bytes_processed: Option<Value>,
    #[serde(default)]
    pub cache_hit: Option<bool>,
}

/// Table schema metadata
#[derive(Debug, Clone, Deserialize)]
pub struct TableSchema {
    #[serde(default)]
    pub fields: Vec<SchemaField>,
}

/// One schema field descriptor
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaField {
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: Option<String>,
}

/// One result row: a list of cells under the `f` member
#[derive(Debug, Clone, Deserialize)]
pub struct TableRow {
    #[serde(default)]
    pub f: Vec<TableCell>,
}

/// One result cell: a single value under the `v` member
#[derive(Debug, Clone, Deserialize)]
pub struct TableCell {
    #[serde(default)]
    pub v: Value,
}

/// Job identity within the query response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReference {
    #[serde(default)]
    pub job_id: Option<String>,
}

/// Response to a dataset table listing (`tables.list`)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableListResponse {
    #[serde(default)]
    pub tables: Vec<ListedTable>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// One entry of a table listing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedTable {
    pub table_reference: ListedTableReference,
    /// Discriminator; equals `"VIEW"` for views
    #[serde(rename = "type", default)]
    pub table_type: Option<String>,
}

/// Table identity within a listing entry
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedTableReference {
    pub table_id: String,
}

/// Response to a table metadata fetch (`tables.get`)
#[derive(Debug, Clone, Deserialize)]
pub struct TableGetResponse {
    #[serde(default)]
    pub schema: Option<TableSchema>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_response_full_page() {
        let body = r#"{
            "schema": {"fields": [{"name": "A1"}, {"name": "A2"}]},
            "rows": [{"f": [{"v": "x"}, {"v": null}]}],
            "pageToken": "t1",
            "jobReference": {"jobId": "job_1"},
            "jobComplete": true
        }"#;
        let resp: QueryResponse = serde_json::from_str(body).unwrap();
        let schema = resp.schema.unwrap();
        assert_eq!(schema.fields[0].name, "A1");
        assert_eq!(resp.rows.unwrap()[0].f.len(), 2);
        assert_eq!(resp.page_token.as_deref(), Some("t1"));
        assert_eq!(
            resp.job_reference.unwrap().job_id.as_deref(),
            Some("job_1")
        );
    }

    #[test]
    fn test_query_response_empty_page() {
        let resp: QueryResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.schema.is_none());
        assert!(resp.rows.is_none());
        assert!(resp.page_token.is_none());
    }

    #[test]
    fn test_table_list_response() {
        let body = r#"{
            "tables": [
                {"tableReference": {"tableId": "orders"}, "type": "TABLE"},
                {"tableReference": {"tableId": "orders_v"}, "type": "VIEW"}
            ]
        }"#;
        let resp: TableListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.tables.len(), 2);
        assert_eq!(resp.tables[1].table_type.as_deref(), Some("VIEW"));
        assert!(resp.next_page_token.is_none());
    }

    #[test]
    fn test_empty_table_list_decodes() {
        let resp: TableListResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.tables.is_empty());
    }
}
