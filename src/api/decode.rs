//! Response decoding and cell normalization
//!
//! Turns wire envelopes into typed rows and listings. Every function is
//! total: malformed payloads come back as `QueryError::Decode` carrying
//! a bounded snippet, never as a panic.
//!
//! Cell normalization: JSON booleans become `"1"`/`"0"`, null stays
//! null, every other value becomes its textual form.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::errors::{QueryError, QueryResult};
use super::response::{QueryResponse, TableGetResponse, TableListResponse};

/// One logical result row: ordered, nullable text cells
pub type Row = Vec<Option<String>>;

/// One entry of a table listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub name: String,
    pub is_view: bool,
}

/// One entry of a field listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: String,
    pub field_type: String,
}

/// Discriminator value marking a listing entry as a view
const VIEW_MARKER: &str = "VIEW";

/// Parses a JSON body into a typed envelope, mapping failure to a
/// bounded decode error.
pub fn parse_body<T: DeserializeOwned>(body: &[u8]) -> QueryResult<T> {
    serde_json::from_slice(body)
        .map_err(|e| QueryError::decode_snippet(&format!("invalid response ({})", e), body))
}

/// Normalizes one cell value to nullable text.
pub fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some("0".to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        // Nested records/arrays keep their JSON text form
        other => Some(other.to_string()),
    }
}

/// Extracts the column names of a tabular page; empty when the page
/// carries no schema.
pub fn page_columns(resp: &QueryResponse) -> Vec<String> {
    resp.schema
        .as_ref()
        .map(|schema| schema.fields.iter().map(|f| f.name.clone()).collect())
        .unwrap_or_default()
}

/// Extracts and normalizes the data rows of a tabular page.
pub fn page_rows(resp: &QueryResponse) -> Vec<Row> {
    resp.rows
        .as_ref()
        .map(|rows| {
            rows.iter()
                .map(|row| row.f.iter().map(|cell| cell_text(&cell.v)).collect())
                .collect()
        })
        .unwrap_or_default()
}

/// Decodes a dry-run estimate into a synthetic two-row table:
/// a header row followed by the stringified estimate values.
pub fn dry_run_rows(resp: &QueryResponse) -> Vec<Row> {
    let header: Row = ["bytesScanned", "jobComplete", "cacheHit"]
        .iter()
        .map(|name| Some(name.to_string()))
        .collect();
    let data: Row = vec![
        resp.total_bytes_processed.as_ref().and_then(cell_text),
        resp.job_complete.map(flag_text),
        resp.cache_hit.map(flag_text),
    ];
    vec![header, data]
}

fn flag_text(flag: bool) -> String {
    if flag { "1" } else { "0" }.to_string()
}

/// Decodes a table listing page into typed entries.
pub fn table_infos(resp: &TableListResponse) -> Vec<TableInfo> {
    resp.tables
        .iter()
        .map(|table| TableInfo {
            name: table.table_reference.table_id.clone(),
            is_view: table.table_type.as_deref() == Some(VIEW_MARKER),
        })
        .collect()
}

/// Decodes a table metadata response into its field listing. A missing
/// schema is a decode failure, not an empty listing.
pub fn field_infos(resp: &TableGetResponse, body: &[u8]) -> QueryResult<Vec<FieldInfo>> {
    let schema = resp
        .schema
        .as_ref()
        .ok_or_else(|| QueryError::decode_snippet("table metadata has no schema", body))?;
    Ok(schema
        .fields
        .iter()
        .map(|field| FieldInfo {
            name: field.name.clone(),
            field_type: field.field_type.clone().unwrap_or_default(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_normalization() {
        assert_eq!(cell_text(&json!(null)), None);
        assert_eq!(cell_text(&json!(true)), Some("1".into()));
        assert_eq!(cell_text(&json!(false)), Some("0".into()));
        assert_eq!(cell_text(&json!("v1")), Some("v1".into()));
        assert_eq!(cell_text(&json!(42)), Some("42".into()));
        assert_eq!(cell_text(&json!(1.5)), Some("1.5".into()));
    }

    #[test]
    fn test_nested_cell_keeps_json_text() {
        assert_eq!(
            cell_text(&json!({"v": "inner"})),
            Some(r#"{"v":"inner"}"#.into())
        );
    }

    #[test]
    fn test_tabular_page_round_trip() {
        let body = br#"{
            "schema": {"fields": [{"name": "A1"}, {"name": "A2"}, {"name": "A3"}]},
            "rows": [
                {"f": [{"v": "v1"}, {"v": true}, {"v": true}]},
                {"f": [{"v": "v5"}, {"v": null}, {"v": false}]}
            ]
        }"#;
        let resp: QueryResponse = parse_body(body).unwrap();
        assert_eq!(page_columns(&resp), vec!["A1", "A2", "A3"]);
        assert_eq!(
            page_rows(&resp),
            vec![
                vec![Some("v1".into()), Some("1".into()), Some("1".into())],
                vec![Some("v5".into()), None, Some("0".into())],
            ]
        );
    }

    #[test]
    fn test_rowless_page_yields_nothing() {
        let resp: QueryResponse = parse_body(b"{\"jobComplete\": true}").unwrap();
        assert!(page_columns(&resp).is_empty());
        assert!(page_rows(&resp).is_empty());
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let err = parse_body::<QueryResponse>(b"{\"rows\": 7}").unwrap_err();
        match err {
            QueryError::Decode(msg) => assert!(msg.contains("{\"rows\": 7}")),
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_dry_run_synthetic_table() {
        let body = br#"{
            "totalBytesProcessed": "123456",
            "jobComplete": true,
            "cacheHit": false
        }"#;
        let resp: QueryResponse = parse_body(body).unwrap();
        assert_eq!(
            dry_run_rows(&resp),
            vec![
                vec![
                    Some("bytesScanned".into()),
                    Some("jobComplete".into()),
                    Some("cacheHit".into())
                ],
                vec![Some("123456".into()), Some("1".into()), Some("0".into())],
            ]
        );
    }

    #[test]
    fn test_table_listing_view_marker() {
        let body = br#"{
            "tables": [
                {"tableReference": {"tableId": "orders"}, "type": "TABLE"},
                {"tableReference": {"tableId": "orders_v"}, "type": "VIEW"},
                {"tableReference": {"tableId": "untyped"}}
            ]
        }"#;
        let resp: TableListResponse = parse_body(body).unwrap();
        assert_eq!(
            table_infos(&resp),
            vec![
                TableInfo { name: "orders".into(), is_view: false },
                TableInfo { name: "orders_v".into(), is_view: true },
                TableInfo { name: "untyped".into(), is_view: false },
            ]
        );
    }

    #[test]
    fn test_field_listing() {
        let body = br#"{
            "schema": {"fields": [
                {"name": "id", "type": "INTEGER"},
                {"name": "name", "type": "STRING"}
            ]}
        }"#;
        let resp: TableGetResponse = parse_body(body).unwrap();
        assert_eq!(
            field_infos(&resp, body).unwrap(),
            vec![
                FieldInfo { name: "id".into(), field_type: "INTEGER".into() },
                FieldInfo { name: "name".into(), field_type: "STRING".into() },
            ]
        );
    }

    #[test]
    fn test_field_listing_without_schema_fails() {
        let resp: TableGetResponse = parse_body(b"{}").unwrap();
        assert!(matches!(
            field_infos(&resp, b"{}"),
            Err(QueryError::Decode(_))
        ));
    }
}
