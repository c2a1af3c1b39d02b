//! # API Module
//!
//! Wire-level request/response shapes for the BigQuery v2 REST API,
//! decode/normalization into typed rows and listings, and the crate
//! error surface.

pub mod decode;
pub mod errors;
pub mod request;
pub mod response;

pub use decode::{FieldInfo, Row, TableInfo};
pub use errors::{QueryError, QueryResult};
