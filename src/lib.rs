//! bqstream - A streaming connector for Google BigQuery
//!
//! Compiles structured select queries to SQL, executes them over a
//! pluggable HTTP transport, and exposes multi-page results as one
//! lazy, pull-based row stream.

pub mod api;
pub mod client;
pub mod query;
pub mod stream;
