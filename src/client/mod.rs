//! # Client Module
//!
//! The query client and the external-collaborator seams it depends on:
//! an HTTP transport and a bearer-token provider.

pub mod client;
pub mod config;
pub mod transport;

pub use client::{QueryClient, RowStream};
pub use config::ClientConfig;
pub use transport::{
    ApiRequest, ApiResponse, HttpTransport, Method, StaticTokenProvider, TokenProvider,
    TransportError,
};
