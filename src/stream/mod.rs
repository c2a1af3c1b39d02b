//! # Stream Module
//!
//! Pull-based streaming stages: the paginated row source and the
//! selective-delay stage.

pub mod delay;
pub mod pages;

pub use delay::{fibonacci, selective_delay};
pub use pages::{row_stream, Page, PageFetcher};
