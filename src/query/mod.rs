//! # Query Module
//!
//! Select-AST value types and the SQL text compiler.

pub mod ast;
pub mod compiler;

pub use ast::{FilterExpr, Projection, SelectQuery, TableRef};
pub use compiler::compile;
