//! obsdoc Parser API
//!
//! Shared trait and types for building obsdoc source parsers.
//!
//! A parser turns one file's bytes into a [`SourceUnit`]: the structural view of
//! the declared types that the documentation extractor needs. It defines:
//!
//! - **SourceParser trait**: The interface every language parser implements
//! - **Unit types**: Types, nested types, enum constants, single-statement methods
//! - **Expressions**: The closed set of literal shapes a marker accessor may return
//! - **Configuration**: Customizable parser behavior
//! - **Metrics**: Performance and success tracking
//! - **Error handling**: Per-file error types
//!
//! # Example
//!
//! ```rust,ignore
//! use obsdoc_parser_api::{SourceParser, ParserConfig, ParserError, SourceUnit};
//! use std::path::Path;
//!
//! struct MyParser {
//!     config: ParserConfig,
//! }
//!
//! impl SourceParser for MyParser {
//!     fn language(&self) -> &str {
//!         "mylang"
//!     }
//!
//!     fn file_extensions(&self) -> &[&str] {
//!         &[".my"]
//!     }
//!
//!     fn parse_source(&self, source: &str, file_path: &Path) -> Result<SourceUnit, ParserError> {
//!         todo!()
//!     }
//!
//!     fn config(&self) -> &ParserConfig {
//!         &self.config
//!     }
//!
//!     fn metrics(&self) -> ParserMetrics {
//!         ParserMetrics::default()
//!     }
//!
//!     fn reset_metrics(&mut self) {}
//! }
//! ```

pub mod config;
pub mod errors;
pub mod expr;
pub mod metrics;
pub mod traits;
pub mod unit;

// Re-export commonly used types
pub use config::ParserConfig;
pub use errors::{ParserError, ParserResult};
pub use expr::{Expr, MethodBody};
pub use metrics::ParserMetrics;
pub use traits::SourceParser;
pub use unit::{
    strip_generics, EnumConstant, ImportDecl, MethodDecl, SourceUnit, TypeDecl, TypeKind,
};
