//! # obsdoc-java
//!
//! Java parser for obsdoc - reduces Java source files to the structure the
//! documentation extractor reads.
//!
//! ## Features
//!
//! - Types with qualified (`a.Outer$Inner`), canonical and simple names
//! - Nested types, enum constants and their per-constant methods
//! - Accessor bodies classified into literal shapes (`return "x";`, `Foo.class`,
//!   `X.values()`, `merge(A.values(), B.values())`, ...)
//! - Raw supertype strings, imports (static / wildcard) and javadoc text
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use obsdoc_java::JavaParser;
//! use obsdoc_parser_api::SourceParser;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let parser = JavaParser::new();
//!
//! let unit = parser.parse_file(Path::new("HttpDocumentation.java"))?;
//! println!("Parsed {} types", unit.type_count());
//! # Ok(())
//! # }
//! ```

mod extractor;
mod parser_impl;
mod visitor;

// Re-export parser-api types for convenience
pub use obsdoc_parser_api::{ParserConfig, ParserError, ParserMetrics, SourceParser, SourceUnit};

// Export the Java parser implementation
pub use parser_impl::JavaParser;
