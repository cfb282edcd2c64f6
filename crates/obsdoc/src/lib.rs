//! # obsdoc
//!
//! Extracts observability documentation (metrics, spans, conventions) from
//! Java sources that describe them with documentation enums.
//!
//! ## Features
//!
//! - Index every type of a source tree, nested types included
//! - Resolve type references the way Java scoping does (nested, imports, package)
//! - Walk class hierarchies to find accessor implementations
//! - Read per-constant accessors into metric and span entries
//! - Inherit default keys through override references
//! - Report every invalid entry in one aggregated error
//! - Render AsciiDoc or JSON output
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use obsdoc::{DocsGenerator, GeneratorConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GeneratorConfig::new("src/main/java").with_inclusion_pattern(".*/observation/.*");
//! let set = DocsGenerator::new(config).generate()?;
//! println!("Documented {} metrics and {} spans", set.metrics.len(), set.spans.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod entry;
pub mod error;
pub mod extract;
pub mod hierarchy;
pub mod index;
pub mod marker;
pub mod overrides;
pub mod pipeline;
pub mod render;
pub mod resolve;
pub mod scanner;
pub mod validate;

pub use config::GeneratorConfig;
pub use entry::{
    ConventionKind, DocumentationSet, DocumentedEntry, EventEntry, KeyNameEntry, MeterType,
    MetricEntry, ObservationConventionEntry, OverrideRef, SpanEntry,
};
pub use error::{DocsError, Result};
pub use extract::{EntryExtractor, Extracted};
pub use hierarchy::HierarchyResolver;
pub use index::{FileId, SourceIndex, TypeId};
pub use marker::MarkerSpec;
pub use pipeline::DocsGenerator;
pub use render::{create_renderers, write_all, OutputFormat, Renderer};
pub use resolve::NameResolver;
pub use scanner::{Candidate, MarkerScanner};
pub use validate::{Violation, ViolationKind};

// Re-export parser-api types for convenience
pub use obsdoc_java::JavaParser;
pub use obsdoc_parser_api::{ParserConfig, ParserError, SourceParser};
