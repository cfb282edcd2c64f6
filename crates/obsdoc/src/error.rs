use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::validate::Violation;

/// Result type alias for documentation extraction
pub type Result<T> = std::result::Result<T, DocsError>;

/// Errors that abort a documentation run
///
/// Per-file parse failures are not represented here: they are logged and the
/// file is skipped. Everything below is fatal for the whole run.
#[derive(Error, Debug)]
pub enum DocsError {
    /// The inclusion pattern is not a valid regular expression
    #[error("Invalid inclusion pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    /// Invalid generator configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The source root cannot be walked
    #[error("Failed to walk source root {path}: {message}")]
    Walk { path: PathBuf, message: String },

    /// I/O error while writing output
    #[error("Failed to write {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    /// A documentation enum declares methods on the enum itself
    #[error(
        "Enum {class} declares method(s) [{}] on the enum itself; accessors must be \
         overridden per constant",
        .methods.join(", ")
    )]
    EnumLevelMethod { class: String, methods: Vec<String> },

    /// A mandatory accessor is missing or not a supported literal
    #[error("{class}.{constant} must implement {accessor}() returning a {expected}")]
    MissingAccessor {
        class: String,
        constant: String,
        accessor: String,
        expected: String,
    },

    /// A referenced enum does not implement the required marker interface
    #[error("{class}.{constant} references {reference}, which does not implement {marker}")]
    NotAMarker {
        class: String,
        constant: String,
        reference: String,
        marker: String,
    },

    /// Override references loop back on themselves
    #[error("Override cycle detected: {}", .chain.join(" -> "))]
    OverrideCycle { chain: Vec<String> },

    /// One or more entries violate the documentation invariants
    #[error("{}", format_violations(.0))]
    Validation(Vec<Violation>),

    /// An index handle no longer points at a declaration
    #[error("Internal error: {0}")]
    Internal(String),

    /// Rendering failed
    #[error("Failed to render {format} output: {message}")]
    Render { format: String, message: String },
}

impl DocsError {
    /// Create an InvalidPattern error
    pub fn invalid_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        DocsError::InvalidPattern {
            pattern: pattern.into(),
            source,
        }
    }

    /// Create a Walk error
    pub fn walk(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        DocsError::Walk {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an Io error
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        DocsError::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a MissingAccessor error
    pub fn missing_accessor(
        class: impl Into<String>,
        constant: impl Into<String>,
        accessor: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        DocsError::MissingAccessor {
            class: class.into(),
            constant: constant.into(),
            accessor: accessor.into(),
            expected: expected.into(),
        }
    }

    /// Create a NotAMarker error
    pub fn not_a_marker(
        class: impl Into<String>,
        constant: impl Into<String>,
        reference: impl Into<String>,
        marker: impl Into<String>,
    ) -> Self {
        DocsError::NotAMarker {
            class: class.into(),
            constant: constant.into(),
            reference: reference.into(),
            marker: marker.into(),
        }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        DocsError::Internal(message.into())
    }

    /// Create a Render error
    pub fn render(format: impl Into<String>, message: impl Into<String>) -> Self {
        DocsError::Render {
            format: format.into(),
            message: message.into(),
        }
    }
}

fn format_violations(violations: &[Violation]) -> String {
    let mut message = format!(
        "Found {} invalid documented entr{}:",
        violations.len(),
        if violations.len() == 1 { "y" } else { "ies" }
    );
    for violation in violations {
        message.push_str("\n\t");
        message.push_str(&violation.to_string());
    }
    message
}
