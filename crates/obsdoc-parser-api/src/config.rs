use serde::{Deserialize, Serialize};

/// Configuration for parser behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Maximum file size to parse (in bytes)
    /// Files larger than this will be skipped
    pub max_file_size: usize,

    /// Keep javadoc text on types, constants and methods
    pub include_docs: bool,

    /// Reject files whose syntax tree contains error nodes.
    /// When false, the recoverable parts of a broken file are still returned.
    pub strict: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024, // 10 MB
            include_docs: true,
            strict: false,
        }
    }
}

impl ParserConfig {
    /// Create config that skips javadoc collection
    pub fn fast() -> Self {
        Self {
            include_docs: false,
            ..Default::default()
        }
    }

    /// Set maximum file size
    pub fn with_max_file_size(mut self, size: usize) -> Self {
        self.max_file_size = size;
        self
    }

    /// Reject files with syntax errors
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}
