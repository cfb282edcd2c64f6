use obsdoc_parser_api::ParserConfig;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{DocsError, Result};

/// Configuration for a documentation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Root directory of the source tree
    pub root: PathBuf,

    /// Regular expression a file's full path must match completely
    pub inclusion_pattern: String,

    /// Parse files and extract entries in parallel
    pub parallel: bool,

    /// Number of threads for parallel processing (None = use default)
    pub num_threads: Option<usize>,

    /// Settings handed to the source parser
    pub parser: ParserConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            inclusion_pattern: ".*".to_string(),
            parallel: false,
            num_threads: None,
            parser: ParserConfig::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn with_inclusion_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.inclusion_pattern = pattern.into();
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_num_threads(mut self, threads: usize) -> Self {
        self.num_threads = Some(threads);
        self
    }

    pub fn with_parser_config(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.num_threads == Some(0) {
            return Err(DocsError::InvalidConfig(
                "num_threads must be greater than 0".to_string(),
            ));
        }
        if self.parser.max_file_size == 0 {
            return Err(DocsError::InvalidConfig(
                "max_file_size must be greater than 0".to_string(),
            ));
        }
        self.compile_pattern().map(|_| ())
    }

    /// Compile the inclusion pattern anchored at both ends, so it has to
    /// match the whole path rather than a substring of it.
    pub fn compile_pattern(&self) -> Result<Regex> {
        Regex::new(&format!("^(?:{})$", self.inclusion_pattern))
            .map_err(|e| DocsError::invalid_pattern(&self.inclusion_pattern, e))
    }

    /// Thread pool for the parallel phases
    pub fn thread_pool(&self) -> Result<rayon::ThreadPool> {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(num_threads) = self.num_threads {
            builder = builder.num_threads(num_threads);
        }
        builder
            .build()
            .map_err(|e| DocsError::InvalidConfig(format!("Failed to create thread pool: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.inclusion_pattern, ".*");
        assert!(!config.parallel);
        assert!(config.num_threads.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = GeneratorConfig::new("/src")
            .with_inclusion_pattern(".*/docs/.*")
            .with_parallel(true)
            .with_num_threads(4);

        assert_eq!(config.root(), Path::new("/src"));
        assert_eq!(config.inclusion_pattern, ".*/docs/.*");
        assert!(config.parallel);
        assert_eq!(config.num_threads, Some(4));
    }

    #[test]
    fn test_pattern_matches_whole_path() {
        let config = GeneratorConfig::default().with_inclusion_pattern(".*/docs/.*Documentation\\.java");
        let pattern = config.compile_pattern().unwrap();

        assert!(pattern.is_match("/repo/src/docs/HttpDocumentation.java"));
        assert!(!pattern.is_match("/repo/src/docs/HttpDocumentation.java.bak"));
        assert!(!pattern.is_match("/repo/src/HttpDocumentation.java"));
    }

    #[test]
    fn test_invalid_pattern() {
        let config = GeneratorConfig::default().with_inclusion_pattern("(unclosed");
        assert!(matches!(
            config.compile_pattern(),
            Err(DocsError::InvalidPattern { .. })
        ));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_threads_rejected() {
        let config = GeneratorConfig::default().with_num_threads(0);
        assert!(matches!(config.validate(), Err(DocsError::InvalidConfig(_))));
    }
}
