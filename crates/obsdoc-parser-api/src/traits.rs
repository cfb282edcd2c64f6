use crate::{config::ParserConfig, errors::ParserError, metrics::ParserMetrics, unit::SourceUnit};
use std::fs;
use std::path::Path;

/// Core trait that all source parsers must implement
///
/// A parser reduces one file to the [`SourceUnit`] structure: declared types
/// with their names in every form, nested types, enum constants with their
/// per-constant methods, raw supertype strings and imports.
///
/// # Thread Safety
/// Implementations must be `Send + Sync`; the index builder parses files in
/// parallel.
pub trait SourceParser: Send + Sync {
    /// Returns the language identifier (lowercase, e.g., "java")
    fn language(&self) -> &str;

    /// Returns supported file extensions (e.g., [".java"])
    fn file_extensions(&self) -> &[&str];

    /// Parse a single file
    ///
    /// **Note on Metrics**: This method updates parser metrics.
    ///
    /// # Errors
    /// Returns `ParserError` if the file cannot be read, is larger than the
    /// configured maximum, or cannot be parsed.
    fn parse_file(&self, path: &Path) -> Result<SourceUnit, ParserError> {
        let metadata = fs::metadata(path).map_err(|e| ParserError::IoError(path.to_path_buf(), e))?;

        if metadata.len() as usize > self.config().max_file_size {
            return Err(ParserError::FileTooLarge(
                path.to_path_buf(),
                metadata.len() as usize,
            ));
        }

        let source =
            fs::read_to_string(path).map_err(|e| ParserError::IoError(path.to_path_buf(), e))?;
        self.parse_source(&source, path)
    }

    /// Parse source code held in memory
    ///
    /// **Note on Metrics**: This method does NOT update parser metrics.
    ///
    /// # Arguments
    /// * `source` - Source code string
    /// * `file_path` - Logical path for this source (used for the primary type lookup)
    fn parse_source(&self, source: &str, file_path: &Path) -> Result<SourceUnit, ParserError>;

    /// Check if this parser can handle the given file
    ///
    /// Default implementation checks file extension.
    fn can_parse(&self, path: &Path) -> bool {
        if let Some(ext) = path.extension() {
            let ext_str = format!(".{}", ext.to_string_lossy());
            self.file_extensions().contains(&ext_str.as_str())
        } else {
            false
        }
    }

    /// Get parser configuration
    fn config(&self) -> &ParserConfig;

    /// Get accumulated metrics
    fn metrics(&self) -> ParserMetrics;

    /// Reset metrics
    fn reset_metrics(&mut self);
}
