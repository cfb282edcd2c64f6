//! Implementation of the SourceParser trait for Java

use obsdoc_parser_api::{ParserConfig, ParserError, ParserMetrics, SourceParser, SourceUnit};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::extractor;

/// Java language parser implementing the SourceParser trait
pub struct JavaParser {
    config: ParserConfig,
    metrics: Mutex<ParserMetrics>,
}

impl JavaParser {
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            metrics: Mutex::new(ParserMetrics::default()),
        }
    }

    fn lock_metrics(&self) -> MutexGuard<'_, ParserMetrics> {
        self.metrics.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn update_metrics(&self, parsed: Option<&SourceUnit>, duration: Duration) {
        let mut metrics = self.lock_metrics();
        metrics.files_attempted += 1;
        match parsed {
            Some(unit) => {
                metrics.files_succeeded += 1;
                metrics.record_unit(unit);
            }
            None => metrics.files_failed += 1,
        }
        metrics.total_parse_time += duration;
    }
}

impl Default for JavaParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceParser for JavaParser {
    fn language(&self) -> &str {
        "java"
    }

    fn file_extensions(&self) -> &[&str] {
        &[".java"]
    }

    fn parse_file(&self, path: &Path) -> Result<SourceUnit, ParserError> {
        let start = Instant::now();
        let result = fs::metadata(path)
            .map_err(|e| ParserError::IoError(path.to_path_buf(), e))
            .and_then(|metadata| {
                if metadata.len() as usize > self.config.max_file_size {
                    Err(ParserError::FileTooLarge(
                        path.to_path_buf(),
                        metadata.len() as usize,
                    ))
                } else {
                    fs::read_to_string(path)
                        .map_err(|e| ParserError::IoError(path.to_path_buf(), e))
                }
            })
            .and_then(|source| self.parse_source(&source, path));

        self.update_metrics(result.as_ref().ok(), start.elapsed());

        result
    }

    fn parse_source(&self, source: &str, file_path: &Path) -> Result<SourceUnit, ParserError> {
        extractor::extract(source, file_path, &self.config)
    }

    fn config(&self) -> &ParserConfig {
        &self.config
    }

    fn metrics(&self) -> ParserMetrics {
        self.lock_metrics().clone()
    }

    fn reset_metrics(&mut self) {
        *self.lock_metrics() = ParserMetrics::default();
    }
}
