//! End-to-end documentation run

use obsdoc_java::JavaParser;
use obsdoc_parser_api::SourceParser;
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info, instrument};

use crate::config::GeneratorConfig;
use crate::entry::{
    normalize_events, normalize_keys, DocumentationSet, MetricEntry, ObservationConventionEntry,
    SpanEntry,
};
use crate::error::Result;
use crate::extract::{EntryExtractor, Extracted};
use crate::index::{FileId, SourceIndex};
use crate::overrides;
use crate::scanner::MarkerScanner;
use crate::validate;

/// Runs every phase over a source tree
pub struct DocsGenerator<P: SourceParser = JavaParser> {
    config: GeneratorConfig,
    parser: P,
}

impl DocsGenerator<JavaParser> {
    pub fn new(config: GeneratorConfig) -> Self {
        let parser = JavaParser::with_config(config.parser.clone());
        Self { config, parser }
    }
}

impl<P: SourceParser> DocsGenerator<P> {
    pub fn with_parser(config: GeneratorConfig, parser: P) -> Self {
        Self { config, parser }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Index the tree, then extract, inherit, validate and sort
    #[instrument(skip(self), fields(root = %self.config.root.display()))]
    pub fn generate(&self) -> Result<DocumentationSet> {
        self.config.validate()?;
        let start = Instant::now();

        let index = SourceIndex::build(&self.config, &self.parser)?;
        let parsed = self.parser.metrics();
        debug!(
            files = parsed.files_attempted,
            failed = parsed.files_failed,
            types = parsed.total_types,
            constants = parsed.total_constants,
            unsupported_bodies = parsed.unsupported_bodies,
            avg_parse_us = parsed.avg_parse_time().as_micros() as u64,
            "Source index built"
        );

        let set = self.extract(&index)?;

        info!(
            metrics = set.metrics.len(),
            spans = set.spans.len(),
            conventions = set.conventions.len(),
            skipped_files = index.failed_files().len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Documentation extracted"
        );
        Ok(set)
    }

    /// Every phase after indexing
    pub fn extract(&self, index: &SourceIndex) -> Result<DocumentationSet> {
        let files: Vec<FileId> = index.file_ids().collect();
        let scanner = MarkerScanner::new(index);
        let extractor = EntryExtractor::new(index);

        let process = |file: &FileId| -> Result<(Extracted, Option<ObservationConventionEntry>)> {
            let mut extracted = Extracted::default();
            for candidate in scanner.scan(*file)? {
                extracted.merge(extractor.extract(&candidate)?);
            }
            Ok((extracted, scanner.scan_conventions(*file)?))
        };

        let partials = if self.config.parallel {
            self.config
                .thread_pool()?
                .install(|| files.par_iter().map(process).collect::<Result<Vec<_>>>())?
        } else {
            files.iter().map(process).collect::<Result<Vec<_>>>()?
        };

        let mut extracted = Extracted::default();
        let mut conventions = Vec::new();
        for (partial, convention) in partials {
            extracted.merge(partial);
            conventions.extend(convention);
        }

        finish(&extractor, extracted, conventions)
    }
}

/// Inherit override keys, drop override sources, normalize, validate and sort
pub fn finish(
    extractor: &EntryExtractor<'_>,
    extracted: Extracted,
    mut conventions: Vec<ObservationConventionEntry>,
) -> Result<DocumentationSet> {
    let Extracted {
        mut metrics,
        mut spans,
    } = extracted;

    overrides::inherit_metric_keys(extractor, &mut metrics)?;
    overrides::inherit_span_keys(extractor, &mut spans)?;
    overrides::exclude_override_sources(&mut metrics);
    overrides::exclude_override_sources(&mut spans);

    metrics.iter_mut().for_each(normalize_metric);
    spans.iter_mut().for_each(normalize_span);

    validate::validate_all(&metrics, &spans)?;

    metrics.sort_by(|a, b| {
        (&a.enum_name, &a.enclosing_class).cmp(&(&b.enum_name, &b.enclosing_class))
    });
    spans.sort_by(|a, b| {
        (&a.enum_name, &a.enclosing_class).cmp(&(&b.enum_name, &b.enclosing_class))
    });
    conventions.sort_by(|a, b| a.class_name.cmp(&b.class_name));

    Ok(DocumentationSet {
        metrics,
        spans,
        conventions,
    })
}

/// Additional keys join the low cardinality keys
fn normalize_metric(metric: &mut MetricEntry) {
    metric
        .low_cardinality_keys
        .extend(metric.additional_keys.iter().cloned());
    normalize_keys(&mut metric.low_cardinality_keys);
    normalize_keys(&mut metric.high_cardinality_keys);
    normalize_keys(&mut metric.additional_keys);
    normalize_events(&mut metric.events);
}

/// Additional keys join the tags
fn normalize_span(span: &mut SpanEntry) {
    span.tag_keys.extend(span.additional_keys.iter().cloned());
    normalize_keys(&mut span.tag_keys);
    normalize_keys(&mut span.additional_keys);
    normalize_events(&mut span.events);
}
