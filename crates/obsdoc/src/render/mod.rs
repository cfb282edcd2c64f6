//! Output formats for a [`DocumentationSet`]

pub mod adoc;
pub mod json;

use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::entry::DocumentationSet;
use crate::error::{DocsError, Result};

pub use adoc::{AsciiDocRenderer, AdocKind};
pub use json::JsonRenderer;

/// Renders a documentation set into one output file
pub trait Renderer: Send + Sync {
    fn render(&self, set: &DocumentationSet) -> Result<String>;

    /// Name of the file the output is written to
    fn file_name(&self) -> &str;
}

/// Output format selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// `_metrics.adoc`, `_spans.adoc` and `_conventions.adoc`
    Adoc,
    /// A single `obsdoc.json`
    Json,
}

/// The renderers producing a format
pub fn create_renderers(format: OutputFormat) -> Vec<Box<dyn Renderer>> {
    match format {
        OutputFormat::Adoc => vec![
            Box::new(AsciiDocRenderer::new(AdocKind::Metrics)),
            Box::new(AsciiDocRenderer::new(AdocKind::Spans)),
            Box::new(AsciiDocRenderer::new(AdocKind::Conventions)),
        ],
        OutputFormat::Json => vec![Box::new(JsonRenderer::new())],
    }
}

/// Render with every renderer and write the files into `output_dir`
pub fn write_all(
    set: &DocumentationSet,
    renderers: &[Box<dyn Renderer>],
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir).map_err(|e| DocsError::io(output_dir, e))?;

    let mut written = Vec::with_capacity(renderers.len());
    for renderer in renderers {
        let path = output_dir.join(renderer.file_name());
        let content = renderer.render(set)?;
        fs::write(&path, content).map_err(|e| DocsError::io(&path, e))?;
        info!(file = %path.display(), "Wrote documentation");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_renderers() {
        let names: Vec<_> = create_renderers(OutputFormat::Adoc)
            .iter()
            .map(|r| r.file_name().to_string())
            .collect();
        assert_eq!(names, vec!["_metrics.adoc", "_spans.adoc", "_conventions.adoc"]);
        assert_eq!(create_renderers(OutputFormat::Json)[0].file_name(), "obsdoc.json");
    }

    #[test]
    fn test_write_all_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("build/docs");

        let written = write_all(
            &DocumentationSet::default(),
            &create_renderers(OutputFormat::Adoc),
            &output,
        )
        .unwrap();

        assert_eq!(written.len(), 3);
        assert!(written.iter().all(|p| p.is_file()));
    }
}
