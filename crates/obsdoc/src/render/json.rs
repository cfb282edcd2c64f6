//! JSON renderer for tooling integration

use super::Renderer;
use crate::entry::DocumentationSet;
use crate::error::{DocsError, Result};

/// Serializes the whole documentation set
#[derive(Debug, Clone, Default)]
pub struct JsonRenderer {
    file_name: String,
}

impl JsonRenderer {
    pub fn new() -> Self {
        Self::with_file_name("obsdoc.json")
    }

    pub fn with_file_name(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }
}

impl Renderer for JsonRenderer {
    fn render(&self, set: &DocumentationSet) -> Result<String> {
        serde_json::to_string_pretty(set).map_err(|e| DocsError::render("json", e.to_string()))
    }

    fn file_name(&self) -> &str {
        &self.file_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::tests::{metric, span};
    use crate::entry::{ConventionKind, ObservationConventionEntry};

    #[test]
    fn test_render_json() {
        let set = DocumentationSet {
            metrics: vec![metric("CALL")],
            spans: vec![span("SEND")],
            conventions: vec![ObservationConventionEntry {
                class_name: "a.Convention".into(),
                kind: ConventionKind::Global,
                context_class_name: "a.Context".into(),
            }],
        };

        let output = JsonRenderer::new().render(&set).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["metrics"][0]["enum_name"], "CALL");
        assert_eq!(value["metrics"][0]["meter_type"], "Timer");
        assert_eq!(value["spans"][0]["name"], "send");
        assert_eq!(value["conventions"][0]["kind"], "Global");

        let parsed: DocumentationSet = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, set);
    }
}
