//! AsciiDoc renderer.
//!
//! Produces the `_metrics.adoc`, `_spans.adoc` and `_conventions.adoc`
//! fragments meant to be included from a reference guide.

use super::Renderer;
use crate::entry::{
    ConventionKind, DocumentationSet, EventEntry, KeyNameEntry, MetricEntry,
    ObservationConventionEntry, SpanEntry,
};
use crate::error::Result;

/// Which fragment to render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdocKind {
    Metrics,
    Spans,
    Conventions,
}

pub struct AsciiDocRenderer {
    kind: AdocKind,
}

impl AsciiDocRenderer {
    pub fn new(kind: AdocKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> AdocKind {
        self.kind
    }
}

impl Renderer for AsciiDocRenderer {
    fn render(&self, set: &DocumentationSet) -> Result<String> {
        Ok(match self.kind {
            AdocKind::Metrics => render_metrics(&set.metrics),
            AdocKind::Spans => render_spans(&set.spans),
            AdocKind::Conventions => render_conventions(&set.conventions),
        })
    }

    fn file_name(&self) -> &str {
        match self.kind {
            AdocKind::Metrics => "_metrics.adoc",
            AdocKind::Spans => "_spans.adoc",
            AdocKind::Conventions => "_conventions.adoc",
        }
    }
}

fn render_metrics(metrics: &[MetricEntry]) -> String {
    let mut lines: Vec<String> = vec![
        "[[observability-metrics]]".into(),
        "=== Observability - Metrics".into(),
        String::new(),
        "Below you can find a list of all metrics declared by this project.".into(),
        String::new(),
    ];

    for metric in metrics {
        lines.push(format!("[[observability-metrics-{}]]", anchor(&metric.enum_name)));
        lines.push(format!("==== {}", title(&metric.enum_name)));
        lines.push(String::new());
        push_description(&mut lines, &metric.description);

        let name = display_name(
            "Metric",
            metric.name.as_deref(),
            metric.convention_class.as_deref(),
            metric.name_from_convention_class.as_deref(),
        );
        lines.push(format!("{} **Type** `{}`.", name, metric.meter_type));
        lines.push(String::new());

        if metric.observation {
            if let Some(active) = metric
                .name
                .as_deref()
                .or(metric.name_from_convention_class.as_deref())
            {
                lines.push(format!(
                    "**Metric name** `{}.active`. **Type** `long task timer`.",
                    active
                ));
                lines.push(String::new());
                lines.push(
                    "IMPORTANT: KeyValues that are added after starting the Observation might be missing from the *.active metrics."
                        .into(),
                );
                lines.push(String::new());
            }
        }

        if let Some(unit) = &metric.base_unit {
            lines.push(format!("**Base unit** `{}`.", unit));
            lines.push(String::new());
        }

        push_enclosing(&mut lines, &metric.enclosing_class);
        push_prefix(&mut lines, metric.prefix.as_deref());
        push_keys(&mut lines, "Low cardinality Keys", &metric.low_cardinality_keys);
        push_keys(&mut lines, "High cardinality Keys", &metric.high_cardinality_keys);
        push_events(&mut lines, &metric.events);
    }

    finish(lines)
}

fn render_spans(spans: &[SpanEntry]) -> String {
    let mut lines: Vec<String> = vec![
        "[[observability-spans]]".into(),
        "=== Observability - Spans".into(),
        String::new(),
        "Below you can find a list of all spans declared by this project.".into(),
        String::new(),
    ];

    for span in spans {
        lines.push(format!("[[observability-spans-{}]]", anchor(&span.enum_name)));
        lines.push(format!("==== {} Span", title(&span.enum_name)));
        lines.push(String::new());
        push_description(&mut lines, &span.description);

        lines.push(display_name(
            "Span",
            span.name.as_deref(),
            span.convention_class.as_deref(),
            span.name_from_convention_class.as_deref(),
        ));
        lines.push(String::new());

        if let Some(contextual) = &span.contextual_name {
            lines.push(format!("**Contextual name** `{}`.", contextual));
            lines.push(String::new());
        }

        push_enclosing(&mut lines, &span.enclosing_class);
        push_prefix(&mut lines, span.prefix.as_deref());
        push_keys(&mut lines, "Tag Keys", &span.tag_keys);
        push_events(&mut lines, &span.events);
    }

    finish(lines)
}

fn render_conventions(conventions: &[ObservationConventionEntry]) -> String {
    let mut lines: Vec<String> = vec![
        "[[observability-conventions]]".into(),
        "=== Observability - Conventions".into(),
        String::new(),
        "Below you can find a list of all `GlobalObservationConvention` and `ObservationConvention` declared by this project.".into(),
        String::new(),
    ];

    for (kind, header) in [
        (ConventionKind::Global, "GlobalObservationConvention"),
        (ConventionKind::Local, "ObservationConvention"),
    ] {
        let matching: Vec<_> = conventions.iter().filter(|c| c.kind == kind).collect();
        if matching.is_empty() {
            continue;
        }
        lines.push(format!(".{} implementations", header));
        lines.push("|===".into());
        lines.push(format!(
            "|{} Class Name | Applicable ObservationContext Class Name",
            header
        ));
        for convention in matching {
            lines.push(format!(
                "|`{}`|`{}`",
                convention.class_name, convention.context_class_name
            ));
        }
        lines.push("|===".into());
        lines.push(String::new());
    }

    finish(lines)
}

fn display_name(
    what: &str,
    name: Option<&str>,
    convention: Option<&str>,
    from_convention: Option<&str>,
) -> String {
    match (name, convention, from_convention) {
        (Some(name), _, _) if name.contains("%s") => format!(
            "**{} name** `{}` - since it contains `%s`, the name is dynamic and will be resolved at runtime.",
            what, name
        ),
        (Some(name), _, _) => format!("**{} name** `{}`.", what, name),
        (None, Some(convention), Some(resolved)) => format!(
            "**{} name** `{}` (defined by convention class `{}`).",
            what, resolved, convention
        ),
        (None, Some(convention), None) => format!(
            "**{} name** - since it's defined by convention class `{}`, the name is resolved at runtime.",
            what, convention
        ),
        (None, None, _) => format!("**{} name** - not declared.", what),
    }
}

fn push_description(lines: &mut Vec<String>, description: &str) {
    lines.push("____".into());
    lines.push(description.to_string());
    lines.push("____".into());
    lines.push(String::new());
}

fn push_enclosing(lines: &mut Vec<String>, class: &str) {
    lines.push(format!(
        "Fully qualified name of the enclosing class `{}`.",
        class
    ));
    lines.push(String::new());
}

fn push_prefix(lines: &mut Vec<String>, prefix: Option<&str>) {
    if let Some(prefix) = prefix.filter(|p| !p.is_empty()) {
        lines.push(format!(
            "IMPORTANT: All tags must be prefixed with `{}` prefix!",
            prefix
        ));
        lines.push(String::new());
    }
}

fn push_keys(lines: &mut Vec<String>, caption: &str, keys: &[KeyNameEntry]) {
    if keys.is_empty() {
        return;
    }
    lines.push(format!(".{}", caption));
    lines.push("[cols=\"a,a\", options=\"header\"]".into());
    lines.push("|===".into());
    lines.push("|Name | Description".into());
    for key in keys {
        let marker = if key.required { " _(required)_" } else { "" };
        lines.push(format!("|`{}`{}|{}", key.name, marker, cell(&key.description)));
    }
    lines.push("|===".into());
    lines.push(String::new());
}

fn push_events(lines: &mut Vec<String>, events: &[EventEntry]) {
    if events.is_empty() {
        return;
    }
    lines.push(".Event Values".into());
    lines.push("[cols=\"a,a\", options=\"header\"]".into());
    lines.push("|===".into());
    lines.push("|Name | Description".into());
    for event in events {
        let name = if event.contextual_name == event.name {
            format!("`{}`", event.name)
        } else {
            format!("`{}` (contextual name: `{}`)", event.name, event.contextual_name)
        };
        lines.push(format!("|{}|{}", name, cell(&event.description)));
    }
    lines.push("|===".into());
    lines.push(String::new());
}

fn finish(mut lines: Vec<String>) -> String {
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    let mut output = lines.join("\n");
    output.push('\n');
    output
}

/// `HTTP_CLIENT_CALL` -> `Http Client Call`
fn title(enum_name: &str) -> String {
    enum_name
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `HTTP_CLIENT_CALL` -> `http-client-call`
fn anchor(enum_name: &str) -> String {
    enum_name.to_lowercase().replace('_', "-")
}

fn cell(text: &str) -> String {
    text.replace('|', "\\|")
}
