//! Default-key inheritance between documentation constants
//!
//! A constant can name another constant it overrides. When it declares no
//! keys of its own it documents the keys of that constant instead, and the
//! enum it overrides is dropped from the output.

use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

use crate::entry::{DocumentedEntry, MetricEntry, OverrideRef, SpanEntry};
use crate::error::{DocsError, Result};
use crate::extract::EntryExtractor;

/// Fail when following override references leads back to where it started.
///
/// Walks start from the smallest reference, so the reported chain is stable.
pub fn check_cycles<E: DocumentedEntry>(entries: &[E]) -> Result<()> {
    let edges: BTreeMap<OverrideRef, &OverrideRef> = entries
        .iter()
        .filter_map(|e| e.overrides().map(|target| (e.reference(), target)))
        .collect();

    let mut finished: HashSet<&OverrideRef> = HashSet::new();
    for start in edges.keys() {
        let mut chain: Vec<&OverrideRef> = vec![start];
        let mut current = start;

        while let Some(&next) = edges.get(current) {
            if let Some(position) = chain.iter().position(|node| *node == next) {
                let mut cycle: Vec<String> = chain[position..].iter().map(|n| n.to_string()).collect();
                cycle.push(next.to_string());
                return Err(DocsError::OverrideCycle { chain: cycle });
            }
            if finished.contains(next) {
                break;
            }
            chain.push(next);
            current = next;
        }
        finished.extend(chain);
    }
    Ok(())
}

/// Give overriding metrics without keys of their own the keys of their source
pub fn inherit_metric_keys(extractor: &EntryExtractor<'_>, metrics: &mut [MetricEntry]) -> Result<()> {
    check_cycles(metrics)?;
    for metric in metrics.iter_mut() {
        let Some(source) = metric.overrides_default_metric_from.clone() else {
            continue;
        };
        if metric.has_own_keys() {
            debug!(entry = %metric.reference(), "Keeping own keys despite override");
            continue;
        }

        let inherited = extractor.inherited_keys(&source)?;
        debug!(
            entry = %metric.reference(),
            source = %source,
            low = inherited.low_cardinality.len(),
            high = inherited.high_cardinality.len(),
            "Inherited metric keys"
        );
        metric.low_cardinality_keys = inherited.low_cardinality;
        metric.high_cardinality_keys = inherited.high_cardinality;
    }
    Ok(())
}

/// Give overriding spans without tags of their own the tags of their source
pub fn inherit_span_keys(extractor: &EntryExtractor<'_>, spans: &mut [SpanEntry]) -> Result<()> {
    check_cycles(spans)?;
    for span in spans.iter_mut() {
        let Some(source) = span.overrides_default_span_from.clone() else {
            continue;
        };
        if span.has_own_keys() {
            debug!(entry = %span.reference(), "Keeping own tags despite override");
            continue;
        }

        let inherited = extractor.inherited_keys(&source)?;
        span.tag_keys = inherited
            .low_cardinality
            .into_iter()
            .chain(inherited.high_cardinality)
            .collect();
        debug!(
            entry = %span.reference(),
            source = %source,
            tags = span.tag_keys.len(),
            "Inherited span tags"
        );
    }
    Ok(())
}

/// Drop entries of enums that only serve as override sources.
///
/// An enclosing class is removed when some entry overrides one of its
/// constants and none of its own entries overrides anything.
pub fn exclude_override_sources<E: DocumentedEntry>(entries: &mut Vec<E>) {
    let sources: HashSet<String> = entries
        .iter()
        .filter_map(|e| e.overrides())
        .map(|r| r.enclosing_class.clone())
        .collect();
    let overriding: HashSet<String> = entries
        .iter()
        .filter(|e| e.overrides().is_some())
        .map(|e| e.enclosing_class().to_string())
        .collect();

    let excluded: HashSet<String> = sources.difference(&overriding).cloned().collect();
    if excluded.is_empty() {
        return;
    }

    let before = entries.len();
    entries.retain(|e| !excluded.contains(e.enclosing_class()));
    info!(
        classes = excluded.len(),
        entries = before - entries.len(),
        "Excluded overridden documentation"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::tests::{key, metric, span};

    fn overriding(mut entry: SpanEntry, class: &str, target: (&str, &str)) -> SpanEntry {
        entry.enclosing_class = class.to_string();
        entry.overrides_default_span_from = Some(OverrideRef::new(target.0, target.1));
        entry
    }

    #[test]
    fn test_no_cycle() {
        let spans = vec![
            span("BASE"),
            overriding(span("CUSTOM"), "a.Custom", ("a.Docs", "BASE")),
        ];
        assert!(check_cycles(&spans).is_ok());
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let spans = vec![overriding(span("SELF"), "a.Docs", ("a.Docs", "SELF"))];
        match check_cycles(&spans) {
            Err(DocsError::OverrideCycle { chain }) => {
                assert_eq!(chain, vec!["a.Docs.SELF", "a.Docs.SELF"]);
            }
            other => panic!("expected a cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_two_step_cycle() {
        let spans = vec![
            overriding(span("X"), "a.A", ("a.B", "Y")),
            overriding(span("Y"), "a.B", ("a.A", "X")),
            overriding(span("Z"), "a.C", ("a.A", "X")),
        ];
        match check_cycles(&spans) {
            Err(DocsError::OverrideCycle { chain }) => {
                assert_eq!(chain, vec!["a.A.X", "a.B.Y", "a.A.X"]);
            }
            other => panic!("expected a cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_cycle_chain_ignores_entry_order() {
        let forward = vec![
            overriding(span("X"), "a.A", ("a.B", "Y")),
            overriding(span("Y"), "a.B", ("a.A", "X")),
        ];
        let backward: Vec<_> = forward.iter().rev().cloned().collect();

        let chain_of = |spans: &[SpanEntry]| match check_cycles(spans) {
            Err(DocsError::OverrideCycle { chain }) => chain,
            other => panic!("expected a cycle, got {other:?}"),
        };
        assert_eq!(chain_of(&forward), chain_of(&backward));
    }

    #[test]
    fn test_exclude_override_sources() {
        let mut base = span("BASE");
        base.tag_keys.push(key("a.one"));
        let mut spans = vec![
            base,
            span("OTHER_BASE"),
            overriding(span("CUSTOM"), "a.Custom", ("a.Docs", "BASE")),
            overriding(span("CHAINED"), "a.Chained", ("a.Custom", "CUSTOM")),
        ];

        exclude_override_sources(&mut spans);

        // a.Docs only serves as a source; a.Custom overrides something itself
        let left: Vec<_> = spans.iter().map(|s| s.enum_name.as_str()).collect();
        assert_eq!(left, vec!["CUSTOM", "CHAINED"]);
    }

    #[test]
    fn test_exclude_keeps_unrelated_entries() {
        let mut metrics = vec![metric("ONE"), metric("TWO")];
        exclude_override_sources(&mut metrics);
        assert_eq!(metrics.len(), 2);
    }
}
