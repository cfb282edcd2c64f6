//! End-to-end tests running the generator over Java source trees

use obsdoc::render::AdocKind;
use obsdoc::{
    create_renderers, write_all, ConventionKind, DocsError, DocsGenerator, DocumentationSet,
    GeneratorConfig, MeterType, OutputFormat, OverrideRef, Renderer, ViolationKind,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/project")
}

fn generate(config: GeneratorConfig) -> obsdoc::Result<DocumentationSet> {
    DocsGenerator::new(config).generate()
}

fn fixture_set() -> DocumentationSet {
    generate(GeneratorConfig::new(fixture_root())).unwrap()
}

fn write_tree(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (path, source) in files {
        let path = dir.path().join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, source).unwrap();
    }
    dir
}

fn generate_tree(files: &[(&str, &str)]) -> obsdoc::Result<DocumentationSet> {
    let dir = write_tree(files);
    generate(GeneratorConfig::new(dir.path()))
}

fn key_names(keys: &[obsdoc::KeyNameEntry]) -> Vec<&str> {
    keys.iter().map(|k| k.name.as_str()).collect()
}

#[test]
fn test_fixture_metrics() {
    let set = fixture_set();

    let order: Vec<_> = set.metrics.iter().map(|m| m.enum_name.as_str()).collect();
    assert_eq!(order, vec!["CLIENT", "GETS", "SERVER"]);

    let client = set.metric("CLIENT").unwrap();
    assert_eq!(client.name.as_deref(), Some("http.client.requests"));
    assert_eq!(client.meter_type, MeterType::Timer);
    assert!(client.observation);
    assert_eq!(
        client.enclosing_class,
        "com.example.http.HttpObservationDocumentation"
    );
    assert_eq!(client.description, "Exchange performed by the HttpClient.");
    assert_eq!(key_names(&client.low_cardinality_keys), vec!["http.method", "http.status"]);
    assert_eq!(key_names(&client.high_cardinality_keys), vec!["http.uri"]);
    assert!(client.low_cardinality_keys[0].required);
    assert!(!client.low_cardinality_keys[1].required);
    assert_eq!(client.events.len(), 1);
    assert_eq!(client.events[0].name, "headers.sent");
    assert_eq!(client.events[0].contextual_name, "headers sent");

    let gets = set.metric("GETS").unwrap();
    assert_eq!(gets.meter_type, MeterType::Counter);
    assert!(!gets.observation);
    assert_eq!(gets.base_unit.as_deref(), Some("operations"));
    assert_eq!(key_names(&gets.low_cardinality_keys), vec!["cache.name", "cache.result"]);
    assert_eq!(gets.low_cardinality_keys[0].enclosing_class, "com.example.cache.CacheKeys");
}

#[test]
fn test_fixture_convention_named_metric() {
    let set = fixture_set();
    let server = set.metric("SERVER").unwrap();

    assert_eq!(server.name, None);
    assert_eq!(
        server.convention_class.as_deref(),
        Some("com.example.http.DefaultServerConvention")
    );
    assert_eq!(
        server.name_from_convention_class.as_deref(),
        Some("http.server.requests")
    );
    assert_eq!(
        server.description,
        "Request handled by the server.\n\nThe name comes from the convention."
    );
    assert_eq!(
        key_names(&server.low_cardinality_keys),
        vec!["http.method", "http.route", "http.status"]
    );
}

#[test]
fn test_fixture_spans() {
    let set = fixture_set();

    let order: Vec<_> = set.spans.iter().map(|s| s.enum_name.as_str()).collect();
    assert_eq!(order, vec!["CLIENT", "KAFKA_SEND", "SERVER"]);

    let client = set.span("CLIENT").unwrap();
    assert_eq!(client.contextual_name.as_deref(), Some("http client"));
    assert_eq!(
        key_names(&client.tag_keys),
        vec!["http.method", "http.status", "http.uri"]
    );

    // The base enum only serves as an override source
    assert!(set.span("SEND").is_none());
    assert!(set
        .spans
        .iter()
        .all(|s| s.enclosing_class != "com.example.messaging.BaseSpanDocumentation"));

    let kafka = set.span("KAFKA_SEND").unwrap();
    assert_eq!(
        kafka.overrides_default_span_from,
        Some(OverrideRef::new(
            "com.example.messaging.BaseSpanDocumentation",
            "SEND"
        ))
    );
    assert_eq!(
        key_names(&kafka.tag_keys),
        vec!["messaging.destination", "messaging.system"]
    );
}

#[test]
fn test_fixture_conventions() {
    let set = fixture_set();

    assert_eq!(set.conventions.len(), 2);
    let server = &set.conventions[0];
    assert_eq!(server.class_name, "com.example.http.DefaultServerConvention");
    assert_eq!(server.kind, ConventionKind::Global);
    assert_eq!(server.context_class_name, "com.example.http.ServerContext");

    let kafka = &set.conventions[1];
    assert_eq!(kafka.class_name, "com.example.messaging.KafkaConvention");
    assert_eq!(kafka.kind, ConventionKind::Local);
    assert_eq!(
        kafka.context_class_name,
        "com.example.messaging.KafkaConvention.KafkaContext"
    );
}

#[test]
fn test_parallel_run_matches_sequential() {
    let sequential = fixture_set();
    let parallel = generate(
        GeneratorConfig::new(fixture_root())
            .with_parallel(true)
            .with_num_threads(3),
    )
    .unwrap();

    assert_eq!(parallel, sequential);
}

#[test]
fn test_inclusion_pattern_limits_scanned_files() {
    let set = generate(
        GeneratorConfig::new(fixture_root()).with_inclusion_pattern(".*/cache/.*"),
    )
    .unwrap();

    assert_eq!(set.metrics.len(), 1);
    assert_eq!(set.metrics[0].enum_name, "GETS");
    assert!(set.spans.is_empty());
    assert!(set.conventions.is_empty());
}

#[test]
fn test_missing_root_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = generate(GeneratorConfig::new(dir.path().join("missing")));
    assert!(matches!(result, Err(DocsError::Walk { .. })));
}

const ENUM_LEVEL_METHOD: &str = r#"
package app;

import io.micrometer.tracing.docs.SpanDocumentation;

public enum BrokenSpans implements SpanDocumentation {

    /** A span. */
    CALL {
        @Override
        public String getName() {
            return "call";
        }
    };

    @Override
    public String getContextualName() {
        return "shared";
    }
}
"#;

#[test]
fn test_enum_level_method_is_fatal() {
    match generate_tree(&[("app/BrokenSpans.java", ENUM_LEVEL_METHOD)]) {
        Err(DocsError::EnumLevelMethod { class, methods }) => {
            assert_eq!(class, "app.BrokenSpans");
            assert_eq!(methods, vec!["getContextualName"]);
        }
        other => panic!("expected an enum-level method error, got {other:?}"),
    }
}

const INVALID_ENTRIES: &str = r#"
package app;

import io.micrometer.common.docs.KeyName;
import io.micrometer.tracing.docs.SpanDocumentation;

public enum InvalidSpans implements SpanDocumentation {

    /** Declares both a name and a convention. */
    BOTH {
        public String getName() { return "both"; }
        public Class<? extends ObservationConvention<? extends Observation.Context>> getDefaultConvention() {
            return SomeConvention.class;
        }
    },

    /** Declares no name at all. */
    NEITHER {
        public String getPrefix() { return ""; }
    },

    UNDOCUMENTED {
        public String getName() { return "undocumented"; }
    },

    /** Keys outside the prefix. */
    PREFIXED {
        public String getName() { return "prefixed"; }
        public String getPrefix() { return "app."; }
        public KeyName[] getKeyNames() { return Tags.values(); }
    };

    enum Tags implements KeyName {
        /** Inside. */
        INSIDE { public String asString() { return "app.inside"; } },
        /** Outside. */
        OUTSIDE { public String asString() { return "other.outside"; } },
        /** Also outside. */
        ELSEWHERE { public String asString() { return "elsewhere"; } }
    }
}
"#;

#[test]
fn test_validation_reports_every_violation() {
    let error = generate_tree(&[("app/InvalidSpans.java", INVALID_ENTRIES)]).unwrap_err();

    let DocsError::Validation(violations) = &error else {
        panic!("expected a validation error, got {error:?}");
    };
    let kinds: Vec<_> = violations
        .iter()
        .map(|v| (v.constant.as_str(), &v.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("BOTH", &ViolationKind::BothNameAndConvention),
            ("NEITHER", &ViolationKind::NeitherNameNorConvention),
            ("UNDOCUMENTED", &ViolationKind::EmptyDescription),
            (
                "PREFIXED",
                &ViolationKind::InvalidPrefix {
                    prefix: "app.".into(),
                    keys: vec!["elsewhere".into(), "other.outside".into()],
                }
            ),
        ]
    );

    let message = error.to_string();
    assert!(message.starts_with("Found 4 invalid documented entries"));
    assert!(message.contains("app.InvalidSpans.PREFIXED"));
    assert!(message.contains("[elsewhere, other.outside]"));
}

const CYCLE_A: &str = r#"
package app;

import io.micrometer.tracing.docs.SpanDocumentation;

public enum FirstSpans implements SpanDocumentation {
    /** First. */
    FIRST {
        public String getName() { return "first"; }
        public SpanDocumentation overridesDefaultSpanFrom() { return SecondSpans.SECOND; }
    }
}
"#;

const CYCLE_B: &str = r#"
package app;

import io.micrometer.tracing.docs.SpanDocumentation;

public enum SecondSpans implements SpanDocumentation {
    /** Second. */
    SECOND {
        public String getName() { return "second"; }
        public SpanDocumentation overridesDefaultSpanFrom() { return FirstSpans.FIRST; }
    }
}
"#;

#[test]
fn test_override_cycle_is_fatal() {
    match generate_tree(&[
        ("app/FirstSpans.java", CYCLE_A),
        ("app/SecondSpans.java", CYCLE_B),
    ]) {
        Err(DocsError::OverrideCycle { chain }) => {
            assert_eq!(chain.len(), 3);
            assert_eq!(chain.first(), chain.last());
        }
        other => panic!("expected an override cycle, got {other:?}"),
    }
}

const BASE_METRICS: &str = r#"
package app.base;

import io.micrometer.common.docs.KeyName;
import io.micrometer.core.instrument.Meter;
import io.micrometer.core.instrument.docs.MeterDocumentation;

public enum BaseMetrics implements MeterDocumentation {
    /** Base. */
    BASE {
        public String getName() { return "base"; }
        public Meter.Type getType() { return Meter.Type.TIMER; }
        public KeyName[] getKeyNames() { return BaseKeys.values(); }
    };

    public enum BaseKeys implements KeyName {
        /** One. */
        ONE { public String asString() { return "one"; } },
        /** Two. */
        TWO { public String asString() { return "two"; } }
    }
}
"#;

const CUSTOM_METRICS: &str = r#"
package app.custom;

import static app.base.BaseMetrics.BASE;

import app.base.BaseMetrics;
import io.micrometer.common.docs.KeyName;
import io.micrometer.core.instrument.docs.MeterDocumentation;

public enum CustomMetrics implements MeterDocumentation {
    /** Inherits the base keys and adds one. */
    INHERITING {
        public String getName() { return "custom.inheriting"; }
        public MeterDocumentation overridesDefaultMetricFrom() { return BASE; }
        public KeyName[] getAdditionalKeyNames() { return Extra.values(); }
    },

    /** Declares its own keys. */
    OWN {
        public String getName() { return "custom.own"; }
        public MeterDocumentation overridesDefaultMetricFrom() { return BaseMetrics.BASE; }
        public KeyName[] getKeyNames() { return Extra.values(); }
    };

    enum Extra implements KeyName {
        /** Extra. */
        EXTRA { public String asString() { return "extra"; } }
    }
}
"#;

#[test]
fn test_override_inherits_keys_and_unions_additional() {
    let set = generate_tree(&[
        ("app/base/BaseMetrics.java", BASE_METRICS),
        ("app/custom/CustomMetrics.java", CUSTOM_METRICS),
    ])
    .unwrap();

    let order: Vec<_> = set.metrics.iter().map(|m| m.enum_name.as_str()).collect();
    assert_eq!(order, vec!["INHERITING", "OWN"]);

    let inheriting = set.metric("INHERITING").unwrap();
    assert_eq!(
        inheriting.overrides_default_metric_from,
        Some(OverrideRef::new("app.base.BaseMetrics", "BASE"))
    );
    assert_eq!(
        key_names(&inheriting.low_cardinality_keys),
        vec!["extra", "one", "two"]
    );

    let own = set.metric("OWN").unwrap();
    assert_eq!(key_names(&own.low_cardinality_keys), vec!["extra"]);
}

const KEY_HOLDER: &str = r#"
package app.keys;

import io.micrometer.common.docs.KeyName;

public class Holder {
    public enum Keys implements KeyName {
        /** Shared. */
        SHARED { public String asString() { return "shared"; } }
    }
}
"#;

const NAME_FORMS: &str = r#"
package app;

import app.keys.Holder;
import io.micrometer.tracing.docs.SpanDocumentation;

public enum FormSpans implements SpanDocumentation {
    /** Simple nested form. */
    NESTED {
        public String getName() { return "nested"; }
        public KeyName[] getKeyNames() { return Holder.Keys.values(); }
    },

    /** Fully qualified form. */
    QUALIFIED {
        public String getName() { return "qualified"; }
        public KeyName[] getKeyNames() { return app.keys.Holder.Keys.values(); }
    }
}
"#;

#[test]
fn test_reference_forms_resolve_to_the_same_keys() {
    let set = generate_tree(&[
        ("app/keys/Holder.java", KEY_HOLDER),
        ("app/FormSpans.java", NAME_FORMS),
    ])
    .unwrap();

    for span in &set.spans {
        assert_eq!(key_names(&span.tag_keys), vec!["shared"], "{}", span.enum_name);
        assert_eq!(span.tag_keys[0].enclosing_class, "app.keys.Holder.Keys");
    }
}

#[test]
fn test_files_with_syntax_errors_are_skipped() {
    let set = generate_tree(&[
        ("app/FormSpans.java", NAME_FORMS),
        ("app/keys/Holder.java", KEY_HOLDER),
        ("app/Broken.java", "package app; public class Broken {"),
    ])
    .unwrap();

    assert_eq!(set.spans.len(), 2);
}

#[test]
fn test_write_adoc_output() {
    let set = fixture_set();
    let output = tempfile::tempdir().unwrap();

    let written = write_all(&set, &create_renderers(OutputFormat::Adoc), output.path()).unwrap();
    assert_eq!(written.len(), 3);

    let metrics = fs::read_to_string(output.path().join("_metrics.adoc")).unwrap();
    assert!(metrics.contains("==== Client"));
    assert!(metrics.contains("**Metric name** `http.client.requests`. **Type** `timer`."));
    assert!(metrics.contains("`http.client.requests.active`"));
    assert!(metrics.contains("**Metric name** `cache.gets`. **Type** `counter`."));
    assert!(metrics.contains("(defined by convention class `com.example.http.DefaultServerConvention`)"));

    let spans = fs::read_to_string(output.path().join("_spans.adoc")).unwrap();
    assert!(spans.contains("==== Kafka Send Span"));
    assert!(!spans.contains("==== Send Span"));

    let conventions = fs::read_to_string(output.path().join("_conventions.adoc")).unwrap();
    assert!(conventions.contains("|`com.example.http.DefaultServerConvention`|`com.example.http.ServerContext`"));
}

#[test]
fn test_write_json_output() {
    let set = fixture_set();
    let output = tempfile::tempdir().unwrap();

    write_all(&set, &create_renderers(OutputFormat::Json), output.path()).unwrap();

    let json = fs::read_to_string(output.path().join("obsdoc.json")).unwrap();
    let parsed: DocumentationSet = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, set);
}

#[test]
fn test_single_renderer() {
    let renderer = obsdoc::render::AsciiDocRenderer::new(AdocKind::Conventions);
    let output = renderer.render(&fixture_set()).unwrap();
    assert!(output.contains(".ObservationConvention implementations"));
}
