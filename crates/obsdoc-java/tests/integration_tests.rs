//! Integration tests for the Java parser

use obsdoc_java::JavaParser;
use obsdoc_parser_api::{Expr, MethodBody, SourceParser, TypeKind};
use std::path::Path;

const SAMPLE_DOCS: &str = include_str!("fixtures/sample_docs.java");

fn parse_sample() -> obsdoc_parser_api::SourceUnit {
    JavaParser::new()
        .parse_source(SAMPLE_DOCS, Path::new("JdbcObservationDocumentation.java"))
        .unwrap()
}

#[test]
fn test_sample_package_and_imports() {
    let unit = parse_sample();

    assert_eq!(unit.package.as_deref(), Some("com.example.jdbc"));
    assert_eq!(unit.imports.len(), 6);

    let statics: Vec<_> = unit.imports.iter().filter(|i| i.is_static).collect();
    assert_eq!(statics.len(), 1);
    assert_eq!(statics[0].name, "com.example.jdbc.ConnectionDocumentation.CONNECTION");
    assert_eq!(statics[0].simple_name(), "CONNECTION");
    assert!(!statics[0].is_wildcard);
}

#[test]
fn test_sample_primary_enum() {
    let unit = parse_sample();
    let docs = unit.primary().unwrap();

    assert_eq!(docs.kind, TypeKind::Enum);
    assert_eq!(docs.simple_name, "JdbcObservationDocumentation");
    assert_eq!(docs.interfaces, vec!["ObservationDocumentation"]);
    assert!(docs.methods.is_empty(), "enum-level methods must not be reported");
    assert!(docs
        .doc_comment
        .as_deref()
        .unwrap()
        .contains("Documented observations"));
}

#[test]
fn test_sample_constants() {
    let unit = parse_sample();
    let docs = unit.primary().unwrap();

    let names: Vec<_> = docs.constants.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["QUERY", "MARKER", "RESULT_SET"]);

    let query = &docs.constants[0];
    assert_eq!(query.methods.len(), 6);
    assert!(query
        .doc_comment
        .as_deref()
        .unwrap()
        .contains("JDBC connection takes place"));
    assert_eq!(
        query.method("getDefaultConvention").unwrap().body,
        MethodBody::Return(Expr::TypeReference("DefaultQueryConvention".into()))
    );
    assert_eq!(
        query.method("getLowCardinalityKeyNames").unwrap().body,
        MethodBody::Return(Expr::Collection(vec![
            "CommonKeys".into(),
            "QueryKeys".into()
        ]))
    );
    assert_eq!(
        query.method("getEvents").unwrap().body,
        MethodBody::Return(Expr::Collection(vec!["QueryEvents".into()]))
    );

    // A line comment between constants does not hide the marker constant
    assert!(docs.constants[1].methods.is_empty());

    let result_set = &docs.constants[2];
    assert_eq!(
        result_set.method("overridesDefaultSpanFrom").unwrap().body,
        MethodBody::Return(Expr::QualifiedName("CONNECTION".into()))
    );
}

#[test]
fn test_sample_nested_marker_enums() {
    let unit = parse_sample();
    let docs = unit.primary().unwrap();

    let nested: Vec<_> = docs.nested.iter().map(|t| t.simple_name.as_str()).collect();
    assert_eq!(
        nested,
        vec!["CommonKeys", "QueryKeys", "QueryHighKeys", "QueryEvents"]
    );

    let events = &docs.nested[3];
    assert_eq!(events.interfaces, vec!["Observation.Event"]);
    assert_eq!(
        events.canonical_name,
        "com.example.jdbc.JdbcObservationDocumentation.QueryEvents"
    );

    let driver = &docs.nested[1].constants[0];
    assert_eq!(
        driver.method("isRequired").unwrap().body,
        MethodBody::Return(Expr::Boolean(false))
    );
    assert_eq!(unit.type_count(), 5);
}

#[test]
fn test_parse_file_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("JdbcObservationDocumentation.java");
    std::fs::write(&path, SAMPLE_DOCS).unwrap();

    let parser = JavaParser::new();
    let unit = parser.parse_file(&path).unwrap();

    assert_eq!(unit.file_path, path);
    assert_eq!(unit.types.len(), 1);
    assert_eq!(parser.metrics().files_succeeded, 1);
    assert_eq!(parser.metrics().total_types, 5);
}

#[test]
fn test_unit_serializes_to_json() {
    let unit = parse_sample();
    let json = serde_json::to_value(&unit).unwrap();

    assert_eq!(json["package"], "com.example.jdbc");
    assert_eq!(json["types"][0]["kind"], "Enum");
}
