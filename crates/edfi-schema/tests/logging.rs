//! The global subscriber installs at most once per process, so these tests
//! only require repeated initialization to fail without panicking.

use edfi_schema::core::logging::{init_logging, LogFormat};
use std::str::FromStr;

#[test]
fn log_format_names() {
    assert_eq!(LogFormat::from_str(" Pretty ").unwrap(), LogFormat::Pretty);
    assert_eq!(LogFormat::from_str("JSON").unwrap(), LogFormat::Json);
    assert!(LogFormat::from_str("yaml").is_err());
    assert_eq!(LogFormat::variants(), &["compact", "pretty", "json"]);
}

#[test]
fn repeated_initialization_is_an_error_not_a_panic() {
    let _ = init_logging(Some("debug"), Some("compact"));
    assert!(init_logging(Some("info"), Some("json")).is_err());
}

#[test]
fn unknown_format_is_rejected_before_install() {
    let err = init_logging(Some("info"), Some("yaml")).unwrap_err();
    assert!(err.to_string().contains("Invalid log format"));
}

#[test]
fn analysis_runs_under_trace_logging() {
    let _ = init_logging(Some("trace"), Some("pretty"));
    let doc = serde_json::json!({ "components": { "schemas": {
        "A": { "properties": { "b": { "$ref": "#/components/schemas/Missing" } } }
    }}});
    let graph = edfi_schema::analyze(&doc);
    assert_eq!(graph.entity_count(), 1);
    assert_eq!(graph.relationship_count(), 0);
}
