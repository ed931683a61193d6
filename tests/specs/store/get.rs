//! Reading stores from disk

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn missing_store_reads_as_empty_document() {
    let project = Project::empty();

    let doc = project.tandem().args(&["get", "prefs"]).passes().stdout_json();

    assert_eq!(doc, json!({}));
    assert!(!project.exists("prefs.json"), "get must not create the file");
}

#[test]
fn existing_document_is_printed() {
    let project = Project::empty();
    project.file("prefs.json", r#"{ "theme": "dark", "zoom": 2 }"#);

    let doc = project.tandem().args(&["get", "prefs"]).passes().stdout_json();

    assert_eq!(doc, json!({ "theme": "dark", "zoom": 2 }));
}

#[test]
fn data_dir_from_environment() {
    let project = Project::empty();
    project.file("prefs.json", r#"{ "zoom": 3 }"#);

    let output = std::process::Command::new(assert_cmd::cargo::cargo_bin("tandem"))
        .args(["get", "prefs"])
        .env("TANDEM_DATA_DIR", project.path())
        .env("TANDEM_LOG", "warn")
        .output()
        .unwrap();

    assert!(output.status.success());
    let doc: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc, json!({ "zoom": 3 }));
}

#[test]
fn corrupt_document_fails_load() {
    let project = Project::empty();
    project.file("prefs.json", "{ this is not json");

    project
        .tandem()
        .args(&["get", "prefs"])
        .fails()
        .stderr_has("failed to load store prefs")
        .stderr_has("corrupt store");
}

#[test]
fn non_object_document_is_corrupt() {
    let project = Project::empty();
    project.file("prefs.json", "[1, 2, 3]");

    project
        .tandem()
        .args(&["get", "prefs"])
        .fails()
        .stderr_has("corrupt store");
}
