//! Changes flowing between processes through `tandem serve`

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn set_is_saved_by_the_server() {
    let project = Project::empty();
    let _server = project.serve(&["prefs"]);

    project
        .tandem()
        .args(&["set", "prefs", "theme", "dark"])
        .passes()
        .stdout_has("prefs.theme = \"dark\"");

    wait_for("prefs.json to be saved", || {
        project.exists("prefs.json") && project.json("prefs.json")["theme"] == "dark"
    });
}

#[test]
fn set_on_a_store_the_server_has_not_loaded() {
    let project = Project::empty();
    let _server = project.serve(&[]);

    project
        .tandem()
        .args(&["set", "prefs", "theme", "dark"])
        .passes();

    wait_for("prefs.json to be saved", || {
        project.exists("prefs.json") && project.json("prefs.json")["theme"] == "dark"
    });
}

#[test]
fn set_keeps_other_fields() {
    let project = Project::empty();
    project.file("prefs.json", r#"{ "theme": "dark", "zoom": 1 }"#);
    let _server = project.serve(&[]);

    project
        .tandem()
        .args(&["set", "prefs", "zoom", "2"])
        .passes();

    wait_for("zoom to change", || project.json("prefs.json")["zoom"] == 2);
    assert_eq!(
        project.json("prefs.json"),
        json!({ "theme": "dark", "zoom": 2 })
    );
}

#[test]
fn watcher_sees_changes_from_another_process() {
    let project = Project::empty();
    project.file("prefs.json", r#"{ "zoom": 1 }"#);
    let _server = project.serve(&[]);
    let mut watcher = project.watch("prefs", 1);
    assert_eq!(watcher.initial, json!({ "zoom": 1 }));

    project
        .tandem()
        .args(&["set", "prefs", "zoom", "5"])
        .passes();

    assert_eq!(watcher.next(), json!({ "zoom": 5 }));
    watcher.finish();
}

#[test]
fn get_reads_what_the_server_saved() {
    let project = Project::empty();
    let _server = project.serve(&["hotbar"]);

    project
        .tandem()
        .args(&["set", "hotbar", "items", r#"["a","b"]"#])
        .passes();
    wait_for("hotbar.json", || project.exists("hotbar.json"));

    let doc = project.tandem().args(&["get", "hotbar"]).passes().stdout_json();
    assert_eq!(doc, json!({ "items": ["a", "b"] }));
}
