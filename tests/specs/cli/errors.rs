//! Error reporting specs

use crate::prelude::*;

#[test]
fn unknown_command_fails() {
    let project = Project::empty();

    project
        .tandem()
        .args(&["frobnicate"])
        .fails()
        .stderr_has("unrecognized subcommand");
}

#[test]
fn set_without_server_explains() {
    let project = Project::empty();

    project
        .tandem()
        .args(&["set", "prefs", "theme", "dark"])
        .fails()
        .stderr_has("is `tandem serve` running?");
}

#[test]
fn store_names_cannot_escape_the_data_dir() {
    let project = Project::empty();

    project
        .tandem()
        .args(&["get", "../prefs"])
        .fails()
        .stderr_has("invalid store name");
}

#[test]
fn explicit_config_must_exist() {
    let project = Project::empty();

    project
        .tandem()
        .args(&["--config", "/nonexistent/tandem.toml", "get", "prefs"])
        .fails()
        .stderr_has("failed to read");
}

#[test]
fn invalid_config_is_reported() {
    let project = Project::empty();
    project.file("tandem.toml", "[stores.prefs]\nautoload = true\n");

    project
        .tandem()
        .args(&["get", "prefs"])
        .fails()
        .stderr_has("tandem.toml");
}

#[test]
fn second_server_on_same_socket_fails() {
    let project = Project::empty();
    let _server = project.serve(&[]);

    project
        .tandem()
        .args(&["serve"])
        .fails()
        .stderr_has("already listening");
}
