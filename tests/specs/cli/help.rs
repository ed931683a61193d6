//! Help and version specs

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    let project = Project::empty();

    project
        .tandem()
        .args(&["--help"])
        .passes()
        .stdout_has("serve")
        .stdout_has("get")
        .stdout_has("set")
        .stdout_has("watch")
        .stdout_has("--data-dir");
}

#[test]
fn version_is_printed() {
    let project = Project::empty();

    project
        .tandem()
        .args(&["--version"])
        .passes()
        .stdout_has("tandem");
}
