use std::fs;
use tempfile::TempDir;

#[test]
fn every_command_runs_against_the_built_in_topology() {
    assert!(
        formwork::commands::validate::execute().is_ok(),
        "validate should accept the built-in topology"
    );
    assert!(
        formwork::commands::graph::execute(false).is_ok(),
        "graph should list the dependency edges"
    );
    assert!(
        formwork::commands::graph::execute(true).is_ok(),
        "graph --dot should render the DOT document"
    );
    assert!(
        formwork::commands::outputs::execute().is_ok(),
        "outputs should list the declared outputs"
    );
}

#[test]
fn synth_writes_the_template_where_asked() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("template.json");

    formwork::commands::synth::execute(Some(path.clone()), false).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert!(
        written.starts_with('{') && written.ends_with('\n'),
        "written template should be a newline-terminated JSON document"
    );
    assert!(
        written.contains("\"formatVersion\""),
        "written template should carry the format version"
    );
}

#[test]
fn synth_reports_the_failed_path_when_the_write_fails() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("missing").join("template.json");

    let err = formwork::commands::synth::execute(Some(path.clone()), true).unwrap_err();
    let message = err.to_string();
    assert!(
        message.contains("file system write operation failed"),
        "unexpected error: {message}"
    );
    assert!(
        message.contains("missing"),
        "error should name the failed path: {message}"
    );
}
