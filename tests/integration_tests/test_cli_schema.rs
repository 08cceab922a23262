// integration tests for schema, completions and help output

use crate::common::*;
use std::fs;

#[test]
fn test_schema_to_stdout() {
    let output = run_dcf(&["schema"]);

    assert!(output.status.success());
    let schema: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(schema["title"], "Conditional Fields Rules");
    assert!(schema["$defs"]["Rule"].is_object());
}

#[test]
fn test_schema_to_file() {
    let test_dir = create_test_dir(&unique_test_name("schema_file"));
    let path = test_dir.join("rules.schema.json");

    let output = run_dcf(&["--json", "schema", "--output", path.to_str().unwrap()]);
    let json = json_output(&output);

    assert!(output.status.success());
    assert!(json["result"]["path"].as_str().unwrap().ends_with("rules.schema.json"));
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("\"$defs\""));

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_completions_bash() {
    let output = run_dcf(&["completions", "bash"]);

    assert!(output.status.success());
    let script = stdout(&output);
    assert!(script.contains("dcf"));
    assert!(script.contains("verify"));
}

#[test]
fn test_completions_unknown_shell() {
    let output = run_dcf(&["completions", "cmd"]);
    assert!(!output.status.success());
}

#[test]
fn test_help_lists_commands() {
    let output = run_dcf(&["--help"]);
    let help = stdout(&output);

    assert!(output.status.success());
    for command in ["verify", "run", "schema", "completions"] {
        assert!(help.contains(command), "help should mention {}", command);
    }
}
