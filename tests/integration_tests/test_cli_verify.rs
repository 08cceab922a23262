// integration tests for the verify command

use crate::common::*;

#[test]
fn test_verify_valid_rules_text() {
    let test_dir = create_test_dir(&unique_test_name("verify_valid"));
    let rules = write_json(&test_dir, "rules.json", &choice_rules());

    let output = run_dcf(&["--no-json", "verify", "--rules", rules.to_str().unwrap()]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("✓ Rules are valid"));

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_verify_reports_each_problem() {
    let test_dir = create_test_dir(&unique_test_name("verify_invalid"));
    let rules = write_file(
        &test_dir,
        "rules.json5",
        r#"{
            // two broken rules
            rules: [
                { trigger: { selector: '#a', operator: 'like', value: 'x' }, affected: { block: 'div >' } },
                { trigger: { selector: '', value: [] }, affected: {} },
            ],
        }"#,
    );

    let output = run_dcf(&["--no-json", "verify", "--rules", rules.to_str().unwrap()]);
    let out = stdout(&output);

    assert!(!output.status.success());
    assert!(out.contains("✗ Rules have 5 error(s)"), "stdout: {}", out);
    assert!(out.contains("rules[0].trigger.operator: unknown operator 'like'"));
    assert!(out.contains("rules[0].affected.block: invalid selector 'div >'"));
    assert!(out.contains("rules[1].trigger.selector: selector is empty"));
    assert!(out.contains("rules[1].trigger.value: no values given"));
    assert!(out.contains("rules[1].affected: needs a block or at least one field"));
    assert!(stderr(&output).contains("rules validation failed"));

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_verify_json_output() {
    let test_dir = create_test_dir(&unique_test_name("verify_json"));
    let rules = write_json(&test_dir, "rules.json", &serde_json::json!([]));

    let output = run_dcf(&["--json", "verify", "--rules", rules.to_str().unwrap()]);
    let json = json_output(&output);

    assert_eq!(output.status.code(), Some(5));
    assert_eq!(json["jsonrpc"], "2.0");
    assert_eq!(json["result"]["valid"], false);
    assert_eq!(json["result"]["errors"][0], "rules: no rules defined");

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_verify_uses_env_var() {
    let test_dir = create_test_dir(&unique_test_name("verify_env"));
    let rules = write_json(&test_dir, "custom.json", &choice_rules());

    let output = run_dcf_with_env(
        &["--json", "verify"],
        &[("DCF_RULES", rules.to_str().unwrap())],
    );
    let json = json_output(&output);

    assert!(output.status.success());
    assert_eq!(json["result"]["valid"], true);
    assert!(json["result"]["path"].as_str().unwrap().ends_with("custom.json"));

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_verify_missing_file() {
    let output = run_dcf(&["--json", "verify", "--rules", "/nonexistent/rules.json5"]);
    let json = json_output(&output);

    assert_eq!(output.status.code(), Some(5));
    assert_eq!(json["error"]["code"], -32005);
    assert!(json["error"]["message"]
        .as_str()
        .unwrap()
        .contains("rules file not found"));
}

#[test]
fn test_verify_malformed_file_text() {
    let test_dir = create_test_dir(&unique_test_name("verify_malformed"));
    let rules = write_file(&test_dir, "rules.json5", "{ rules: [");

    let output = run_dcf(&["--no-json", "verify", "--rules", rules.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("invalid rules file"));

    cleanup_test_dir(&test_dir);
}
