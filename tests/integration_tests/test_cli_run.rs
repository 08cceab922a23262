// integration tests for the run command

use crate::common::*;
use std::path::{Path, PathBuf};

struct Fixture {
    dir: PathBuf,
    form: PathBuf,
    rules: PathBuf,
}

impl Fixture {
    fn new(prefix: &str, form: &serde_json::Value, rules: &serde_json::Value) -> Self {
        let dir = create_test_dir(&unique_test_name(prefix));
        let form = write_json(&dir, "form.json", form);
        let rules = write_json(&dir, "rules.json", rules);
        Self { dir, form, rules }
    }

    fn choice(prefix: &str) -> Self {
        Self::new(prefix, &choice_form(), &choice_rules())
    }

    /// `dcf run` with this fixture's files, extra args appended
    fn run(&self, mode: &str, extra: &[&str]) -> std::process::Output {
        let mut args = vec![
            mode,
            "run",
            "--form",
            path_str(&self.form),
            "--rules",
            path_str(&self.rules),
        ];
        args.extend(extra);
        run_dcf(&args)
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        cleanup_test_dir(&self.dir);
    }
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

// ============================================================================
// initial state
// ============================================================================

#[test]
fn test_run_initial_state_hides_field() {
    let fixture = Fixture::choice("run_initial");

    let output = fixture.run("--json", &[]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let json = json_output(&output);
    assert_eq!(json["result"]["rules"], 1);
    assert_eq!(json["result"]["interactions"], 0);

    let details = element(&json, "details");
    assert_eq!(details["hidden"], true);
    assert_eq!(details["required"], false);
    assert_eq!(details["interacted"], "false");
}

// ============================================================================
// interactions
// ============================================================================

#[test]
fn test_run_select_shows_and_requires() {
    let fixture = Fixture::choice("run_select_a");

    let output = fixture.run("--json", &["--set", "#choice=A", "--set", "#details=hello"]);
    let json = json_output(&output);

    let details = element(&json, "details");
    assert_eq!(details["hidden"], false);
    assert_eq!(details["required"], true);
    assert_eq!(details["value"], "hello");
    assert_eq!(details["interacted"], "true");
    assert_eq!(element(&json, "choice")["value"], "A");
}

#[test]
fn test_run_switching_away_clears() {
    let fixture = Fixture::choice("run_select_b");

    let output = fixture.run(
        "--json",
        &["--set", "#choice=A", "--set", "#details=hello", "--set", "#choice=B"],
    );
    let json = json_output(&output);

    let details = element(&json, "details");
    assert_eq!(details["hidden"], true);
    assert_eq!(details["required"], false);
    assert_eq!(details["value"], "");
}

#[test]
fn test_run_checkbox_group_in_order() {
    let form = serde_json::json!({
        "tag": "form",
        "children": [
            { "tag": "input", "attributes": { "type": "checkbox", "name": "extras", "value": "gift", "id": "gift" } },
            { "tag": "input", "attributes": { "type": "checkbox", "name": "extras", "value": "card", "id": "card" } },
            {
                "tag": "fieldset",
                "attributes": { "id": "gift-options" },
                "children": [
                    { "tag": "textarea", "attributes": { "id": "message" }, "text": "Happy birthday" }
                ]
            }
        ]
    });
    let rules = serde_json::json!({
        "rules": [{
            "trigger": { "selector": "[name=extras]", "value": ["gift", "card"] },
            "affected": { "block": "#gift-options", "fields": [{ "selector": "#message" }] },
            "hideOnEmpty": false
        }]
    });
    let fixture = Fixture::new("run_checkbox", &form, &rules);

    // empty group counts as shown
    let json = json_output(&fixture.run("--json", &[]));
    assert_eq!(element(&json, "gift-options")["hidden"], false);
    assert_eq!(element(&json, "message")["value"], "Happy birthday");

    // check then uncheck: shown, then empty again and still shown
    let json = json_output(&fixture.run("--json", &["--check", "#gift", "--uncheck", "#gift"]));
    assert_eq!(element(&json, "gift")["checked"], false);
    assert_eq!(element(&json, "gift-options")["hidden"], false);

    // uncheck then check keeps the box checked
    let json = json_output(&fixture.run("--json", &["--uncheck", "#card", "--check", "#card"]));
    assert_eq!(element(&json, "card")["checked"], true);
}

#[test]
fn test_run_text_output() {
    let fixture = Fixture::choice("run_text");

    let output = fixture.run("--no-json", &["--set", "#choice=A"]);
    let out = stdout(&output);

    assert!(output.status.success());
    assert!(out.contains("Installed 1 of 1 rule(s)"));
    let line = out
        .lines()
        .find(|l| l.starts_with("#details "))
        .expect("details line");
    assert!(line.contains("visible"));
    assert!(line.contains("required"));
}

#[test]
fn test_run_quiet_prints_nothing() {
    let fixture = Fixture::choice("run_quiet");

    let output = fixture.run("--quiet", &["--set", "#choice=A"]);

    assert!(output.status.success());
    assert!(stdout(&output).is_empty());
}

// ============================================================================
// failures
// ============================================================================

#[test]
fn test_run_bad_rule_reported_good_rule_applied() {
    let rules = serde_json::json!([
        {
            "trigger": { "selector": "#nope", "value": "A" },
            "affected": { "fields": [{ "selector": "#details" }] }
        },
        {
            "trigger": { "selector": "#choice", "value": "A" },
            "affected": { "fields": [{ "selector": "#details", "required": true }] }
        }
    ]);
    let fixture = Fixture::new("run_partial", &choice_form(), &rules);

    let output = fixture.run("--json", &["--set", "#choice=A"]);
    assert!(output.status.success());

    let json = json_output(&output);
    assert_eq!(json["result"]["rules"], 1);
    assert_eq!(json["result"]["failures"][0]["index"], 0);
    assert_eq!(json["result"]["failures"][0]["selector"], "#nope");
    assert_eq!(element(&json, "details")["required"], true);
}

#[test]
fn test_run_unknown_selector_suggests() {
    let fixture = Fixture::choice("run_suggest");

    let output = fixture.run("--json", &["--set", "#choise=A"]);
    let json = json_output(&output);

    assert_eq!(output.status.code(), Some(6));
    assert_eq!(json["error"]["code"], -32006);
    assert_eq!(json["error"]["data"]["suggestions"][0], "#choice");
}

#[test]
fn test_run_unknown_selector_text() {
    let fixture = Fixture::choice("run_suggest_text");

    let output = fixture.run("--no-json", &["--set", "#choise=A"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("did you mean #choice?"));
}

#[test]
fn test_run_check_requires_toggle() {
    let fixture = Fixture::choice("run_check_select");

    let output = fixture.run("--json", &["--check", "#choice"]);

    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_run_missing_form() {
    let fixture = Fixture::choice("run_missing_form");

    let output = run_dcf(&[
        "--json",
        "run",
        "--form",
        "/nonexistent/form.json",
        "--rules",
        path_str(&fixture.rules),
    ]);
    let json = json_output(&output);

    assert_eq!(output.status.code(), Some(7));
    assert!(json["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Failed to read form file"));
}

#[test]
fn test_run_empty_rules() {
    let fixture = Fixture::new("run_empty_rules", &choice_form(), &serde_json::json!([]));

    let output = fixture.run("--json", &[]);
    let json = json_output(&output);

    assert_eq!(output.status.code(), Some(5));
    assert!(json["error"]["message"]
        .as_str()
        .unwrap()
        .contains("no configuration provided"));
}

#[test]
fn test_run_verbose_logs_rule_installation() {
    let fixture = Fixture::choice("run_verbose");

    let output = fixture.run("--quiet", &["--verbose"]);

    assert!(output.status.success());
    assert!(stderr(&output).contains("installed rule on '#choice'"));
}
