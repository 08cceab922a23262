// shared utilities for integration tests

#![allow(dead_code)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::atomic::{AtomicUsize, Ordering};

// counter for unique test directory names
static TEST_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// create a unique test directory name
pub fn unique_test_name(prefix: &str) -> String {
    let count = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}_{}_{}", prefix, std::process::id(), count)
}

/// create a temporary directory for test files
pub fn create_test_dir(name: &str) -> PathBuf {
    let dir = env::temp_dir().join("dcf_integration_tests").join(name);

    // clean up if exists
    if dir.exists() {
        fs::remove_dir_all(&dir).ok();
    }

    fs::create_dir_all(&dir).expect("Failed to create test directory");
    dir
}

/// clean up a test directory
pub fn cleanup_test_dir(path: &Path) {
    if path.exists() {
        fs::remove_dir_all(path).ok();
    }
}

/// write `content` as pretty JSON into `dir/name`
pub fn write_json(dir: &Path, name: &str, content: &serde_json::Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(content).unwrap())
        .expect("Failed to write test file");
    path
}

/// write raw text into `dir/name`
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write test file");
    path
}

/// get path to the built dcf binary
pub fn dcf_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_dcf"))
}

/// run dcf with a clean environment and capture output
pub fn run_dcf(args: &[&str]) -> Output {
    run_dcf_with_env(args, &[])
}

/// run dcf command with custom environment
pub fn run_dcf_with_env(args: &[&str], env_vars: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(dcf_binary_path());
    cmd.args(args);
    cmd.env_remove("DCF_RULES");
    cmd.env_remove("RUST_LOG");

    for (key, value) in env_vars {
        cmd.env(key, value);
    }

    cmd.output().expect("Failed to run dcf")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// parse the single JSON-RPC line printed in JSON mode
pub fn json_output(output: &Output) -> serde_json::Value {
    serde_json::from_str(stdout(output).trim()).expect("stdout should be JSON")
}

/// find an element in a `dcf run --json` result by its id attribute
pub fn element<'a>(result: &'a serde_json::Value, id: &str) -> &'a serde_json::Value {
    result["result"]["elements"]
        .as_array()
        .expect("elements array")
        .iter()
        .find(|e| e["id"] == id)
        .unwrap_or_else(|| panic!("element #{} not in output", id))
}

/// select with options A/B and a required text input controlled by it
pub fn choice_form() -> serde_json::Value {
    serde_json::json!({
        "tag": "form",
        "children": [
            {
                "tag": "select",
                "attributes": { "id": "choice" },
                "children": [
                    { "tag": "option", "attributes": { "value": "" }, "text": "Pick one" },
                    { "tag": "option", "attributes": { "value": "A" }, "text": "A" },
                    { "tag": "option", "attributes": { "value": "B" }, "text": "B" }
                ]
            },
            {
                "tag": "div",
                "attributes": { "class": "form-group" },
                "children": [
                    { "tag": "label", "attributes": { "for": "details", "id": "details-label" }, "text": "Details" },
                    { "tag": "input", "attributes": { "id": "details", "type": "text" } }
                ]
            }
        ]
    })
}

pub fn choice_rules() -> serde_json::Value {
    serde_json::json!([
        {
            "trigger": { "selector": "#choice", "value": "A" },
            "affected": {
                "fields": [{ "selector": "#details", "required": true }]
            }
        }
    ])
}
