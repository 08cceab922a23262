//! what dcf prints
//!
//! text for people, JSON-RPC 2.0 envelopes for scripts:
//! `{"jsonrpc":"2.0","result":..,"id":null}` on success and
//! `{"jsonrpc":"2.0","error":{"code","message","data"?},"id":null}` on failure.

use serde::Serialize;
use std::io::IsTerminal;

use crate::dom::memory::ElementSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Text,
    Json,
    /// nothing on stdout unless something fails
    Quiet,
}

impl OutputMode {
    /// `--quiet` beats `--json` beats `--no-json`; without flags a piped
    /// stdout gets JSON
    pub fn from_flags(json: bool, no_json: bool, quiet: bool) -> Self {
        match (quiet, json, no_json) {
            (true, _, _) => Self::Quiet,
            (false, true, _) => Self::Json,
            (false, false, true) => Self::Text,
            _ if std::io::stdout().is_terminal() => Self::Text,
            _ => Self::Json,
        }
    }

    pub fn is_json(&self) -> bool {
        *self == Self::Json
    }

    pub fn is_quiet(&self) -> bool {
        *self == Self::Quiet
    }
}

/// one JSON-RPC response line
#[derive(Serialize)]
struct Envelope<T: Serialize> {
    jsonrpc: &'static str,
    #[serde(flatten)]
    body: Body<T>,
    /// dcf answers no request, so always null
    id: Option<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum Body<T: Serialize> {
    Result(T),
    Error(RpcError),
}

impl<T: Serialize> Envelope<T> {
    fn new(body: Body<T>) -> Self {
        Self {
            jsonrpc: "2.0",
            body,
            id: None,
        }
    }

    fn print(&self) {
        if let Ok(line) = serde_json::to_string(self) {
            println!("{}", line);
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RpcError {
    /// `-32000 - exit code`, inside the range JSON-RPC leaves to applications
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ErrorData>,
}

#[derive(Debug, Serialize)]
pub struct ErrorData {
    /// close matches for a selector that found nothing
    pub suggestions: Vec<String>,
}

impl RpcError {
    pub fn new(exit_code: i32, message: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self {
            code: to_jsonrpc_code(exit_code),
            message: message.into(),
            data: (!suggestions.is_empty()).then_some(ErrorData { suggestions }),
        }
    }
}

fn to_jsonrpc_code(exit_code: i32) -> i32 {
    -32000 - exit_code
}

// ============================================================================
// Command results
// ============================================================================

/// `dcf run`
#[derive(Serialize)]
pub struct RunData {
    /// installed rule count
    pub rules: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FailureData>,
    pub interactions: usize,
    pub elements: Vec<ElementSnapshot>,
}

/// a rule that could not be installed
#[derive(Serialize)]
pub struct FailureData {
    pub index: usize,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
}

/// `dcf verify`
#[derive(Serialize)]
pub struct VerifyData {
    pub path: String,
    pub valid: bool,
    pub errors: Vec<String>,
}

// ============================================================================
// Printing
// ============================================================================

/// one line per element: label, visibility, required flag and value
pub fn format_element(element: &ElementSnapshot) -> String {
    let mut line = format!(
        "{:<28} {:<7}",
        element.label(),
        if element.hidden { "hidden" } else { "visible" }
    );
    if element.required {
        line.push_str(" required");
    }
    match element.checked {
        Some(checked) => line.push_str(if checked { " [x]" } else { " [ ]" }),
        None if matches!(element.tag.as_str(), "input" | "select" | "textarea") => {
            line.push_str(&format!(" value={:?}", element.value));
        }
        None => {}
    }
    line.trim_end().to_string()
}

pub fn print_json<T: Serialize>(data: &T) {
    Envelope::new(Body::Result(data)).print();
}

pub fn print_json_error(exit_code: i32, message: &str) {
    print_json_error_with_suggestions(exit_code, message, Vec::new());
}

pub fn print_json_error_with_suggestions(exit_code: i32, message: &str, suggestions: Vec<String>) {
    Envelope::<()>::new(Body::Error(RpcError::new(exit_code, message, suggestions))).print();
}
