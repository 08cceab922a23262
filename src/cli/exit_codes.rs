//! process exit codes, one per failure class so scripts can branch on them
//!
//! in JSON mode the same code appears as `-32000 - code` in the error object

/// command completed successfully
pub const SUCCESS: i32 = 0;

/// general or unknown error
pub const ERROR: i32 = 1;

/// invalid command-line arguments
pub const INVALID_ARGS: i32 = 4;

/// rules file missing, unreadable or invalid
pub const CONFIG_ERROR: i32 = 5;

/// an interaction targeted a selector with no match in the form
pub const SELECTOR_NOT_FOUND: i32 = 6;

/// form file missing or unreadable
pub const FORM_ERROR: i32 = 7;
