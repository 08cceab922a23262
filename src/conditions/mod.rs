//! trigger conditions for conditional fields
//!
//! provides:
//! - equality operators: equal, notEqual
//! - numeric ordering: greaterThan, lessThan, greaterThanOrEqual, lessThanOrEqual
//! - string operators: contains, startsWith, endsWith
//! - single or multiple configured values (a match on any value counts)

mod eval;
mod types;

pub use eval::{evaluate, evaluate_any};
pub use types::{parse_float, Operator, TriggerValue, TriggerValues};
