// library crate for conditional fields
// the rule engine plus the modules the dcf binaries need

pub mod cli;
pub mod conditions;
pub mod config;
pub mod dom;
pub mod error;
pub mod field;
pub mod rule;
pub mod setup;
pub mod styles;

pub use conditions::{Operator, TriggerValue, TriggerValues};
pub use config::{AffectedConfig, AffectedFieldConfig, RuleConfig, TriggerConfig};
pub use error::{Error, Result};
pub use field::{create_field, Field, FieldKind, FieldSpec, ParentSelector};
pub use rule::ConditionalField;
pub use setup::{setup_conditional_fields, Setup};
