//! batch installation of rules

use std::rc::Rc;

use crate::config::RuleConfig;
use crate::dom::Document;
use crate::error::{Error, Result};
use crate::rule::ConditionalField;

/// outcome of [`setup_conditional_fields`]
#[derive(Debug, Default)]
pub struct Setup {
    rules: Vec<Rc<ConditionalField>>,
    failures: Vec<Error>,
}

impl Setup {
    /// rules that were installed, in configuration order
    pub fn rules(&self) -> &[Rc<ConditionalField>] {
        &self.rules
    }

    /// [`Error::RuleFailed`] for every entry that could not be installed
    pub fn failures(&self) -> &[Error] {
        &self.failures
    }

    pub fn installed(&self) -> usize {
        self.rules.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// install one [`ConditionalField`] per configuration entry
///
/// an empty list is an error. a failing entry is logged and recorded, and the
/// remaining entries are still installed.
pub fn setup_conditional_fields(document: &dyn Document, configs: &[RuleConfig]) -> Result<Setup> {
    if configs.is_empty() {
        return Err(Error::ConfigurationMissing);
    }

    let mut setup = Setup::default();
    for (index, config) in configs.iter().enumerate() {
        match ConditionalField::new(document, config) {
            Ok(rule) => setup.rules.push(rule),
            Err(e) => {
                log::error!(
                    "error initializing conditional field {} (trigger '{}'): {}",
                    index,
                    config.trigger.selector,
                    e
                );
                setup.failures.push(Error::rule_failed(index, e));
            }
        }
    }

    log::debug!(
        "installed {}/{} conditional field rule(s)",
        setup.installed(),
        configs.len()
    );
    Ok(setup)
}
