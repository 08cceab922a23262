mod json_schema;
mod schema;

pub use json_schema::{write_schema_file, JSON_SCHEMA};
pub use schema::{
    AffectedConfig, AffectedFieldConfig, FormFile, RuleConfig, RulesFile, TriggerConfig,
};

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::dom::memory::NodeSpec;
use crate::dom::selector;

const RULES_ENV_VAR: &str = "DCF_RULES";
pub const DEFAULT_RULES_FILE: &str = "conditional-fields.json5";

/// explicit path, then `DCF_RULES`, then `./conditional-fields.json5`
pub fn get_rules_path(override_path: Option<&Path>) -> PathBuf {
    if let Some(path) = override_path {
        return path.to_path_buf();
    }
    if let Ok(path) = env::var(RULES_ENV_VAR) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }
    PathBuf::from(DEFAULT_RULES_FILE)
}

/// parse rules from JSON or JSON5 text
pub fn parse_rules(content: &str) -> Result<Vec<RuleConfig>> {
    json5::from_str::<RulesFile>(content)
        .map(RulesFile::into_rules)
        .map_err(|e| anyhow!("invalid rules file: {}", e))
}

pub fn load(path: &Path) -> Result<Vec<RuleConfig>> {
    read_json5(path, "rules").map(RulesFile::into_rules)
}

/// load a form description: one element tree or a list of them
pub fn load_form(path: &Path) -> Result<Vec<NodeSpec>> {
    read_json5(path, "form").map(FormFile::into_nodes)
}

fn read_json5<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} file: {}", what, path.display()))?;

    json5::from_str(&content)
        .with_context(|| format!("Failed to parse {} file: {}", what, path.display()))
}

/// Verify a rules file and return a list of errors
pub fn verify(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(anyhow!("rules file not found: {}", path.display()));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read rules file: {}", path.display()))?;

    Ok(verify_rules(&parse_rules(&content)?))
}

/// static checks that need no document
pub fn verify_rules(rules: &[RuleConfig]) -> Vec<String> {
    let mut errors = Vec::new();

    if rules.is_empty() {
        errors.push("rules: no rules defined".to_string());
        return errors;
    }

    for (i, rule) in rules.iter().enumerate() {
        let prefix = format!("rules[{}]", i);

        check_selector(
            &mut errors,
            &format!("{}.trigger.selector", prefix),
            &rule.trigger.selector,
        );

        if !rule.trigger.operator.is_known() {
            errors.push(format!(
                "{}.trigger.operator: unknown operator '{}'",
                prefix, rule.trigger.operator
            ));
        }

        if rule.trigger.value.is_empty() {
            errors.push(format!("{}.trigger.value: no values given", prefix));
        }

        if let Some(block) = &rule.affected.block {
            check_selector(&mut errors, &format!("{}.affected.block", prefix), block);
        }

        if rule.affected.block.is_none() && rule.affected.fields.is_empty() {
            errors.push(format!("{}.affected: needs a block or at least one field", prefix));
        }

        let parent = rule.affected.parent_selector.as_ref();
        if let Some(parent) = parent.and_then(|p| p.selector()) {
            check_selector(&mut errors, &format!("{}.affected.parentSelector", prefix), parent);
        }

        for (j, field) in rule.affected.fields.iter().enumerate() {
            let field_prefix = format!("{}.affected.fields[{}]", prefix, j);
            check_selector(
                &mut errors,
                &format!("{}.selector", field_prefix),
                &field.selector,
            );

            for (k, associated) in field.associated_elements.iter().enumerate() {
                check_selector(
                    &mut errors,
                    &format!("{}.associatedElements[{}]", field_prefix, k),
                    associated,
                );
            }

            if let Some(parent) = field.parent_selector.as_ref().and_then(|p| p.selector()) {
                let location = format!("{}.parentSelector", field_prefix);
                check_selector(&mut errors, &location, parent);
            }
        }
    }

    errors
}

fn check_selector(errors: &mut Vec<String>, location: &str, selector: &str) {
    if selector.trim().is_empty() {
        errors.push(format!("{}: selector is empty", location));
        return;
    }
    if let Err(e) = selector::validate(selector) {
        errors.push(format!("{}: {}", location, e));
    }
}
