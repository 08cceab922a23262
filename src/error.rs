//! error types for conditional field construction

use thiserror::Error;

/// errors raised while locating elements or installing rules
#[derive(Debug, Error)]
pub enum Error {
    /// setup was called without any rule configuration
    #[error("no configuration provided")]
    ConfigurationMissing,

    /// a selector matched zero elements
    #[error("no elements found for selector: {0}")]
    SelectorNotFound(String),

    /// the element locator rejected the selector syntax
    #[error("invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// one rule of a setup batch could not be installed
    #[error("rule {index} failed: {source}")]
    RuleFailed {
        index: usize,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn selector_not_found(selector: impl Into<String>) -> Self {
        Self::SelectorNotFound(selector.into())
    }

    pub fn invalid_selector(selector: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            reason: reason.into(),
        }
    }

    pub fn rule_failed(index: usize, source: Error) -> Self {
        Self::RuleFailed {
            index,
            source: Box::new(source),
        }
    }

    /// the selector involved in this error, if any
    pub fn selector(&self) -> Option<&str> {
        match self {
            Self::SelectorNotFound(s) => Some(s),
            Self::InvalidSelector { selector, .. } => Some(selector),
            Self::RuleFailed { source, .. } => source.selector(),
            Self::ConfigurationMissing => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
