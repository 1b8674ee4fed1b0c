//! Config validation errors

use thiserror::Error;

/// A config value the rule table cannot work with
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field}: minWords ({min}) is greater than maxWords ({max})")]
    InvalidRange {
        field: &'static str,
        min: usize,
        max: usize,
    },

    #[error("{0} must list at least one keyword")]
    EmptyKeywords(&'static str),

    #[error("{0} contains a blank keyword")]
    BlankKeyword(&'static str),

    #[error("Unknown rule in config: {0}")]
    UnknownRule(String),
}
