//! Result and error types for pagehand.

use thiserror::Error;

use crate::locator::Strategy;

/// Result type for pagehand operations
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Errors raised by the page-object layer.
///
/// Every failure is propagated to the caller; the step runner decides how a
/// failure is reported.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Resolution polling exhausted its timeout with zero matches
    #[error("Element not found. Locator: '{locator}'. Find method: '{strategy}'")]
    ElementNotFound {
        /// Locator value that was searched for
        locator: String,
        /// Strategy used for the search
        strategy: Strategy,
    },

    /// A form input's observed state disagrees with the asserted value
    #[error("Expected {alias} to be {expected} but got {observed}")]
    VerificationMismatch {
        /// Display name of the input
        alias: String,
        /// Asserted value
        expected: String,
        /// Value read back from the page
        observed: String,
    },

    /// Current location never matched the page URL
    #[error("Expected to be on {expected} but browser is at {observed}")]
    NavigationMismatch {
        /// Page URL pattern
        expected: String,
        /// Last observed browser URL
        observed: String,
    },

    /// Lookup of a name that was never declared
    #[error("Unknown alias: {alias}")]
    UnknownAlias {
        /// The name that was looked up
        alias: String,
    },

    /// Two inputs in one form share an alias
    #[error("Duplicate alias in form: {alias}")]
    DuplicateAlias {
        /// The repeated alias
        alias: String,
    },

    /// A generic wait expired
    #[error("Timed out after {ms}ms waiting for {waited_for}")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
        /// Description of the awaited condition
        waited_for: String,
    },

    /// A value could not be interpreted by an input or a scoped locator
    #[error("Invalid value for {alias}: {message}")]
    InvalidValue {
        /// Input alias
        alias: String,
        /// What was wrong
        message: String,
    },

    /// Page URL is not a valid anchored pattern
    #[error("Invalid URL pattern {pattern}: {source}")]
    InvalidPattern {
        /// Offending pattern
        pattern: String,
        /// Regex compile error
        #[source]
        source: regex::Error,
    },

    /// No step definition matches the step text
    #[error("Undefined step: {step}")]
    UndefinedStep {
        /// Step text
        step: String,
    },

    /// The driver reported a failure
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// URL parse error
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl HarnessError {
    /// Build a driver error from any displayable message
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Build an unknown-alias error
    pub fn unknown_alias(alias: impl Into<String>) -> Self {
        Self::UnknownAlias {
            alias: alias.into(),
        }
    }

    /// True when the failure came from a resolution or navigation timeout
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::ElementNotFound { .. } | Self::NavigationMismatch { .. } | Self::Timeout { .. }
        )
    }
}
