// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Lenses CLI Authors

//! Error handling for the command-line client
//!
//! - [`LensesCliError`] - every error a command can end with
//! - [`ErrorContext`] - trait for adding context to errors
//! - JSON rendering for structured error output
//!
//! # Examples
//!
//! ```rust
//! use lenses_cli::error::{ErrorContext, LensesCliError};
//!
//! let result: Result<(), std::io::Error> = Err(std::io::Error::new(
//!     std::io::ErrorKind::NotFound,
//!     "file not found",
//! ));
//! let err = result
//!     .with_context(|| "Failed to read config file".to_string())
//!     .unwrap_err();
//! assert_eq!(err.error_code(), "GENERIC_ERROR");
//! ```

use crate::config::{ConfigError, ValidationError};
use serde_json::Value;
use thiserror::Error;

/// Main error type of the command-line client
#[derive(Error, Debug)]
pub enum LensesCliError {
    /// Locating, decoding or saving the configuration failed
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The configuration cannot be used
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A context named on the command line does not exist
    #[error("Context '{name}' not found")]
    ContextNotFound {
        /// The requested context
        name: String,
    },

    /// Removing a context was refused
    #[error("Cannot remove context '{name}': {reason}")]
    RemovalRefused {
        /// The context to remove
        name: String,
        /// Why it was kept
        reason: String,
    },

    /// Input or output failure outside of configuration files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rendering output as JSON failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Rendering output as YAML failed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Interactive prompt failure
    #[cfg(feature = "wizard")]
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// Anything else, with context
    #[error("Error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl LensesCliError {
    /// Build a [`LensesCliError::ContextNotFound`]
    pub fn context_not_found<T: Into<String>>(name: T) -> Self {
        Self::ContextNotFound { name: name.into() }
    }

    /// Build a [`LensesCliError::RemovalRefused`]
    pub fn removal_refused<T: Into<String>, U: Into<String>>(name: T, reason: U) -> Self {
        Self::RemovalRefused {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Stable code used in JSON output
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(ConfigError::NotFound { .. }) => "CONFIG_NOT_FOUND",
            Self::Config(ConfigError::InvalidConfiguration(_)) | Self::Validation(_) => {
                "VALIDATION_ERROR"
            }
            Self::Config(ConfigError::ContextNotFound { .. }) | Self::ContextNotFound { .. } => {
                "CONTEXT_NOT_FOUND"
            }
            Self::Config(_) => "CONFIG_ERROR",
            Self::RemovalRefused { .. } => "REMOVAL_REFUSED",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Yaml(_) => "YAML_ERROR",
            #[cfg(feature = "wizard")]
            Self::Prompt(_) => "PROMPT_ERROR",
            Self::Generic(_) => "GENERIC_ERROR",
        }
    }

    /// Structured form of the error
    ///
    /// ```json
    /// {"error": {"code": "...", "message": "...", "details": ...}}
    /// ```
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "details": self.error_details()
            }
        })
    }

    fn error_details(&self) -> Value {
        match self {
            Self::Config(ConfigError::NotFound { searched }) => serde_json::json!({
                "searched": searched
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
            }),
            Self::Config(ConfigError::Decode { path, formats }) => serde_json::json!({
                "path": path.display().to_string(),
                "formats": formats
            }),
            Self::Config(ConfigError::ContextNotFound { name })
            | Self::ContextNotFound { name }
            | Self::RemovalRefused { name, .. } => {
                serde_json::json!({ "context": name })
            }
            _ => Value::Null,
        }
    }
}

/// Adds a message to the error of a `Result`
pub trait ErrorContext<T> {
    /// Wrap the error with the message built by `f`
    fn with_context<F>(self, f: F) -> Result<T, LensesCliError>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: Into<LensesCliError>,
{
    fn with_context<F>(self, f: F) -> Result<T, LensesCliError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let base_error = e.into();
            LensesCliError::Generic(anyhow::Error::new(base_error).context(f()))
        })
    }
}
