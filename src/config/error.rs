// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Lenses CLI Authors

//! Configuration-specific error types
//!
//! - [`ConfigError`] - Main error type for locating, loading and saving
//! - [`CodecError`] - A document could not be encoded or decoded by one format
//! - [`ValidationError`] - A decoded configuration is missing required values
//!
//! A refused context removal is not an error: see
//! [`Configuration::remove_context`](super::Configuration::remove_context).

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-specific error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No configuration file in any search root matched any filename
    #[error("no configuration file found (searched: {})", display_paths(.searched))]
    NotFound {
        /// Directories or files that were searched
        searched: Vec<PathBuf>,
    },

    /// A configuration file exists but no registered codec accepted it
    #[error(
        "configuration file '{}' is not formatted to a compatible document: {}",
        .path.display(),
        .formats.join(", ")
    )]
    Decode {
        /// The offending file
        path: PathBuf,
        /// Names of the formats that were tried
        formats: Vec<&'static str>,
    },

    /// The selected context is not in the configuration
    #[error("context '{name}' does not exist")]
    ContextNotFound {
        /// Name of the selected context
        name: String,
    },

    /// The configuration decoded fine but cannot be used to connect
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ValidationError),

    /// Encoding or decoding failure of a single format
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// I/O errors when reading or writing configuration files
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The home directory of the current user could not be resolved
    #[error("could not determine the home directory of the current user")]
    NoHomeDirectory,
}

impl ConfigError {
    /// Wrap an I/O error together with the path it happened on
    pub fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the caller should fall back to interactive setup
    ///
    /// Both a missing file and an incomplete configuration are recoverable
    /// by asking the user; a broken document is not.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::InvalidConfiguration(_))
    }
}

/// Errors produced by a single [`ConfigurationCodec`](super::ConfigurationCodec)
#[derive(Error, Debug)]
pub enum CodecError {
    /// JSON syntax or schema error
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML syntax or schema error
    #[error("YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A context carries more than one authentication block
    #[error("context '{context}' declares more than one authentication kind")]
    AmbiguousAuthentication {
        /// Context name
        context: String,
    },

    /// A Kerberos block must carry exactly one method
    #[error("context '{context}' must declare exactly one kerberos method")]
    InvalidKerberosMethod {
        /// Context name
        context: String,
    },
}

/// Configuration validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The configuration has no contexts at all
    #[error("no contexts configured")]
    NoContexts,

    /// The host of a context is empty after normalization
    #[error("context '{context}': host is required")]
    MissingHost {
        /// Context name
        context: String,
    },

    /// Neither a token nor an authentication method is present
    #[error("context '{context}': a token or an authentication method is required")]
    MissingCredentials {
        /// Context name
        context: String,
    },

    /// The timeout cannot be parsed as a duration
    #[error("context '{context}': invalid timeout '{value}': {reason}")]
    InvalidTimeout {
        /// Context name
        context: String,
        /// Raw timeout value
        value: String,
        /// What is wrong with it
        reason: String,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
