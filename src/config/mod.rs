// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Lenses CLI Authors

//! Multi-context configuration of the Lenses client
//!
//! A configuration holds any number of named contexts, one of which is
//! current. Each context says where a Lenses backend lives and how to
//! authenticate against it.
//!
//! # Module Structure
//!
//! - [`authentication`]: basic and Kerberos credentials
//! - [`client`]: one context, host normalization and merging
//! - [`configuration`]: the set of contexts and the current pointer
//! - [`codec`]: JSON and YAML documents
//! - [`locator`]: finding a configuration file on disk
//! - [`resolver`]: loading, command-line overrides and saving
//! - [`error`]: error types
//!
//! # Configuration Sources
//!
//! Highest precedence first:
//!
//! 1. Command-line flags (`--host`, `--token`, `--user`, ...)
//! 2. Environment variables (`LENSES_HOST`, `LENSES_TOKEN`, ...)
//! 3. The configuration file
//! 4. Empty defaults, which are not a usable configuration
//!
//! The configuration file is either given explicitly (`--config`, which must
//! exist) or searched for in `~/.lenses/`, the directory of the executable
//! and the current directory, under the names listed in
//! [`locator::CONFIGURATION_FILENAMES`].
//!
//! ## Example Configuration File
//!
//! ```yaml
//! CurrentContext: prod
//! Contexts:
//!   prod:
//!     Host: https://lenses.example.com:443
//!     BasicAuthentication:
//!       Username: admin
//!       Password: admin
//!     Timeout: 30s
//!   dev:
//!     Host: http://localhost:3030
//!     Token: e2c1f8d0
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use lenses_cli::config::{ClientConfiguration, ConfigurationResolver};
//!
//! let resolver = ConfigurationResolver::new();
//! let loaded = resolver
//!     .resolve(None, ClientConfiguration::default(), Some("prod"))
//!     .expect("no usable configuration");
//!
//! if let Some(current) = loaded.configuration.current() {
//!     println!("connecting to {}", current.host);
//! }
//! ```

pub mod authentication;
pub mod client;
pub mod codec;
pub mod configuration;
pub mod error;
pub mod locator;
pub mod resolver;

pub use self::authentication::{
    Authentication, BasicAuthentication, KerberosAuthentication, KerberosMethod,
};
pub use self::client::{format_host, ClientConfiguration, Credentials};
pub use self::codec::{ConfigurationCodec, JsonCodec, YamlCodec};
pub use self::configuration::{Configuration, DEFAULT_CONTEXT_KEY};
pub use self::error::{CodecError, ConfigError, ValidationError};
pub use self::locator::{home_dir, ConfigurationLocator, LocatedConfiguration};
pub use self::resolver::{default_save_path, ConfigurationResolver, LoadedConfiguration};
