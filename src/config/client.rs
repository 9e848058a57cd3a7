// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Lenses CLI Authors

//! Connection parameters of a single context
//!
//! A [`ClientConfiguration`] describes one Lenses environment: where it
//! listens, how to authenticate, and how the HTTP client should behave.
//!
//! # Host format
//!
//! Hosts are kept as `scheme://host:port`. [`format_host`] fills in the
//! missing parts:
//!
//! ```rust
//! use lenses_cli::config::format_host;
//!
//! assert_eq!(format_host("example.com"), "http://example.com:80");
//! assert_eq!(format_host("example.com:443"), "https://example.com:443");
//! assert_eq!(format_host("https://example.com/"), "https://example.com:443");
//! ```

use super::authentication::{
    Authentication, BasicAuthentication, KerberosAuthentication,
};
use super::error::ValidationError;
use std::time::Duration;

const HTTP_PORT: &str = "80";
const HTTPS_PORT: &str = "443";
const SCHEME_SEPARATOR: &str = "://";

/// Connection parameters of one context
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientConfiguration {
    /// `scheme://host:port` of the Lenses backend
    pub host: String,
    /// Credentials used to obtain a token
    pub authentication: Option<Authentication>,
    /// Bearer token; when non-empty it takes precedence over `authentication`
    pub token: String,
    /// Connection timeout, such as `"300ms"` or `"2h45m"`; empty means none
    pub timeout: String,
    /// Log every request and the configuration (without passwords)
    pub debug: bool,
}

/// Credentials a connection should present, in order of precedence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Credentials<'a> {
    /// A previously issued token
    Token(&'a str),
    /// An authentication method to log in with
    Authentication(&'a Authentication),
}

impl ClientConfiguration {
    /// Whether the context holds enough information to connect
    ///
    /// The host is checked in its normalized form, without modifying it.
    pub fn is_valid(&self) -> bool {
        !format_host(&self.host).is_empty()
            && (!self.token.is_empty() || self.authentication.is_some())
    }

    /// Like [`is_valid`](Self::is_valid) but reports what is wrong
    ///
    /// Succeeds exactly when `is_valid` does. `context` is only used to
    /// label the error. The timeout is not looked at; see
    /// [`timeout_duration`](Self::timeout_duration).
    pub fn validate(&self, context: &str) -> Result<(), ValidationError> {
        if format_host(&self.host).is_empty() {
            return Err(ValidationError::MissingHost {
                context: context.to_string(),
            });
        }

        if self.token.is_empty() && self.authentication.is_none() {
            return Err(ValidationError::MissingCredentials {
                context: context.to_string(),
            });
        }

        Ok(())
    }

    /// Merge the non-empty fields of `other` into this configuration
    ///
    /// `debug` is always taken from `other`, and a present authentication
    /// replaces the current one as a whole. The host is not normalized.
    ///
    /// Returns the validity of the merged configuration.
    pub fn fill(&mut self, other: ClientConfiguration) -> bool {
        if !other.host.is_empty() && other.host != self.host {
            self.host = other.host;
        }

        if other.authentication.is_some() {
            self.authentication = other.authentication;
        }

        if !other.token.is_empty() && other.token != self.token {
            self.token = other.token;
        }

        if !other.timeout.is_empty() && other.timeout != self.timeout {
            self.timeout = other.timeout;
        }

        if self.debug != other.debug {
            self.debug = other.debug;
        }

        self.is_valid()
    }

    /// Rewrite `host` into its normalized `scheme://host:port` form
    pub fn format_host(&mut self) {
        let formatted = format_host(&self.host);
        if formatted != self.host {
            self.host = formatted;
        }
    }

    /// The basic credentials, if that is the active kind
    pub fn basic_auth(&self) -> Option<&BasicAuthentication> {
        match &self.authentication {
            Some(Authentication::Basic(auth)) => Some(auth),
            _ => None,
        }
    }

    /// The Kerberos credentials, if that is the active kind
    pub fn kerberos_auth(&self) -> Option<&KerberosAuthentication> {
        match &self.authentication {
            Some(Authentication::Kerberos(auth)) => Some(auth),
            _ => None,
        }
    }

    /// The credentials a connection should use
    ///
    /// A non-empty token wins over any authentication method.
    pub fn credentials(&self) -> Option<Credentials<'_>> {
        if !self.token.is_empty() {
            return Some(Credentials::Token(&self.token));
        }
        self.authentication.as_ref().map(Credentials::Authentication)
    }

    /// The parsed timeout, `None` when no timeout is configured
    ///
    /// `context` is only used to label the error.
    pub fn timeout_duration(&self, context: &str) -> Result<Option<Duration>, ValidationError> {
        if self.timeout.is_empty() {
            return Ok(None);
        }
        parse_duration(&self.timeout)
            .map(Some)
            .map_err(|reason| ValidationError::InvalidTimeout {
                context: context.to_string(),
                value: self.timeout.clone(),
                reason,
            })
    }
}

/// Normalize a host into `scheme://host:port`
///
/// Trailing slashes are removed. Without a scheme, `https://` is chosen
/// when the port is 443 and `http://` otherwise. Without a port, 443 is
/// appended for `https://` and 80 for anything else. An empty host (or one
/// made only of slashes) stays empty.
///
/// The function is idempotent.
pub fn format_host(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.is_empty() {
        return String::new();
    }

    let scheme_idx = host.find(SCHEME_SEPARATOR);
    // A colon only marks a port when it comes after the scheme separator.
    let port_idx = host.rfind(':').filter(|&idx| match scheme_idx {
        Some(scheme) => idx > scheme + 1,
        None => idx > 0,
    });

    let mut port = match port_idx {
        Some(idx) => &host[idx + 1..],
        None => HTTP_PORT,
    };

    let mut formatted = String::with_capacity(host.len() + 16);
    match scheme_idx {
        None if port == HTTPS_PORT => formatted.push_str("https://"),
        None => formatted.push_str("http://"),
        Some(_) if port_idx.is_none() && host.starts_with("https://") => {
            port = HTTPS_PORT;
        }
        Some(_) => {}
    }
    formatted.push_str(host);

    if port_idx.is_none() {
        formatted.push(':');
        formatted.push_str(port);
    }

    formatted
}

/// Parse a duration such as `"300ms"`, `"1.5h"` or `"2h45m"`
///
/// Valid units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`. A bare `0`
/// is accepted. Negative durations are rejected.
fn parse_duration(value: &str) -> Result<Duration, String> {
    let mut rest = value;
    if rest.is_empty() {
        return Ok(Duration::ZERO);
    }

    if let Some(stripped) = rest.strip_prefix('-') {
        if stripped.trim_start_matches(['0', '.']).chars().any(|c| c.is_ascii_digit()) {
            return Err("negative durations are not allowed".to_string());
        }
        rest = stripped;
    } else if let Some(stripped) = rest.strip_prefix('+') {
        rest = stripped;
    }

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err("missing value".to_string());
    }

    let mut total_nanos = 0f64;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let number = &rest[..number_len];
        if number.is_empty() || number == "." || number.matches('.').count() > 1 {
            return Err(format!("invalid number in '{value}'"));
        }
        let amount: f64 = number
            .parse()
            .map_err(|_| format!("invalid number in '{value}'"))?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let unit_nanos = match &rest[..unit_len] {
            "ns" => 1f64,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            "" => return Err(format!("missing unit in '{value}'")),
            other => return Err(format!("unknown unit '{other}' in '{value}'")),
        };
        rest = &rest[unit_len..];

        total_nanos += amount * unit_nanos;
    }

    if total_nanos > u64::MAX as f64 {
        return Err(format!("'{value}' is out of range"));
    }

    Ok(Duration::from_nanos(total_nanos.round() as u64))
}
