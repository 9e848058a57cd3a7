// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Lenses CLI Authors

//! Authentication methods a context can use to log in to Lenses.
//!
//! The set of kinds is closed: a context holds exactly one
//! [`Authentication`] or none at all. Codecs write each kind under its own
//! discriminator key, so the concrete kind is rebuilt without guessing.

use std::fmt;

const REDACTED: &str = "<redacted>";

/// One of the supported credential kinds
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Authentication {
    /// Username and password
    Basic(BasicAuthentication),
    /// Kerberos, with one of several ticket sources
    Kerberos(KerberosAuthentication),
}

impl Authentication {
    /// Short name of the kind, as shown to users
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Basic(_) => "basic",
            Self::Kerberos(_) => "kerberos",
        }
    }
}

impl From<BasicAuthentication> for Authentication {
    fn from(auth: BasicAuthentication) -> Self {
        Self::Basic(auth)
    }
}

impl From<KerberosAuthentication> for Authentication {
    fn from(auth: KerberosAuthentication) -> Self {
        Self::Kerberos(auth)
    }
}

/// Username/password credentials
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BasicAuthentication {
    /// Login name
    pub username: String,
    /// Password, never printed
    pub password: String,
}

impl BasicAuthentication {
    /// Create basic credentials
    pub fn new<U: Into<String>, P: Into<String>>(username: U, password: P) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for BasicAuthentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuthentication")
            .field("username", &self.username)
            .field("password", &REDACTED)
            .finish()
    }
}

/// Kerberos credentials
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KerberosAuthentication {
    /// Path of the `krb5.conf` to use
    pub conf_file: String,
    /// Where the ticket comes from
    pub method: KerberosMethod,
}

/// Source of the Kerberos ticket
#[derive(Clone, PartialEq, Eq)]
pub enum KerberosMethod {
    /// Obtain a ticket with a password
    WithPassword {
        /// Principal name
        username: String,
        /// Password, never printed
        password: String,
        /// Realm, empty for the default realm of `conf_file`
        realm: String,
    },
    /// Obtain a ticket with a keytab file
    WithKeytab {
        /// Principal name, empty to use the first entry of the keytab
        username: String,
        /// Keytab path
        keytab_file: String,
    },
    /// Reuse a ticket from a credentials cache
    FromCCache {
        /// Credentials cache path
        ccache_file: String,
    },
}

impl KerberosMethod {
    /// Short name of the method, as shown to users
    pub fn kind(&self) -> &'static str {
        match self {
            Self::WithPassword { .. } => "password",
            Self::WithKeytab { .. } => "keytab",
            Self::FromCCache { .. } => "ccache",
        }
    }
}

impl fmt::Debug for KerberosMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WithPassword {
                username, realm, ..
            } => f
                .debug_struct("WithPassword")
                .field("username", username)
                .field("password", &REDACTED)
                .field("realm", realm)
                .finish(),
            Self::WithKeytab {
                username,
                keytab_file,
            } => f
                .debug_struct("WithKeytab")
                .field("username", username)
                .field("keytab_file", keytab_file)
                .finish(),
            Self::FromCCache { ccache_file } => f
                .debug_struct("FromCCache")
                .field("ccache_file", ccache_file)
                .finish(),
        }
    }
}
