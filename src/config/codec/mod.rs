// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Lenses CLI Authors

//! On-disk formats of the configuration
//!
//! Each format is a [`ConfigurationCodec`]: a pair of pure functions between
//! bytes and a [`Configuration`]. Two formats are provided:
//!
//! - [`JsonCodec`]: `currentContext`, `contexts`, `host`, `basic_authentication`, ...
//! - [`YamlCodec`]: `CurrentContext`, `Contexts`, `Host`, `BasicAuthentication`, ...
//!
//! The authentication of a context is written under a key naming its kind,
//! and a Kerberos block names its method the same way:
//!
//! ```yaml
//! CurrentContext: master
//! Contexts:
//!   master:
//!     Host: https://lenses.example.com:443
//!     KerberosAuthentication:
//!       ConfFile: /etc/krb5.conf
//!       WithKeytab:
//!         Username: svc-lenses
//!         KeytabFile: /etc/lenses/svc.keytab
//! ```
//!
//! Both formats reject unknown keys, so a document is only accepted by the
//! codec it was written for.

/// Conversions between the domain types and the wire structs of a format
///
/// Each format module declares `Document`, `Context`, `Basic`, `Kerberos`,
/// `KerberosPassword`, `KerberosKeytab` and `KerberosCCache` with the same
/// field names and only its own serde attributes, then invokes this macro.
macro_rules! wire_conversions {
    () => {
        impl From<&Configuration> for Document {
            fn from(configuration: &Configuration) -> Self {
                Self {
                    current_context: configuration.current_context.clone(),
                    contexts: configuration
                        .contexts
                        .iter()
                        .map(|(name, cfg)| (name.clone(), Context::from(cfg)))
                        .collect(),
                }
            }
        }

        impl Document {
            fn into_configuration(self) -> Result<Configuration, CodecError> {
                let contexts: std::collections::BTreeMap<String, ClientConfiguration> = self
                    .contexts
                    .into_iter()
                    .map(|(name, context)| {
                        let cfg = context.into_client(&name)?;
                        Ok((name, cfg))
                    })
                    .collect::<Result<_, CodecError>>()?;

                Ok(Configuration {
                    current_context: self.current_context,
                    contexts,
                })
            }
        }

        impl From<&ClientConfiguration> for Context {
            fn from(cfg: &ClientConfiguration) -> Self {
                let (basic_authentication, kerberos_authentication) = match &cfg.authentication {
                    Some(Authentication::Basic(auth)) => (
                        Some(Basic {
                            username: auth.username.clone(),
                            password: auth.password.clone(),
                        }),
                        None,
                    ),
                    Some(Authentication::Kerberos(auth)) => (None, Some(Kerberos::from(auth))),
                    None => (None, None),
                };

                Self {
                    host: cfg.host.clone(),
                    basic_authentication,
                    kerberos_authentication,
                    token: cfg.token.clone(),
                    timeout: cfg.timeout.clone(),
                    debug: cfg.debug,
                }
            }
        }

        impl Context {
            fn into_client(self, name: &str) -> Result<ClientConfiguration, CodecError> {
                let basic: Option<Authentication> = self
                    .basic_authentication
                    .map(|b| BasicAuthentication::new(b.username, b.password).into());
                let kerberos = self
                    .kerberos_authentication
                    .map(|k| k.into_authentication(name))
                    .transpose()?;

                Ok(ClientConfiguration {
                    host: self.host,
                    authentication: crate::config::codec::single_authentication(
                        name, basic, kerberos,
                    )?,
                    token: self.token,
                    timeout: self.timeout,
                    debug: self.debug,
                })
            }
        }

        impl From<&KerberosAuthentication> for Kerberos {
            fn from(auth: &KerberosAuthentication) -> Self {
                let mut kerberos = Kerberos {
                    conf_file: auth.conf_file.clone(),
                    with_password: None,
                    with_keytab: None,
                    from_ccache: None,
                };

                match &auth.method {
                    KerberosMethod::WithPassword {
                        username,
                        password,
                        realm,
                    } => {
                        kerberos.with_password = Some(KerberosPassword {
                            username: username.clone(),
                            password: password.clone(),
                            realm: realm.clone(),
                        })
                    }
                    KerberosMethod::WithKeytab {
                        username,
                        keytab_file,
                    } => {
                        kerberos.with_keytab = Some(KerberosKeytab {
                            username: username.clone(),
                            keytab_file: keytab_file.clone(),
                        })
                    }
                    KerberosMethod::FromCCache { ccache_file } => {
                        kerberos.from_ccache = Some(KerberosCCache {
                            ccache_file: ccache_file.clone(),
                        })
                    }
                }

                kerberos
            }
        }

        impl Kerberos {
            fn into_authentication(self, name: &str) -> Result<Authentication, CodecError> {
                let method = crate::config::codec::single_kerberos_method(
                    name,
                    [
                        self.with_password.map(|m| KerberosMethod::WithPassword {
                            username: m.username,
                            password: m.password,
                            realm: m.realm,
                        }),
                        self.with_keytab.map(|m| KerberosMethod::WithKeytab {
                            username: m.username,
                            keytab_file: m.keytab_file,
                        }),
                        self.from_ccache.map(|m| KerberosMethod::FromCCache {
                            ccache_file: m.ccache_file,
                        }),
                    ],
                )?;

                Ok(KerberosAuthentication {
                    conf_file: self.conf_file,
                    method,
                }
                .into())
            }
        }
    };
}

mod json;
mod yaml;

pub use self::json::JsonCodec;
pub use self::yaml::YamlCodec;

use super::authentication::{Authentication, KerberosMethod};
use super::configuration::Configuration;
use super::error::CodecError;
use std::fmt;
use std::path::Path;

/// Conversion between a [`Configuration`] and one byte encoding
pub trait ConfigurationCodec: fmt::Debug {
    /// Format name used in messages
    fn name(&self) -> &'static str;

    /// File extensions this format is usually stored with
    fn extensions(&self) -> &'static [&'static str];

    /// Decode a document
    fn decode(&self, bytes: &[u8]) -> Result<Configuration, CodecError>;

    /// Encode a configuration
    fn encode(&self, configuration: &Configuration) -> Result<Vec<u8>, CodecError>;
}

/// The codecs tried when reading a file, in order
pub fn default_codecs() -> Vec<Box<dyn ConfigurationCodec>> {
    vec![Box::new(JsonCodec), Box::new(YamlCodec)]
}

/// The codec among [`default_codecs`] called `name`
pub fn codec_named(name: &str) -> Option<Box<dyn ConfigurationCodec>> {
    default_codecs()
        .into_iter()
        .find(|codec| codec.name() == name)
}

/// The codec to write a new file at `path` with
///
/// `.json` files are written as JSON, everything else as YAML.
pub fn codec_for_path(path: &Path) -> Box<dyn ConfigurationCodec> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();

    if JsonCodec.extensions().contains(&extension) {
        Box::new(JsonCodec)
    } else {
        Box::new(YamlCodec)
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Pick the single authentication of a context out of its tagged blocks
fn single_authentication(
    context: &str,
    basic: Option<Authentication>,
    kerberos: Option<Authentication>,
) -> Result<Option<Authentication>, CodecError> {
    match (basic, kerberos) {
        (Some(_), Some(_)) => Err(CodecError::AmbiguousAuthentication {
            context: context.to_string(),
        }),
        (basic, kerberos) => Ok(basic.or(kerberos)),
    }
}

/// Pick the single method of a Kerberos block out of its tagged entries
fn single_kerberos_method(
    context: &str,
    methods: [Option<KerberosMethod>; 3],
) -> Result<KerberosMethod, CodecError> {
    let mut present = methods.into_iter().flatten();
    match (present.next(), present.next()) {
        (Some(method), None) => Ok(method),
        _ => Err(CodecError::InvalidKerberosMethod {
            context: context.to_string(),
        }),
    }
}
