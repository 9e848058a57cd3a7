// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Lenses CLI Authors

//! YAML documents, with PascalCase keys

use super::ConfigurationCodec;
use crate::config::authentication::{
    Authentication, BasicAuthentication, KerberosAuthentication, KerberosMethod,
};
use crate::config::client::ClientConfiguration;
use crate::config::configuration::Configuration;
use crate::config::error::CodecError;
use serde_derive::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// YAML format
#[derive(Clone, Copy, Debug, Default)]
pub struct YamlCodec;

impl ConfigurationCodec for YamlCodec {
    fn name(&self) -> &'static str {
        "YAML"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["yml", "yaml"]
    }

    fn decode(&self, bytes: &[u8]) -> Result<Configuration, CodecError> {
        let document: Document = serde_yaml::from_slice(bytes)?;
        document.into_configuration()
    }

    fn encode(&self, configuration: &Configuration) -> Result<Vec<u8>, CodecError> {
        Ok(serde_yaml::to_string(&Document::from(configuration))?.into_bytes())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
struct Document {
    #[serde(default)]
    current_context: String,
    #[serde(default)]
    contexts: BTreeMap<String, Context>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
struct Context {
    #[serde(default)]
    host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    basic_authentication: Option<Basic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kerberos_authentication: Option<Kerberos>,
    #[serde(default)]
    token: String,
    #[serde(default)]
    timeout: String,
    #[serde(default)]
    debug: bool,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
struct Basic {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
struct Kerberos {
    #[serde(default)]
    conf_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    with_password: Option<KerberosPassword>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    with_keytab: Option<KerberosKeytab>,
    #[serde(
        rename = "FromCCache",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    from_ccache: Option<KerberosCCache>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
struct KerberosPassword {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    realm: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
struct KerberosKeytab {
    #[serde(default)]
    username: String,
    #[serde(default)]
    keytab_file: String,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct KerberosCCache {
    #[serde(rename = "CCacheFile", default)]
    ccache_file: String,
}

wire_conversions!();
