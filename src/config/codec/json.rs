// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Lenses CLI Authors

//! JSON documents, with snake_case keys

use super::{is_false, ConfigurationCodec};
use crate::config::authentication::{
    Authentication, BasicAuthentication, KerberosAuthentication, KerberosMethod,
};
use crate::config::client::ClientConfiguration;
use crate::config::configuration::Configuration;
use crate::config::error::CodecError;
use serde_derive::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// JSON format
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl ConfigurationCodec for JsonCodec {
    fn name(&self) -> &'static str {
        "JSON"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["json"]
    }

    fn decode(&self, bytes: &[u8]) -> Result<Configuration, CodecError> {
        let document: Document = serde_json::from_slice(bytes)?;
        document.into_configuration()
    }

    fn encode(&self, configuration: &Configuration) -> Result<Vec<u8>, CodecError> {
        let mut bytes = serde_json::to_vec_pretty(&Document::from(configuration))?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct Document {
    #[serde(rename = "currentContext", default)]
    current_context: String,
    #[serde(default)]
    contexts: BTreeMap<String, Context>,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct Context {
    #[serde(default)]
    host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    basic_authentication: Option<Basic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kerberos_authentication: Option<Kerberos>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    token: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    timeout: String,
    #[serde(default, skip_serializing_if = "is_false")]
    debug: bool,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct Basic {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct Kerberos {
    #[serde(default)]
    conf_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    with_password: Option<KerberosPassword>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    with_keytab: Option<KerberosKeytab>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    from_ccache: Option<KerberosCCache>,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct KerberosPassword {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    realm: String,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct KerberosKeytab {
    #[serde(default)]
    username: String,
    #[serde(default)]
    keytab_file: String,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct KerberosCCache {
    #[serde(default)]
    ccache_file: String,
}

wire_conversions!();
