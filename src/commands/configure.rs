// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Lenses CLI Authors

//! Configuration wizard for lenses-cli
//!
//! Merges the command-line values into the current context, asks for
//! whatever is still missing (interactive mode only), and saves the result.

use super::context::describe;
use super::Store;
use crate::output::OutputHandler;
use lenses_cli::config::{ClientConfiguration, LoadedConfiguration};
use lenses_cli::error::LensesCliError;
use log::debug;
use serde_json::{json, Value};

/// Parameters of `configure`
#[derive(Debug)]
pub struct ConfigureParams {
    /// Fail instead of prompting for missing values
    pub non_interactive: bool,
    /// Values given on the command line or in the environment
    pub overrides: ClientConfiguration,
}

/// Run `configure`
pub fn execute(
    store: &Store<'_>,
    mut loaded: LoadedConfiguration,
    params: ConfigureParams,
    output: &OutputHandler,
) -> Result<Value, LensesCliError> {
    let configuration = &mut loaded.configuration;
    let complete = configuration.get_current().fill(params.overrides);
    let name = configuration.current_context.clone();
    debug!("Context '{name}' after command-line values: complete={complete}");

    if !complete {
        if params.non_interactive {
            output.hint("Missing values; pass --host and --token or --user/--pass.");
        } else {
            #[cfg(feature = "wizard")]
            {
                wizard::run(configuration.get_current())?;
            }
            #[cfg(not(feature = "wizard"))]
            {
                output.info(
                    "Interactive mode requires the 'wizard' feature. \
                     Use --non-interactive or rebuild with --features wizard.",
                );
            }
        }
    }

    let current = configuration.get_current();
    current.validate(&name)?;
    let _ = current.timeout_duration(&name)?;
    configuration.format_hosts();

    let path = store.save(&loaded)?;
    output.info(format!("Configuration written to {}", path.display()));

    let summary = loaded
        .configuration
        .contexts
        .get(&name)
        .map(|cfg| describe(&name, cfg, true))
        .unwrap_or(Value::Null);

    Ok(json!({
        "status": "success",
        "config_file": path.display().to_string(),
        "current_context": name,
        "context": summary,
    }))
}

#[cfg(feature = "wizard")]
mod wizard {
    use dialoguer::{Input, Password, Select};
    use lenses_cli::config::{
        BasicAuthentication, ClientConfiguration, KerberosAuthentication, KerberosMethod,
    };
    use lenses_cli::error::LensesCliError;

    const METHODS: &[&str] = &[
        "token",
        "basic (username and password)",
        "kerberos with password",
        "kerberos with keytab",
        "kerberos from credentials cache",
    ];

    fn text(prompt: &str, default: &str, allow_empty: bool) -> Result<String, LensesCliError> {
        let mut input = Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(allow_empty);
        if !default.is_empty() {
            input = input.default(default.to_string());
        }
        Ok(input.interact_text()?)
    }

    fn secret(prompt: &str) -> Result<String, LensesCliError> {
        Ok(Password::new().with_prompt(prompt).interact()?)
    }

    /// Prompt for the values `cfg` lacks
    pub(super) fn run(cfg: &mut ClientConfiguration) -> Result<(), LensesCliError> {
        eprintln!("cannot retrieve credentials, please configure below");
        eprintln!();

        cfg.host = text("Host", &cfg.host, false)?;

        let method = Select::new()
            .with_prompt("Authentication")
            .items(METHODS)
            .default(1)
            .interact()?;

        match method {
            0 => {
                cfg.token = secret("Token")?;
            }
            1 => {
                let username = text("Username", "", false)?;
                let password = secret("Password")?;
                cfg.authentication = Some(BasicAuthentication::new(username, password).into());
            }
            _ => {
                let conf_file = text("Kerberos configuration file", "/etc/krb5.conf", false)?;
                let method = match method {
                    2 => KerberosMethod::WithPassword {
                        username: text("Username", "", false)?,
                        password: secret("Password")?,
                        realm: text("Realm (empty for the default realm)", "", true)?,
                    },
                    3 => KerberosMethod::WithKeytab {
                        username: text("Username (empty for the first keytab entry)", "", true)?,
                        keytab_file: text("Keytab file", "", false)?,
                    },
                    _ => KerberosMethod::FromCCache {
                        ccache_file: text("Credentials cache file", "", false)?,
                    },
                };
                cfg.authentication = Some(KerberosAuthentication { conf_file, method }.into());
            }
        }

        cfg.timeout = text("Timeout (e.g. 30s, empty for none)", &cfg.timeout, true)?;
        Ok(())
    }
}
