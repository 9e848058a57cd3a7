// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Lenses CLI Authors

//! # lenses-cli
//!
//! Command-line client for the Lenses REST API. This binary manages the
//! connection contexts the client works with: where each Lenses backend
//! lives and how to authenticate against it.

#![deny(
    nonstandard_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    while_true,
    missing_debug_implementations,
    trivial_numeric_casts,
    unused_allocation,
    unused_comparisons,
    unused_parens,
    unused_extern_crates,
    unused_import_braces
)]

mod commands;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use lenses_cli::config::{
    Authentication, BasicAuthentication, ClientConfiguration, ConfigError, ConfigurationResolver,
    KerberosAuthentication, KerberosMethod, LoadedConfiguration,
};
use lenses_cli::error::LensesCliError;
use log::{debug, error, warn};
use serde_json::Value;
use std::path::PathBuf;
use std::process;

use crate::commands::configure::{self, ConfigureParams};
use crate::commands::{context, Store};
use crate::output::OutputHandler;

/// Command-line client for the Lenses REST API
#[derive(Parser, Debug)]
#[command(
    name = "lenses-cli",
    version,
    about = "Command-line client for the Lenses REST API",
    long_about = "lenses-cli manages the contexts used to reach Lenses backends: \
                  their hosts, credentials and timeouts, stored in a JSON or YAML file.",
    after_long_help = "CONFIGURATION SOURCES (highest to lowest priority):\n  \
        1. Command-line arguments (--host, --token, --user, ...)\n  \
        2. Environment variables (LENSES_HOST, LENSES_TOKEN, ...)\n  \
        3. Configuration file (~/.lenses/lenses-cli.yml, ./lenses.yml, ...)\n\n\
        Run `lenses-cli configure` to create a configuration file interactively."
)]
struct Cli {
    /// Configuration file path; it must exist unless running `configure`
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Context to use instead of the current one
    #[arg(long, global = true, env = "LENSES_CONTEXT", value_name = "NAME")]
    context: Option<String>,

    /// Lenses host, e.g. https://lenses.example.com:443
    #[arg(long, global = true, env = "LENSES_HOST", value_name = "HOST")]
    host: Option<String>,

    /// Access token
    #[arg(
        long,
        global = true,
        env = "LENSES_TOKEN",
        hide_env_values = true,
        value_name = "TOKEN"
    )]
    token: Option<String>,

    /// Username (basic or kerberos authentication)
    #[arg(long, global = true, env = "LENSES_USER", value_name = "USER")]
    user: Option<String>,

    /// Password (basic or kerberos authentication)
    #[arg(
        long,
        global = true,
        env = "LENSES_PASSWORD",
        hide_env_values = true,
        value_name = "PASSWORD"
    )]
    pass: Option<String>,

    /// Kerberos configuration file; selects kerberos authentication
    #[arg(long, global = true, value_name = "FILE")]
    kerberos_conf: Option<String>,

    /// Kerberos keytab file
    #[arg(long, global = true, value_name = "FILE", conflicts_with = "kerberos_ccache")]
    kerberos_keytab: Option<String>,

    /// Kerberos credentials cache file
    #[arg(long, global = true, value_name = "FILE")]
    kerberos_ccache: Option<String>,

    /// Kerberos realm, used with a password
    #[arg(long, global = true, value_name = "REALM")]
    realm: Option<String>,

    /// Connection timeout, e.g. 30s or 1m30s
    #[arg(long, global = true, env = "LENSES_TIMEOUT", value_name = "DURATION")]
    timeout: Option<String>,

    /// Print the configuration of the context before running
    #[arg(long, global = true)]
    debug: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except results
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "json")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available output formats
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum OutputFormat {
    /// JSON output (default)
    Json,
    /// Human-readable table format
    Table,
    /// YAML output
    Yaml,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Create or update the current context
    Configure {
        /// Run without interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },
    /// List all contexts
    Contexts,
    /// Show the current context, with command-line values applied
    Context {
        /// Context to show instead of the current one
        #[arg(value_name = "NAME")]
        name: Option<String>,
    },
    /// Make another context the current one
    UseContext {
        /// Context name
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Remove a context
    RemoveContext {
        /// Context name
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Forget the tokens of every context
    Logout,
}

impl Cli {
    /// The connection values given on the command line or in the environment
    fn overrides(&self) -> ClientConfiguration {
        ClientConfiguration {
            host: self.host.clone().unwrap_or_default(),
            authentication: self.authentication(),
            token: self.token.clone().unwrap_or_default(),
            timeout: self.timeout.clone().unwrap_or_default(),
            debug: self.debug,
        }
    }

    fn authentication(&self) -> Option<Authentication> {
        let username = self.user.clone().unwrap_or_default();
        let password = self.pass.clone().unwrap_or_default();

        let kerberos = self.kerberos_conf.is_some()
            || self.kerberos_keytab.is_some()
            || self.kerberos_ccache.is_some()
            || self.realm.is_some();

        if kerberos {
            let method = if let Some(ccache_file) = &self.kerberos_ccache {
                KerberosMethod::FromCCache {
                    ccache_file: ccache_file.clone(),
                }
            } else if let Some(keytab_file) = &self.kerberos_keytab {
                KerberosMethod::WithKeytab {
                    username,
                    keytab_file: keytab_file.clone(),
                }
            } else {
                KerberosMethod::WithPassword {
                    username,
                    password,
                    realm: self.realm.clone().unwrap_or_default(),
                }
            };

            return Some(
                KerberosAuthentication {
                    conf_file: self.kerberos_conf.clone().unwrap_or_default(),
                    method,
                }
                .into(),
            );
        }

        if self.user.is_some() || self.pass.is_some() {
            return Some(BasicAuthentication::new(username, password).into());
        }

        None
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbose, cli.quiet);

    let resolver = ConfigurationResolver::new();
    debug!("Configuration search roots: {:?}", resolver.roots());

    let store = Store {
        resolver: &resolver,
        explicit: cli.config.as_deref(),
    };

    let Some(command) = &cli.command else {
        handle_no_command(&store);
        return;
    };

    let output = OutputHandler::new(cli.format, cli.quiet);

    let result = execute_command(&cli, command, &store, &output)
        .and_then(|response| output.success(response));

    if let Err(e) = result {
        error!("Command failed: {e}");
        if matches!(&e, LensesCliError::Config(c) if c.is_recoverable()) {
            output.hint("Run `lenses-cli configure` to set up a context.");
        }
        output.error(e);
        process::exit(1);
    }
}

/// Initialize logging based on verbosity level
///
/// Logs go to stderr so that results on stdout stay parseable.
fn init_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let log_level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    pretty_env_logger::formatted_builder()
        .filter_level(log_level)
        .target(pretty_env_logger::env_logger::Target::Stderr)
        .init();
}

/// Without a subcommand: summarize the configuration and print help
fn handle_no_command(store: &Store<'_>) {
    use std::io::IsTerminal;

    let loaded = match store.resolver.load_or_default(store.explicit) {
        Ok(loaded) => loaded,
        Err(e) => {
            warn!("Configuration: {e}");
            LoadedConfiguration::default()
        }
    };

    print_config_summary(&loaded);

    if !loaded.has_config_file() {
        eprintln!("No configuration file found.");
        if std::io::stdin().is_terminal() {
            eprintln!("  Tip: Run `lenses-cli configure` to create one.");
        }
        eprintln!();
    }

    let mut cmd = Cli::command();
    let _ = cmd.print_help();
}

fn print_config_summary(loaded: &LoadedConfiguration) {
    let configuration = &loaded.configuration;

    if let Some(path) = &loaded.loaded_from {
        eprintln!(
            "Configuration: {} ({})",
            path.display(),
            loaded.format.unwrap_or("unknown format")
        );
    }

    if configuration.contexts.is_empty() {
        return;
    }

    let state = match configuration.current() {
        Some(current) if current.is_valid() => "valid",
        Some(_) => "incomplete",
        None => "missing",
    };
    eprintln!(
        "Current context: {} ({state})",
        configuration.current_context
    );
    eprintln!(
        "Contexts: {}",
        configuration.context_names().collect::<Vec<_>>().join(", ")
    );
    eprintln!();
}

/// Print the redacted current context when it asks for debugging
fn print_debug(loaded: &LoadedConfiguration) {
    if let Some(current) = loaded.configuration.current().filter(|c| c.debug) {
        eprintln!("{current:#?}");
    }
}

fn execute_command(
    cli: &Cli,
    command: &Commands,
    store: &Store<'_>,
    output: &OutputHandler,
) -> Result<Value, LensesCliError> {
    let resolver = store.resolver;
    let selected = cli.context.as_deref();

    match command {
        Commands::Configure { non_interactive } => {
            // `configure` may create the explicit file.
            let mut loaded = match resolver.load_or_default(store.explicit) {
                Err(ConfigError::NotFound { .. }) => LoadedConfiguration::default(),
                other => other?,
            };
            if let Some(name) = selected {
                loaded.configuration.set_current(name);
            }
            print_debug(&loaded);

            configure::execute(
                store,
                loaded,
                ConfigureParams {
                    non_interactive: *non_interactive,
                    overrides: cli.overrides(),
                },
                output,
            )
        }
        Commands::Contexts => Ok(context::list(&resolver.load_or_default(store.explicit)?)),
        Commands::Context { name } => {
            let loaded = resolver.resolve(
                store.explicit,
                cli.overrides(),
                name.as_deref().or(selected),
            )?;
            print_debug(&loaded);
            context::show(&loaded)
        }
        Commands::UseContext { name } => {
            context::use_context(store, resolver.load(store.explicit)?, name)
        }
        Commands::RemoveContext { name } => {
            context::remove_context(store, resolver.load(store.explicit)?, name)
        }
        Commands::Logout => context::logout(store, resolver.load(store.explicit)?),
    }
}
