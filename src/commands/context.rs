// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Lenses CLI Authors

//! Context management commands
//!
//! `contexts`, `context`, `use-context`, `remove-context` and `logout`.
//! None of them talk to a Lenses backend; they only read and rewrite the
//! configuration file.

use super::Store;
use lenses_cli::config::{
    Authentication, ClientConfiguration, KerberosMethod, LoadedConfiguration,
};
use lenses_cli::error::LensesCliError;
use log::debug;
use serde_json::{json, Value};

const REDACTED: &str = "********";

/// Redacted view of one context
///
/// Passwords are never included and a token only shows whether it is set.
pub fn describe(name: &str, cfg: &ClientConfiguration, current: bool) -> Value {
    let problem = cfg.validate(name).err().map(|e| e.to_string());
    let token = (!cfg.token.is_empty()).then_some(REDACTED);
    let timeout = (!cfg.timeout.is_empty()).then_some(cfg.timeout.as_str());

    json!({
        "name": name,
        "current": current,
        "host": cfg.host,
        "authentication": cfg.authentication.as_ref().map(describe_authentication),
        "token": token,
        "timeout": timeout,
        "debug": cfg.debug,
        "valid": problem.is_none(),
        "problem": problem,
    })
}

fn describe_authentication(auth: &Authentication) -> Value {
    let mut value = json!({ "kind": auth.kind() });

    let details = match auth {
        Authentication::Basic(basic) => json!({ "username": basic.username }),
        Authentication::Kerberos(kerberos) => match &kerberos.method {
            KerberosMethod::WithPassword {
                username, realm, ..
            } => json!({
                "method": kerberos.method.kind(),
                "conf_file": kerberos.conf_file,
                "username": username,
                "realm": realm,
            }),
            KerberosMethod::WithKeytab {
                username,
                keytab_file,
            } => json!({
                "method": kerberos.method.kind(),
                "conf_file": kerberos.conf_file,
                "username": username,
                "keytab_file": keytab_file,
            }),
            KerberosMethod::FromCCache { ccache_file } => json!({
                "method": kerberos.method.kind(),
                "conf_file": kerberos.conf_file,
                "ccache_file": ccache_file,
            }),
        },
    };

    if let (Value::Object(target), Value::Object(extra)) = (&mut value, details) {
        target.extend(extra);
    }
    value
}

/// `contexts`: every context with its validity
pub fn list(loaded: &LoadedConfiguration) -> Value {
    let configuration = &loaded.configuration;
    let contexts: Vec<Value> = configuration
        .contexts
        .iter()
        .map(|(name, cfg)| {
            json!({
                "name": name,
                "current": *name == configuration.current_context,
                "host": cfg.host,
                "valid": cfg.is_valid(),
            })
        })
        .collect();

    json!({
        "config_file": loaded.loaded_from.as_ref().map(|p| p.display().to_string()),
        "current_context": configuration.current_context,
        "contexts": contexts,
    })
}

/// `context`: the current context
pub fn show(loaded: &LoadedConfiguration) -> Result<Value, LensesCliError> {
    let configuration = &loaded.configuration;
    let name = &configuration.current_context;

    let cfg = configuration
        .current()
        .ok_or_else(|| LensesCliError::context_not_found(name.as_str()))?;

    Ok(describe(name, cfg, true))
}

/// `use-context NAME`: switch to an existing context and save
pub fn use_context(
    store: &Store<'_>,
    mut loaded: LoadedConfiguration,
    name: &str,
) -> Result<Value, LensesCliError> {
    let configuration = &mut loaded.configuration;
    if !configuration.contexts.contains_key(name) {
        return Err(LensesCliError::context_not_found(name));
    }

    let previous = std::mem::take(&mut configuration.current_context);
    configuration.set_current(name);
    debug!("Current context: '{previous}' -> '{name}'");

    let path = store.save(&loaded)?;

    Ok(json!({
        "status": "success",
        "config_file": path.display().to_string(),
        "previous_context": previous,
        "current_context": name,
    }))
}

/// `remove-context NAME`
///
/// Removing the current context moves the current pointer to another valid
/// context. When there is none the configuration is left untouched and the
/// command fails.
pub fn remove_context(
    store: &Store<'_>,
    mut loaded: LoadedConfiguration,
    name: &str,
) -> Result<Value, LensesCliError> {
    let configuration = &mut loaded.configuration;
    if !configuration.contexts.contains_key(name) {
        return Err(LensesCliError::context_not_found(name));
    }

    if !configuration.remove_context(name) {
        return Err(LensesCliError::removal_refused(
            name,
            "it is the current context and no other valid context exists",
        ));
    }

    let current = configuration.current_context.clone();
    let path = store.save(&loaded)?;

    Ok(json!({
        "status": "success",
        "config_file": path.display().to_string(),
        "removed_context": name,
        "current_context": current,
    }))
}

/// `logout`: forget the token of every context and save
pub fn logout(store: &Store<'_>, mut loaded: LoadedConfiguration) -> Result<Value, LensesCliError> {
    let cleared: Vec<String> = loaded
        .configuration
        .contexts
        .iter()
        .filter(|(_, cfg)| !cfg.token.is_empty())
        .map(|(name, _)| name.clone())
        .collect();

    loaded.configuration.remove_tokens();
    let path = store.save(&loaded)?;

    Ok(json!({
        "status": "success",
        "config_file": path.display().to_string(),
        "cleared_tokens": cleared,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lenses_cli::config::{
        BasicAuthentication, Configuration, ConfigurationResolver, KerberosAuthentication,
    };
    use std::path::PathBuf;

    fn valid(host: &str, token: &str) -> ClientConfiguration {
        ClientConfiguration {
            host: host.to_string(),
            authentication: Some(BasicAuthentication::new("admin", "secret").into()),
            token: token.to_string(),
            ..Default::default()
        }
    }

    fn loaded(current: &str, contexts: Vec<(&str, ClientConfiguration)>) -> LoadedConfiguration {
        LoadedConfiguration {
            configuration: Configuration {
                current_context: current.to_string(),
                contexts: contexts
                    .into_iter()
                    .map(|(name, cfg)| (name.to_string(), cfg))
                    .collect(),
            },
            loaded_from: None,
            format: None,
        }
    }

    fn store_at<'a>(resolver: &'a ConfigurationResolver, path: &'a PathBuf) -> Store<'a> {
        Store {
            resolver,
            explicit: Some(path.as_path()),
        }
    }

    #[test]
    fn test_describe_never_leaks_secrets() {
        let value = describe("dev", &valid("http://dev:80", "tok"), true);
        let text = value.to_string();

        assert!(!text.contains("secret"));
        assert!(!text.contains("tok\""));
        assert_eq!(value["token"], REDACTED);
        assert_eq!(value["authentication"]["kind"], "basic");
        assert_eq!(value["authentication"]["username"], "admin");
        assert_eq!(value["valid"], true);
    }

    #[test]
    fn test_describe_kerberos_and_problems() {
        let cfg = ClientConfiguration {
            authentication: Some(
                KerberosAuthentication {
                    conf_file: "/etc/krb5.conf".to_string(),
                    method: KerberosMethod::WithPassword {
                        username: "svc".to_string(),
                        password: "hunter2".to_string(),
                        realm: "EXAMPLE.COM".to_string(),
                    },
                }
                .into(),
            ),
            ..Default::default()
        };
        let value = describe("k", &cfg, false);

        assert!(!value.to_string().contains("hunter2"));
        assert_eq!(value["authentication"]["realm"], "EXAMPLE.COM");
        assert_eq!(value["valid"], false);
        assert_eq!(value["problem"], "context 'k': host is required");
    }

    #[test]
    fn test_list_marks_current_and_validity() {
        let loaded = loaded(
            "b",
            vec![("a", ClientConfiguration::default()), ("b", valid("http://b:80", ""))],
        );
        let value = list(&loaded);

        assert_eq!(value["current_context"], "b");
        assert_eq!(value["contexts"][0]["name"], "a");
        assert_eq!(value["contexts"][0]["valid"], false);
        assert_eq!(value["contexts"][1]["current"], true);
        assert_eq!(value["config_file"], Value::Null);
    }

    #[test]
    fn test_show_unknown_context() {
        let mut loaded = loaded("nope", vec![("a", valid("http://a:80", ""))]);
        assert!(matches!(
            show(&loaded),
            Err(LensesCliError::ContextNotFound { .. })
        ));

        loaded.configuration.set_current("a");
        let value = show(&loaded).unwrap(); //#[allow_ci]
        assert_eq!(value["name"], "a");
        assert_eq!(value["current"], true);
    }

    #[test]
    fn test_use_context_saves() {
        let dir = tempfile::tempdir().unwrap(); //#[allow_ci]
        let path = dir.path().join("lenses-cli.yml");
        let resolver = ConfigurationResolver::with_roots(vec![]);
        let store = store_at(&resolver, &path);

        let loaded = loaded(
            "a",
            vec![("a", valid("http://a:80", "")), ("b", valid("http://b:80", ""))],
        );
        let value = use_context(&store, loaded.clone(), "b").unwrap(); //#[allow_ci]
        assert_eq!(value["previous_context"], "a");

        let saved = resolver.load(Some(path.as_path())).unwrap(); //#[allow_ci]
        assert_eq!(saved.configuration.current_context, "b");

        assert!(matches!(
            use_context(&store, loaded, "zzz"),
            Err(LensesCliError::ContextNotFound { .. })
        ));
    }

    #[test]
    fn test_remove_context_refusal_writes_nothing() {
        let dir = tempfile::tempdir().unwrap(); //#[allow_ci]
        let path = dir.path().join("lenses-cli.yml");
        let resolver = ConfigurationResolver::with_roots(vec![]);
        let store = store_at(&resolver, &path);

        let loaded = loaded("a", vec![("a", valid("http://a:80", ""))]);
        assert!(matches!(
            remove_context(&store, loaded, "a"),
            Err(LensesCliError::RemovalRefused { .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_remove_current_context_switches() {
        let dir = tempfile::tempdir().unwrap(); //#[allow_ci]
        let path = dir.path().join("lenses.json");
        let resolver = ConfigurationResolver::with_roots(vec![]);
        let store = store_at(&resolver, &path);

        let loaded = loaded(
            "a",
            vec![("a", valid("http://a:80", "")), ("b", valid("http://b:80", ""))],
        );
        let value = remove_context(&store, loaded, "a").unwrap(); //#[allow_ci]
        assert_eq!(value["current_context"], "b");

        let saved = resolver.load(Some(path.as_path())).unwrap(); //#[allow_ci]
        assert_eq!(saved.format, Some("JSON"));
        assert_eq!(saved.configuration.context_names().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_logout_clears_tokens() {
        let dir = tempfile::tempdir().unwrap(); //#[allow_ci]
        let path = dir.path().join("lenses-cli.yml");
        let resolver = ConfigurationResolver::with_roots(vec![]);
        let store = store_at(&resolver, &path);

        let loaded = loaded(
            "a",
            vec![("a", valid("http://a:80", "t1")), ("b", valid("http://b:80", ""))],
        );
        let value = logout(&store, loaded).unwrap(); //#[allow_ci]
        assert_eq!(value["cleared_tokens"], json!(["a"]));

        let saved = resolver.load(Some(path.as_path())).unwrap(); //#[allow_ci]
        assert!(saved.configuration.contexts.values().all(|c| c.token.is_empty()));
    }
}
