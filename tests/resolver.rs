// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Lenses CLI Authors

//! End-to-end tests of configuration discovery, merging and saving.

use lenses_cli::config::locator::CONFIGURATION_FILENAMES;
use lenses_cli::config::{
    BasicAuthentication, ClientConfiguration, ConfigError, ConfigurationResolver,
    DEFAULT_CONTEXT_KEY,
};
use std::fs;

const MINIMAL_YAML: &str = "CurrentContext: master
Contexts:
  master:
    Host: x:443
    BasicAuthentication:
      Username: admin
      Password: admin
";

const MINIMAL_JSON: &str = r#"{
  "currentContext": "master",
  "contexts": {
    "master": {
      "host": "x:443",
      "basic_authentication": {"username": "admin", "password": "admin"}
    }
  }
}"#;

fn resolver_in(dir: &tempfile::TempDir) -> ConfigurationResolver {
    ConfigurationResolver::with_roots(vec![dir.path().to_path_buf()])
}

#[test]
fn test_empty_directory_is_not_found() {
    let dir = tempfile::tempdir().unwrap(); //#[allow_ci]
    let resolver = resolver_in(&dir);

    match resolver.load(None) {
        Err(ConfigError::NotFound { searched }) => {
            assert_eq!(searched, vec![dir.path().to_path_buf()])
        }
        other => panic!("expected NotFound, got {other:?}"), //#[allow_ci]
    }

    let loaded = resolver.load_or_default(None).unwrap(); //#[allow_ci]
    assert!(!loaded.has_config_file());
    assert!(loaded.configuration.contexts.is_empty());
}

#[test]
fn test_minimal_document_under_every_filename() {
    for name in CONFIGURATION_FILENAMES {
        let dir = tempfile::tempdir().unwrap(); //#[allow_ci]
        let contents = if name.ends_with(".json") {
            MINIMAL_JSON
        } else {
            MINIMAL_YAML
        };
        fs::write(dir.path().join(name), contents).unwrap(); //#[allow_ci]

        let loaded = resolver_in(&dir)
            .load(None)
            .unwrap_or_else(|e| panic!("{name}: {e}")); //#[allow_ci]

        assert!(loaded.configuration.is_valid(), "{name}");
        assert_eq!(loaded.loaded_from, Some(dir.path().join(name)));
        assert_eq!(
            loaded.configuration.contexts[DEFAULT_CONTEXT_KEY].host,
            "https://x:443"
        );
    }
}

#[test]
fn test_broken_document_is_a_decode_error() {
    let dir = tempfile::tempdir().unwrap(); //#[allow_ci]
    fs::write(dir.path().join("lenses.yml"), "Contexts: [unterminated").unwrap(); //#[allow_ci]

    let err = resolver_in(&dir).load(None).unwrap_err(); //#[allow_ci]
    match &err {
        ConfigError::Decode { path, formats } => {
            assert_eq!(path, &dir.path().join("lenses.yml"));
            assert!(formats.contains(&"JSON"));
            assert!(formats.contains(&"YAML"));
        }
        other => panic!("expected Decode, got {other:?}"), //#[allow_ci]
    }
    assert!(err.to_string().contains("not formatted to a compatible document"));

    // A broken file is not silently replaced by an empty configuration.
    assert!(resolver_in(&dir).load_or_default(None).is_err());
}

#[test]
fn test_resolve_applies_overrides_to_selected_context() {
    let dir = tempfile::tempdir().unwrap(); //#[allow_ci]
    fs::write(
        dir.path().join("lenses-cli.yml"),
        "CurrentContext: master
Contexts:
  master:
    Host: x:443
    Token: t
  dev:
    Host: dev:3030
    Token: d
",
    )
    .unwrap(); //#[allow_ci]

    let overrides = ClientConfiguration {
        timeout: "10s".to_string(),
        ..Default::default()
    };
    let loaded = resolver_in(&dir)
        .resolve(None, overrides, Some("dev"))
        .unwrap(); //#[allow_ci]

    let configuration = &loaded.configuration;
    assert_eq!(configuration.current_context, "dev");
    assert_eq!(configuration.contexts["dev"].timeout, "10s");
    assert_eq!(configuration.contexts["dev"].host, "http://dev:3030");
    assert_eq!(configuration.contexts["master"].timeout, "");
}

#[test]
fn test_resolve_without_file_builds_default_context() {
    let dir = tempfile::tempdir().unwrap(); //#[allow_ci]
    let resolver = resolver_in(&dir);

    let overrides = ClientConfiguration {
        host: "lenses:443".to_string(),
        authentication: Some(BasicAuthentication::new("admin", "admin").into()),
        ..Default::default()
    };
    let loaded = resolver.resolve(None, overrides, None).unwrap(); //#[allow_ci]
    assert_eq!(loaded.configuration.current_context, DEFAULT_CONTEXT_KEY);
    assert!(loaded.configuration.is_valid());

    // Incomplete values cannot stand in for a configuration file.
    let partial = ClientConfiguration {
        host: "lenses:443".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        resolver.resolve(None, partial, None),
        Err(ConfigError::InvalidConfiguration(_))
    ));
}

#[test]
fn test_save_then_reload_keeps_format_and_contents() {
    let dir = tempfile::tempdir().unwrap(); //#[allow_ci]
    fs::write(dir.path().join("lenses.json"), MINIMAL_JSON).unwrap(); //#[allow_ci]
    let resolver = resolver_in(&dir);

    let mut loaded = resolver.load(None).unwrap(); //#[allow_ci]
    assert_eq!(loaded.format, Some("JSON"));

    loaded.configuration.set_current("dev");
    loaded.configuration.get_current().host = "dev:3030".to_string();
    loaded.configuration.get_current().token = "abc".to_string();

    let path = resolver.save_path(&loaded).unwrap(); //#[allow_ci]
    assert_eq!(path, dir.path().join("lenses.json"));
    resolver.save(&loaded.configuration, &path).unwrap(); //#[allow_ci]

    let reloaded = resolver.load(None).unwrap(); //#[allow_ci]
    assert_eq!(reloaded.format, Some("JSON"));
    assert_eq!(reloaded.configuration.current_context, "dev");
    assert_eq!(reloaded.configuration.contexts["dev"].host, "http://dev:3030");
    assert_eq!(reloaded.configuration.contexts["dev"].token, "abc");
    assert_eq!(
        reloaded.configuration.contexts[DEFAULT_CONTEXT_KEY],
        loaded.configuration.contexts[DEFAULT_CONTEXT_KEY]
    );
}
