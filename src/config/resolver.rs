// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Lenses CLI Authors

//! Loading, merging and saving the configuration
//!
//! [`ConfigurationResolver`] ties the locator to the rest of the program:
//!
//! 1. an explicit file (`--config`) is read as-is and must exist;
//! 2. otherwise the search roots are scanned (see [`super::locator`]);
//! 3. hosts are normalized;
//! 4. command-line values are merged into the selected context.
//!
//! Rewriting the file a configuration came from keeps the format it was
//! written in; a new file gets the format of its extension.

use super::client::ClientConfiguration;
use super::codec::{codec_for_path, codec_named, ConfigurationCodec};
use super::configuration::{Configuration, DEFAULT_CONTEXT_KEY};
use super::error::ConfigError;
use super::locator::{
    default_search_roots, home_dir, ConfigurationLocator, HOME_CONFIGURATION_DIR,
};
use std::fs;
use std::path::{Path, PathBuf};

/// File written when no configuration was loaded
pub const DEFAULT_CONFIGURATION_FILENAME: &str = "lenses-cli.yml";

/// A configuration and its origin
#[derive(Debug, Clone, Default)]
pub struct LoadedConfiguration {
    /// The configuration, with normalized hosts
    pub configuration: Configuration,
    /// The file it was read from; `None` when nothing was found
    pub loaded_from: Option<PathBuf>,
    /// Name of the format the file was written in
    pub format: Option<&'static str>,
}

impl LoadedConfiguration {
    /// Whether a configuration file was found
    pub fn has_config_file(&self) -> bool {
        self.loaded_from.is_some()
    }
}

/// Loads and saves configurations
#[derive(Debug)]
pub struct ConfigurationResolver {
    locator: ConfigurationLocator,
    roots: Vec<PathBuf>,
}

impl Default for ConfigurationResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationResolver {
    /// A resolver over the default search roots and codecs
    pub fn new() -> Self {
        Self::with_roots(default_search_roots())
    }

    /// A resolver over the given search roots, in priority order
    pub fn with_roots(roots: Vec<PathBuf>) -> Self {
        Self {
            locator: ConfigurationLocator::new(),
            roots,
        }
    }

    /// Replace the locator, e.g. to restrict the formats
    pub fn with_locator(mut self, locator: ConfigurationLocator) -> Self {
        self.locator = locator;
        self
    }

    /// The directories searched when no explicit file is given
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Read the configuration
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotFound`] if `explicit` does not exist or, without
    /// it, no search root holds a configuration file. See
    /// [`ConfigurationLocator::search`] for the other cases.
    pub fn load(&self, explicit: Option<&Path>) -> Result<LoadedConfiguration, ConfigError> {
        let located = match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::NotFound {
                        searched: vec![path.to_path_buf()],
                    });
                }
                self.locator.read_file(path)?
            }
            None => self.locator.search(&self.roots)?,
        };

        log::info!(
            "Loaded {} configuration from {}",
            located.format,
            located.path.display()
        );

        let mut configuration = located.configuration;
        configuration.format_hosts();

        Ok(LoadedConfiguration {
            configuration,
            loaded_from: Some(located.path),
            format: Some(located.format),
        })
    }

    /// Like [`load`](Self::load), but a missing file yields an empty
    /// configuration
    ///
    /// A missing explicit file is still an error.
    pub fn load_or_default(
        &self,
        explicit: Option<&Path>,
    ) -> Result<LoadedConfiguration, ConfigError> {
        match self.load(explicit) {
            Err(ConfigError::NotFound { searched }) if explicit.is_none() => {
                log::info!(
                    "No configuration file found in {} directories, starting empty",
                    searched.len()
                );
                Ok(LoadedConfiguration::default())
            }
            other => other,
        }
    }

    /// Load, select `context`, merge `overrides` and validate
    ///
    /// The overrides go into the current context after selection. An empty
    /// override changes nothing.
    ///
    /// # Errors
    ///
    /// Load errors other than a missing file,
    /// [`ConfigError::InvalidConfiguration`] when the result is unusable and
    /// [`ConfigError::ContextNotFound`] when the selected context is absent.
    pub fn resolve(
        &self,
        explicit: Option<&Path>,
        overrides: ClientConfiguration,
        context: Option<&str>,
    ) -> Result<LoadedConfiguration, ConfigError> {
        let mut loaded = self.load_or_default(explicit)?;
        let configuration = &mut loaded.configuration;

        if let Some(name) = context {
            log::debug!("Selecting context '{name}'");
            configuration.set_current(name);
        }

        if overrides != ClientConfiguration::default() {
            if configuration.current_context.is_empty() && !configuration.contexts.contains_key("")
            {
                configuration.set_current(DEFAULT_CONTEXT_KEY);
            }
            let valid = configuration.fill_current(overrides);
            log::debug!(
                "Applied command-line values to '{}' (valid: {valid})",
                configuration.current_context
            );
            configuration.format_hosts();
        }

        configuration.validate()?;
        if !configuration.current_context_exists() {
            return Err(ConfigError::ContextNotFound {
                name: configuration.current_context.clone(),
            });
        }
        Ok(loaded)
    }

    /// The file a configuration loaded into `loaded` should be written to
    ///
    /// # Errors
    ///
    /// [`ConfigError::NoHomeDirectory`] when nothing was loaded and the home
    /// directory is unknown.
    pub fn save_path(&self, loaded: &LoadedConfiguration) -> Result<PathBuf, ConfigError> {
        match &loaded.loaded_from {
            Some(path) => Ok(path.clone()),
            None => default_save_path(),
        }
    }

    /// Write `configuration` to `path`, creating parent directories
    ///
    /// `.json` files are written as JSON, anything else as YAML.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Codec`] if encoding fails, [`ConfigError::Io`] if
    /// writing does.
    pub fn save(&self, configuration: &Configuration, path: &Path) -> Result<(), ConfigError> {
        write_with(codec_for_path(path).as_ref(), configuration, path)
    }

    /// Write `loaded` to `path`
    ///
    /// When `path` is the file `loaded` was read from, the detected format
    /// is kept whatever the extension says. Otherwise behaves like
    /// [`save`](Self::save).
    ///
    /// # Errors
    ///
    /// As [`save`](Self::save).
    pub fn save_loaded(
        &self,
        loaded: &LoadedConfiguration,
        path: &Path,
    ) -> Result<(), ConfigError> {
        let detected = loaded
            .format
            .filter(|_| loaded.loaded_from.as_deref() == Some(path))
            .and_then(codec_named);

        match detected {
            Some(codec) => write_with(codec.as_ref(), &loaded.configuration, path),
            None => self.save(&loaded.configuration, path),
        }
    }
}

fn write_with(
    codec: &dyn ConfigurationCodec,
    configuration: &Configuration,
    path: &Path,
) -> Result<(), ConfigError> {
    let bytes = codec.encode(configuration)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
    }
    fs::write(path, bytes).map_err(|e| ConfigError::io(path, e))?;

    log::info!("Saved {} configuration to {}", codec.name(), path.display());
    Ok(())
}

/// `<home>/.lenses/lenses-cli.yml`
///
/// # Errors
///
/// [`ConfigError::NoHomeDirectory`] when the home directory is unknown.
pub fn default_save_path() -> Result<PathBuf, ConfigError> {
    let home = home_dir().ok_or(ConfigError::NoHomeDirectory)?;
    Ok(home
        .join(HOME_CONFIGURATION_DIR)
        .join(DEFAULT_CONFIGURATION_FILENAME))
}
