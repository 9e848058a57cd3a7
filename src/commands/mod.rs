// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Lenses CLI Authors

//! Command implementations for lenses-cli

pub mod configure;
pub mod context;

use lenses_cli::config::{ConfigurationResolver, LoadedConfiguration};
use lenses_cli::error::{ErrorContext, LensesCliError};
use std::path::{Path, PathBuf};

/// Where a command reads its configuration from and writes it back to
#[derive(Debug)]
pub struct Store<'a> {
    /// Locates, loads and saves configuration files
    pub resolver: &'a ConfigurationResolver,
    /// `--config`, if given
    pub explicit: Option<&'a Path>,
}

impl Store<'_> {
    /// The file `loaded` is saved to: the explicit file, the file it was
    /// read from, or the default location
    pub fn target(&self, loaded: &LoadedConfiguration) -> Result<PathBuf, LensesCliError> {
        match self.explicit {
            Some(path) => Ok(path.to_path_buf()),
            None => Ok(self.resolver.save_path(loaded)?),
        }
    }

    /// Save `loaded` to its [`target`](Self::target)
    pub fn save(&self, loaded: &LoadedConfiguration) -> Result<PathBuf, LensesCliError> {
        let path = self.target(loaded)?;
        self.resolver
            .save_loaded(loaded, &path)
            .with_context(|| format!("Failed to save configuration to {}", path.display()))?;
        Ok(path)
    }
}
