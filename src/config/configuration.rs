// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Lenses CLI Authors

//! Named contexts and the pointer to the current one
//!
//! A [`Configuration`] is a plain value: it is not synchronized, and callers
//! sharing one between threads must wrap it themselves.

use super::client::ClientConfiguration;
use super::error::ValidationError;
use log::debug;
use std::collections::BTreeMap;

/// Context created when none is selected
pub const DEFAULT_CONTEXT_KEY: &str = "master";

/// The whole persisted configuration
///
/// Contexts are kept in key order, which is also the order in which
/// [`remove_context`](Self::remove_context) looks for a replacement.
/// `Clone` is a deep copy: a clone never shares entries with its source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Configuration {
    /// Name of the current context; may name a context that does not exist
    pub current_context: String,
    /// All contexts by name
    pub contexts: BTreeMap<String, ClientConfiguration>,
}

impl Configuration {
    /// True if there is at least one context and every context is valid
    pub fn is_valid(&self) -> bool {
        !self.contexts.is_empty() && self.contexts.values().all(ClientConfiguration::is_valid)
    }

    /// Like [`is_valid`](Self::is_valid) but reports the first problem
    ///
    /// The current context is checked first so that its error is the one
    /// users see.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.contexts.is_empty() {
            return Err(ValidationError::NoContexts);
        }

        if let Some(current) = self.contexts.get(&self.current_context) {
            current.validate(&self.current_context)?;
        }

        self.contexts
            .iter()
            .try_for_each(|(name, cfg)| cfg.validate(name))
    }

    /// The current context, created on demand
    ///
    /// When `current_context` is empty it becomes [`DEFAULT_CONTEXT_KEY`].
    /// A missing entry is inserted as an empty configuration, which is
    /// invalid until filled.
    pub fn get_current(&mut self) -> &mut ClientConfiguration {
        if self.current_context.is_empty() && !self.contexts.contains_key("") {
            self.current_context = DEFAULT_CONTEXT_KEY.to_string();
        }

        if !self.contexts.contains_key(&self.current_context) {
            debug!("Creating empty context '{}'", self.current_context);
        }

        self.contexts
            .entry(self.current_context.clone())
            .or_default()
    }

    /// The current context, if it exists
    pub fn current(&self) -> Option<&ClientConfiguration> {
        self.contexts.get(&self.current_context)
    }

    /// Select another context; its existence is not checked
    pub fn set_current<S: Into<String>>(&mut self, name: S) {
        self.current_context = name.into();
    }

    /// Whether the current context has an entry
    pub fn current_context_exists(&self) -> bool {
        self.contexts.contains_key(&self.current_context)
    }

    /// Remove a context
    ///
    /// Removing the current context first moves the current pointer to the
    /// first other valid context. If there is none, nothing is removed and
    /// `false` is returned. Removing an unknown context also returns `false`.
    pub fn remove_context(&mut self, name: &str) -> bool {
        if !self.contexts.contains_key(name) {
            return false;
        }

        if self.current_context == name {
            let replacement = self
                .contexts
                .iter()
                .find(|(other, cfg)| other.as_str() != name && cfg.is_valid())
                .map(|(other, _)| other.clone());

            match replacement {
                Some(next) => {
                    debug!("Switching current context from '{name}' to '{next}'");
                    self.set_current(next);
                }
                None => {
                    debug!("Refusing to remove '{name}': no other valid context");
                    return false;
                }
            }
        }

        self.contexts.remove(name).is_some()
    }

    /// Clear the token of every context
    pub fn remove_tokens(&mut self) {
        for cfg in self.contexts.values_mut() {
            cfg.token.clear();
        }
    }

    /// Merge `other` into the current context
    ///
    /// Without an entry for the current context, `other` is adopted only if
    /// it is valid on its own. Returns whether the current context is valid
    /// afterwards.
    pub fn fill_current(&mut self, other: ClientConfiguration) -> bool {
        match self.contexts.get_mut(&self.current_context) {
            Some(current) => current.fill(other),
            None if other.is_valid() => {
                let _ = self.contexts.insert(self.current_context.clone(), other);
                true
            }
            None => false,
        }
    }

    /// Normalize the host of every context
    pub fn format_hosts(&mut self) {
        self.contexts
            .values_mut()
            .for_each(ClientConfiguration::format_host);
    }

    /// Context names in iteration order
    pub fn context_names(&self) -> impl Iterator<Item = &str> {
        self.contexts.keys().map(String::as_str)
    }
}
