// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Loader configuration.
//!
//! Values come from defaults, an optional `key=value` rc file and
//! `GLOBLOAD_*` environment variables, applied in that order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

use crate::compat::HostCapabilities;
use crate::error::Result;

/// Prefix of environment variables read by [`LoaderConfig::load_from_env`]
pub const ENV_PREFIX: &str = "GLOBLOAD_";

/// Configuration for the glob loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Version of the host runtime, e.g. `v20.11.0`
    pub host_version: Option<String>,

    /// Force import attribute support on or off, bypassing version detection
    pub import_attributes: Option<bool>,

    /// Extra extensions decoded with the YAML transform
    pub data_extensions: Vec<String>,

    /// Log level
    pub loglevel: String,

    /// Unrecognized keys
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            host_version: None,
            import_attributes: None,
            data_extensions: Vec::new(),
            loglevel: "warn".to_string(),
            extra: BTreeMap::new(),
        }
    }
}

impl LoaderConfig {
    /// Load configuration from an optional rc file and the process environment.
    pub fn load(rc_file: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = rc_file {
            if path.exists() {
                config.merge_from_file(path)?;
            }
        }

        config.load_from_env(std::env::vars());

        Ok(config)
    }

    /// Merge `key=value` lines from a file.
    pub fn merge_from_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)?;
        self.merge_from_str(&content);
        Ok(())
    }

    /// Merge `key=value` lines, skipping blanks and `#`/`;` comments.
    pub fn merge_from_str(&mut self, content: &str) {
        for line in content.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            match line.split_once('=') {
                Some((key, value)) => self.set(key.trim(), value.trim()),
                None => warn!("Ignoring config line without '=': {}", line),
            }
        }
    }

    /// Apply `GLOBLOAD_*` variables from the given iterator.
    pub fn load_from_env<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if let Some(config_key) = key.strip_prefix(ENV_PREFIX) {
                let config_key = config_key.to_lowercase().replace('_', "-");
                self.set(&config_key, &value);
            }
        }
    }

    /// Set a configuration value.
    pub fn set(&mut self, key: &str, value: &str) {
        match key {
            "host-version" => {
                self.host_version = Some(value.to_string()).filter(|v| !v.is_empty());
            }
            "import-attributes" => match value {
                "true" => self.import_attributes = Some(true),
                "false" => self.import_attributes = Some(false),
                _ => self.import_attributes = None,
            },
            "data-extensions" => {
                self.data_extensions = value
                    .split(',')
                    .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
                    .filter(|ext| !ext.is_empty())
                    .collect();
            }
            "loglevel" => self.loglevel = value.to_string(),
            _ => {
                self.extra.insert(key.to_string(), value.to_string());
            }
        }
    }

    /// Get a configuration value.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "host-version" => self.host_version.clone(),
            "import-attributes" => self.import_attributes.map(|v| v.to_string()),
            "data-extensions" => Some(self.data_extensions.join(",")),
            "loglevel" => Some(self.loglevel.clone()),
            _ => self.extra.get(key).cloned(),
        }
    }

    /// Host capabilities implied by this configuration.
    pub fn capabilities(&self) -> HostCapabilities {
        match self.import_attributes {
            Some(supported) => HostCapabilities {
                supports_import_attributes: supported,
            },
            None => HostCapabilities::detect(self.host_version.as_deref()),
        }
    }
}
