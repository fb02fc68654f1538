// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Payload transforms
//!
//! Files without a native module representation are decoded into a plain
//! value, which becomes the default export of a generated data module.

use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Decodes file content into a plain value
pub trait PayloadTransform: Send + Sync {
    /// Short name for diagnostics
    fn name(&self) -> &'static str;

    /// Decode the file content
    fn decode(&self, text: &str) -> Result<JsonValue, String>;

    /// Whether top-level keys of the value are also exported by name
    fn exposes_top_level_keys(&self) -> bool;
}

/// YAML documents; top-level keys are exported by name
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlTransform;

impl PayloadTransform for YamlTransform {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn decode(&self, text: &str) -> Result<JsonValue, String> {
        serde_yaml::from_str(text).map_err(|e| e.to_string())
    }

    fn exposes_top_level_keys(&self) -> bool {
        true
    }
}

/// JSON documents; only a default export, like native JSON modules
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTransform;

impl PayloadTransform for JsonTransform {
    fn name(&self) -> &'static str {
        "json"
    }

    fn decode(&self, text: &str) -> Result<JsonValue, String> {
        // Tolerate a byte order mark the way JSON module loaders do
        serde_json::from_str(text.trim_start_matches('\u{feff}')).map_err(|e| e.to_string())
    }

    fn exposes_top_level_keys(&self) -> bool {
        false
    }
}

/// Payload transforms by lowercase file extension
#[derive(Clone, Default)]
pub struct TransformRegistry {
    transforms: HashMap<String, Arc<dyn PayloadTransform>>,
}

impl TransformRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// `yaml`, `yml` and `json`
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("yaml", Arc::new(YamlTransform));
        registry.register("yml", Arc::new(YamlTransform));
        registry.register("json", Arc::new(JsonTransform));
        registry
    }

    /// Register a transform for an extension (without the dot)
    pub fn register(&mut self, extension: &str, transform: Arc<dyn PayloadTransform>) {
        self.transforms
            .insert(extension.trim_start_matches('.').to_ascii_lowercase(), transform);
    }

    /// Whether an extension is handled by a transform
    pub fn handles(&self, extension: &str) -> bool {
        self.transforms.contains_key(&extension.to_ascii_lowercase())
    }

    /// Transform for a file path
    pub fn for_path(&self, path: &Path) -> Option<Arc<dyn PayloadTransform>> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        self.transforms.get(&ext).cloned()
    }
}

impl fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut extensions: Vec<_> = self.transforms.keys().collect();
        extensions.sort();
        f.debug_struct("TransformRegistry")
            .field("extensions", &extensions)
            .finish()
    }
}
