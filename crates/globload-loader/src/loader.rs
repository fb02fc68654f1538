// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Glob loader - enumerates matches and synthesizes modules
//!
//! Every call recomputes its result from the file system; the loader holds
//! no per-request state and can be shared between concurrent loads.

use std::io;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::compat::HostCapabilities;
use crate::config::LoaderConfig;
use crate::error::{GlobError, Result};
use crate::fs::FileSystem;
use crate::glob::enumerate::{enumerate, MatchEntry};
use crate::glob::synth::{emit, emit_data_module, plan_module, ModulePlan, SyntheticModule};
use crate::glob::GlobRequest;
use crate::transform::{TransformRegistry, YamlTransform};

/// Glob import loader
#[derive(Debug)]
pub struct GlobLoader<F> {
    /// File system capability
    fs: F,
    /// Payload transforms by extension
    transforms: TransformRegistry,
    /// Host runtime capabilities
    caps: HostCapabilities,
}

impl<F: FileSystem> GlobLoader<F> {
    /// Create a loader with the default transforms
    pub fn new(fs: F, caps: HostCapabilities) -> Self {
        Self {
            fs,
            transforms: TransformRegistry::with_defaults(),
            caps,
        }
    }

    /// Create a loader from configuration
    pub fn from_config(fs: F, config: &LoaderConfig) -> Self {
        let mut loader = Self::new(fs, config.capabilities());
        for ext in &config.data_extensions {
            loader
                .transforms
                .register(ext, Arc::new(YamlTransform));
        }
        loader
    }

    /// Replace the transform registry
    pub fn with_transforms(mut self, transforms: TransformRegistry) -> Self {
        self.transforms = transforms;
        self
    }

    /// Host capabilities in effect
    pub fn capabilities(&self) -> HostCapabilities {
        self.caps
    }

    /// Matches of a request, ordered by key
    pub async fn matches(&self, request: &GlobRequest) -> Result<Vec<MatchEntry>> {
        enumerate(&self.fs, &request.pattern, &request.importer_dir).await
    }

    /// Binding plan of a request
    pub async fn plan(&self, request: &GlobRequest) -> Result<ModulePlan> {
        let matches = self.matches(request).await?;
        Ok(plan_module(
            &matches,
            request.mode(),
            &request.export_plan(),
            self.caps,
            |ext| self.transforms.handles(ext),
        ))
    }

    /// Synthesize the module for a request
    #[instrument(level = "debug", skip(self, request), fields(pattern = %request.pattern))]
    pub async fn synthesize(&self, request: &GlobRequest) -> Result<SyntheticModule> {
        let plan = self.plan(request).await?;
        debug!("Synthesizing {:?} module with {} entries", plan.mode, plan.bindings.len());
        Ok(emit(&plan))
    }

    /// Synthesize the module for a raw specifier imported from `importer`.
    ///
    /// Returns `Ok(None)` when the specifier is not a glob import.
    pub async fn synthesize_specifier(
        &self,
        specifier: &str,
        importer: &Path,
    ) -> Result<Option<SyntheticModule>> {
        let importer_dir = importer.parent().unwrap_or(Path::new("/"));
        match GlobRequest::from_specifier(specifier, importer_dir)? {
            Some(request) => self.synthesize(&request).await.map(Some),
            None => Ok(None),
        }
    }

    /// Decode a payload file into a data module.
    ///
    /// Malformed content fails only this module.
    #[instrument(level = "debug", skip(self))]
    pub async fn load_data_module(&self, path: &Path) -> Result<SyntheticModule> {
        let transform = self
            .transforms
            .for_path(path)
            .ok_or_else(|| GlobError::UnsupportedPayload(path.to_path_buf()))?;

        let text = self.fs.read_to_string(path).await.map_err(|e| match e.kind() {
            io::ErrorKind::InvalidData => GlobError::payload(path, e),
            _ => GlobError::Fs(e),
        })?;

        let value = transform
            .decode(&text)
            .map_err(|reason| GlobError::payload(path, reason))?;
        debug!("Decoded {} with the {} transform", path.display(), transform.name());

        Ok(emit_data_module(&value, transform.exposes_top_level_keys()))
    }
}
