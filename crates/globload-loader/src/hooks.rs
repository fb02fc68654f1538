// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module customization hooks
//!
//! Thin adapter between the host's `resolve`/`load` hook chain and the
//! glob loader. Requests this crate does not claim are handed, unchanged,
//! to the next hook.

use std::collections::BTreeMap;
use std::future::Future;
use std::path::Path;
use tracing::debug;

use crate::config::LoaderConfig;
use crate::error::{GlobError, Result};
use crate::fs::FileSystem;
use crate::glob::specifier::parse_specifier;
use crate::glob::synth::{ModuleFormat, SyntheticModule};
use crate::glob::GlobRequest;
use crate::loader::GlobLoader;
use crate::urls::{is_data_module_url, parse_file_url, url_to_path};

/// Context passed to `resolve`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveContext {
    /// URL of the importing module
    pub parent_url: Option<String>,
    /// Export conditions of the request
    pub conditions: Vec<String>,
    /// Import attributes of the import statement
    pub import_attributes: BTreeMap<String, String>,
}

/// Result of `resolve`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOutcome {
    /// Resolved URL
    pub url: String,
    /// Format hint for `load`
    pub format: Option<ModuleFormat>,
    /// Import attributes to cache the module under, replacing the input ones
    pub import_attributes: Option<BTreeMap<String, String>>,
    /// Stop the hook chain here
    pub short_circuit: bool,
}

/// Context passed to `load`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadContext {
    /// Format returned by `resolve`, if any
    pub format: Option<ModuleFormat>,
    /// Export conditions of the request
    pub conditions: Vec<String>,
    /// Import attributes of the import statement
    pub import_attributes: BTreeMap<String, String>,
}

/// Result of `load`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    /// Format of the source
    pub format: ModuleFormat,
    /// Module source, `None` for formats the host loads itself
    pub source: Option<String>,
    /// Stop the hook chain here
    pub short_circuit: bool,
}

impl From<SyntheticModule> for LoadOutcome {
    fn from(module: SyntheticModule) -> Self {
        Self {
            format: module.format,
            source: Some(module.source),
            short_circuit: true,
        }
    }
}

/// `resolve` and `load` hooks for glob imports
#[derive(Debug)]
pub struct GlobHooks<F> {
    loader: GlobLoader<F>,
}

impl<F: FileSystem> GlobHooks<F> {
    /// Wrap a loader
    pub fn new(loader: GlobLoader<F>) -> Self {
        Self { loader }
    }

    /// Hooks configured from a [`LoaderConfig`]
    pub fn from_config(fs: F, config: &LoaderConfig) -> Self {
        Self::new(GlobLoader::from_config(fs, config))
    }

    /// The underlying loader
    pub fn loader(&self) -> &GlobLoader<F> {
        &self.loader
    }

    /// Resolve hook.
    ///
    /// Glob specifiers resolve to a marked URL and short-circuit; anything
    /// else is delegated to `next_resolve`.
    pub async fn resolve<N, Fut>(
        &self,
        specifier: &str,
        context: ResolveContext,
        next_resolve: N,
    ) -> Result<ResolveOutcome>
    where
        N: FnOnce(String, ResolveContext) -> Fut,
        Fut: Future<Output = Result<ResolveOutcome>>,
    {
        match self.resolve_glob(specifier, &context)? {
            Some(request) => {
                let url = request.marked_url();
                debug!("Resolved glob specifier {} to {}", specifier, url);
                Ok(ResolveOutcome {
                    url,
                    format: Some(ModuleFormat::Module),
                    // The synthesized module is always ESM, whatever the
                    // import statement asserted
                    import_attributes: Some(BTreeMap::new()),
                    short_circuit: true,
                })
            }
            None => next_resolve(specifier.to_string(), context).await,
        }
    }

    fn resolve_glob(&self, specifier: &str, context: &ResolveContext) -> Result<Option<GlobRequest>> {
        if parse_specifier(specifier).is_none() {
            return Ok(None);
        }

        let parent_url = context
            .parent_url
            .as_deref()
            .ok_or_else(|| GlobError::MissingImporter(specifier.to_string()))?;
        let importer = url_to_path(&parse_file_url(parent_url)?)?;
        let importer_dir = importer.parent().unwrap_or(Path::new("/"));

        GlobRequest::from_specifier(specifier, importer_dir)
    }

    /// Load hook.
    ///
    /// Marked glob URLs are synthesized, data module URLs are decoded, and
    /// anything else is delegated to `next_load`.
    pub async fn load<N, Fut>(
        &self,
        url: &str,
        context: LoadContext,
        next_load: N,
    ) -> Result<LoadOutcome>
    where
        N: FnOnce(String, LoadContext) -> Fut,
        Fut: Future<Output = Result<LoadOutcome>>,
    {
        let parsed = match url.starts_with("file:").then(|| parse_file_url(url)) {
            Some(Ok(parsed)) => parsed,
            _ => return next_load(url.to_string(), context).await,
        };

        if let Some(request) = GlobRequest::from_marked_url(&parsed)? {
            debug!("Loading glob module {}", url);
            return self.loader.synthesize(&request).await.map(LoadOutcome::from);
        }

        if is_data_module_url(&parsed) {
            debug!("Loading data module {}", url);
            let path = url_to_path(&parsed)?;
            return self.loader.load_data_module(&path).await.map(LoadOutcome::from);
        }

        next_load(url.to_string(), context).await
    }
}
