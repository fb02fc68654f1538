// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Glob import resolution and synthesis
//!
//! ```text
//! specifier ─► specifier::parse_specifier ─► GlobRequest (pattern anchored)
//!           ─► enumerate::enumerate ─► [MatchEntry] (sorted by key)
//!           ─► synth::plan_module ─► ModulePlan ─► synth::emit ─► source
//! ```
//!
//! Nothing in here knows about the host's hook protocol.

pub mod enumerate;
pub mod export;
pub mod key;
pub mod pattern;
pub mod specifier;
pub mod synth;

use std::path::Path;
use url::Url;

use crate::error::Result;
use crate::urls::{file_url, url_to_path};
use export::ExportPlan;
use pattern::{normalize_dir, AnchoredPattern};
use specifier::{format_query, parse_query, parse_specifier, GlobOptions};
use synth::LoadMode;

/// A parsed and anchored glob import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobRequest {
    /// Absolute pattern
    pub pattern: AnchoredPattern,
    /// Directory of the importing module, `/`-separated
    pub importer_dir: String,
    /// `eager` option present
    pub eager: bool,
    /// `import=<name>` option
    pub import_name: Option<String>,
}

impl GlobRequest {
    /// Build a request from a raw specifier and the importer's directory.
    ///
    /// Returns `Ok(None)` when the specifier is not a glob import.
    pub fn from_specifier(specifier: &str, importer_dir: &Path) -> Result<Option<Self>> {
        let Some(parsed) = parse_specifier(specifier) else {
            return Ok(None);
        };

        let pattern = if parsed.pattern.starts_with("file:") {
            let url = crate::urls::parse_file_url(&parsed.pattern)?;
            let path = url_to_path(&url)?;
            AnchoredPattern::parse_absolute(&path.to_string_lossy())?
        } else {
            AnchoredPattern::anchor(&parsed.pattern, importer_dir)?
        };

        Ok(Some(Self {
            pattern,
            importer_dir: normalize_dir(&importer_dir.to_string_lossy()),
            eager: parsed.options.eager,
            import_name: parsed.options.import,
        }))
    }

    /// Rebuild a request from a URL produced by [`Self::marked_url`].
    ///
    /// Returns `Ok(None)` when the URL carries no `glob` marker.
    pub fn from_marked_url(url: &Url) -> Result<Option<Self>> {
        let Some(options) = url.query().and_then(parse_query) else {
            return Ok(None);
        };

        let path = url_to_path(url)?;
        let pattern = AnchoredPattern::parse_absolute(&path.to_string_lossy())?;
        let importer_dir = options
            .importer
            .map(|dir| normalize_dir(&dir))
            .unwrap_or_else(|| pattern.static_root_str());

        Ok(Some(Self {
            pattern,
            importer_dir,
            eager: options.eager,
            import_name: options.import,
        }))
    }

    /// URL identifying this request in the host's module graph
    pub fn marked_url(&self) -> String {
        let options = GlobOptions {
            eager: self.eager,
            import: self.import_name.clone(),
            importer: Some(self.importer_dir.clone()),
        };
        format!("{}?{}", file_url(&self.pattern.to_string()), format_query(&options))
    }

    /// Eager or lazy
    pub fn mode(&self) -> LoadMode {
        LoadMode::from_eager(self.eager)
    }

    /// Export exposed for every match
    pub fn export_plan(&self) -> ExportPlan {
        ExportPlan::from_import(self.import_name.as_deref())
    }
}
