// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Deciding what each matched file contributes to the mapping

use std::path::Path;

use crate::compat::HostCapabilities;

/// Which export of each matched module is exposed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportPlan {
    /// The whole module namespace object
    Namespace,
    /// The `default` export
    Default,
    /// A single named export, `undefined` when absent
    Named(String),
}

impl ExportPlan {
    /// Plan for the `import=<name>` option
    pub fn from_import(import: Option<&str>) -> Self {
        match import {
            None => ExportPlan::Namespace,
            Some("default") => ExportPlan::Default,
            Some(name) => ExportPlan::Named(name.to_string()),
        }
    }

    /// Property of the namespace object to read, if any
    pub fn property(&self) -> Option<&str> {
        match self {
            ExportPlan::Namespace => None,
            ExportPlan::Default => Some("default"),
            ExportPlan::Named(name) => Some(name),
        }
    }
}

/// How a matched file is loaded by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadKind {
    /// An ordinary module
    Script,
    /// A JSON file, loaded natively
    Json,
    /// A file decoded by a payload transform into a data module
    Data,
}

/// Import attribute attached to a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportAttribute {
    /// `{ type: "json" }`
    Json,
}

impl ImportAttribute {
    /// Value of the `type` attribute
    pub fn type_name(&self) -> &'static str {
        match self {
            ImportAttribute::Json => "json",
        }
    }
}

/// Loading route chosen for one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadRoute {
    /// Import the file URL as it is
    Direct,
    /// Import the file URL with an import attribute
    WithAttribute(ImportAttribute),
    /// Import the file URL tagged as a data module
    DataModule,
}

/// Classify a file by extension.
///
/// `is_data` tells whether a payload transform claims the extension.
pub fn classify(path: &Path, is_data: impl Fn(&str) -> bool) -> PayloadKind {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("json") => PayloadKind::Json,
        Some(ext) if is_data(ext) => PayloadKind::Data,
        _ => PayloadKind::Script,
    }
}

/// Choose how a file of the given kind is imported.
///
/// JSON goes through the data module route when the host cannot take an
/// import attribute.
pub fn route(kind: &PayloadKind, caps: HostCapabilities) -> LoadRoute {
    match kind {
        PayloadKind::Script => LoadRoute::Direct,
        PayloadKind::Json if caps.supports_import_attributes => {
            LoadRoute::WithAttribute(ImportAttribute::Json)
        }
        PayloadKind::Json | PayloadKind::Data => LoadRoute::DataModule,
    }
}
