// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Glob import specifier parsing
//!
//! Grammar: `<glob-pattern>?glob[&eager][&import=<name>]`. Options may come
//! in any order and unknown keys are ignored.

use url::form_urlencoded;

/// Query key marking a specifier as a glob import
pub const GLOB_MARKER: &str = "glob";

/// Query key selecting eager mode
pub const EAGER_OPTION: &str = "eager";

/// Query key selecting a single export
pub const IMPORT_OPTION: &str = "import";

/// Query key carrying the importer directory on marked URLs
pub const IMPORTER_OPTION: &str = "importer";

/// Options recognized in the query block of a glob specifier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobOptions {
    /// `eager` present
    pub eager: bool,
    /// Value of `import=<name>`, if any
    pub import: Option<String>,
    /// Value of `importer=<dir>`, only set on URLs produced by the resolve hook
    pub importer: Option<String>,
}

/// A specifier split into its pattern and glob options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobSpecifier {
    /// The specifier with the query block stripped
    pub pattern: String,
    /// Recognized options
    pub options: GlobOptions,
}

/// Parse a specifier, returning `None` when it carries no `glob` marker.
pub fn parse_specifier(specifier: &str) -> Option<GlobSpecifier> {
    let (pattern, query) = specifier.split_once('?')?;
    let options = parse_query(query)?;

    Some(GlobSpecifier {
        pattern: pattern.to_string(),
        options,
    })
}

/// Parse a query string (without the leading `?`).
///
/// Returns `None` when the `glob` marker is absent.
pub fn parse_query(query: &str) -> Option<GlobOptions> {
    // Fragments never reach the loader as part of the pattern
    let query = query.split_once('#').map_or(query, |(q, _)| q);

    let mut is_glob = false;
    let mut options = GlobOptions::default();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            GLOB_MARKER => is_glob = true,
            EAGER_OPTION => options.eager = true,
            IMPORT_OPTION if !value.is_empty() => options.import = Some(value.into_owned()),
            IMPORTER_OPTION if !value.is_empty() => options.importer = Some(value.into_owned()),
            _ => {}
        }
    }

    is_glob.then_some(options)
}

/// Render options back into a query string, `glob` first.
pub fn format_query(options: &GlobOptions) -> String {
    let mut query = String::from(GLOB_MARKER);

    if options.eager {
        query.push('&');
        query.push_str(EAGER_OPTION);
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    if let Some(name) = &options.import {
        serializer.append_pair(IMPORT_OPTION, name);
    }
    if let Some(importer) = &options.importer {
        serializer.append_pair(IMPORTER_OPTION, importer);
    }

    let rest = serializer.finish();
    if !rest.is_empty() {
        query.push('&');
        query.push_str(&rest);
    }

    query
}

/// Whether a pattern contains a wildcard
pub fn has_wildcard(pattern: &str) -> bool {
    pattern.contains('*')
}
