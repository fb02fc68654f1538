// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! `file://` URL helpers
//!
//! Emitted URLs percent-encode every byte of every path segment except
//! ASCII alphanumerics and `-_.~`, so arbitrary file names survive as import
//! specifiers.

use std::path::PathBuf;
use url::Url;

use crate::error::{GlobError, Result};
use crate::glob::pattern::to_slashes;

/// Query marker of URLs served as data modules
pub const DATA_MARKER: &str = "glob-data";

/// Build a `file://` URL from an absolute `/`-separated path
pub fn file_url(path: &str) -> String {
    // Backslash is an ordinary file name character outside Windows
    let path = if cfg!(windows) { to_slashes(path) } else { path.to_string() };
    let mut url = String::from("file://");

    for (i, segment) in path.trim_start_matches('/').split('/').enumerate() {
        url.push('/');
        if i == 0 && is_drive(segment) {
            url.push_str(segment);
        } else {
            url.push_str(&urlencoding::encode(segment));
        }
    }

    url
}

/// URL under which a payload file is served as a data module
pub fn data_module_url(path: &str) -> String {
    format!("{}?{}", file_url(path), DATA_MARKER)
}

/// Parse a URL, requiring the `file:` scheme
pub fn parse_file_url(input: &str) -> Result<Url> {
    let url = Url::parse(input).map_err(|e| GlobError::invalid_url(input, e.to_string()))?;
    if url.scheme() != "file" {
        return Err(GlobError::invalid_url(input, "not a file: URL"));
    }
    Ok(url)
}

/// Absolute path of a `file:` URL, query and fragment ignored
pub fn url_to_path(url: &Url) -> Result<PathBuf> {
    url.to_file_path()
        .map_err(|()| GlobError::invalid_url(url.as_str(), "not a local file path"))
}

/// Whether a URL carries the data module marker
pub fn is_data_module_url(url: &Url) -> bool {
    url.query_pairs().any(|(key, _)| key == DATA_MARKER)
}

fn is_drive(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
