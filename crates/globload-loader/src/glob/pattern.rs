// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Anchoring glob patterns to the importing module's directory
//!
//! Resolution is purely lexical and depends only on the importer's path,
//! never on the process working directory. All anchored patterns use `/`
//! separators regardless of platform.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{GlobError, Result};
use crate::glob::specifier::has_wildcard;

/// A glob pattern anchored to an absolute directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchoredPattern {
    /// `/` on Unix-like paths, `C:/` for drive paths
    prefix: String,
    /// Literal segments before the first wildcard segment
    static_segments: Vec<String>,
    /// The first wildcard segment and everything after it
    glob_segments: Vec<String>,
}

impl AnchoredPattern {
    /// Anchor `pattern` to `importer_dir`.
    ///
    /// `./` and bare patterns are relative to `importer_dir`, every leading
    /// `../` climbs one directory, absolute patterns are kept as they are.
    pub fn anchor(pattern: &str, importer_dir: &Path) -> Result<Self> {
        let pattern_slashed = to_slashes(pattern);

        if !has_wildcard(&pattern_slashed) {
            return Err(GlobError::malformed(pattern, "no wildcard segment"));
        }

        let joined = if is_absolute(&pattern_slashed) {
            pattern_slashed
        } else {
            let dir = to_slashes(&importer_dir.to_string_lossy());
            if !is_absolute(&dir) {
                return Err(GlobError::malformed(
                    pattern,
                    format!("importer directory '{}' is not absolute", importer_dir.display()),
                ));
            }
            format!("{}/{}", dir.trim_end_matches('/'), pattern_slashed)
        };

        Self::from_absolute(&joined).map_err(|reason| GlobError::malformed(pattern, reason))
    }

    /// Parse an already absolute pattern such as the path of a marked URL
    pub fn parse_absolute(pattern: &str) -> Result<Self> {
        let slashed = to_slashes(pattern);
        if !is_absolute(&slashed) {
            return Err(GlobError::malformed(pattern, "pattern is not absolute"));
        }
        if !has_wildcard(&slashed) {
            return Err(GlobError::malformed(pattern, "no wildcard segment"));
        }
        Self::from_absolute(&slashed).map_err(|reason| GlobError::malformed(pattern, reason))
    }

    fn from_absolute(path: &str) -> std::result::Result<Self, String> {
        let (prefix, rest) = split_prefix(path);

        let mut static_segments: Vec<String> = Vec::new();
        let mut glob_segments: Vec<String> = Vec::new();

        for component in rest.split('/') {
            match component {
                "" | "." => continue,
                ".." => {
                    if !glob_segments.is_empty() {
                        return Err("'..' cannot follow a wildcard segment".to_string());
                    }
                    // Clamp at the root
                    static_segments.pop();
                }
                c if !glob_segments.is_empty() || has_wildcard(c) => {
                    glob_segments.push(c.to_string());
                }
                c => static_segments.push(c.to_string()),
            }
        }

        if glob_segments.is_empty() {
            return Err("no wildcard segment".to_string());
        }

        Ok(Self {
            prefix,
            static_segments,
            glob_segments,
        })
    }

    /// The longest literal directory before the first wildcard segment
    pub fn static_root(&self) -> PathBuf {
        PathBuf::from(self.static_root_str())
    }

    /// [`Self::static_root`] as a `/`-separated string
    pub fn static_root_str(&self) -> String {
        format!("{}{}", self.prefix, self.static_segments.join("/"))
    }

    /// Segments to be matched below the static root
    pub fn glob_segments(&self) -> &[String] {
        &self.glob_segments
    }
}

impl fmt::Display for AnchoredPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix)?;
        for segment in &self.static_segments {
            write!(f, "{segment}/")?;
        }
        f.write_str(&self.glob_segments.join("/"))
    }
}

/// Replace backslashes with forward slashes
pub fn to_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Absolute in either the POSIX or the drive-letter sense
pub fn is_absolute(path: &str) -> bool {
    path.starts_with('/') || has_drive_prefix(path)
}

/// Lexically normalize an absolute directory to `/` separators.
///
/// `.` is dropped and `..` pops a segment, clamped at the root. Relative
/// input is only converted to `/` separators.
pub fn normalize_dir(dir: &str) -> String {
    let slashed = to_slashes(dir);
    if !is_absolute(&slashed) {
        return slashed;
    }

    let (prefix, rest) = split_prefix(&slashed);
    let mut segments: Vec<&str> = Vec::new();
    for component in rest.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            c => segments.push(c),
        }
    }

    format!("{}{}", prefix, segments.join("/"))
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/'
}

fn split_prefix(path: &str) -> (String, &str) {
    if has_drive_prefix(path) {
        (path[..3].to_string(), &path[3..])
    } else {
        ("/".to_string(), path.trim_start_matches('/'))
    }
}
