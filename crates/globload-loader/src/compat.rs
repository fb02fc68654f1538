// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Host runtime version detection
//!
//! Features of the emitted module source that depend on the host runtime
//! are decided here, once, and carried around as [`HostCapabilities`].

use std::cmp::Ordering;
use std::fmt;

/// First host version accepting `with { type: "json" }` on imports
pub const IMPORT_ATTRIBUTES_SINCE: HostVersion = HostVersion::new(18, 20, 0);

/// A `major.minor.patch` host runtime version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HostVersion {
    /// Major version
    pub major: u64,
    /// Minor version
    pub minor: u64,
    /// Patch version
    pub patch: u64,
}

impl HostVersion {
    /// Create a version from its components
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self { major, minor, patch }
    }

    /// Parse a version string such as `v20.11.1` or `18.20`.
    ///
    /// Missing or non-numeric components read as `0`, so parsing never fails.
    pub fn parse(version: &str) -> Self {
        let version = version.trim();
        let version = version.strip_prefix('v').unwrap_or(version);
        let mut parts = version
            .split('.')
            .map(|part| part.trim().parse::<u64>().unwrap_or(0));

        Self {
            major: parts.next().unwrap_or(0),
            minor: parts.next().unwrap_or(0),
            patch: parts.next().unwrap_or(0),
        }
    }
}

impl fmt::Display for HostVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Compare two host version strings
pub fn compare_host_versions(v1: &str, v2: &str) -> Ordering {
    HostVersion::parse(v1).cmp(&HostVersion::parse(v2))
}

/// Capabilities of the host runtime that affect emitted source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
    /// Whether static and dynamic imports accept import attributes
    pub supports_import_attributes: bool,
}

impl HostCapabilities {
    /// Capabilities of a host of the given version
    pub fn for_version(version: HostVersion) -> Self {
        Self {
            supports_import_attributes: version >= IMPORT_ATTRIBUTES_SINCE,
        }
    }

    /// Capabilities for an optional version string; unknown hosts are assumed current
    pub fn detect(version: Option<&str>) -> Self {
        match version {
            Some(v) => Self::for_version(HostVersion::parse(v)),
            None => Self::default(),
        }
    }
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self {
            supports_import_attributes: true,
        }
    }
}
