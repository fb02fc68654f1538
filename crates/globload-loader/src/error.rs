// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for the glob loader

use std::path::PathBuf;
use thiserror::Error;

/// Result type for glob loader operations
pub type Result<T> = std::result::Result<T, GlobError>;

/// Errors that can occur while resolving or loading a glob import
#[derive(Debug, Error)]
pub enum GlobError {
    /// The glob pattern cannot be matched against the file system
    #[error("Malformed glob pattern '{pattern}': {reason}")]
    MalformedPattern {
        /// The offending pattern
        pattern: String,
        /// Reason for failure
        reason: String,
    },

    /// A glob specifier was imported without an importing module
    #[error("Cannot resolve glob specifier '{0}' without an importing module")]
    MissingImporter(String),

    /// A URL could not be parsed or converted to a path
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL as received
        url: String,
        /// Reason for failure
        reason: String,
    },

    /// File system error
    #[error("File system error: {0}")]
    Fs(#[from] std::io::Error),

    /// Payload content could not be decoded
    #[error("Cannot decode '{path}': {reason}")]
    Payload {
        /// The payload file
        path: PathBuf,
        /// Decoder message
        reason: String,
    },

    /// No transform is registered for the payload's extension
    #[error("No payload transform for '{0}'")]
    UnsupportedPayload(PathBuf),

    /// Error reported by the next hook in the host chain
    #[error("{0}")]
    Host(String),
}

impl GlobError {
    /// Create a malformed pattern error
    pub fn malformed(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid URL error
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a payload decoding error
    pub fn payload(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Payload {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
