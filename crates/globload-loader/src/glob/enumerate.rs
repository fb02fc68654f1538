// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Expanding anchored patterns into ordered file matches
//!
//! `*` matches within one path segment, `**` matches zero or more whole
//! segments. Only regular files are returned. Entries whose name starts
//! with `.` are only matched by segments that spell the dot out.

use ::glob::{MatchOptions, Pattern};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

use crate::error::{GlobError, Result};
use crate::fs::{EntryKind, FileSystem};
use crate::glob::key::derive_key;
use crate::glob::pattern::AnchoredPattern;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// One matched file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchEntry {
    /// Absolute path of the file
    pub absolute_path: PathBuf,
    /// Key of the file in the synthesized mapping
    pub key: String,
}

/// A compiled pattern segment
#[derive(Debug)]
enum Segment {
    /// `**`
    Globstar,
    /// Segment without wildcards
    Literal(String),
    /// Segment containing `*`
    Wildcard(Pattern),
}

impl Segment {
    fn compile(segment: &str, whole: &AnchoredPattern) -> Result<Self> {
        if segment == "**" {
            return Ok(Segment::Globstar);
        }
        if !segment.contains('*') {
            return Ok(Segment::Literal(segment.to_string()));
        }

        // Only `*` is special; everything else must match literally
        let mut escaped = String::with_capacity(segment.len());
        for c in segment.chars() {
            if c == '*' {
                escaped.push('*');
            } else {
                escaped.push_str(&Pattern::escape(c.encode_utf8(&mut [0; 4])));
            }
        }

        Pattern::new(&escaped)
            .map(Segment::Wildcard)
            .map_err(|e| GlobError::malformed(whole.to_string(), e.msg))
    }

    fn matches(&self, name: &str) -> bool {
        match self {
            Segment::Globstar => !name.starts_with('.'),
            Segment::Literal(literal) => literal == name,
            Segment::Wildcard(pattern) => pattern.matches_with(name, MATCH_OPTIONS),
        }
    }
}

/// Expand `pattern` into matches keyed relative to `importer_dir`.
///
/// The result is sorted ascending by key and contains each key once. A
/// missing static root, or one that is not a directory, yields no matches;
/// any other failure to list the root is returned as an error. Failures
/// below the root skip that directory.
#[instrument(level = "debug", skip(fs, pattern), fields(pattern = %pattern))]
pub async fn enumerate<F>(
    fs: &F,
    pattern: &AnchoredPattern,
    importer_dir: &str,
) -> Result<Vec<MatchEntry>>
where
    F: FileSystem + ?Sized,
{
    let segments = pattern
        .glob_segments()
        .iter()
        .map(|s| Segment::compile(s, pattern))
        .collect::<Result<Vec<_>>>()?;

    let root = pattern.static_root_str();
    let mut found: BTreeMap<String, PathBuf> = BTreeMap::new();
    let mut pending: Vec<(String, usize)> = vec![(root.clone(), 0)];
    let mut at_root = true;

    while let Some((dir, index)) = pending.pop() {
        let entries = match fs.read_dir(Path::new(&dir)).await {
            Ok(entries) => entries,
            Err(e) if is_absent(&e) => {
                if at_root {
                    debug!("Static root {} does not exist", root);
                }
                at_root = false;
                continue;
            }
            Err(e) if at_root => return Err(e.into()),
            Err(e) => {
                warn!("Skipping unreadable directory {}: {}", dir, e);
                continue;
            }
        };
        at_root = false;

        let segment = &segments[index];
        let last = index + 1 == segments.len();

        for entry in entries {
            if !segment.matches(&entry.name) {
                continue;
            }
            let child = join(&dir, &entry.name);

            match (segment, entry.kind) {
                (_, EntryKind::File) if last => {
                    let key = derive_key(&child, importer_dir);
                    found.entry(key).or_insert_with(|| PathBuf::from(&child));
                }
                (Segment::Globstar, EntryKind::Directory) if !entry.symlink => {
                    pending.push((child, index));
                }
                (Segment::Globstar, _) => {}
                (_, EntryKind::Directory) if !last => {
                    pending.push((child, index + 1));
                }
                _ => {}
            }
        }

        // `**` may also match zero segments
        if matches!(segment, Segment::Globstar) && !last {
            pending.push((dir, index + 1));
        }
    }

    debug!("Matched {} file(s)", found.len());

    Ok(found
        .into_iter()
        .map(|(key, absolute_path)| MatchEntry { absolute_path, key })
        .collect())
}

fn is_absent(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

fn join(dir: &str, name: &str) -> String {
    format!("{}/{}", dir.trim_end_matches('/'), name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;

    fn fixture() -> MemoryFileSystem {
        let fs = MemoryFileSystem::new();
        fs.add_file("/proj/basic/b.js", "");
        fs.add_file("/proj/basic/a.js", "");
        fs.add_file("/proj/basic/readme.md", "");
        fs.add_file("/proj/basic/.hidden.js", "");
        fs.add_dir("/proj/basic/dir.js");
        fs.add_file("/proj/nested/top.js", "");
        fs.add_file("/proj/nested/x/one.js", "");
        fs.add_file("/proj/nested/x/y/two.js", "");
        fs.add_file("/proj/nested/.cache/skip.js", "");
        fs.add_dir("/proj/empty");
        fs.add_file("/proj/pkgs/a/index.js", "");
        fs.add_file("/proj/pkgs/b/index.js", "");
        fs.add_file("/proj/pkgs/c/main.js", "");
        fs
    }

    async fn keys(fs: &MemoryFileSystem, pattern: &str) -> Vec<String> {
        let anchored = AnchoredPattern::anchor(pattern, Path::new("/proj")).unwrap();
        enumerate(fs, &anchored, "/proj")
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.key)
            .collect()
    }

    #[tokio::test]
    async fn test_single_star_sorted() {
        let fs = fixture();
        assert_eq!(keys(&fs, "./basic/*.js").await, ["./basic/a.js", "./basic/b.js"]);
    }

    #[tokio::test]
    async fn test_single_star_does_not_cross_directories() {
        let fs = fixture();
        assert_eq!(keys(&fs, "./nested/*.js").await, ["./nested/top.js"]);
    }

    #[tokio::test]
    async fn test_globstar_any_depth() {
        let fs = fixture();
        assert_eq!(
            keys(&fs, "./nested/**/*.js").await,
            ["./nested/top.js", "./nested/x/one.js", "./nested/x/y/two.js"]
        );
    }

    #[tokio::test]
    async fn test_trailing_globstar() {
        let fs = fixture();
        assert_eq!(
            keys(&fs, "./nested/**").await,
            ["./nested/top.js", "./nested/x/one.js", "./nested/x/y/two.js"]
        );
    }

    #[tokio::test]
    async fn test_wildcard_directory_segment() {
        let fs = fixture();
        assert_eq!(
            keys(&fs, "./pkgs/*/index.js").await,
            ["./pkgs/a/index.js", "./pkgs/b/index.js"]
        );
    }

    #[tokio::test]
    async fn test_missing_and_empty_roots() {
        let fs = fixture();
        assert!(keys(&fs, "./empty/*.js").await.is_empty());
        assert!(keys(&fs, "./non-exist/*.js").await.is_empty());
        assert!(keys(&fs, "./basic/a.js/*.js").await.is_empty());
    }

    #[tokio::test]
    async fn test_parent_pattern_keys() {
        let fs = fixture();
        let anchored = AnchoredPattern::anchor("../*.js", Path::new("/proj/basic/dir.js")).unwrap();
        let matches = enumerate(&fs, &anchored, "/proj/basic/dir.js").await.unwrap();
        let keys: Vec<_> = matches.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, ["../a.js", "../b.js"]);
        assert_eq!(matches[0].absolute_path, PathBuf::from("/proj/basic/a.js"));
    }

    #[tokio::test]
    async fn test_explicit_dot_segment() {
        let fs = fixture();
        assert_eq!(keys(&fs, "./basic/.*.js").await, ["./basic/.hidden.js"]);
    }

    #[tokio::test]
    async fn test_literal_brackets_are_not_classes() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/proj/[id]/page.js", "");
        fs.add_file("/proj/i/page.js", "");
        assert_eq!(keys(&fs, "./[id]/*.js").await, ["./[id]/page.js"]);
        assert_eq!(keys(&fs, "./*/p?ge.js").await, Vec::<String>::new());
    }

    #[tokio::test]
    async fn test_recursive_wildcard_inside_segment_is_malformed() {
        let fs = fixture();
        let anchored = AnchoredPattern::anchor("./basic/a**.js", Path::new("/proj")).unwrap();
        assert!(matches!(
            enumerate(&fs, &anchored, "/proj").await,
            Err(GlobError::MalformedPattern { .. })
        ));
    }
}
