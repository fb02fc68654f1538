// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! File system capability
//!
//! The loader never touches the disk directly. Directory listings and file
//! reads go through [`FileSystem`], which is the only place where loading
//! may suspend.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Kind of a directory entry, after following symlinks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory
    Directory,
    /// Anything else (sockets, broken links, ...)
    Other,
}

/// A single directory listing entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// File name within the listed directory
    pub name: String,
    /// What the entry points to
    pub kind: EntryKind,
    /// Whether the entry itself is a symbolic link
    pub symlink: bool,
}

/// Read-only file system access used by the loader
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// List a directory.
    ///
    /// A missing directory must fail with [`io::ErrorKind::NotFound`].
    async fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    /// Read a file as UTF-8 text
    async fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

#[async_trait]
impl<T: FileSystem + ?Sized> FileSystem for Arc<T> {
    async fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        (**self).read_dir(path).await
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string(path).await
    }
}

/// The real file system, via `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

#[async_trait]
impl FileSystem for OsFileSystem {
    async fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        let mut dir = tokio::fs::read_dir(path).await?;

        while let Some(entry) = dir.next_entry().await? {
            let Ok(name) = entry.file_name().into_string() else {
                tracing::debug!("Skipping non UTF-8 entry in {}", path.display());
                continue;
            };
            let file_type = entry.file_type().await?;
            let symlink = file_type.is_symlink();

            let kind = if symlink {
                match tokio::fs::metadata(entry.path()).await {
                    Ok(meta) if meta.is_dir() => EntryKind::Directory,
                    Ok(meta) if meta.is_file() => EntryKind::File,
                    _ => EntryKind::Other,
                }
            } else if file_type.is_dir() {
                EntryKind::Directory
            } else if file_type.is_file() {
                EntryKind::File
            } else {
                EntryKind::Other
            };

            entries.push(DirEntry { name, kind, symlink });
        }

        Ok(entries)
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }
}

#[derive(Debug)]
enum Node {
    File(String),
    Directory,
}

/// In-memory file system
///
/// Paths are absolute; parent directories are created on insert.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    nodes: RwLock<BTreeMap<PathBuf, Node>>,
}

impl MemoryFileSystem {
    /// Create an empty file system containing only the root
    pub fn new() -> Self {
        let fs = Self::default();
        fs.nodes.write().insert(PathBuf::from("/"), Node::Directory);
        fs
    }

    /// Add a file (and its parent directories)
    pub fn add_file(&self, path: impl AsRef<Path>, contents: impl Into<String>) {
        let path = clean(path.as_ref());
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.nodes.write().insert(path, Node::File(contents.into()));
    }

    /// Add a directory (and its parents)
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = clean(path.as_ref());
        let mut nodes = self.nodes.write();
        for ancestor in path.ancestors() {
            nodes.entry(ancestor.to_path_buf()).or_insert(Node::Directory);
        }
    }
}

#[async_trait]
impl FileSystem for MemoryFileSystem {
    async fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let path = clean(path);
        let nodes = self.nodes.read();

        match nodes.get(&path) {
            Some(Node::Directory) => {}
            Some(Node::File(_)) => {
                return Err(io::Error::new(io::ErrorKind::NotADirectory, path.display().to_string()));
            }
            None => {
                return Err(io::Error::new(io::ErrorKind::NotFound, path.display().to_string()));
            }
        }

        let entries = nodes
            .iter()
            .filter(|(child, _)| child.parent() == Some(path.as_path()))
            .filter_map(|(child, node)| {
                let name = child.file_name()?.to_str()?.to_string();
                let kind = match node {
                    Node::File(_) => EntryKind::File,
                    Node::Directory => EntryKind::Directory,
                };
                Some(DirEntry { name, kind, symlink: false })
            })
            .collect();

        Ok(entries)
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let path = clean(path);
        match self.nodes.read().get(&path) {
            Some(Node::File(contents)) => Ok(contents.clone()),
            Some(Node::Directory) => {
                Err(io::Error::new(io::ErrorKind::IsADirectory, path.display().to_string()))
            }
            None => Err(io::Error::new(io::ErrorKind::NotFound, path.display().to_string())),
        }
    }
}

/// Drop `.` components so lookups are stable
fn clean(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
