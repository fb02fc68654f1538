// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # globload-loader
//!
//! Glob imports for ECMAScript module loaders.
//!
//! A module can import a whole set of files through one specifier by adding
//! a `?glob` query to a pattern:
//!
//! ```js
//! import plugins from "./plugins/*.js?glob";              // lazy accessors
//! import eager from "./plugins/*.js?glob&eager";          // namespaces
//! import setups from "./plugins/*.js?glob&import=setup";  // one export
//! ```
//!
//! The loader enumerates the matching files relative to the importing
//! module and generates a module whose default export maps each file's
//! relative path to its namespace, a selected export, or a function that
//! imports it on demand.
//!
//! - `*` matches inside one path segment, `**` across any number of them
//! - Keys are sorted and use `/` on every platform
//! - JSON files use `with { type: "json" }` when the host supports it
//! - YAML files are decoded into data modules
//! - Missing or empty directories produce an empty mapping
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use globload_loader::{GlobLoader, HostCapabilities, OsFileSystem};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let loader = GlobLoader::new(OsFileSystem, HostCapabilities::detect(Some("v20.11.0")));
//!     let module = loader
//!         .synthesize_specifier("./plugins/*.js?glob&eager", Path::new("/app/main.js"))
//!         .await?;
//!     println!("{}", module.unwrap().source);
//!     Ok(())
//! }
//! ```
//!
//! ## Loader hooks
//!
//! [`GlobHooks`] exposes the same pipeline as `resolve`/`load` hooks that
//! either claim a request or hand it to the next hook in the chain.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compat;
pub mod config;
pub mod error;
pub mod fs;
pub mod glob;
pub mod hooks;
pub mod loader;
pub mod transform;
pub mod urls;

// Re-exports
pub use compat::{compare_host_versions, HostCapabilities, HostVersion};
pub use config::LoaderConfig;
pub use error::{GlobError, Result};
pub use fs::{FileSystem, MemoryFileSystem, OsFileSystem};
pub use glob::export::ExportPlan;
pub use glob::synth::{LoadMode, ModuleFormat, SyntheticModule};
pub use glob::GlobRequest;
pub use hooks::{GlobHooks, LoadContext, LoadOutcome, ResolveContext, ResolveOutcome};
pub use loader::GlobLoader;
pub use transform::{JsonTransform, PayloadTransform, TransformRegistry, YamlTransform};

/// Version of the glob loader
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
