// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Mapping keys of the synthesized module

use std::path::{Component, Path};

/// Key under which a match appears in the synthesized mapping.
///
/// The key is the match path relative to the importer directory, with `/`
/// separators, prefixed with `./` unless it already climbs with `../`.
pub fn derive_key(matched: &str, importer_dir: &str) -> String {
    let relative = pathdiff::diff_paths(Path::new(matched), Path::new(importer_dir))
        .map(|rel| {
            rel.components()
                .filter_map(|c| match c {
                    Component::ParentDir => Some("..".to_string()),
                    Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("/")
        })
        .unwrap_or_else(|| matched.to_string());

    if relative.starts_with("../") || relative.starts_with('/') {
        relative
    } else {
        format!("./{relative}")
    }
}
