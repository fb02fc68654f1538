// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Virtual module synthesis
//!
//! Synthesis happens in two steps. [`plan_module`] turns a match set into a
//! [`ModulePlan`], a list of bindings that say what to import and which
//! export to expose. [`emit`] is the only place that produces source text;
//! every string it writes is a JSON-escaped literal, and every URL is fully
//! percent-encoded.
//!
//! Eager output:
//!
//! ```text
//! import * as __glob_0 from "file:///proj/basic/a.js";
//! export default {
//!   "./basic/a.js": __glob_0["default"],
//! };
//! ```
//!
//! Lazy output:
//!
//! ```text
//! export default {
//!   "./basic/a.js": () => import("file:///proj/basic/a.js").then((m) => m["default"]),
//! };
//! ```

use serde_json::Value as JsonValue;

use crate::compat::HostCapabilities;
use crate::glob::enumerate::MatchEntry;
use crate::glob::export::{classify, route, ExportPlan, ImportAttribute, LoadRoute};
use crate::urls::{data_module_url, file_url};

/// Prefix of the local bindings in eager modules
const BINDING_PREFIX: &str = "__glob_";

/// When matched modules are loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Bound when the synthesized module is evaluated
    Eager,
    /// Loaded on each call of the entry's accessor
    Lazy,
}

impl LoadMode {
    /// Mode for the presence of the `eager` option
    pub fn from_eager(eager: bool) -> Self {
        if eager { LoadMode::Eager } else { LoadMode::Lazy }
    }
}

/// Format declared for loaded source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleFormat {
    /// ECMAScript module
    Module,
    /// CommonJS module
    CommonJs,
    /// JSON module
    Json,
    /// Host built-in
    Builtin,
    /// WebAssembly module
    Wasm,
    /// Any other host-defined format
    Other(String),
}

impl ModuleFormat {
    /// Name of the format in the host protocol
    pub fn as_str(&self) -> &str {
        match self {
            ModuleFormat::Module => "module",
            ModuleFormat::CommonJs => "commonjs",
            ModuleFormat::Json => "json",
            ModuleFormat::Builtin => "builtin",
            ModuleFormat::Wasm => "wasm",
            ModuleFormat::Other(name) => name,
        }
    }

    /// Parse a host format name
    pub fn parse(name: &str) -> Self {
        match name {
            "module" => ModuleFormat::Module,
            "commonjs" => ModuleFormat::CommonJs,
            "json" => ModuleFormat::Json,
            "builtin" => ModuleFormat::Builtin,
            "wasm" => ModuleFormat::Wasm,
            other => ModuleFormat::Other(other.to_string()),
        }
    }
}

/// What a binding imports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSource {
    /// Absolute, percent-encoded URL
    pub url: String,
    /// Import attribute to attach
    pub attribute: Option<ImportAttribute>,
}

/// One entry of the synthesized mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Property name in the mapping
    pub key: String,
    /// Module to import
    pub source: ImportSource,
    /// Export to expose
    pub export: ExportPlan,
}

/// Intermediate form of a synthesized module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulePlan {
    /// Eager or lazy
    pub mode: LoadMode,
    /// Entries in mapping order
    pub bindings: Vec<Binding>,
}

/// A generated module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticModule {
    /// Module source text
    pub source: String,
    /// Declared format, always [`ModuleFormat::Module`]
    pub format: ModuleFormat,
}

/// Build the plan for a match set.
///
/// `is_data` tells whether an extension is handled by a payload transform.
pub fn plan_module(
    matches: &[MatchEntry],
    mode: LoadMode,
    export: &ExportPlan,
    caps: HostCapabilities,
    is_data: impl Fn(&str) -> bool,
) -> ModulePlan {
    let bindings = matches
        .iter()
        .map(|entry| {
            let path = entry.absolute_path.to_string_lossy();
            let kind = classify(&entry.absolute_path, &is_data);
            let source = match route(&kind, caps) {
                LoadRoute::Direct => ImportSource {
                    url: file_url(&path),
                    attribute: None,
                },
                LoadRoute::WithAttribute(attribute) => ImportSource {
                    url: file_url(&path),
                    attribute: Some(attribute),
                },
                LoadRoute::DataModule => ImportSource {
                    url: data_module_url(&path),
                    attribute: None,
                },
            };

            Binding {
                key: entry.key.clone(),
                source,
                export: export.clone(),
            }
        })
        .collect();

    ModulePlan { mode, bindings }
}

/// Emit the source text for a plan
pub fn emit(plan: &ModulePlan) -> SyntheticModule {
    let source = match plan.mode {
        LoadMode::Eager => emit_eager(&plan.bindings),
        LoadMode::Lazy => emit_lazy(&plan.bindings),
    };

    SyntheticModule {
        source,
        format: ModuleFormat::Module,
    }
}

fn emit_eager(bindings: &[Binding]) -> String {
    if bindings.is_empty() {
        return "export default {};\n".to_string();
    }

    let mut out = String::new();

    for (i, binding) in bindings.iter().enumerate() {
        out.push_str(&format!(
            "import * as {BINDING_PREFIX}{i} from {}",
            js_string(&binding.source.url)
        ));
        if let Some(attribute) = binding.source.attribute {
            out.push_str(&format!(" with {{ type: {} }}", js_string(attribute.type_name())));
        }
        out.push_str(";\n");
    }

    out.push_str("\nexport default {\n");
    for (i, binding) in bindings.iter().enumerate() {
        out.push_str(&format!("  {}: {BINDING_PREFIX}{i}", js_string(&binding.key)));
        if let Some(property) = binding.export.property() {
            out.push_str(&format!("[{}]", js_string(property)));
        }
        out.push_str(",\n");
    }
    out.push_str("};\n");

    out
}

fn emit_lazy(bindings: &[Binding]) -> String {
    if bindings.is_empty() {
        return "export default {};\n".to_string();
    }

    let mut out = String::from("export default {\n");

    for binding in bindings {
        out.push_str(&format!(
            "  {}: () => import({}",
            js_string(&binding.key),
            js_string(&binding.source.url)
        ));
        if let Some(attribute) = binding.source.attribute {
            out.push_str(&format!(", {{ with: {{ type: {} }} }}", js_string(attribute.type_name())));
        }
        out.push(')');
        if let Some(property) = binding.export.property() {
            out.push_str(&format!(".then((m) => m[{}])", js_string(property)));
        }
        out.push_str(",\n");
    }
    out.push_str("};\n");

    out
}

/// Emit a data module for a decoded payload.
///
/// The value is the default export. With `named_exports`, each top-level key
/// of an object value other than `default` is also exported under its own
/// (string) name.
pub fn emit_data_module(value: &JsonValue, named_exports: bool) -> SyntheticModule {
    let mut out = String::new();

    out.push_str(&format!("const __data = JSON.parse({});\n", js_string(&value.to_string())));
    out.push_str("export default __data;\n");

    if let (true, JsonValue::Object(map)) = (named_exports, value) {
        for (i, key) in map.keys().filter(|k| k.as_str() != "default").enumerate() {
            out.push_str(&format!("const __key_{i} = __data[{}];\n", js_string(key)));
            out.push_str(&format!("export {{ __key_{i} as {} }};\n", js_string(key)));
        }
    }

    SyntheticModule {
        source: out,
        format: ModuleFormat::Module,
    }
}

/// Quote a string as a JavaScript string literal
fn js_string(s: &str) -> String {
    JsonValue::String(s.to_string()).to_string()
}
