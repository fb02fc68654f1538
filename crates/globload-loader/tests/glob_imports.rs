// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! End-to-end glob imports against a real directory tree

use std::fs;
use std::path::{Path, PathBuf};

use globload_loader::urls::{data_module_url, file_url};
use globload_loader::{
    GlobError, GlobHooks, GlobLoader, GlobRequest, HostCapabilities, LoadContext, LoadMode,
    LoadOutcome, OsFileSystem, ResolveContext, ResolveOutcome,
};
use tempfile::TempDir;

/// Fixture tree:
///
/// ```text
/// a.js
/// main.js
/// basic/{a.js,b.js}
/// empty/
/// nested/{x.js, deep/y.js, deep/deeper/z.js}
/// yaml/{admin.yaml,guest.yaml}
/// json/{one.json,two.json}
/// sub/main.js
/// ```
struct Fixture {
    _dir: TempDir,
    root: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();

        let files: &[(&str, &str)] = &[
            ("a.js", "export default 'root';"),
            ("main.js", ""),
            ("basic/a.js", "export default () => 'a';"),
            ("basic/b.js", "export default () => 'b';"),
            ("nested/x.js", "export const name = 'x';"),
            ("nested/deep/y.js", "export const name = 'y';"),
            ("nested/deep/deeper/z.js", "export const name = 'z';"),
            ("yaml/admin.yaml", "role: admin\nlevel: 3\n"),
            ("yaml/guest.yaml", "name: guest\nlevel: 0\n"),
            ("json/one.json", "{\"n\": 1}"),
            ("json/two.json", "{\"n\": 2}"),
            ("sub/main.js", ""),
        ];
        for (path, contents) in files {
            let path = root.join(path);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }
        fs::create_dir_all(root.join("empty")).unwrap();

        Self { _dir: dir, root }
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    fn url(&self, relative: &str) -> String {
        file_url(&self.path(relative).to_string_lossy())
    }

    fn main_js(&self) -> PathBuf {
        self.path("main.js")
    }
}

fn modern() -> GlobLoader<OsFileSystem> {
    GlobLoader::new(OsFileSystem, HostCapabilities::detect(Some("v20.11.0")))
}

fn legacy() -> GlobLoader<OsFileSystem> {
    GlobLoader::new(OsFileSystem, HostCapabilities::detect(Some("v18.19.0")))
}

async fn synth(loader: &GlobLoader<OsFileSystem>, specifier: &str, importer: &Path) -> String {
    loader
        .synthesize_specifier(specifier, importer)
        .await
        .unwrap()
        .unwrap()
        .source
}

#[tokio::test]
async fn test_eager_namespaces() {
    let fx = Fixture::new();
    let source = synth(&modern(), "./basic/*.js?glob&eager", &fx.main_js()).await;

    let expected = format!(
        "import * as __glob_0 from \"{}\";\n\
         import * as __glob_1 from \"{}\";\n\
         \n\
         export default {{\n  \"./basic/a.js\": __glob_0,\n  \"./basic/b.js\": __glob_1,\n}};\n",
        fx.url("basic/a.js"),
        fx.url("basic/b.js"),
    );
    assert_eq!(source, expected);
}

#[tokio::test]
async fn test_eager_default_export() {
    let fx = Fixture::new();
    let source = synth(&modern(), "./basic/*.js?glob&eager&import=default", &fx.main_js()).await;

    assert!(source.contains("  \"./basic/a.js\": __glob_0[\"default\"],\n"));
    assert!(source.contains("  \"./basic/b.js\": __glob_1[\"default\"],\n"));
}

#[tokio::test]
async fn test_lazy_accessors() {
    let fx = Fixture::new();
    let source = synth(&modern(), "./basic/*.js?glob", &fx.main_js()).await;

    let expected = format!(
        "export default {{\n  \"./basic/a.js\": () => import(\"{}\"),\n  \"./basic/b.js\": () => import(\"{}\"),\n}};\n",
        fx.url("basic/a.js"),
        fx.url("basic/b.js"),
    );
    assert_eq!(source, expected);
}

#[tokio::test]
async fn test_empty_and_missing_directories() {
    let fx = Fixture::new();
    let loader = modern();

    for specifier in [
        "./empty/*.js?glob",
        "./empty/*.js?glob&eager",
        "./non-exist/*.js?glob",
        "./non-exist/**/*.js?glob&eager&import=default",
    ] {
        assert_eq!(synth(&loader, specifier, &fx.main_js()).await, "export default {};\n");
    }
}

#[tokio::test]
async fn test_globstar_matches_every_depth() {
    let fx = Fixture::new();
    let request = GlobRequest::from_specifier("./nested/**/*.js?glob", &fx.root)
        .unwrap()
        .unwrap();
    let matches = modern().matches(&request).await.unwrap();

    let keys: Vec<_> = matches.iter().map(|m| m.key.as_str()).collect();
    assert_eq!(
        keys,
        ["./nested/deep/deeper/z.js", "./nested/deep/y.js", "./nested/x.js"]
    );
    assert_eq!(matches[2].absolute_path, fx.path("nested/x.js"));
}

#[tokio::test]
async fn test_single_star_stays_in_segment() {
    let fx = Fixture::new();
    let request = GlobRequest::from_specifier("./nested/*.js?glob", &fx.root)
        .unwrap()
        .unwrap();
    let matches = modern().matches(&request).await.unwrap();

    let keys: Vec<_> = matches.iter().map(|m| m.key.as_str()).collect();
    assert_eq!(keys, ["./nested/x.js"]);
}

#[tokio::test]
async fn test_parent_directory_keys() {
    let fx = Fixture::new();
    let source = synth(&modern(), "../*.js?glob&eager", &fx.path("sub/main.js")).await;

    assert!(source.contains(&format!("import * as __glob_0 from \"{}\";", fx.url("a.js"))));
    assert!(source.contains("  \"../a.js\": __glob_0,\n"));
    assert!(source.contains("  \"../main.js\": __glob_1,\n"));
}

#[tokio::test]
async fn test_yaml_named_export() {
    let fx = Fixture::new();
    let loader = modern();
    let source = synth(&loader, "./yaml/*.yaml?glob&eager&import=role", &fx.main_js()).await;

    let admin = data_module_url(&fx.path("yaml/admin.yaml").to_string_lossy());
    assert!(admin.ends_with("/yaml/admin.yaml?glob-data"));
    assert!(source.contains(&format!("import * as __glob_0 from \"{}\";", admin)));
    assert!(source.contains("  \"./yaml/admin.yaml\": __glob_0[\"role\"],\n"));
    // guest.yaml has no `role`; it is still indexed and reads as undefined
    assert!(source.contains("  \"./yaml/guest.yaml\": __glob_1[\"role\"],\n"));

    let data = loader
        .load_data_module(&fx.path("yaml/admin.yaml"))
        .await
        .unwrap()
        .source;
    assert_eq!(
        data,
        "const __data = JSON.parse(\"{\\\"level\\\":3,\\\"role\\\":\\\"admin\\\"}\");\n\
         export default __data;\n\
         const __key_0 = __data[\"level\"];\n\
         export { __key_0 as \"level\" };\n\
         const __key_1 = __data[\"role\"];\n\
         export { __key_1 as \"role\" };\n"
    );

    let guest = loader
        .load_data_module(&fx.path("yaml/guest.yaml"))
        .await
        .unwrap()
        .source;
    assert!(guest.contains("export { __key_1 as \"name\" };"));
    assert!(!guest.contains("as \"role\""));
    assert!(!guest.contains("\\\"role\\\""));
}

#[tokio::test]
async fn test_json_with_import_attributes() {
    let fx = Fixture::new();
    let eager = synth(&modern(), "./json/*.json?glob&eager&import=default", &fx.main_js()).await;
    assert!(eager.contains(&format!(
        "import * as __glob_0 from \"{}\" with {{ type: \"json\" }};",
        fx.url("json/one.json")
    )));
    assert!(eager.contains("  \"./json/one.json\": __glob_0[\"default\"],\n"));

    let lazy = synth(&modern(), "./json/*.json?glob&import=default", &fx.main_js()).await;
    assert!(lazy.contains(&format!(
        "  \"./json/two.json\": () => import(\"{}\", {{ with: {{ type: \"json\" }} }}).then((m) => m[\"default\"]),\n",
        fx.url("json/two.json")
    )));
}

#[tokio::test]
async fn test_json_without_import_attributes() {
    let fx = Fixture::new();
    let loader = legacy();
    let source = synth(&loader, "./json/*.json?glob&eager&import=default", &fx.main_js()).await;

    assert!(!source.contains("with {"));
    let one = data_module_url(&fx.path("json/one.json").to_string_lossy());
    assert!(source.contains(&format!("import * as __glob_0 from \"{}\";", one)));

    let data = loader
        .load_data_module(&fx.path("json/one.json"))
        .await
        .unwrap()
        .source;
    assert_eq!(
        data,
        "const __data = JSON.parse(\"{\\\"n\\\":1}\");\nexport default __data;\n"
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_escaped_names() {
    let fx = Fixture::new();
    fs::create_dir_all(fx.path("odd")).unwrap();
    fs::write(fx.path("odd/it's \"quoted\".js"), "export default 1;").unwrap();
    fs::write(fx.path("odd/with space.js"), "export default 2;").unwrap();
    let source = synth(&modern(), "./odd/*.js?glob", &fx.main_js()).await;

    assert!(source.contains("  \"./odd/it's \\\"quoted\\\".js\": () => import("));
    assert!(source.contains("/odd/it%27s%20%22quoted%22.js\")"));
    assert!(source.contains("/odd/with%20space.js\")"));
}

#[tokio::test]
async fn test_eager_and_lazy_share_keys() {
    let fx = Fixture::new();
    let loader = modern();
    let eager = GlobRequest::from_specifier("./nested/**/*.js?glob&eager", &fx.root)
        .unwrap()
        .unwrap();
    let lazy = GlobRequest::from_specifier("./nested/**/*.js?glob", &fx.root)
        .unwrap()
        .unwrap();

    let eager = loader.plan(&eager).await.unwrap();
    let lazy = loader.plan(&lazy).await.unwrap();

    assert_eq!(eager.mode, LoadMode::Eager);
    assert_eq!(lazy.mode, LoadMode::Lazy);
    assert_eq!(eager.bindings, lazy.bindings);
}

#[tokio::test]
async fn test_results_follow_the_file_system() {
    let fx = Fixture::new();
    let loader = modern();

    let before = synth(&loader, "./basic/*.js?glob", &fx.main_js()).await;
    fs::write(fx.path("basic/c.js"), "export default () => 'c';").unwrap();
    let after = synth(&loader, "./basic/*.js?glob", &fx.main_js()).await;

    assert!(!before.contains("./basic/c.js"));
    assert!(after.contains("\"./basic/c.js\": () => import("));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_loads_agree() {
    let fx = Fixture::new();
    let loader = modern();
    let main_js = fx.main_js();

    let loads = (0..16).map(|i| {
        let specifier = if i % 2 == 0 {
            "./nested/**/*.js?glob&eager"
        } else {
            "./yaml/*.yaml?glob&import=role"
        };
        loader.synthesize_specifier(specifier, &main_js)
    });
    let results = futures::future::join_all(loads).await;

    let sources: Vec<String> = results
        .into_iter()
        .map(|r| r.unwrap().unwrap().source)
        .collect();
    for pair in sources.chunks(2) {
        assert_eq!(pair[0], sources[0]);
        assert_eq!(pair[1], sources[1]);
    }
}

#[tokio::test]
async fn test_hooks_resolve_then_load() {
    let fx = Fixture::new();
    let hooks = GlobHooks::new(modern());
    let context = ResolveContext {
        parent_url: Some(fx.url("sub/main.js")),
        ..Default::default()
    };

    let resolved = hooks
        .resolve("../basic/*.js?glob&import=default", context, |specifier, _| async move {
            Err::<ResolveOutcome, _>(GlobError::Host(format!("unexpected {specifier}")))
        })
        .await
        .unwrap();
    assert!(resolved.short_circuit);
    assert!(resolved.url.contains("?glob&import=default&importer="));

    let loaded = hooks
        .load(&resolved.url, LoadContext::default(), |url, _| async move {
            Err::<LoadOutcome, _>(GlobError::Host(format!("unexpected {url}")))
        })
        .await
        .unwrap();
    let source = loaded.source.unwrap();

    assert!(source.contains(&format!(
        "  \"../basic/a.js\": () => import(\"{}\").then((m) => m[\"default\"]),\n",
        fx.url("basic/a.js")
    )));
}

#[tokio::test]
async fn test_malformed_payload_fails_alone() {
    let fx = Fixture::new();
    fs::write(fx.path("yaml/broken.yaml"), "role: [\n").unwrap();
    let loader = modern();

    let broken = loader.load_data_module(&fx.path("yaml/broken.yaml")).await;
    assert!(matches!(broken, Err(GlobError::Payload { .. })));

    let admin = loader.load_data_module(&fx.path("yaml/admin.yaml")).await;
    assert!(admin.is_ok());

    // The glob module itself does not read payloads
    let source = synth(&loader, "./yaml/*.yaml?glob", &fx.main_js()).await;
    assert!(source.contains("\"./yaml/broken.yaml\": () => import("));
}
