//! End-to-end resolution scenarios over package trees written to disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use semver::Version;
use serde_json::{json, Value};
use tempfile::TempDir;

use pacc::core::{Dependency, Package, Project};
use pacc::ops::{resolve_at, ResolvedPackage};
use pacc::sources::{Located, PackageStore};
use pacc::{ResolveError, VersionRequirement};

/// A package tree: the root package under `<tmp>/app`, dependencies under
/// `<tmp>/packages`.
struct Tree {
    tmp: TempDir,
}

impl Tree {
    fn new() -> Self {
        Tree {
            tmp: TempDir::new().unwrap(),
        }
    }

    fn packages(&self) -> PathBuf {
        self.tmp.path().join("packages")
    }

    fn write(dir: &Path, name: &str, version: &str, projects: Value) -> PathBuf {
        fs::create_dir_all(dir).unwrap();
        let manifest = json!({ "name": name, "version": version, "projects": projects });
        fs::write(
            dir.join("cpackage.json"),
            serde_json::to_string_pretty(&manifest).unwrap(),
        )
        .unwrap();
        dir.to_path_buf()
    }

    fn package(&self, name: &str, version: &str, projects: Value) -> PathBuf {
        Self::write(&self.packages().join(name), name, version, projects)
    }

    fn app(&self, projects: Value) -> PathBuf {
        Self::write(&self.tmp.path().join("app"), "app", "1.0.0", projects)
    }

    fn resolve(&self, projects: Value) -> ResolvedPackage {
        let root = self.app(projects);
        resolve_at(&root, vec![self.packages()]).unwrap()
    }
}

fn project<'a>(package: &'a Package, name: &str) -> &'a Project {
    package.find_project(name).unwrap()
}

/// The package bound to the first package dependency of `project`.
fn bound(project: &Project) -> Rc<Package> {
    project
        .config
        .dependencies
        .declared
        .iter()
        .find_map(|dep| match dep {
            Dependency::Package(pd) => pd.resolved().cloned(),
            _ => None,
        })
        .unwrap()
}

fn mathlib(tree: &Tree) {
    tree.package(
        "mathlib",
        "1.0.0",
        json!([{
            "name": "mathlib",
            "type": "static lib",
            "includeFolders": { "interface": ["include/"] }
        }]),
    );
}

#[test]
fn test_app_links_against_static_library() {
    let tree = Tree::new();
    mathlib(&tree);

    let resolved = tree.resolve(json!([{
        "name": "main",
        "type": "app",
        "dependencies": { "private": ["mathlib"] }
    }]));
    let main = project(&resolved.package, "main");
    let math = bound(main);
    let config = &main.config;

    assert_eq!(config.linked_libraries.computed.private, vec!["mathlib"]);
    assert_eq!(
        config.linker_folders.computed.private,
        vec![math.predict_output_folder(project(&math, "mathlib"))]
    );

    let includes = &config.include_folders.computed.private;
    assert_eq!(includes.len(), 1);
    assert!(Path::new(&includes[0]).is_absolute());
    assert!(includes[0]
        .trim_end_matches('/')
        .ends_with("mathlib/include"));

    // Nothing lands in other tiers.
    assert!(config.linked_libraries.computed.public.is_empty());
    assert!(config.include_folders.computed.interface.is_empty());
}

#[test]
fn test_dependency_linker_folders_are_rewritten() {
    let tree = Tree::new();
    tree.package(
        "zlib",
        "1.3.1",
        json!([{
            "name": "zlib",
            "type": "static lib",
            "linkerFolders": { "public": ["lib"], "private": ["build/tmp"] }
        }]),
    );

    let resolved = tree.resolve(json!([{
        "name": "main", "type": "app", "dependencies": ["zlib"]
    }]));
    let main = project(&resolved.package, "main");
    let zlib = bound(main);

    assert_eq!(
        main.config.linker_folders.computed.private,
        vec![
            zlib.resolve_path("lib"),
            zlib.predict_output_folder(project(&zlib, "zlib")),
        ]
    );
    assert!(Path::new(&main.config.linker_folders.computed.private[0]).is_absolute());
    assert!(main.config.linker_folders.declared.is_empty());
}

#[test]
fn test_raw_interface_dependency_reaches_consumer() {
    let tree = Tree::new();
    tree.package(
        "gfx",
        "1.0.0",
        json!([{
            "name": "gfx",
            "type": "static lib",
            "dependencies": { "interface": ["file:GL"] }
        }]),
    );
    tree.package(
        "threads",
        "1.0.0",
        json!([{
            "name": "threads",
            "type": "interface",
            "dependencies": ["file:pthread"]
        }]),
    );

    let resolved = tree.resolve(json!([{
        "name": "main", "type": "app", "dependencies": ["gfx", "threads"]
    }]));
    let main = project(&resolved.package, "main");
    let gfx = bound(main);
    let gfx_libs = &project(&gfx, "gfx").config.linked_libraries;

    assert_eq!(gfx_libs.computed.interface, vec!["GL"]);
    assert!(gfx_libs.computed.private.is_empty());
    assert_eq!(
        main.config.linked_libraries.computed.private,
        vec!["GL", "gfx", "pthread"]
    );
}

#[test]
fn test_filter_overlay_travels_through_chain() {
    let tree = Tree::new();
    tree.package(
        "core",
        "1.0.0",
        json!([{
            "name": "core",
            "type": "static lib",
            "filters": {
                "configurations:Debug": { "defines": { "public": ["CORE_DEBUG"] } }
            }
        }]),
    );
    tree.package(
        "mid",
        "1.0.0",
        json!([{
            "name": "mid",
            "type": "static lib",
            "dependencies": { "public": ["core"] }
        }]),
    );

    let resolved = tree.resolve(json!([{
        "name": "main", "type": "app", "dependencies": ["mid"]
    }]));
    let main = project(&resolved.package, "main");
    let mid = bound(main);

    let mid_debug = &project(&mid, "mid").filters["configurations:Debug"];
    assert_eq!(mid_debug.defines.computed.public, vec!["CORE_DEBUG"]);
    assert!(mid_debug.defines.declared.is_empty());

    let main_debug = &main.filters["configurations:Debug"];
    assert_eq!(main_debug.defines.computed.private, vec!["CORE_DEBUG"]);
    assert_eq!(main_debug.linked_libraries.computed.private, vec!["core", "mid"]);

    // The overlay stays out of the base configuration.
    assert!(main.config.defines.computed.is_empty());
}

#[test]
fn test_private_defines_never_leak() {
    let tree = Tree::new();
    tree.package(
        "utils",
        "1.0.0",
        json!([{
            "name": "utils",
            "type": "static lib",
            "defines": { "private": ["UTILS_INTERNAL"], "public": ["UTILS_API"] }
        }]),
    );
    tree.package(
        "mathlib",
        "1.0.0",
        json!([{
            "name": "mathlib",
            "type": "static lib",
            "dependencies": { "private": ["utils"] }
        }]),
    );

    let resolved = tree.resolve(json!([{
        "name": "main", "type": "app", "dependencies": ["mathlib"]
    }]));
    let main = project(&resolved.package, "main");
    let math = bound(main);
    let math_defines = &project(&math, "mathlib").config.defines;

    assert_eq!(math_defines.computed.private, vec!["UTILS_API"]);
    assert!(!math_defines.effective().any(|d| d == "UTILS_INTERNAL"));

    let app_defines = &main.config.defines;
    assert!(app_defines.computed.is_empty());
    assert!(!app_defines.effective().any(|d| d.starts_with("UTILS_")));
    assert_eq!(main.config.linked_libraries.computed.private, vec!["mathlib"]);
}

#[test]
fn test_interface_values_travel_unmodified() {
    let tree = Tree::new();
    tree.package(
        "core",
        "1.0.0",
        json!([{
            "name": "core",
            "type": "interface",
            "includeFolders": "include",
            "defines": "CORE_API"
        }]),
    );
    tree.package(
        "mid",
        "1.0.0",
        json!([{
            "name": "mid",
            "type": "static lib",
            "dependencies": { "public": ["core"] }
        }]),
    );

    let resolved = tree.resolve(json!([{
        "name": "main", "type": "app", "dependencies": ["mid"]
    }]));
    let main = project(&resolved.package, "main");
    let mid = bound(main);
    let mid_config = &project(&mid, "mid").config;

    assert_eq!(mid_config.defines.computed.public, vec!["CORE_API"]);
    assert_eq!(main.config.defines.computed.private, vec!["CORE_API"]);
    assert_eq!(
        main.config.include_folders.computed.private,
        mid_config.include_folders.computed.public
    );

    // The header-only project injects no link inputs anywhere.
    assert!(mid_config.linked_libraries.computed.is_empty());
    assert_eq!(main.config.linked_libraries.computed.private, vec!["mid"]);
}

#[test]
fn test_diamond_loads_shared_package_once() {
    let tree = Tree::new();
    tree.package(
        "d",
        "1.0.0",
        json!([{ "name": "d", "type": "static lib", "defines": { "public": ["D_API"] } }]),
    );
    for name in ["b", "c"] {
        tree.package(
            name,
            "1.0.0",
            json!([{ "name": name, "type": "static lib", "dependencies": { "public": ["d"] } }]),
        );
    }

    let resolved = tree.resolve(json!([{
        "name": "main", "type": "app", "dependencies": ["b", "c"]
    }]));

    assert_eq!(resolved.stats.packages_loaded, 3);
    assert_eq!(resolved.stats.packages_reused, 1);
    assert_eq!(resolved.dependencies.len(), 3);

    let main = project(&resolved.package, "main");
    let bound_pkgs: Vec<Rc<Package>> = main
        .config
        .dependencies
        .declared
        .private
        .iter()
        .filter_map(|dep| match dep {
            Dependency::Package(pd) => pd.resolved().cloned(),
            _ => None,
        })
        .collect();
    let d_via_b = bound(project(&bound_pkgs[0], "b"));
    let d_via_c = bound(project(&bound_pkgs[1], "c"));
    assert!(Rc::ptr_eq(&d_via_b, &d_via_c));

    // Duplicates across merge paths are preserved.
    assert_eq!(main.config.defines.computed.private, vec!["D_API", "D_API"]);
    assert_eq!(
        main.config.linked_libraries.computed.private,
        vec!["d", "b", "d", "c"]
    );
}

#[test]
fn test_self_dependency_shares_package_root() {
    let tree = Tree::new();
    let resolved = tree.resolve(json!([
        {
            "name": "engine",
            "type": "shared lib",
            "includeFolders": { "public": ["engine/include"] }
        },
        {
            "name": "game",
            "type": "app",
            "dependencies": ["self:engine"]
        }
    ]));

    let game = project(&resolved.package, "game");
    assert_eq!(game.config.include_folders.computed.private, vec!["engine/include"]);
    assert_eq!(game.config.linked_libraries.computed.private, vec!["engine"]);
    assert_eq!(resolved.stats.packages_loaded, 0);
    assert_eq!(resolved.stats.merges, 1);
}

#[test]
fn test_version_requirement_table() {
    let any = VersionRequirement::parse("Any");
    assert!(any.test(&Version::parse("9.9.9").unwrap()));

    let exact = VersionRequirement::parse("=1.2.0");
    assert!(exact.test(&Version::parse("1.2.0").unwrap()));
    assert!(!exact.test(&Version::parse("1.2.1").unwrap()));

    assert_eq!(VersionRequirement::parse("not a version"), VersionRequirement::Any);
    assert!(VersionRequirement::parse_lenient("not a version").is_fallback());
}

#[test]
fn test_store_skips_version_mismatch() {
    let tmp = TempDir::new().unwrap();
    let first = tmp.path().join("first");
    let second = tmp.path().join("second");
    let projects = json!([{ "name": "utils", "type": "static lib" }]);
    Tree::write(&first.join("utils"), "utils", "1.0.0", projects.clone());
    Tree::write(&second.join("utils"), "utils", "2.1.0", projects);

    let store = PackageStore::new(vec![first.clone(), second.clone()]);

    match store.load_by_name("utils", &VersionRequirement::parse("^2")).unwrap() {
        Located::Fresh(pkg) => assert_eq!(pkg.version, Version::new(2, 1, 0)),
        other => panic!("expected a fresh package, got {:?}", other),
    }

    let err = store
        .load_by_name("utils", &VersionRequirement::parse(">=3"))
        .unwrap_err();
    match err {
        ResolveError::PackageNotFound { mismatch, searched, .. } => {
            assert_eq!(searched, vec![first, second.clone()]);
            let mismatch = mismatch.unwrap();
            assert_eq!(mismatch.version, Version::new(2, 1, 0));
            assert_eq!(mismatch.root, second.join("utils").canonicalize().unwrap());
        }
        other => panic!("expected PackageNotFound, got {:?}", other),
    }
}

#[test]
fn test_dependency_on_root_is_a_cycle() {
    let tree = Tree::new();
    tree.package(
        "lib",
        "1.0.0",
        json!([{ "name": "lib", "type": "static lib", "dependencies": ["app"] }]),
    );
    let root = tree.app(json!([{ "name": "app", "type": "app", "dependencies": ["lib"] }]));

    // The root's parent holds `app/` itself.
    let candidates = vec![tree.packages(), tree.tmp.path().to_path_buf()];
    let err = resolve_at(&root, candidates).unwrap_err();

    match err.downcast_ref::<ResolveError>() {
        Some(ResolveError::CycleDetected { packages }) => {
            assert_eq!(packages, &vec!["app", "lib", "app"]);
        }
        other => panic!("expected CycleDetected, got {:?}", other),
    }
}
