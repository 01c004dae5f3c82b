//! Walks the workspace sources and fails on architectural violations.
//!
//! The core crate must stay headless: a UI-framework import there would
//! quietly undo the core/surface split that everything else relies on.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

fn workspace_root() -> PathBuf {
    // tests/architectural-enforcement -> workspace root
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .canonicalize()
        .expect("workspace root")
}

fn rust_sources(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "rs"))
        .map(|entry| entry.into_path())
        .collect()
}

fn files_containing(dir: &Path, needles: &[&str]) -> Vec<(PathBuf, String)> {
    let mut hits = Vec::new();
    for path in rust_sources(dir) {
        let content = fs::read_to_string(&path).expect("readable source file");
        for needle in needles {
            if content.contains(needle) {
                hits.push((path.clone(), (*needle).to_string()));
            }
        }
    }
    hits
}

#[test]
fn test_core_has_no_ui_framework_references() {
    let core_src = workspace_root().join("core/src");
    let hits = files_containing(&core_src, &["ratatui", "crossterm"]);

    assert!(
        hits.is_empty(),
        "UI framework references in the headless core: {hits:?}"
    );
}

#[test]
fn test_no_blocking_sleep_in_production_code() {
    let root = workspace_root();
    for member in ["core/src", "tui/src"] {
        let hits = files_containing(&root.join(member), &["std::thread::sleep"]);
        assert!(
            hits.is_empty(),
            "blocking sleep in async production code: {hits:?}"
        );
    }
}

#[test]
fn test_core_manifest_declares_no_ui_dependency() {
    let manifest = fs::read_to_string(workspace_root().join("core/Cargo.toml"))
        .expect("core manifest");
    assert!(!manifest.contains("ratatui"));
    assert!(!manifest.contains("crossterm"));
}
