//! Layering guardrails for the workspace crates.
//!
//! `kiln_core` is the shared vocabulary and must stay dependency-free; `kiln_syntax` must not reach back into the
//! backend. These tests scan the member manifests and fail if either rule is broken.

fn dependency_names(manifest: &str) -> Vec<String> {
    let mut in_dependencies = false;
    let mut names = Vec::new();

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        // Track when we enter/exit the `[dependencies]` table.
        if line.starts_with('[') {
            in_dependencies = line == "[dependencies]";
            continue;
        }
        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }
        // Strip inline comments for robustness.
        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        if let Some((name, _)) = line_no_comment.split_once('=') {
            names.push(name.trim().to_string());
        }
    }
    names
}

#[test]
fn core_vocabulary_has_no_dependencies() {
    let manifest = include_str!("../crates/kiln_core/Cargo.toml");
    let deps = dependency_names(manifest);
    assert!(deps.is_empty(), "kiln_core must not have dependencies, found {deps:?}");
}

#[test]
fn syntax_does_not_depend_on_backend() {
    let manifest = include_str!("../crates/kiln_syntax/Cargo.toml");
    let deps = dependency_names(manifest);
    assert!(
        !deps.iter().any(|d| d == "kiln"),
        "kiln_syntax must not depend on the kiln crate, found {deps:?}"
    );
}
