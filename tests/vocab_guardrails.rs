use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use kiln_core::lang::{builtins, numerics, operators};

/// Guardrail against reintroducing stringly-typed vocabulary checks.
///
/// This is intentionally a **coarse** safety net. It looks for suspicious patterns like `== "add"` or
/// `match op.as_str() { "add" => ... }` in Rust source files where we expect callers to go through
/// `kiln_core::lang` registries instead.
///
/// Notes:
/// - We allow occurrences in `crates/kiln_core/src/lang/**` (registries themselves) and in tests/fixtures.
/// - This is not meant to be perfect; it’s meant to catch “oops I added a string match”.
#[test]
fn no_new_stringly_vocab_checks_in_rust_sources() {
    let root = repo_root();
    let spellings = vocabulary_spellings();
    let mut offenders: Vec<(PathBuf, usize, String)> = Vec::new();

    let targets = [root.join("src"), root.join("crates")];
    for dir in targets {
        if dir.exists() {
            scan_dir(&root, &dir, &spellings, &mut offenders);
        }
    }

    if !offenders.is_empty() {
        let mut msg = String::new();
        msg.push_str("Found potential stringly-typed vocabulary checks. Prefer kiln_core registries.\n\n");
        for (path, line_no, line) in offenders.into_iter().take(80) {
            msg.push_str(&format!(
                "- {}:{}: {}\n",
                path.strip_prefix(&root).unwrap_or(&path).display(),
                line_no,
                line.trim()
            ));
        }
        panic!("{msg}");
    }
}

#[test]
fn suffixes_resolve_to_registered_types() {
    for (suffix, id) in numerics::LITERAL_SUFFIXES {
        assert_eq!(numerics::from_suffix(suffix), Some(*id));
        assert!(numerics::from_str(numerics::as_str(*id)).is_some(), "suffix {suffix}");
    }
}

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn vocabulary_spellings() -> Vec<&'static str> {
    let mut set: BTreeSet<&'static str> = BTreeSet::new();

    set.extend(operators::UNARY_OPERATORS.iter().map(|(_, name)| *name));
    set.extend(operators::BINARY_OPERATORS.iter().map(|(_, name)| *name));
    set.extend(operators::TERNARY_OPERATORS.iter().map(|(_, name)| *name));
    set.extend(numerics::NUMERIC_TYPES.iter().map(|t| t.canonical));
    set.extend(numerics::LITERAL_SUFFIXES.iter().map(|(suffix, _)| *suffix));
    set.extend(builtins::BUILTIN_FUNCTIONS.iter().map(|b| b.canonical));

    set.into_iter().collect()
}

fn is_allowed_file(root: &Path, path: &Path) -> bool {
    let rel = path.strip_prefix(root).unwrap_or(path).to_string_lossy();
    if !rel.ends_with(".rs") {
        return true;
    }
    // Registries define the spellings; allow them.
    if rel.starts_with("crates/kiln_core/src/lang/") {
        return true;
    }
    // Tests can mention spellings directly.
    if rel.starts_with("tests/") {
        return true;
    }
    false
}

fn scan_dir(root: &Path, dir: &Path, spellings: &[&'static str], offenders: &mut Vec<(PathBuf, usize, String)>) {
    let Ok(entries) = fs::read_dir(dir) else { return };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            scan_dir(root, &path, spellings, offenders);
            continue;
        }
        if is_allowed_file(root, &path) {
            continue;
        }
        let Ok(contents) = fs::read_to_string(&path) else {
            continue;
        };
        for (idx, line) in contents.lines().enumerate() {
            if is_suspicious_line(line, spellings) {
                offenders.push((path.clone(), idx + 1, line.to_string()));
            }
        }
    }
}

fn is_suspicious_line(line: &str, spellings: &[&'static str]) -> bool {
    // Avoid false positives in comments/docstrings.
    let trimmed = line.trim_start();
    if trimmed.starts_with("//") {
        return false;
    }

    // Only flag explicit (in)equality checks or match arms for known vocabulary spellings.
    for s in spellings {
        let eq = format!("== \"{s}\"");
        let ne = format!("!= \"{s}\"");
        let arm = format!("\"{s}\" =>");
        if line.contains(&eq) || line.contains(&ne) || line.contains(&arm) {
            return true;
        }
    }

    false
}
