//! Discovery context enumeration, caching and confinement tests

use std::fs;
use std::path::Path;

use serde_json::json;
use tempfile::TempDir;

use crate::config::ConfigTree;
use crate::context::DiscoveryContext;
use crate::error::PluginError;

/// Workspace fixture:
/// ```text
/// a.txt
/// notes.md
/// src/lib.txt
/// src/deep/mod.txt
/// tmp/scratch.txt
/// ```
fn build_workspace() -> TempDir {
    let dir = TempDir::new().expect("temp workspace");
    let root = dir.path();
    fs::create_dir_all(root.join("src/deep")).unwrap();
    fs::create_dir_all(root.join("tmp")).unwrap();
    fs::write(root.join("a.txt"), "a").unwrap();
    fs::write(root.join("notes.md"), "n").unwrap();
    fs::write(root.join("src/lib.txt"), "l").unwrap();
    fs::write(root.join("src/deep/mod.txt"), "m").unwrap();
    fs::write(root.join("tmp/scratch.txt"), "s").unwrap();
    dir
}

fn rel_names(ctx: &DiscoveryContext, include: &[&str], exclude: &[&str]) -> Vec<String> {
    let root = ctx.root().to_path_buf();
    let mut names: Vec<String> = ctx
        .iter_files(include, exclude)
        .map(|p| {
            p.strip_prefix(&root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    names.sort();
    names
}

#[test]
fn test_include_minus_exclude() {
    let dir = build_workspace();
    let ctx = DiscoveryContext::new(dir.path(), ConfigTree::default()).unwrap();

    let names = rel_names(&ctx, &["**/*.txt"], &["tmp/**"]);
    assert_eq!(names, ["a.txt", "src/deep/mod.txt", "src/lib.txt"]);
}

#[test]
fn test_empty_include_means_everything() {
    let dir = build_workspace();
    let ctx = DiscoveryContext::new(dir.path(), ConfigTree::default()).unwrap();

    let names = rel_names(&ctx, &[], &[]);
    assert_eq!(names.len(), 5);
    assert!(names.contains(&"notes.md".to_string()));
}

#[test]
fn test_repeat_call_served_from_cache() {
    let dir = build_workspace();
    let ctx = DiscoveryContext::new(dir.path(), ConfigTree::default()).unwrap();

    let first = rel_names(&ctx, &["**/*.txt"], &["tmp/**"]);
    assert_eq!(ctx.scan_count(), 1);

    let second = rel_names(&ctx, &["**/*.txt"], &["tmp/**"]);
    assert_eq!(first, second);
    // No re-scan for an identical pattern pair
    assert_eq!(ctx.scan_count(), 1);

    // Pattern order does not matter: the key is the sorted pair
    let reordered = rel_names(&ctx, &["**/*.txt"], &["tmp/**"]);
    assert_eq!(reordered, first);
    assert_eq!(ctx.scan_count(), 1);

    // A different pair scans again
    rel_names(&ctx, &["**/*.md"], &[]);
    assert_eq!(ctx.scan_count(), 2);
}

#[test]
fn test_cache_key_ignores_pattern_order() {
    let dir = build_workspace();
    let ctx = DiscoveryContext::new(dir.path(), ConfigTree::default()).unwrap();

    rel_names(&ctx, &["**/*.txt", "**/*.md"], &[]);
    rel_names(&ctx, &["**/*.md", "**/*.txt"], &[]);
    assert_eq!(ctx.scan_count(), 1);
}

#[test]
fn test_cache_opt_out_via_config() {
    let dir = build_workspace();
    let config = ConfigTree::new(json!({ "options": { "iter_files_cache": false } }));
    let ctx = DiscoveryContext::new(dir.path(), config).unwrap();

    rel_names(&ctx, &["**/*.txt"], &[]);
    rel_names(&ctx, &["**/*.txt"], &[]);
    assert_eq!(ctx.scan_count(), 2);
}

#[test]
fn test_global_config_excludes_applied() {
    let dir = build_workspace();
    let config = ConfigTree::new(json!({ "exclude_patterns": ["tmp/**"] }));
    let ctx = DiscoveryContext::new(dir.path(), config).unwrap();

    let names = rel_names(&ctx, &["**/*.txt"], &[]);
    assert_eq!(names, ["a.txt", "src/deep/mod.txt", "src/lib.txt"]);
}

#[test]
fn test_per_plugin_excludes_applied() {
    let dir = build_workspace();
    let config = ConfigTree::new(json!({
        "plugins": { "cleaner": { "exclude_patterns": ["src/**"] } }
    }));
    let ctx = DiscoveryContext::new(dir.path(), config).unwrap();

    let mut names: Vec<String> = ctx
        .iter_files_for("cleaner", &["**/*.txt"], &["tmp/**"])
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, ["a.txt"]);

    // Another plugin id gets no extra excludes
    let all = ctx.iter_files_for("other", &["**/*.txt"], &["tmp/**"]);
    assert_eq!(all.len(), 3);
}

#[test]
fn test_paths_confined_to_root() {
    let dir = build_workspace();
    let ctx = DiscoveryContext::new(dir.path(), ConfigTree::default()).unwrap();

    for path in ctx.iter_files(&["**/*"], &[]) {
        assert!(
            path.starts_with(ctx.root()),
            "{} escapes the workspace root",
            path.display()
        );
    }
    // Upward-reaching patterns match nothing outside the root
    assert!(ctx.iter_files(&["../**/*"], &[]).is_empty());
}

#[test]
fn test_malformed_pattern_skipped() {
    let dir = build_workspace();
    let ctx = DiscoveryContext::new(dir.path(), ConfigTree::default()).unwrap();

    // "[" is an unclosed bracket class; the good pattern still applies
    let names = rel_names(&ctx, &["[", "**/*.md"], &[]);
    assert_eq!(names, ["notes.md"]);
}

#[test]
fn test_question_mark_and_bracket_class() {
    let dir = build_workspace();
    let ctx = DiscoveryContext::new(dir.path(), ConfigTree::default()).unwrap();

    assert_eq!(rel_names(&ctx, &["?.txt"], &[]), ["a.txt"]);
    assert_eq!(rel_names(&ctx, &["[ab].txt"], &[]), ["a.txt"]);
    // "*" does not cross directory separators
    assert_eq!(rel_names(&ctx, &["*.txt"], &[]), ["a.txt"]);
}

#[test]
fn test_restartable_iteration() {
    let dir = build_workspace();
    let ctx = DiscoveryContext::new(dir.path(), ConfigTree::default()).unwrap();

    let mut iter = ctx.iter_files(&["**/*.txt"], &["tmp/**"]);
    assert_eq!(iter.len(), 3);
    let first = iter.next().unwrap();

    // Re-invoking with the same arguments restarts from the beginning
    let mut again = ctx.iter_files(&["**/*.txt"], &["tmp/**"]);
    assert_eq!(again.next().unwrap(), first);
}

#[test]
fn test_nonexistent_root_rejected() {
    let result = DiscoveryContext::new(Path::new("/does/not/exist"), ConfigTree::default());
    assert!(matches!(result, Err(PluginError::Discovery { .. })));
}
