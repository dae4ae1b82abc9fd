use snaplog::{Config, ConfigBuilder, collect, consolidate, render_tree};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn plain_config() -> Config {
    ConfigBuilder::new()
        .skip_dirs(Vec::new())
        .ignore_patterns(Vec::new())
        .build()
}

#[cfg(unix)]
#[test]
fn integration_collect_scenario() {
    let dir = tempdir().unwrap();
    let outside = tempdir().unwrap();
    fs::create_dir(dir.path().join("a")).unwrap();
    fs::write(dir.path().join("a/x.py"), "print('hello from x')\n").unwrap();
    fs::create_dir(dir.path().join("a/.git")).unwrap();
    fs::write(dir.path().join("a/.git/config"), "[core]\n").unwrap();
    std::os::unix::fs::symlink(outside.path(), dir.path().join("b")).unwrap();

    let out = dir.path().join("out");
    let result = collect(dir.path(), &out, &Config::default(), &set(&["python"]), false).unwrap();

    assert_eq!(result.artifacts.len(), 1);
    assert_eq!(result.files_included, 1);
    assert!(result.files_skipped >= 1);
    let artifact = &result.artifacts[0];
    assert!(artifact.starts_with(&out));
    let content = fs::read_to_string(artifact).unwrap();
    assert!(content.contains("--- a/x.py ---"));
    assert!(content.contains("print('hello from x')"));
    assert!(!content.contains(".git"));
}

#[test]
fn integration_collect_is_deterministic() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("one.py"), "x = 1\n").unwrap();
    fs::create_dir(dir.path().join("pkg")).unwrap();
    fs::write(dir.path().join("pkg/two.py"), "y = 2\n").unwrap();
    fs::write(dir.path().join("notes.md"), "# notes\n").unwrap();

    let config = plain_config();
    let outputs = tempdir().unwrap();
    let out1 = outputs.path().join("out1");
    let out2 = outputs.path().join("out2");
    let first = collect(dir.path(), &out1, &config, &BTreeSet::new(), false).unwrap();
    let second = collect(dir.path(), &out2, &config, &BTreeSet::new(), false).unwrap();

    assert_eq!(first.artifacts.len(), second.artifacts.len());
    for (a, b) in first.artifacts.iter().zip(&second.artifacts) {
        assert_eq!(fs::read(a).unwrap(), fs::read(b).unwrap());
    }
}

#[test]
fn integration_collect_oversized_placeholder() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("big.py"), "A".repeat(5000)).unwrap();
    fs::write(dir.path().join("small.py"), "ok = True\n").unwrap();

    let config = ConfigBuilder::new()
        .skip_dirs(Vec::new())
        .ignore_patterns(Vec::new())
        .max_inline_bytes(100)
        .build();
    let out = dir.path().join("out");
    let result = collect(dir.path(), &out, &config, &set(&["python"]), false).unwrap();

    assert_eq!(result.files_included, 1);
    assert_eq!(result.files_skipped, 1);
    let content = fs::read_to_string(&result.artifacts[0]).unwrap();
    assert!(content.contains("--- big.py ---"));
    assert!(content.contains("[skipped: file exceeds 100 bytes]"));
    assert!(!content.contains("AAAA"));
    assert!(content.contains("ok = True"));
}

#[test]
fn integration_consolidate_in_walker_order() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.py"), "# a\n").unwrap();
    fs::write(dir.path().join("b.py"), "# b\n").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/c.py"), "# c\n").unwrap();
    fs::write(dir.path().join("readme.md"), "# docs\n").unwrap();

    let output = dir.path().join("out/consolidated.txt");
    let result = consolidate(dir.path(), &output, &plain_config(), &set(&["py"]), false).unwrap();

    assert_eq!(result.files_included, 3);
    let content = fs::read_to_string(&output).unwrap();
    let pos_a = content.find("--- a.py ---").unwrap();
    let pos_b = content.find("--- b.py ---").unwrap();
    let pos_c = content.find("--- sub/c.py ---").unwrap();
    assert!(pos_a < pos_b && pos_b < pos_c);
    assert!(!content.contains("readme.md"));
}

#[test]
fn integration_consolidate_empty_extension_set() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.py"), "# a\n").unwrap();

    let output = dir.path().join("empty.txt");
    let result =
        consolidate(dir.path(), &output, &plain_config(), &BTreeSet::new(), false).unwrap();

    assert_eq!(result.files_included, 0);
    let content = fs::read_to_string(&output).unwrap();
    assert!(!content.contains("--- "));
}

#[test]
fn integration_consolidate_binary_placeholder() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("blob.py"), [0u8, 159, 146, 150, 0, 1]).unwrap();
    fs::write(dir.path().join("ok.py"), "fine = 1\n").unwrap();

    let output = dir.path().join("out.txt");
    let result = consolidate(dir.path(), &output, &plain_config(), &set(&["py"]), false).unwrap();

    assert_eq!(result.files_included, 1);
    assert_eq!(result.files_skipped, 1);
    let content = fs::read_to_string(&output).unwrap();
    assert!(content.contains("--- blob.py ---"));
    assert!(content.contains("[skipped: binary file]"));
}

#[test]
fn integration_tree_layout() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("a")).unwrap();
    fs::write(dir.path().join("a/x.py"), "pass\n").unwrap();
    fs::write(dir.path().join("top.md"), "# t\n").unwrap();

    let output = dir.path().join("tree.txt");
    render_tree(
        dir.path(),
        &output,
        &plain_config(),
        &BTreeSet::new(),
        false,
        false,
    )
    .unwrap();

    let content = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines, vec!["a/", "  x.py", "top.md"]);
}

#[test]
fn integration_tree_content_ceiling() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("big.py"), "B".repeat(100)).unwrap();

    let config = ConfigBuilder::new()
        .skip_dirs(Vec::new())
        .ignore_patterns(Vec::new())
        .max_inline_bytes(10)
        .build();
    let output = dir.path().join("tree.txt");
    let result = render_tree(dir.path(), &output, &config, &BTreeSet::new(), true, false).unwrap();

    assert_eq!(result.files_skipped, 1);
    let content = fs::read_to_string(&output).unwrap();
    assert!(content.contains("[skipped: file exceeds 10 bytes]"));
    assert!(!content.contains("BBBB"));
}

#[test]
fn integration_tree_inlines_contents() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("a")).unwrap();
    fs::write(dir.path().join("a/x.py"), "line1\nline2\n").unwrap();

    let output = dir.path().join("tree.txt");
    let result = render_tree(
        dir.path(),
        &output,
        &plain_config(),
        &BTreeSet::new(),
        true,
        false,
    )
    .unwrap();

    assert_eq!(result.files_included, 1);
    let content = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines, vec!["a/", "  x.py", "    line1", "    line2"]);
}

#[test]
fn integration_dry_run_writes_nothing() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.py"), "# a\n").unwrap();

    let out = dir.path().join("out");
    let result = collect(dir.path(), &out, &plain_config(), &BTreeSet::new(), true).unwrap();

    assert_eq!(result.bytes_written, 0);
    assert_eq!(result.files_included, 1);
    assert!(!result.artifacts.is_empty());
    assert!(!out.exists());

    let output = dir.path().join("consolidated.txt");
    let result =
        consolidate(dir.path(), &output, &plain_config(), &set(&["py"]), true).unwrap();
    assert_eq!(result.bytes_written, 0);
    assert!(!output.exists());
}

#[test]
fn integration_output_directories_created() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.py"), "# a\n").unwrap();

    let output = dir.path().join("deep/nested/out.txt");
    consolidate(dir.path(), &output, &plain_config(), &set(&["py"]), false).unwrap();
    assert!(output.exists());
}

#[test]
fn integration_missing_root_is_config_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");
    let result = collect(
        &missing,
        &dir.path().join("out"),
        &plain_config(),
        &BTreeSet::new(),
        false,
    );
    assert!(result.is_err());
}

#[test]
fn integration_tree_matches_collect_paths() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("pkg")).unwrap();
    fs::write(dir.path().join("pkg/mod.py"), "# m\n").unwrap();
    fs::write(dir.path().join("run.py"), "# r\n").unwrap();

    let config = plain_config();
    let tree_out = dir.path().join("tree.txt");
    render_tree(dir.path(), &tree_out, &config, &set(&["py"]), false, false).unwrap();

    // Reconstruct relative paths from the indentation.
    let content = fs::read_to_string(&tree_out).unwrap();
    let mut stack: Vec<String> = Vec::new();
    let mut tree_files: BTreeSet<String> = BTreeSet::new();
    for line in content.lines() {
        let depth = (line.len() - line.trim_start().len()) / 2;
        let name = line.trim_start();
        stack.truncate(depth);
        if let Some(dir_name) = name.strip_suffix('/') {
            stack.push(dir_name.to_string());
        } else {
            let mut parts = stack.clone();
            parts.push(name.to_string());
            tree_files.insert(parts.join("/"));
        }
    }

    let collect_out = dir.path().join("out");
    let result = collect(dir.path(), &collect_out, &config, &set(&["python"]), false).unwrap();
    let mut collect_files: BTreeSet<String> = BTreeSet::new();
    for artifact in &result.artifacts {
        let content = fs::read_to_string(artifact).unwrap();
        for line in content.lines() {
            if let Some(rest) = line.strip_prefix("--- ") {
                if let Some(path) = rest.strip_suffix(" ---") {
                    collect_files.insert(path.to_string());
                }
            }
        }
    }
    assert_eq!(tree_files, collect_files);
}
