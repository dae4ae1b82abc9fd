//! Ignore-pattern compilation and matching.
//!
//! Patterns come from three sources merged with override precedence:
//! caller overrides, then the project's `.gitignore`, then built-in
//! defaults (including the expanded `skip_dirs` list). All patterns are
//! compiled once at construction; matching never recompiles.

use crate::config::Config;
use crate::error::SnaplogError;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::fs;
use std::path::Path;

/// Predicate over candidate paths relative to the project root.
#[derive(Debug)]
pub struct IgnoreMatcher {
    /// Patterns matching any entry kind.
    any: GlobSet,
    /// Trailing-slash patterns, consulted for directories only.
    dir_only: GlobSet,
}

impl IgnoreMatcher {
    /// Builds a matcher for `project_root` from the configured skip
    /// directories, the project's `.gitignore`, and the caller's ignore
    /// patterns.
    pub fn for_project(config: &Config, project_root: &Path) -> Result<Self, SnaplogError> {
        let defaults: Vec<String> = config
            .skip_dirs
            .iter()
            .map(|d| format!("{}/", d.trim_matches('/')))
            .filter(|d| *d != "/")
            .collect();
        let project = load_project_patterns(project_root)?;
        Self::from_sources(&defaults, &project, &config.ignore_patterns)
    }

    /// Builds a matcher from explicit pattern sources, highest precedence
    /// last in the merge order: defaults, project file, overrides. All
    /// patterns are positive excludes, so precedence reduces to a
    /// de-duplicated union.
    pub fn from_sources(
        defaults: &[String],
        project: &[String],
        overrides: &[String],
    ) -> Result<Self, SnaplogError> {
        let mut any = GlobSetBuilder::new();
        let mut dir_only = GlobSetBuilder::new();
        let mut seen: Vec<String> = Vec::new();

        for pattern in overrides.iter().chain(project).chain(defaults) {
            let normalised = normalise_pattern(pattern)?;
            let Some(normalised) = normalised else {
                continue;
            };
            if seen.contains(&normalised) {
                continue;
            }
            add_pattern(&mut any, &mut dir_only, &normalised)?;
            seen.push(normalised);
        }

        Ok(Self {
            any: any
                .build()
                .map_err(|e| SnaplogError::config(format!("failed to build glob set: {}", e)))?,
            dir_only: dir_only
                .build()
                .map_err(|e| SnaplogError::config(format!("failed to build glob set: {}", e)))?,
        })
    }

    /// Returns `true` if the entry at `relative` should be excluded.
    ///
    /// A skipped directory prunes its whole subtree; the walker never
    /// consults the matcher for anything beneath it.
    pub fn should_skip(&self, relative: &Path, is_dir: bool) -> bool {
        if self.any.is_match(relative) {
            return true;
        }
        is_dir && self.dir_only.is_match(relative)
    }
}

/// Reads ignore patterns from the project's `.gitignore`, if present.
///
/// Blank lines and `#` comments are dropped. Negation (`!`) patterns are
/// not supported and are skipped.
pub fn load_project_patterns(project_root: &Path) -> Result<Vec<String>, SnaplogError> {
    let path = project_root.join(".gitignore");
    if !path.is_file() {
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(&path).map_err(|e| SnaplogError::io(&path, e))?;
    let mut patterns = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(negated) = line.strip_prefix('!') {
            tracing::debug!(pattern = negated, "negation patterns are unsupported, skipping");
            continue;
        }
        patterns.push(line.to_string());
    }
    Ok(patterns)
}

fn normalise_pattern(raw: &str) -> Result<Option<String>, SnaplogError> {
    if raw.contains('\n') || raw.contains('\r') {
        return Err(SnaplogError::config(format!(
            "ignore pattern contains newline characters: {:?}",
            raw
        )));
    }
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Ok(Some(trimmed.to_string()))
}

fn add_pattern(
    any: &mut GlobSetBuilder,
    dir_only: &mut GlobSetBuilder,
    pattern: &str,
) -> Result<(), SnaplogError> {
    let (body, is_dir_pattern) = match pattern.strip_suffix('/') {
        Some(body) => (body, true),
        None => (pattern, false),
    };
    let body = body.strip_prefix('/').unwrap_or(body);
    if body.is_empty() {
        return Ok(());
    }
    let target = if is_dir_pattern { dir_only } else { any };

    // A slash-free pattern matches any path segment at any depth; a
    // pattern containing a slash anchors to the relative path.
    target.add(compile_glob(body, pattern)?);
    if !body.contains('/') {
        target.add(compile_glob(&format!("**/{}", body), pattern)?);
    }
    Ok(())
}

fn compile_glob(glob: &str, original: &str) -> Result<globset::Glob, SnaplogError> {
    GlobBuilder::new(glob)
        .literal_separator(true)
        .build()
        .map_err(|e| {
            SnaplogError::config(format!("invalid ignore pattern '{}': {}", original, e))
        })
}
