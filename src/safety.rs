//! Symlink-safe path containment.

use std::path::{Path, PathBuf};

/// Outcome of resolving a candidate path against the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathResolution {
    /// Canonical form is the root or nested under it; carries the path
    /// relative to the canonical root.
    Inside(PathBuf),
    /// Canonical form lies outside the root: symlink escape, `..`
    /// traversal, or an absolute path elsewhere.
    Escaped,
    /// The candidate could not be resolved at all (dangling symlink,
    /// permission denied).
    Unreadable,
}

/// Resolves `candidate` to its canonical form, dereferencing symlinks at
/// every segment, and classifies it against `canonical_root`.
///
/// `canonical_root` must already be canonical; the walker resolves the
/// project root once at construction. Both escape and resolution failure
/// are non-fatal conditions the caller records as skips.
pub fn safe_relative_path(canonical_root: &Path, candidate: &Path) -> PathResolution {
    let resolved = match candidate.canonicalize() {
        Ok(path) => path,
        Err(_) => return PathResolution::Unreadable,
    };
    match resolved.strip_prefix(canonical_root) {
        Ok(relative) => PathResolution::Inside(relative.to_path_buf()),
        Err(_) => PathResolution::Escaped,
    }
}
