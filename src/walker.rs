//! Deterministic depth-first traversal of a project root.

use crate::classify::Classifier;
use crate::error::SnaplogError;
use crate::ignore::IgnoreMatcher;
use crate::safety::{PathResolution, safe_relative_path};
use crate::types::{EntryKind, SkipReason, WalkEntry, WalkEvent};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

struct Frame {
    /// Canonical path of the directory this frame is reading. Frames on
    /// the stack form the cycle guard: a directory whose canonical form is
    /// already open is never re-entered.
    canonical: PathBuf,
    /// Directory path relative to the project root; empty for the root.
    relative: PathBuf,
    entries: std::vec::IntoIter<(OsString, PathBuf)>,
}

/// Lazy, single-pass iterator over surviving entries and skip records.
///
/// Entries at each level are visited in lexicographic name order so that
/// output artifacts are reproducible across runs on an unchanged tree.
/// Not restartable; start a fresh walk for each aggregation run.
pub struct Walker<'a> {
    matcher: &'a IgnoreMatcher,
    classifier: &'a Classifier,
    root: PathBuf,
    stack: Vec<Frame>,
}

impl<'a> Walker<'a> {
    /// Canonicalizes `project_root` and opens the walk.
    ///
    /// A missing or non-directory root is a configuration error; an
    /// unreadable root directory is fatal I/O. Everything below the root
    /// fails soft.
    pub fn new(
        project_root: &Path,
        matcher: &'a IgnoreMatcher,
        classifier: &'a Classifier,
    ) -> Result<Self, SnaplogError> {
        let root = project_root.canonicalize().map_err(|_| {
            SnaplogError::config(format!(
                "project root does not exist: {}",
                project_root.display()
            ))
        })?;
        if !root.is_dir() {
            return Err(SnaplogError::config(format!(
                "project root must be a directory: {}",
                project_root.display()
            )));
        }
        let entries = read_dir_sorted(&root).map_err(|e| SnaplogError::io(&root, e))?;
        Ok(Self {
            matcher,
            classifier,
            root: root.clone(),
            stack: vec![Frame {
                canonical: root,
                relative: PathBuf::new(),
                entries: entries.into_iter(),
            }],
        })
    }

    /// The canonical project root all yielded paths lie under.
    pub fn canonical_root(&self) -> &Path {
        &self.root
    }
}

impl Iterator for Walker<'_> {
    type Item = WalkEvent;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            let Some((name, path)) = frame.entries.next() else {
                self.stack.pop();
                continue;
            };
            let relative = frame.relative.join(&name);

            let link_meta = match fs::symlink_metadata(&path) {
                Ok(meta) => meta,
                Err(e) => {
                    tracing::warn!(path = %relative.display(), error = %e, "unreadable entry");
                    return Some(WalkEvent::Skipped(SkipReason::Unreadable(relative)));
                }
            };
            let is_symlink = link_meta.file_type().is_symlink();

            let canonical_relative = match safe_relative_path(&self.root, &path) {
                PathResolution::Inside(rel) => rel,
                PathResolution::Escaped => {
                    tracing::warn!(path = %relative.display(), "entry escapes project root");
                    return Some(WalkEvent::Skipped(SkipReason::Escaped(relative)));
                }
                PathResolution::Unreadable => {
                    tracing::warn!(path = %relative.display(), "entry could not be resolved");
                    return Some(WalkEvent::Skipped(SkipReason::Unreadable(relative)));
                }
            };
            let canonical = self.root.join(&canonical_relative);

            let meta = match fs::metadata(&path) {
                Ok(meta) => meta,
                Err(e) => {
                    tracing::warn!(path = %relative.display(), error = %e, "unreadable entry");
                    return Some(WalkEvent::Skipped(SkipReason::Unreadable(relative)));
                }
            };

            if self.matcher.should_skip(&relative, meta.is_dir()) {
                // Pruned subtrees and omitted files are silent: never
                // yielded, never counted as skipped.
                continue;
            }

            if meta.is_dir() {
                if self.stack.iter().any(|f| f.canonical == canonical) {
                    tracing::warn!(path = %relative.display(), "symlink cycle detected");
                    return Some(WalkEvent::Skipped(SkipReason::Cycle(relative)));
                }
                let children = match read_dir_sorted(&path) {
                    Ok(children) => children,
                    Err(e) => {
                        tracing::warn!(path = %relative.display(), error = %e, "unreadable directory");
                        return Some(WalkEvent::Skipped(SkipReason::Unreadable(relative)));
                    }
                };
                self.stack.push(Frame {
                    canonical: canonical.clone(),
                    relative: relative.clone(),
                    entries: children.into_iter(),
                });
                return Some(WalkEvent::Entry(WalkEntry {
                    path: canonical,
                    relative,
                    kind: if is_symlink {
                        EntryKind::SymlinkDirectory
                    } else {
                        EntryKind::Directory
                    },
                    size: 0,
                    category: None,
                }));
            }

            if meta.is_file() {
                let category = self.classifier.classify(&name.to_string_lossy()).to_string();
                return Some(WalkEvent::Entry(WalkEntry {
                    path: canonical,
                    relative,
                    kind: if is_symlink {
                        EntryKind::SymlinkFile
                    } else {
                        EntryKind::File
                    },
                    size: meta.len(),
                    category: Some(category),
                }));
            }

            // Sockets, FIFOs and other special files are of no use to any
            // aggregation mode.
        }
    }
}

fn read_dir_sorted(dir: &Path) -> std::io::Result<Vec<(OsString, PathBuf)>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        entries.push((entry.file_name(), entry.path()));
    }
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));
    Ok(entries)
}
