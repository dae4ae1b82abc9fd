use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Kind of a filesystem entry as seen before symlink resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    File,
    Directory,
    SymlinkFile,
    SymlinkDirectory,
}

impl EntryKind {
    pub fn is_dir(self) -> bool {
        matches!(self, EntryKind::Directory | EntryKind::SymlinkDirectory)
    }

    pub fn is_file(self) -> bool {
        matches!(self, EntryKind::File | EntryKind::SymlinkFile)
    }
}

/// One filesystem entry that survived safety and ignore filtering.
///
/// Produced during traversal and consumed immediately by an aggregation
/// mode; never persisted on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkEntry {
    /// Canonical absolute path.
    pub path: PathBuf,
    /// Path relative to the project root.
    pub relative: PathBuf,
    pub kind: EntryKind,
    /// Size in bytes. Zero for directories.
    pub size: u64,
    /// Category assigned by the classifier. `None` for directories.
    pub category: Option<String>,
}

/// Why the walker dropped an entry without yielding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Canonical resolution lies outside the project root.
    Escaped(PathBuf),
    /// Dangling symlink, permission denied, or other resolution failure.
    Unreadable(PathBuf),
    /// Directory already open on the traversal stack (symlink cycle).
    Cycle(PathBuf),
}

/// Item yielded by the walker: a surviving entry or a skip record.
///
/// Ignore-matcher hits produce neither variant; pruned subtrees and omitted
/// files simply do not appear.
#[derive(Debug, Clone)]
pub enum WalkEvent {
    Entry(WalkEntry),
    Skipped(SkipReason),
}

/// Summary of one aggregation run, owned by the caller for reporting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregationResult {
    /// Output artifact paths. On a dry run these are the paths that would
    /// have been written.
    pub artifacts: Vec<PathBuf>,
    /// Files whose content was embedded in an artifact.
    pub files_included: u64,
    /// Entries dropped for safety reasons plus files whose content was
    /// replaced by a placeholder (oversized or binary).
    pub files_skipped: u64,
    /// Total bytes written across all artifacts. Zero on a dry run.
    pub bytes_written: u64,
}
