//! # Snaplog
//!
//! `snaplog` aggregates and snapshots a project's source tree into
//! human-readable log artifacts: per-category file bundles, single
//! consolidated files, and annotated directory trees.
//!
//! The core is a deterministic, symlink-safe traversal engine: ignore
//! patterns (built-in defaults, the project's `.gitignore`, and caller
//! overrides) are compiled once into an [`IgnoreMatcher`]; every entry is
//! resolved against the canonical project root so no symlink or `..`
//! traversal can escape it; surviving files are classified by an ordered
//! rule table; and each aggregation mode streams content to its
//! destination through a temp-file-then-rename handle.
//!
//! Traversal is single-threaded and synchronous by design; the ordering
//! guarantee (depth-first, lexicographic per level) makes two runs over an
//! unchanged tree produce byte-identical artifacts.
//!
//! # Example
//!
//! ```no_run
//! use snaplog::{Config, collect};
//! use std::collections::BTreeSet;
//! use std::path::Path;
//!
//! let config = Config::default();
//! let categories: BTreeSet<String> = ["python".to_string()].into();
//! let result = collect(
//!     Path::new("."),
//!     Path::new("snaplog-out"),
//!     &config,
//!     &categories,
//!     false,
//! )
//! .expect("collect failed");
//!
//! println!(
//!     "{} files into {} artifacts ({} skipped)",
//!     result.files_included,
//!     result.artifacts.len(),
//!     result.files_skipped
//! );
//! ```

mod aggregate;
mod classify;
mod config;
mod error;
mod ignore;
mod safety;
mod types;
mod walker;

pub use aggregate::{collect, consolidate, render_tree};
pub use classify::{Classifier, DEFAULT_CATEGORY};
pub use config::{Config, ConfigBuilder, DEFAULT_MAX_INLINE_BYTES};
pub use error::SnaplogError;
pub use ignore::{IgnoreMatcher, load_project_patterns};
pub use safety::{PathResolution, safe_relative_path};
pub use types::{AggregationResult, EntryKind, SkipReason, WalkEntry, WalkEvent};
pub use walker::Walker;
