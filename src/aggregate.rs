//! Aggregation modes built on top of the walker: per-category bundles,
//! single-file consolidation, and annotated tree snapshots.
//!
//! All modes stream file contents to their destination instead of
//! buffering the project in memory, write through a temp-file-then-rename
//! handle so a failed run leaves no partial artifact, and absorb
//! entry-level problems into the skip count of the returned
//! [`AggregationResult`].

use crate::classify::Classifier;
use crate::config::Config;
use crate::error::SnaplogError;
use crate::ignore::IgnoreMatcher;
use crate::types::{AggregationResult, WalkEntry, WalkEvent};
use crate::walker::Walker;
use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;

const PROBE_LEN: usize = 4096;

/// What became of one file appended to an artifact.
enum Body {
    Embedded,
    TooLarge,
    Binary,
    Unreadable,
}

/// Scoped artifact handle: writes go to a temporary file next to the
/// destination and are renamed into place on [`finish`](Self::finish).
/// Dropping the writer early removes the temporary file.
struct ArtifactWriter {
    tmp: NamedTempFile,
    dest: PathBuf,
    bytes: u64,
}

impl ArtifactWriter {
    fn create(dest: &Path) -> Result<Self, SnaplogError> {
        let parent = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|e| SnaplogError::write(parent, e))?;
        let tmp = NamedTempFile::new_in(parent).map_err(|e| SnaplogError::write(dest, e))?;
        Ok(Self {
            tmp,
            dest: dest.to_path_buf(),
            bytes: 0,
        })
    }

    fn write_str(&mut self, text: &str) -> Result<(), SnaplogError> {
        self.tmp
            .write_all(text.as_bytes())
            .map_err(|e| SnaplogError::write(&self.dest, e))?;
        self.bytes += text.len() as u64;
        Ok(())
    }

    /// Appends the standard per-file body: a `--- <relative_path> ---`
    /// header, then raw bytes (or a placeholder for oversized and binary
    /// files), then a blank separator line.
    ///
    /// Read failures on the source file are absorbed and reported as
    /// [`Body::Unreadable`]; only destination write failures are errors.
    fn append_file(&mut self, entry: &WalkEntry, max_inline_bytes: u64) -> Result<Body, SnaplogError> {
        if entry.size > max_inline_bytes {
            self.write_str(&format!(
                "--- {} ---\n[skipped: file exceeds {} bytes]\n\n",
                entry.relative.display(),
                max_inline_bytes
            ))?;
            return Ok(Body::TooLarge);
        }
        let file = match File::open(&entry.path) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(path = %entry.relative.display(), error = %e, "skipping unreadable file");
                return Ok(Body::Unreadable);
            }
        };
        let mut reader = BufReader::new(file);
        let mut probe = Vec::with_capacity(PROBE_LEN);
        if let Err(e) = reader
            .by_ref()
            .take(PROBE_LEN as u64)
            .read_to_end(&mut probe)
        {
            tracing::warn!(path = %entry.relative.display(), error = %e, "skipping unreadable file");
            return Ok(Body::Unreadable);
        }
        if content_inspector::inspect(&probe).is_binary() {
            self.write_str(&format!(
                "--- {} ---\n[skipped: binary file]\n\n",
                entry.relative.display()
            ))?;
            return Ok(Body::Binary);
        }

        self.write_str(&format!("--- {} ---\n", entry.relative.display()))?;
        let mut written = 0u64;
        let mut last_byte = b'\n';
        let mut chunk = probe;
        loop {
            if !chunk.is_empty() {
                self.tmp
                    .write_all(&chunk)
                    .map_err(|e| SnaplogError::write(&self.dest, e))?;
                written += chunk.len() as u64;
                last_byte = chunk[chunk.len() - 1];
            }
            chunk.resize(PROBE_LEN, 0);
            match reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => chunk.truncate(n),
                // The header is already written; keep the artifact
                // well-formed and report the truncation.
                Err(e) => {
                    tracing::warn!(path = %entry.relative.display(), error = %e, "read failed mid-file");
                    self.bytes += written;
                    self.write_str("\n[skipped: file became unreadable]\n\n")?;
                    return Ok(Body::Unreadable);
                }
            }
        }
        self.bytes += written;
        if last_byte != b'\n' {
            self.write_str("\n")?;
        }
        self.write_str("\n")?;
        Ok(Body::Embedded)
    }

    fn finish(self) -> Result<u64, SnaplogError> {
        self.tmp
            .persist(&self.dest)
            .map_err(|e| SnaplogError::write(&self.dest, e.error))?;
        Ok(self.bytes)
    }
}

/// Groups surviving files by category and writes one artifact per
/// non-empty selected category under `output_root`.
///
/// An empty `categories` set selects every category. The walk gathers
/// paths only; contents are streamed one category at a time with a single
/// open output handle.
pub fn collect(
    project_root: &Path,
    output_root: &Path,
    config: &Config,
    categories: &BTreeSet<String>,
    dry_run: bool,
) -> Result<AggregationResult, SnaplogError> {
    let matcher = IgnoreMatcher::for_project(config, project_root)?;
    let classifier = Classifier::new(&config.file_types)?;
    let walker = Walker::new(project_root, &matcher, &classifier)?;

    let mut result = AggregationResult::default();
    let mut by_category: IndexMap<String, Vec<WalkEntry>> = IndexMap::new();
    for event in walker {
        match event {
            WalkEvent::Entry(entry) if entry.kind.is_file() => {
                let Some(category) = entry.category.clone() else {
                    continue;
                };
                if categories.is_empty() || categories.contains(&category) {
                    by_category.entry(category).or_default().push(entry);
                }
            }
            WalkEvent::Entry(_) => {}
            WalkEvent::Skipped(_) => result.files_skipped += 1,
        }
    }

    for (category, entries) in &by_category {
        let dest = artifact_path(output_root, config, category)?;
        result.artifacts.push(dest.clone());
        if dry_run {
            tally_dry_run(&mut result, entries, config.max_inline_bytes);
            continue;
        }
        let mut writer = ArtifactWriter::create(&dest)?;
        for entry in entries {
            tally(&mut result, writer.append_file(entry, config.max_inline_bytes)?);
        }
        result.bytes_written += writer.finish()?;
        tracing::debug!(category = %category, artifact = %dest.display(), "collect artifact written");
    }
    Ok(result)
}

/// Streams every surviving file whose extension is in `extensions` into a
/// single artifact at `output_path`, in walker order.
///
/// The extension filter is literal set membership: an empty set matches
/// nothing and still produces an artifact with zero file headers.
pub fn consolidate(
    project_root: &Path,
    output_path: &Path,
    config: &Config,
    extensions: &BTreeSet<String>,
    dry_run: bool,
) -> Result<AggregationResult, SnaplogError> {
    let matcher = IgnoreMatcher::for_project(config, project_root)?;
    let classifier = Classifier::new(&config.file_types)?;
    let walker = Walker::new(project_root, &matcher, &classifier)?;
    let extensions = normalise_extensions(extensions);

    let mut result = AggregationResult::default();
    result.artifacts.push(output_path.to_path_buf());
    let mut writer = if dry_run {
        None
    } else {
        Some(ArtifactWriter::create(output_path)?)
    };

    for event in walker {
        match event {
            WalkEvent::Entry(entry)
                if entry.kind.is_file() && extension_matches(&entry, &extensions) =>
            {
                match writer.as_mut() {
                    Some(writer) => {
                        tally(&mut result, writer.append_file(&entry, config.max_inline_bytes)?)
                    }
                    None => tally_dry_run(
                        &mut result,
                        std::slice::from_ref(&entry),
                        config.max_inline_bytes,
                    ),
                }
            }
            WalkEvent::Entry(_) => {}
            WalkEvent::Skipped(_) => result.files_skipped += 1,
        }
    }

    if let Some(writer) = writer {
        result.bytes_written = writer.finish()?;
    }
    Ok(result)
}

/// Renders an indented snapshot of all surviving directories and files:
/// two spaces per depth level, directories suffixed with `/`.
///
/// A non-empty `extensions` set restricts which files are shown; the
/// empty set shows everything (the tree is a snapshot view, unlike
/// [`consolidate`]'s extraction filter). With `include_contents` set,
/// file bytes are inlined one level deeper, subject to
/// `config.max_inline_bytes`.
pub fn render_tree(
    project_root: &Path,
    output_path: &Path,
    config: &Config,
    extensions: &BTreeSet<String>,
    include_contents: bool,
    dry_run: bool,
) -> Result<AggregationResult, SnaplogError> {
    let matcher = IgnoreMatcher::for_project(config, project_root)?;
    let classifier = Classifier::new(&config.file_types)?;
    let walker = Walker::new(project_root, &matcher, &classifier)?;
    let extensions = normalise_extensions(extensions);

    let mut result = AggregationResult::default();
    result.artifacts.push(output_path.to_path_buf());
    let mut writer = if dry_run {
        None
    } else {
        Some(ArtifactWriter::create(output_path)?)
    };

    for event in walker {
        let entry = match event {
            WalkEvent::Entry(entry) => entry,
            WalkEvent::Skipped(_) => {
                result.files_skipped += 1;
                continue;
            }
        };
        let depth = entry.relative.components().count().saturating_sub(1);
        let name = entry
            .relative
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if entry.kind.is_dir() {
            if let Some(writer) = writer.as_mut() {
                writer.write_str(&format!("{}{}/\n", "  ".repeat(depth), name))?;
            }
            continue;
        }
        if !extensions.is_empty() && !extension_matches(&entry, &extensions) {
            continue;
        }
        if let Some(writer) = writer.as_mut() {
            writer.write_str(&format!("{}{}\n", "  ".repeat(depth), name))?;
        }
        if include_contents {
            match writer.as_mut() {
                Some(writer) => {
                    let indent = "  ".repeat(depth + 1);
                    tally(
                        &mut result,
                        inline_contents(writer, &entry, &indent, config.max_inline_bytes)?,
                    );
                }
                None => tally_dry_run(
                    &mut result,
                    std::slice::from_ref(&entry),
                    config.max_inline_bytes,
                ),
            }
        } else {
            result.files_included += 1;
        }
    }

    if let Some(writer) = writer {
        result.bytes_written = writer.finish()?;
    }
    Ok(result)
}

fn inline_contents(
    writer: &mut ArtifactWriter,
    entry: &WalkEntry,
    indent: &str,
    max_inline_bytes: u64,
) -> Result<Body, SnaplogError> {
    if entry.size > max_inline_bytes {
        writer.write_str(&format!(
            "{}[skipped: file exceeds {} bytes]\n",
            indent, max_inline_bytes
        ))?;
        return Ok(Body::TooLarge);
    }
    // Bounded by max_inline_bytes, so reading whole files here keeps
    // memory within the configured ceiling.
    let bytes = match fs::read(&entry.path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(path = %entry.relative.display(), error = %e, "skipping unreadable file");
            return Ok(Body::Unreadable);
        }
    };
    let probe_len = bytes.len().min(PROBE_LEN);
    if content_inspector::inspect(&bytes[..probe_len]).is_binary() {
        writer.write_str(&format!("{}[skipped: binary file]\n", indent))?;
        return Ok(Body::Binary);
    }
    let text = String::from_utf8_lossy(&bytes);
    for line in text.lines() {
        writer.write_str(&format!("{}{}\n", indent, line))?;
    }
    Ok(Body::Embedded)
}

fn tally(result: &mut AggregationResult, body: Body) {
    match body {
        Body::Embedded => result.files_included += 1,
        Body::TooLarge | Body::Binary | Body::Unreadable => result.files_skipped += 1,
    }
}

/// Dry runs walk and classify but never read file contents, so binary
/// detection does not apply; only the size ceiling is consulted.
fn tally_dry_run(result: &mut AggregationResult, entries: &[WalkEntry], max_inline_bytes: u64) {
    for entry in entries {
        if entry.size > max_inline_bytes {
            result.files_skipped += 1;
        } else {
            result.files_included += 1;
        }
    }
}

fn artifact_path(
    output_root: &Path,
    config: &Config,
    category: &str,
) -> Result<PathBuf, SnaplogError> {
    let subpath = config
        .collection_logs
        .get(category)
        .cloned()
        .unwrap_or_else(|| format!("{}.txt", category));
    let subpath = Path::new(&subpath);
    if subpath.is_absolute()
        || subpath
            .components()
            .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(SnaplogError::config(format!(
            "collection log path for {:?} escapes the output root: {}",
            category,
            subpath.display()
        )));
    }
    Ok(output_root.join(subpath))
}

fn normalise_extensions(extensions: &BTreeSet<String>) -> BTreeSet<String> {
    extensions
        .iter()
        .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
        .collect()
}

fn extension_matches(entry: &WalkEntry, normalised: &BTreeSet<String>) -> bool {
    entry
        .relative
        .extension()
        .map(|ext| normalised.contains(&ext.to_string_lossy().to_ascii_lowercase()))
        .unwrap_or(false)
}
