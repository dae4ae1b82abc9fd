//! File classification by name and extension.

use crate::error::SnaplogError;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Catch-all category for files no rule matches.
pub const DEFAULT_CATEGORY: &str = "other";

/// Maps file names to logical categories using an ordered rule table.
///
/// Precedence: exact full-name match, then longest-suffix match, then
/// [`DEFAULT_CATEGORY`]. Pure lookup, no I/O.
#[derive(Debug)]
pub struct Classifier {
    exact: HashMap<String, String>,
    /// Suffix rules sorted longest first; ties keep table order.
    suffixes: Vec<(String, String)>,
}

impl Classifier {
    /// Compiles the `file_types` table. Keys starting with `.` (or the
    /// `*.ext` spelling) are extension rules; anything else is an exact
    /// file-name rule.
    pub fn new(file_types: &IndexMap<String, String>) -> Result<Self, SnaplogError> {
        let mut exact = HashMap::new();
        let mut suffixes = Vec::new();
        for (pattern, category) in file_types {
            if pattern.is_empty() || category.is_empty() {
                return Err(SnaplogError::config(format!(
                    "invalid file-type mapping: {:?} -> {:?}",
                    pattern, category
                )));
            }
            if let Some(suffix) = pattern.strip_prefix('*') {
                if !suffix.starts_with('.') || suffix.len() < 2 {
                    return Err(SnaplogError::config(format!(
                        "invalid file-type pattern: {:?}",
                        pattern
                    )));
                }
                suffixes.push((suffix.to_string(), category.clone()));
            } else if pattern.starts_with('.') && pattern.len() > 1 {
                suffixes.push((pattern.clone(), category.clone()));
            } else {
                exact.insert(pattern.clone(), category.clone());
            }
        }
        // Stable sort: among equal lengths the table order decides.
        suffixes.sort_by_key(|(suffix, _)| std::cmp::Reverse(suffix.len()));
        Ok(Self { exact, suffixes })
    }

    /// Returns the category for `file_name`.
    pub fn classify(&self, file_name: &str) -> &str {
        if let Some(category) = self.exact.get(file_name) {
            return category;
        }
        for (suffix, category) in &self.suffixes {
            if file_name.len() > suffix.len() && file_name.ends_with(suffix.as_str()) {
                return category;
            }
        }
        DEFAULT_CATEGORY
    }
}
