use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Default ceiling for embedded file content, in bytes.
pub const DEFAULT_MAX_INLINE_BYTES: u64 = 1_048_576;

/// Fully resolved configuration handed to the core entry points.
///
/// Constructed once by the caller (CLI, config loader) and passed by
/// reference into every operation; the core holds no global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory names pruned wherever they appear in the tree.
    pub skip_dirs: Vec<String>,
    /// Glob-style ignore patterns supplied by the caller. These take
    /// precedence over patterns loaded from the project ignore file, which
    /// in turn take precedence over built-in defaults.
    pub ignore_patterns: Vec<String>,
    /// Ordered mapping from file-name or extension pattern to category.
    ///
    /// Keys starting with `.` are extension rules (`.py` -> `python`);
    /// any other key is an exact file-name rule (`Makefile` -> `make`).
    pub file_types: IndexMap<String, String>,
    /// Mapping from category to the artifact subpath `collect` writes under
    /// the output root. Unmapped categories fall back to `<category>.txt`.
    pub collection_logs: IndexMap<String, String>,
    /// Files larger than this have their content replaced by a placeholder.
    pub max_inline_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            skip_dirs: [
                ".git",
                "__pycache__",
                "node_modules",
                "migrations",
                "static",
                "staticfiles",
                "media",
                "logs",
                "build",
                "dist",
                "target",
                "venv",
                ".venv",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            ignore_patterns: [
                "*.pyc",
                "*.sqlite3",
                "*.log",
                ".DS_Store",
                "yarn.lock",
                "package-lock.json",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            file_types: [
                (".py", "python"),
                (".rs", "rust"),
                (".html", "html"),
                (".css", "css"),
                (".mjs", "javascript-module"),
                (".js", "javascript"),
                (".ts", "typescript"),
                (".json", "json"),
                (".toml", "toml"),
                (".yml", "yaml"),
                (".yaml", "yaml"),
                (".md", "markdown"),
                (".sh", "shell"),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
            collection_logs: [
                ("python", "capture_all_pyth.txt"),
                ("html", "capture_all_html.txt"),
                ("css", "capture_all_css.txt"),
                ("javascript", "capture_all_js.txt"),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
            max_inline_bytes: DEFAULT_MAX_INLINE_BYTES,
        }
    }
}

#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip_dirs(mut self, dirs: Vec<String>) -> Self {
        self.config.skip_dirs = dirs;
        self
    }

    pub fn ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.config.ignore_patterns = patterns;
        self
    }

    pub fn add_ignore_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.ignore_patterns.push(pattern.into());
        self
    }

    pub fn file_types(mut self, types: IndexMap<String, String>) -> Self {
        self.config.file_types = types;
        self
    }

    pub fn file_type(mut self, pattern: impl Into<String>, category: impl Into<String>) -> Self {
        self.config.file_types.insert(pattern.into(), category.into());
        self
    }

    pub fn collection_log(mut self, category: impl Into<String>, subpath: impl Into<String>) -> Self {
        self.config
            .collection_logs
            .insert(category.into(), subpath.into());
        self
    }

    pub fn max_inline_bytes(mut self, limit: u64) -> Self {
        self.config.max_inline_bytes = limit;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
