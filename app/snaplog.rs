//! Command-line interface for snaplog.
//!
//! This binary is the thin outer surface: it loads configuration, resolves
//! the project root, and dispatches to the library's aggregation modes.

use clap::{Parser, Subcommand};
use snaplog::{AggregationResult, Config, SnaplogError, collect, consolidate, render_tree};
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use std::process::exit;

/// snaplog — source-tree aggregation and snapshot tool
#[derive(Parser)]
#[command(name = "snaplog", version, about, long_about = None)]
struct Cli {
    /// Project root (default current dir)
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// JSON configuration file (built-in defaults when not set)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Extra ignore patterns (can be repeated)
    #[arg(short = 'I', long = "ignore")]
    ignore_patterns: Vec<String>,

    /// Per-file content ceiling in bytes
    #[arg(long)]
    max_inline_bytes: Option<u64>,

    /// Walk and classify but write nothing
    #[arg(long)]
    dry_run: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Bundle files into one artifact per category
    Collect {
        /// Output directory for category artifacts
        #[arg(long, default_value = "snaplog-out")]
        out: PathBuf,

        /// Categories to collect (all categories when omitted)
        #[arg(short = 'c', long = "category")]
        categories: Vec<String>,
    },
    /// Concatenate files matching the extension filter into one artifact
    Consolidate {
        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// File extensions to include (e.g. py, rs)
        #[arg(short = 'e', long = "ext")]
        extensions: Vec<String>,
    },
    /// Write an annotated tree snapshot
    Tree {
        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Restrict listed files to these extensions (all when omitted)
        #[arg(short = 'e', long = "ext")]
        extensions: Vec<String>,

        /// Inline file contents beneath each entry
        #[arg(long)]
        contents: bool,
    },
}

fn load_config(cli: &Cli) -> Result<Config, SnaplogError> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|e| {
                SnaplogError::Config(format!("cannot read config {}: {}", path.display(), e))
            })?;
            serde_json::from_str(&text).map_err(|e| {
                SnaplogError::Config(format!("malformed config {}: {}", path.display(), e))
            })?
        }
        None => Config::default(),
    };
    config.ignore_patterns.extend(cli.ignore_patterns.clone());
    if let Some(limit) = cli.max_inline_bytes {
        config.max_inline_bytes = limit;
    }
    Ok(config)
}

fn run(cli: &Cli) -> Result<AggregationResult, SnaplogError> {
    let config = load_config(cli)?;
    match &cli.command {
        Command::Collect { out, categories } => {
            let categories: BTreeSet<String> = categories.iter().cloned().collect();
            collect(&cli.root, out, &config, &categories, cli.dry_run)
        }
        Command::Consolidate { output, extensions } => {
            let extensions: BTreeSet<String> = extensions.iter().cloned().collect();
            consolidate(&cli.root, output, &config, &extensions, cli.dry_run)
        }
        Command::Tree {
            output,
            extensions,
            contents,
        } => {
            let extensions: BTreeSet<String> = extensions.iter().cloned().collect();
            render_tree(&cli.root, output, &config, &extensions, *contents, cli.dry_run)
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(&cli) {
        Ok(result) => report(&result, cli.dry_run),
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    }
}

fn report(result: &AggregationResult, dry_run: bool) {
    for artifact in &result.artifacts {
        println!("{}", artifact.display());
    }
    println!(
        "{} files included, {} skipped, {} bytes written{}",
        result.files_included,
        result.files_skipped,
        result.bytes_written,
        if dry_run { " (dry run)" } else { "" }
    );
}
