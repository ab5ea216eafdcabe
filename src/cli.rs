//! Command-line interface for interpcheck.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::{self, Config, DEFAULT_CONFIG_NAMES, DEFAULT_TEMPLATE};
use crate::detect::{RuleId, Runner, Severity};
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Extension of the files that are checked.
const SOURCE_EXTENSION: &str = "cs";

/// Find misused interpolated strings in C# sources.
///
/// Interpcheck reports `${...}` holes, which emit a stray literal dollar
/// sign, and interpolated strings without any holes, which should be plain
/// string literals.
#[derive(Parser)]
#[command(name = "interpcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log progress to stderr (same as RUST_LOG=interpcheck=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check C# sources for interpolated-string misuse
    #[command(visible_alias = "check")]
    Lint(LintArgs),
    /// List the available rules
    Rules,
    /// Create a default interpcheck config
    Init(InitArgs),
}

/// Arguments for the lint command.
#[derive(Parser)]
pub struct LintArgs {
    /// Path to check (file or directory)
    pub path: PathBuf,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty, json, or sarif
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Show suppressed violations in output
    #[arg(long)]
    pub show_suppressed: bool,

    /// Lowest severity that makes the run fail: error, warning, or info
    #[arg(long, default_value = "warning")]
    pub fail_level: String,

    /// Disable a rule by identifier (repeatable)
    #[arg(short, long, value_name = "RULE")]
    pub disable: Vec<String>,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "interpcheck.yaml")]
    pub output: PathBuf,
}

/// Install the stderr log subscriber. `--verbose` overrides `RUST_LOG`.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("interpcheck=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // A subscriber may already be installed when embedded.
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .try_init();
}

/// Collect C# files under `root`, honoring the config's exclusions.
pub fn collect_files(root: &Path, config: &Config) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            // Skip hidden directories
            let name = e.file_name().to_string_lossy();
            !(e.depth() > 0 && e.file_type().is_dir() && name.starts_with('.'))
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !ext.eq_ignore_ascii_case(SOURCE_EXTENSION) {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        if config.should_skip(relative) {
            debug!(file = %relative.display(), "skipping excluded file");
            continue;
        }

        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

/// Run the lint command.
pub fn run_lint(args: &LintArgs) -> anyhow::Result<i32> {
    // Validate format
    if args.format != "pretty" && args.format != "json" && args.format != "sarif" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty', 'json', or 'sarif'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let fail_level: Severity = match args.fail_level.parse() {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Error: {}, must be 'error', 'warning', or 'info'", e);
            return Ok(EXIT_ERROR);
        }
    };

    // Explicit config, then auto-discovery, then defaults
    let config_path = match &args.config {
        Some(p) => Some(p.clone()),
        None => config::discover(Path::new(".")),
    };

    let config = match &config_path {
        Some(path) => match Config::parse_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                return Ok(EXIT_ERROR);
            }
        },
        None => {
            debug!(
                "no config file found (looked for {}), using defaults",
                DEFAULT_CONFIG_NAMES.join(", ")
            );
            Config::default()
        }
    };

    if let Err(e) = config::validate(&config) {
        eprintln!("Error: invalid config: {}", e);
        return Ok(EXIT_ERROR);
    }

    let mut rules = config.rule_set();
    for name in &args.disable {
        match RuleId::parse(name) {
            Some(rule) => rules.set(rule, false),
            None => {
                eprintln!("Error: unknown rule {:?}", name);
                eprintln!("Run 'interpcheck rules' to see available rules");
                return Ok(EXIT_ERROR);
            }
        }
    }

    // Resolve path
    let abs_path = match args.path.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    let files = if abs_path.is_dir() {
        collect_files(&abs_path, &config)?
    } else {
        vec![abs_path.clone()]
    };
    debug!(files = files.len(), path = %abs_path.display(), "collected files");

    if files.is_empty() {
        eprintln!("Warning: no files to scan");
        return Ok(EXIT_SUCCESS);
    }

    let runner = Runner::new(&abs_path).rules(rules);
    let result = runner.run(&files)?;

    if !result.failures.is_empty() {
        warn!(count = result.failures.len(), "some files could not be scanned");
    }

    let config_path_str = config_path
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "(defaults)".to_string());
    let path_str = args.path.to_string_lossy().to_string();

    match args.format.as_str() {
        "json" => report::write_json(&path_str, &config_path_str, &result)?,
        "sarif" => report::write_sarif(&result)?,
        _ => report::write_pretty(&path_str, &config_path_str, &result, args.show_suppressed),
    }

    if result.has_at_least(fail_level) {
        Ok(EXIT_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Run the rules command.
pub fn run_rules() -> anyhow::Result<i32> {
    report::write_rules();
    Ok(EXIT_SUCCESS)
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    // Check if output already exists
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    // Create output directory if needed
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = std::fs::write(&args.output, DEFAULT_TEMPLATE) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to customize for your project", args.output.display());
    println!("  2. Run: interpcheck lint . --config {}", args.output.display());

    Ok(EXIT_SUCCESS)
}
