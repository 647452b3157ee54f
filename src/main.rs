//! partdup - Find duplicate and redundant parts in a CAD mesh library.
//!
//! Usage:
//!   partdup scan [PATH]          Extract signatures and list components
//!   partdup duplicates [PATH]    Group likely duplicate parts
//!   partdup compare A B          Show the similarity between two files
//!   partdup export [PATH]        Export components to JSON
//!   partdup --help               Show help

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use partdup_analyze::{
    AnalyzerConfig, Component, ComponentAnalyzer, DuplicateReport, ExtractionFailure,
    SimilarityBreakdown,
};
use partdup_core::{Inventory, ScanStats};

#[derive(Parser)]
#[command(
    name = "partdup",
    version,
    about = "Find duplicate and redundant parts in a CAD mesh library",
    long_about = "partdup fingerprints every STL file below a directory by volume, \
                  surface area and bounding box, then groups parts that are \
                  likely copies of each other, across projects."
)]
struct Cli {
    /// Analyzer config file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Number of scanning threads (0 = auto)
    #[arg(long, global = true)]
    threads: Option<usize>,

    /// Follow symbolic links
    #[arg(long, global = true)]
    follow_symlinks: bool,

    /// Additional file extension to discover (repeatable).
    /// Only STL is extracted; files of other formats are listed as
    /// unsupported failures.
    #[arg(long = "ext", value_name = "EXT", global = true)]
    extensions: Vec<String>,

    /// Glob pattern for entries to skip (repeatable)
    #[arg(long = "ignore", value_name = "PATTERN", global = true)]
    ignore: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract signatures and list every component
    Scan {
        /// Library root
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Group likely duplicate parts
    Duplicates {
        /// Library root
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Minimum similarity for grouping, 0.0 to 1.0
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Maximum number of groups to show
        #[arg(short = 'n', long)]
        top: Option<usize>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the similarity breakdown between two mesh files
    Compare {
        a: PathBuf,
        b: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Export components and failures to JSON
    Export {
        /// Library root
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct ScanOutput<'a> {
    root: &'a Path,
    stats: &'a ScanStats,
    scan_duration_secs: f64,
    components: Vec<&'a Component>,
    failures: &'a [ExtractionFailure],
}

#[derive(Serialize)]
struct CompareOutput<'a> {
    a: &'a Path,
    b: &'a Path,
    similarity: SimilarityBreakdown,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;

    match cli.command {
        Command::Scan { path, format } => run_scan(config, &path, format),
        Command::Duplicates {
            path,
            threshold,
            top,
            format,
        } => run_duplicates(config, &path, threshold, top, format),
        Command::Compare { a, b, format } => run_compare(config, &a, &b, format),
        Command::Export { path, output } => run_export(config, &path, output),
    }
}

/// Install the stderr log subscriber.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the config file, if any, and apply command line overrides.
fn load_config(cli: &Cli) -> Result<AnalyzerConfig> {
    let mut config = match &cli.config {
        Some(path) => AnalyzerConfig::from_toml_file(path)
            .wrap_err_with(|| format!("Failed to load config {}", path.display()))?,
        None => AnalyzerConfig::default(),
    };

    if let Some(threads) = cli.threads {
        config.threads = threads;
    }
    if cli.follow_symlinks {
        config.follow_symlinks = true;
    }
    config.extensions.extend(cli.extensions.iter().cloned());
    config.ignore_patterns.extend(cli.ignore.iter().cloned());

    debug!(?config, "configuration loaded");
    Ok(config)
}

/// Scan a library and extract every component.
fn analyze(config: AnalyzerConfig, path: &Path) -> Result<(ComponentAnalyzer, Inventory)> {
    let path = path.canonicalize().context("Invalid path")?;

    eprintln!("Scanning {}...", path.display());

    let mut analyzer = ComponentAnalyzer::with_config(config);
    let inventory = analyzer.scan_directory(&path).context("Scan failed")?;

    Ok((analyzer, inventory))
}

/// List every component with its signature.
fn run_scan(config: AnalyzerConfig, path: &Path, format: OutputFormat) -> Result<()> {
    let (analyzer, inventory) = analyze(config, path)?;

    match format {
        OutputFormat::Text => {
            println!();
            println!("{}", "─".repeat(100));
            println!(
                " {} - {} mesh files, {}",
                inventory.root_path.display(),
                inventory.stats.mesh_files,
                format_size(inventory.stats.total_size)
            );
            println!(" Scanned in {:.2}s", inventory.scan_duration.as_secs_f64());
            println!("{}", "─".repeat(100));
            println!();

            println!(
                " {:<40} {:<16} {:>12} {:>12}  {}",
                "Path", "Project", "Volume", "Area", "Extents"
            );
            for component in analyzer.components() {
                let [w, d, h] = component.signature.bounding_box.extents();
                println!(
                    " {:<40} {:<16} {:>12.3} {:>12.3}  {:.2} x {:.2} x {:.2}",
                    truncate(&relative(component.path(), &inventory.root_path), 40),
                    truncate(&component.metadata.project_id, 16),
                    component.signature.volume,
                    component.signature.surface_area,
                    w,
                    d,
                    h
                );
            }

            print_failures(analyzer.failures(), &inventory.root_path);

            if inventory.has_warnings() {
                println!();
                println!("{} warning(s) during scan", inventory.warnings.len());
            }
        }
        OutputFormat::Json => {
            let output = ScanOutput {
                root: &inventory.root_path,
                stats: &inventory.stats,
                scan_duration_secs: inventory.scan_duration.as_secs_f64(),
                components: analyzer.components().collect(),
                failures: analyzer.failures(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Group and print likely duplicates.
fn run_duplicates(
    mut config: AnalyzerConfig,
    path: &Path,
    threshold: Option<f64>,
    top: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    if let Some(threshold) = threshold {
        config = config.with_threshold(threshold)?;
    }
    if let Some(top) = top {
        config.max_groups = top;
    }

    let (analyzer, inventory) = analyze(config, path)?;

    eprintln!(
        "Grouping {} components (threshold {})...",
        analyzer.len(),
        analyzer.config().threshold
    );

    let report = analyzer.report();

    match format {
        OutputFormat::Text => print_report(&report, &inventory.root_path),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

fn print_report(report: &DuplicateReport, root: &Path) {
    println!();
    println!("{}", "─".repeat(70));
    println!(" Duplicate Part Report");
    println!("{}", "─".repeat(70));
    println!();

    if !report.has_duplicates() {
        println!(
            " No similar parts found among {} components.",
            report.components_analyzed
        );
    } else {
        println!(
            " Found {} groups ({} of {} components)",
            report.group_count, report.files_with_duplicates, report.components_analyzed
        );
        println!(
            " {} groups span more than one project",
            report.cross_project_groups()
        );
        if report.groups.len() < report.group_count {
            println!(" Showing the first {}", report.groups.len());
        }
        println!(
            " {} redundant parts in the groups shown",
            report.total_redundant()
        );
        println!();

        for (i, group) in report.groups.iter().enumerate() {
            println!(
                " Group {} ({} parts, {} redundant) projects: {}",
                i + 1,
                group.count(),
                group.redundant_count(),
                group
                    .projects
                    .iter()
                    .map(|p| p.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            for member in &group.members {
                println!(
                    "   {:<50} {:<16} {:>6.1}%",
                    truncate(&relative(&member.path, root), 50),
                    truncate(&member.project_id, 16),
                    member.score_to_seed * 100.0
                );
            }
            println!();
        }
    }

    print_failures(&report.failures, root);
}

/// Compare two individual files.
fn run_compare(config: AnalyzerConfig, a: &Path, b: &Path, format: OutputFormat) -> Result<()> {
    let a = a.canonicalize().context("Invalid path")?;
    let b = b.canonicalize().context("Invalid path")?;
    let root = std::env::current_dir().context("No working directory")?;

    let mut analyzer = ComponentAnalyzer::with_config(config);
    analyzer
        .process_file(&a, &root)
        .wrap_err_with(|| format!("Failed to read {}", a.display()))?;
    analyzer
        .process_file(&b, &root)
        .wrap_err_with(|| format!("Failed to read {}", b.display()))?;

    let Some(similarity) = analyzer.compare(&a, &b) else {
        color_eyre::eyre::bail!("Components missing after extraction");
    };

    match format {
        OutputFormat::Text => {
            println!();
            println!(" {}", a.display());
            println!(" {}", b.display());
            println!();
            println!("   Hash match:    {}", if similarity.hash_match { "yes" } else { "no" });
            println!("   Volume:        {:>6.1}%", similarity.volume * 100.0);
            println!("   Surface area:  {:>6.1}%", similarity.surface_area * 100.0);
            println!("   Bounding box:  {:>6.1}%", similarity.bounding_box * 100.0);
            println!("   Similarity:    {:>6.1}%", similarity.total * 100.0);

            let threshold = analyzer.config().threshold;
            let verdict = if similarity.total >= threshold {
                "would group"
            } else {
                "would not group"
            };
            println!();
            println!(" {} at threshold {}", verdict, threshold);
        }
        OutputFormat::Json => {
            let output = CompareOutput {
                a: &a,
                b: &b,
                similarity,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Export components to JSON.
fn run_export(config: AnalyzerConfig, path: &Path, output: Option<PathBuf>) -> Result<()> {
    let (analyzer, inventory) = analyze(config, path)?;

    let document = ScanOutput {
        root: &inventory.root_path,
        stats: &inventory.stats,
        scan_duration_secs: inventory.scan_duration.as_secs_f64(),
        components: analyzer.components().collect(),
        failures: analyzer.failures(),
    };
    let json = serde_json::to_string_pretty(&document)?;

    match output {
        Some(output_path) => {
            std::fs::write(&output_path, json)
                .wrap_err_with(|| format!("Failed to write {}", output_path.display()))?;
            eprintln!("Exported to {}", output_path.display());
        }
        None => {
            println!("{}", json);
        }
    }

    Ok(())
}

fn print_failures(failures: &[ExtractionFailure], root: &Path) {
    if failures.is_empty() {
        return;
    }

    println!();
    println!(" {} file(s) could not be read:", failures.len());
    for failure in failures {
        println!("   {}: {}", relative(&failure.path, root), failure.message);
    }
}

/// Display a path relative to the scan root when possible.
fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Truncate a string to max length in characters.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}
