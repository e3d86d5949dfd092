//! # CLI Module
//!
//! Command-line interface for the photo organizer.
//!
//! ## Usage
//! ```bash
//! # Organize in place using the remembered settings
//! picplace organize ~/Photos
//!
//! # Copy into another folder, year first
//! picplace organize ~/Photos --dest ~/Sorted --structure "Year/Month/Place" --mode copy
//!
//! # Only use places already in the cache
//! picplace organize ~/Photos --offline
//!
//! # Preview what a run would see
//! picplace scan ~/Photos
//! ```

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use picplace::config::{default_cache_path, default_config_path, RunConfig};
use picplace::core::cache::JsonFileCache;
use picplace::core::geo::OfflineGeocoder;
use picplace::core::organize::{
    FolderStructure, OrganizeEngine, OrganizeRequest, RunResult, TransferMode,
};
use picplace::core::scanner::{ScanConfig, ScanOutcome};
use picplace::error::Result;
use picplace::events::{Event, EventChannel, OrganizeEvent, ScanEvent};
use std::path::{Path, PathBuf};
use std::thread;
use tracing::warn;

/// PicPlace - Sort photos into folders by where and when they were taken
#[derive(Parser, Debug)]
#[command(name = "picplace")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Organize photos into place/date folders
    Organize {
        /// Folder to organize (defaults to the last one used)
        source: Option<PathBuf>,

        /// Put the organized tree here instead of inside the source folder
        #[arg(short, long)]
        dest: Option<PathBuf>,

        /// Organize inside the source folder even if another destination was remembered
        #[arg(long, conflicts_with = "dest")]
        in_place: bool,

        /// Folder structure: "Place/Year/Month", "Place/Year", "Year/Place" or "Year/Month/Place"
        #[arg(short, long)]
        structure: Option<String>,

        /// Copy or move the photos
        #[arg(short, long)]
        mode: Option<TransferMode>,

        /// Skip hidden files and folders
        #[arg(long)]
        skip_hidden: bool,

        /// Do not query the geocoding service; only cached places resolve
        #[arg(long)]
        offline: bool,

        /// Save the place cache after every new lookup
        #[arg(long)]
        flush_each: bool,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Configuration file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Place cache file path
        #[arg(long)]
        cache: Option<PathBuf>,
    },

    /// Show which photos and duplicates a run would find
    Scan {
        /// Folder to scan (defaults to the last one used)
        source: Option<PathBuf>,

        /// Skip hidden files and folders
        #[arg(long)]
        skip_hidden: bool,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Configuration file path
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Options for one organize invocation
struct OrganizeArgs {
    source: Option<PathBuf>,
    dest: Option<PathBuf>,
    in_place: bool,
    structure: Option<String>,
    mode: Option<TransferMode>,
    skip_hidden: bool,
    offline: bool,
    flush_each: bool,
    output: OutputFormat,
    config: Option<PathBuf>,
    cache: Option<PathBuf>,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Organize {
            source,
            dest,
            in_place,
            structure,
            mode,
            skip_hidden,
            offline,
            flush_each,
            output,
            config,
            cache,
        } => run_organize(OrganizeArgs {
            source,
            dest,
            in_place,
            structure,
            mode,
            skip_hidden,
            offline,
            flush_each,
            output,
            config,
            cache,
        }),
        Commands::Scan {
            source,
            skip_hidden,
            output,
            config,
        } => run_scan(source, skip_hidden, output, config),
    }
}

/// The given folder, else the remembered one, else a usage error
fn resolve_source(source: Option<PathBuf>, config: &RunConfig) -> PathBuf {
    match source {
        Some(source) => source,
        None if !config.last_source_folder.is_empty() => {
            PathBuf::from(&config.last_source_folder)
        }
        None => Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "no SOURCE given and no folder remembered from a previous run",
            )
            .exit(),
    }
}

/// Labels accepted by `--structure`
fn supported_structures() -> String {
    FolderStructure::ALL
        .iter()
        .map(FolderStructure::label)
        .collect::<Vec<_>>()
        .join(", ")
}

fn scan_config(skip_hidden: bool) -> ScanConfig {
    ScanConfig {
        include_hidden: !skip_hidden,
        ..Default::default()
    }
}

fn run_organize(args: OrganizeArgs) -> Result<()> {
    let term = Term::stderr();
    let pretty = matches!(args.output, OutputFormat::Pretty);

    let config_path = args.config.unwrap_or_else(default_config_path);
    let mut config = RunConfig::load(&config_path);

    let source = resolve_source(args.source, &config);
    let destination = match (args.dest, args.in_place) {
        (Some(dest), _) => Some(dest),
        (None, false) if config.different_destination && !config.last_destination_folder.is_empty() => {
            Some(PathBuf::from(&config.last_destination_folder))
        }
        _ => None,
    };

    if let Some(structure) = args.structure {
        config.structure = FolderStructure::from(structure);
    }
    if let FolderStructure::Unrecognized(label) = &config.structure {
        warn!(
            structure = %label,
            supported = %supported_structures(),
            "unrecognized folder structure, photos go to a single Unknown folder"
        );
    }
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    config.last_source_folder = source.display().to_string();
    config.different_destination = destination.is_some();
    if let Some(dest) = &destination {
        config.last_destination_folder = dest.display().to_string();
    }

    if let Err(e) = config.save(&config_path) {
        warn!(error = %e, "could not remember settings");
    }

    let destination = destination.unwrap_or_else(|| source.clone());

    if pretty {
        term.write_line(&format!(
            "{} {}",
            style("PicPlace").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line(&format!(
            "  {} {} {} ({}, {})",
            style(display_path(&source)).dim(),
            style("→").cyan(),
            style(display_path(&destination)).dim(),
            config.structure,
            config.mode
        ))
        .ok();
        term.write_line("").ok();
    }

    let cache_path = args.cache.unwrap_or_else(default_cache_path);
    let mut builder = OrganizeEngine::builder()
        .scan_config(scan_config(args.skip_hidden))
        .cache(Box::new(JsonFileCache::open(&cache_path)))
        .flush_on_miss(args.flush_each);
    if args.offline {
        builder = builder.geocoder(Box::new(OfflineGeocoder));
    }
    let engine = builder.build();

    let request = OrganizeRequest::new(&source, &destination, config.structure.clone(), config.mode);

    // Set up event handling
    let (sender, receiver) = EventChannel::new();

    let progress = if pretty {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress_clone else {
                continue;
            };
            match event {
                Event::Scan(ScanEvent::Completed { candidates, .. }) => {
                    pb.set_length(candidates as u64);
                }
                Event::Scan(ScanEvent::Error { path, message }) => {
                    pb.println(format!("  {} {}: {}", style("!").yellow(), path.display(), message));
                }
                Event::Organize(OrganizeEvent::Status { message }) => {
                    pb.set_message(message);
                }
                Event::Organize(OrganizeEvent::Progress(p)) => {
                    pb.set_length(p.total as u64);
                    pb.set_position(p.current as u64);
                }
                Event::Organize(OrganizeEvent::Completed { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let outcome = engine.organize_with_events(&request, &sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let result = outcome?;

    match args.output {
        OutputFormat::Pretty => print_pretty_result(&term, &result, &destination),
        OutputFormat::Json => print_json(&result),
    }

    Ok(())
}

fn run_scan(
    source: Option<PathBuf>,
    skip_hidden: bool,
    output: OutputFormat,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let term = Term::stderr();
    let config = RunConfig::load(&config_path.unwrap_or_else(default_config_path));
    let source = resolve_source(source, &config);

    // Scanning never geocodes
    let engine = OrganizeEngine::builder()
        .scan_config(scan_config(skip_hidden))
        .geocoder(Box::new(OfflineGeocoder))
        .build();
    let outcome = engine.scan(&source)?;

    match output {
        OutputFormat::Pretty => print_pretty_scan(&term, &outcome),
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "candidates": outcome.candidates.len(),
                "duplicate_groups": outcome.duplicate_groups,
                "unreadable": outcome.unreadable,
                "errors": outcome.errors.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
            });
            print_json(&summary);
        }
    }

    Ok(())
}

fn print_pretty_result(term: &Term, result: &RunResult, destination: &Path) {
    term.write_line(&format!("{} Organize Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} of {} photos organized in {:.1}s",
        style(result.organized).cyan(),
        style(result.total).cyan(),
        result.duration_ms as f64 / 1000.0
    ))
    .ok();

    if result.no_metadata > 0 {
        term.write_line(&format!(
            "  {} without metadata",
            style(result.no_metadata).yellow()
        ))
        .ok();
    }

    term.write_line(&format!(
        "  {} duplicate groups, {} duplicates set aside",
        style(result.duplicate_groups).cyan(),
        style(result.duplicates_transferred).cyan()
    ))
    .ok();

    if result.unreadable > 0 {
        term.write_line(&format!(
            "  {} unreadable files skipped",
            style(result.unreadable).dim()
        ))
        .ok();
    }

    if result.errors > 0 {
        term.write_line("").ok();
        term.write_line(&format!(
            "{} {} photos could not be organized:",
            style("✗").red().bold(),
            result.errors
        ))
        .ok();
        for failure in &result.failures {
            term.write_line(&format!(
                "    {} {}",
                style(display_path(&failure.path)).dim(),
                style(&failure.reason).red()
            ))
            .ok();
        }
    }

    term.write_line("").ok();
    term.write_line(&format!(
        "{}",
        style(format!("Organized tree: {}", display_path(destination))).dim()
    ))
    .ok();
}

fn print_pretty_scan(term: &Term, outcome: &ScanOutcome) {
    term.write_line(&format!("{} Scan Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} distinct photos",
        style(outcome.candidates.len()).cyan()
    ))
    .ok();
    term.write_line(&format!(
        "  {} duplicate groups",
        style(outcome.duplicate_groups.len()).cyan()
    ))
    .ok();
    if !outcome.unreadable.is_empty() {
        term.write_line(&format!(
            "  {} unreadable files",
            style(outcome.unreadable.len()).dim()
        ))
        .ok();
    }
    term.write_line("").ok();

    for (i, group) in outcome.duplicate_groups.iter().enumerate() {
        term.write_line(&format!(
            "  {} ({} copies)",
            style(format!("Group {}:", i + 1)).bold(),
            group.len()
        ))
        .ok();

        for photo in &group.paths {
            let marker = if photo.as_path() == group.canonical() {
                style("★").green().to_string()
            } else {
                style("○").dim().to_string()
            };
            term.write_line(&format!("    {} {}", marker, display_path(photo)))
                .ok();
        }
        term.write_line("").ok();
    }

    for error in &outcome.errors {
        term.write_line(&format!("  {} {}", style("!").yellow(), error))
            .ok();
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => warn!(error = %e, "could not serialize output"),
    }
}

/// Abbreviate paths under the home directory with `~`
fn display_path(path: &Path) -> String {
    match dirs::home_dir().and_then(|home| path.strip_prefix(home).ok().map(Path::to_path_buf)) {
        Some(relative) => format!("~/{}", relative.display()),
        None => path.display().to_string(),
    }
}
