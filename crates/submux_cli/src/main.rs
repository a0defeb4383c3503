//! SubMux command line interface.
//!
//! Pairs media files with subtitle files and drives mkvmerge to embed
//! each subtitle into its video, one output file per pair.

mod discovery;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;

use submux_core::batch::{BatchError, BatchOptions, BatchProcessor, BatchReport, ProcessInvoker};
use submux_core::config::{ConfigManager, ConfigSection};
use submux_core::logging::{init_tracing, LogLevel, RunLogger};
use submux_core::models::{CandidateKind, PairStatus, RunState, TrackLanguage};
use submux_core::pairing::{pair_all_automatic, CandidatePool, PairRegistry};

#[derive(Parser, Debug)]
#[command(
    name = "submux",
    version,
    about = "Embed subtitle files into their matching videos with mkvmerge"
)]
struct Cli {
    /// Media files or directories to scan
    #[arg(long = "media", value_name = "PATH")]
    media: Vec<PathBuf>,

    /// Subtitle files or directories to scan
    #[arg(long = "subs", value_name = "PATH")]
    subtitles: Vec<PathBuf>,

    /// Pre-formed pairs, bypassing automatic matching
    #[arg(long = "pair", value_name = "MEDIA=SUBTITLE", value_parser = parse_pair)]
    pairs: Vec<(PathBuf, PathBuf)>,

    /// Output directory for the muxed files
    #[arg(short = 'o', long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Path to the mkvmerge executable (persisted to the settings file)
    #[arg(long, value_name = "PATH")]
    tool_path: Option<PathBuf>,

    /// Subtitle track language, by name or 3-letter code
    #[arg(short = 'l', long)]
    language: Option<TrackLanguage>,

    /// Per-invocation timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Alternate settings file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the batch report as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_pair(value: &str) -> Result<(PathBuf, PathBuf), String> {
    match value.split_once('=') {
        Some((media, subtitle)) if !media.is_empty() && !subtitle.is_empty() => {
            Ok((PathBuf::from(media), PathBuf::from(subtitle)))
        }
        _ => Err(format!("expected MEDIA=SUBTITLE, got '{value}'")),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            // the subscriber may not be installed yet, so report directly
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    // Settings, with CLI overrides; a corrected tool path is persisted.
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(default_config_path);
    let mut config = ConfigManager::new(&config_path);
    config
        .load_or_create()
        .with_context(|| format!("failed to load settings from {}", config_path.display()))?;

    let level = match cli.verbose {
        0 => config.settings().logging.level,
        1 => LogLevel::Debug,
        _ => LogLevel::Trace,
    };
    init_tracing(level);

    if let Some(tool) = &cli.tool_path {
        config.settings_mut().tool.mkvmerge_path = tool.to_string_lossy().to_string();
        config
            .update_section(ConfigSection::Tool)
            .context("failed to persist the tool path")?;
        tracing::info!("Saved mkvmerge path: {}", tool.display());
    }

    let settings = config.settings().clone();
    let tool_path = PathBuf::from(&settings.tool.mkvmerge_path);
    let language = cli.language.unwrap_or(settings.mux.language);
    let output_dir = cli
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&settings.paths.output_folder));

    // Form the pairs: explicit ones first, then automatic matching over
    // whatever the pools collect.
    let mut pool = CandidatePool::new();
    let mut registry = PairRegistry::new();

    for (media, subtitle) in &cli.pairs {
        registry.create(media.clone(), subtitle.clone());
    }

    let media = discovery::collect_candidates(&cli.media, CandidateKind::Media)?;
    let subtitles = discovery::collect_candidates(&cli.subtitles, CandidateKind::Subtitle)?;
    if !media.is_empty() || !subtitles.is_empty() {
        pool.add(media, CandidateKind::Media);
        pool.add(subtitles, CandidateKind::Subtitle);

        let outcome = pair_all_automatic(&mut pool, &mut registry)
            .context("automatic pairing failed")?;
        tracing::info!("Automatically paired {} file(s)", outcome.pair_ids.len());
        for path in pool.list(CandidateKind::Media) {
            tracing::warn!("Unpaired media file: {}", path.display());
        }
        for path in pool.list(CandidateKind::Subtitle) {
            tracing::warn!("Unpaired subtitle file: {}", path.display());
        }
    }

    if registry.is_empty() {
        bail!("nothing to do: no media-subtitle pairs were formed");
    }

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;

    // Batch run.
    let mut invoker = ProcessInvoker::new(tool_path.clone());
    if let Some(secs) = cli.timeout {
        invoker = invoker.with_timeout(Duration::from_secs(secs));
    }

    let mut processor = BatchProcessor::new(
        Box::new(invoker),
        BatchOptions {
            tool_path,
            output_dir,
            language,
        },
    );
    if settings.logging.write_run_log {
        match RunLogger::new("batch", &settings.paths.logs_folder) {
            Ok(logger) => {
                tracing::info!("Run log: {}", logger.log_path().display());
                processor = processor.with_logger(Arc::new(logger));
            }
            Err(e) => tracing::warn!("Could not create run log file: {}", e),
        }
    }

    let report = match processor.run(&mut registry) {
        Ok(report) => report,
        Err(e @ BatchError::ToolUnavailable { .. }) => {
            tracing::error!("{}", e);
            tracing::error!("Set the correct path with --tool-path or in the settings file");
            return Ok(ExitCode::from(2));
        }
        Err(e) => return Err(e.into()),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    Ok(exit_code_for(&report))
}

fn print_summary(report: &BatchReport) {
    println!();
    println!("{:<6} {:<40} {:<30} {}", "id", "media", "subtitle", "status");
    println!("{}", "-".repeat(90));
    for outcome in &report.outcomes {
        println!(
            "{:<6} {:<40} {:<30} {}",
            outcome.id,
            truncate(&outcome.media, 40),
            truncate(&outcome.subtitle, 30),
            outcome.status
        );
        if outcome.status == PairStatus::Failed {
            if let Some(diagnostic) = &outcome.diagnostic {
                for line in diagnostic.lines().take(3) {
                    println!("       {}", line);
                }
            }
        }
    }
    println!();
    println!(
        "Batch {}: {} of {} pairs processed successfully",
        report.state, report.succeeded, report.attempted
    );
    if let Some(reason) = &report.abort_reason {
        println!("Aborted: {}", reason);
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let tail: String = text
            .chars()
            .rev()
            .take(max.saturating_sub(3))
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("...{}", tail)
    }
}

fn exit_code_for(report: &BatchReport) -> ExitCode {
    match report.state {
        RunState::Aborted => ExitCode::from(2),
        RunState::Cancelled => ExitCode::from(1),
        _ if report.all_succeeded() => ExitCode::SUCCESS,
        _ => ExitCode::from(1),
    }
}

fn default_config_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "submux")
        .map(|dirs| dirs.config_dir().join("settings.toml"))
        .unwrap_or_else(|| PathBuf::from(".submux/settings.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_argument_parses() {
        let (media, subtitle) = parse_pair("a.mkv=a.srt").unwrap();
        assert_eq!(media, PathBuf::from("a.mkv"));
        assert_eq!(subtitle, PathBuf::from("a.srt"));

        assert!(parse_pair("no-separator").is_err());
        assert!(parse_pair("=a.srt").is_err());
        assert!(parse_pair("a.mkv=").is_err());
    }

    #[test]
    fn truncate_keeps_the_tail() {
        assert_eq!(truncate("short.mkv", 40), "short.mkv");
        let long = "a-very-long-file-name-that-never-ends.mkv";
        let cut = truncate(long, 20);
        assert_eq!(cut.chars().count(), 20);
        assert!(cut.starts_with("..."));
        assert!(cut.ends_with(".mkv"));
    }

    #[test]
    fn cli_arguments_parse() {
        let cli = Cli::parse_from([
            "submux",
            "--media",
            "videos/",
            "--subs",
            "subs/",
            "-l",
            "per",
            "-o",
            "out/",
            "--timeout",
            "120",
            "-vv",
        ]);
        assert_eq!(cli.language, Some(TrackLanguage::Persian));
        assert_eq!(cli.timeout, Some(120));
        assert_eq!(cli.verbose, 2);
    }
}
