// SYNOID Reel Entry Point
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use synoid_reel::reel::{self, ReelStrategy};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "synoid-reel")]
#[command(about = "SYNOID Highlight Reel Planner", long_about = None)]
struct Cli {
    /// Strategy file (JSON). Defaults to the usual lookup locations.
    #[arg(long, global = true)]
    strategy: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PlanFormat {
    /// Clips and report as JSON
    Json,
    /// FFmpeg concat-demuxer script
    Concat,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a highlight reel from a transcript
    Plan {
        /// Transcript file ("-" for stdin)
        #[arg(short, long)]
        transcript: PathBuf,

        /// Source duration in seconds
        #[arg(short, long)]
        duration: f64,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: PlanFormat,

        /// Source media path, written into the concat script
        #[arg(short, long, required_if_eq("format", "concat"))]
        source: Option<PathBuf>,

        /// Return an empty plan instead of the head/middle/tail fallback
        #[arg(long)]
        no_fallback: bool,
    },

    /// Write a text digest of a transcript
    Digest {
        /// Transcript file ("-" for stdin)
        #[arg(short, long)]
        transcript: PathBuf,
    },

    /// Show topics, entities and per-segment scores
    Analyze {
        /// Transcript file ("-" for stdin)
        #[arg(short, long)]
        transcript: PathBuf,
    },

    /// Print the effective strategy
    Strategy,
}

fn read_transcript(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read transcript from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read transcript {:?}", path))
}

fn load_strategy(path: Option<&Path>) -> Result<ReelStrategy> {
    match path {
        Some(p) => ReelStrategy::load_from(p),
        None => Ok(ReelStrategy::load()),
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut strategy = load_strategy(cli.strategy.as_deref())?;

    match cli.command {
        Commands::Plan {
            transcript,
            duration,
            format,
            source,
            no_fallback,
        } => {
            if no_fallback {
                strategy.fallback.enabled = false;
            }
            let raw = read_transcript(&transcript)?;
            let built = reel::build_reel(&raw, duration, &strategy)?;

            info!(
                "[REEL] Plan: {} clips, {:.1}s of {:.1}s{}",
                built.report.clip_count,
                built.report.summary_duration,
                built.report.original_duration,
                if built.report.used_fallback { " (fallback)" } else { "" }
            );

            match format {
                PlanFormat::Json => {
                    let out = serde_json::json!({
                        "clips": built.plan,
                        "report": built.report,
                    });
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
                PlanFormat::Concat => {
                    let source = source.context("--source is required for concat output")?;
                    println!("{}", reel::manifest::concat_manifest(&source, &built.plan));
                }
            }
        }
        Commands::Digest { transcript } => {
            let raw = read_transcript(&transcript)?;
            let segments = reel::transcript::parse(&raw);
            let analyzer = reel::LexicalAnalyzer::new(&strategy.lexicon)?;
            let analysis = analyzer.analyze(&reel::transcript_text(&segments));
            println!("{}", reel::digest::digest(&segments, &analysis, &strategy.digest));
        }
        Commands::Analyze { transcript } => {
            let raw = read_transcript(&transcript)?;
            let (segments, analysis) = reel::score_transcript(&raw, &strategy)?;
            let out = serde_json::json!({
                "topics": analysis.topics,
                "entities": analysis.entities,
                "segments": segments,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Commands::Strategy => {
            println!("{}", serde_json::to_string_pretty(&strategy)?);
        }
    }

    Ok(())
}

fn main() {
    dotenv().ok();

    // Logs go to stderr so plans on stdout stay machine-readable.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
