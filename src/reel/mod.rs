// SYNOID Reel - Transcript-Driven Highlight Planning
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// parse -> analyze -> score -> select. Everything here is pure and
// synchronous; cutting the media is left to whoever consumes the plan.

pub mod digest;
pub mod lexicon;
pub mod manifest;
pub mod scoring;
pub mod selector;
pub mod strategy;
pub mod transcript;

pub use lexicon::{Analysis, LexicalAnalyzer};
pub use scoring::{ScoredSegment, SegmentScorer};
pub use selector::{fallback_plan, select, HighlightClip, HighlightPlan};
pub use strategy::ReelStrategy;
pub use transcript::TranscriptSegment;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ReelError {
    #[error("Invalid source duration: {0} (must be a positive number of seconds)")]
    InvalidDuration(f64),

    #[error("Invalid strategy: {0}")]
    InvalidStrategy(String),

    #[error("Invalid word list pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, ReelError>;

/// Durations handed back to the caller alongside a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReelReport {
    pub original_duration: f64,
    pub summary_duration: f64,
    pub clip_count: usize,
    pub used_fallback: bool,
}

/// Result of a full pipeline run
#[derive(Debug, Clone)]
pub struct Reel {
    pub segments: Vec<ScoredSegment>,
    pub analysis: Analysis,
    pub plan: HighlightPlan,
    pub report: ReelReport,
}

/// Concatenated segment text, the input of the lexical analyzer.
pub fn transcript_text(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse, analyze and score a transcript.
pub fn score_transcript(
    raw: &str,
    strategy: &ReelStrategy,
) -> Result<(Vec<ScoredSegment>, Analysis)> {
    let segments = transcript::parse(raw);
    let analyzer = LexicalAnalyzer::new(&strategy.lexicon)?;
    let analysis = analyzer.analyze(&transcript_text(&segments));
    let scored =
        SegmentScorer::new(&strategy.scoring).score_normalized(&segments, &analysis, &analyzer);
    Ok((scored, analysis))
}

/// Run the whole pipeline, substituting the head/middle/tail plan when the
/// transcript yields nothing and the strategy allows it.
pub fn build_reel(raw: &str, source_duration: f64, strategy: &ReelStrategy) -> Result<Reel> {
    selector::check_duration(source_duration)?;
    strategy.validate()?;

    let (segments, analysis) = score_transcript(raw, strategy)?;
    info!(
        "[REEL] {} segments, topics: {:?}",
        segments.len(),
        analysis.topics
    );

    let mut plan = select(&segments, source_duration, &strategy.selection)?;
    let mut used_fallback = false;
    if plan.is_empty() && strategy.fallback.enabled {
        warn!("[REEL] Transcript produced no segments, using head/middle/tail fallback");
        plan = fallback_plan(source_duration, &strategy.fallback)?;
        used_fallback = true;
    }

    let report = ReelReport {
        original_duration: source_duration,
        summary_duration: plan.total_duration(),
        clip_count: plan.len(),
        used_fallback,
    };

    Ok(Reel {
        segments,
        analysis,
        plan,
        report,
    })
}
