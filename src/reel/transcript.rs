// SYNOID Transcript Parser
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Turns block-formatted transcript text into timestamped segments:
//
//   00:45 - Speaker 1:
//   First line of speech
//   continued here
//
// Blocks are separated by blank lines. Headers that do not parse are skipped.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub start_time: f64,
    pub speaker: Option<String>,
    pub text: String,
}

impl TranscriptSegment {
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

fn header_pattern() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| {
        // Literal pattern; compiling it cannot fail.
        Regex::new(
            r"^(?:(?:(?P<h>\d+):)?(?P<m>\d+):(?P<s>\d+)|(?P<secs>\d+(?:\.\d*)?|\.\d+))(?: - (?P<speaker>.*))?$",
        )
        .unwrap()
    })
}

/// Parse a header line into `(start_time, speaker)`.
///
/// The speaker part only counts when it ends in a colon; `00:10 - Alice`
/// keeps its time but has no speaker.
fn parse_header(line: &str) -> Option<(f64, Option<String>)> {
    let caps = header_pattern().captures(line.trim())?;

    let start_time = if let Some(secs) = caps.name("secs") {
        secs.as_str().parse::<f64>().ok()?
    } else {
        let field = |name: &str| -> Option<f64> {
            match caps.name(name) {
                Some(m) => m.as_str().parse::<u64>().ok().map(|v| v as f64),
                None => Some(0.0),
            }
        };
        field("h")? * 3600.0 + field("m")? * 60.0 + field("s")?
    };
    if !start_time.is_finite() {
        return None;
    }

    let speaker = caps
        .name("speaker")
        .and_then(|m| m.as_str().trim().strip_suffix(':'))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Some((start_time, speaker))
}

/// Split text into blocks of consecutive non-blank lines.
fn blocks(raw: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in raw.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

/// Parse raw transcript text into segments ordered by start time.
///
/// Returns an empty vector when no block has a recognizable header; callers
/// treat that as "no transcript" rather than an error.
pub fn parse(raw: &str) -> Vec<TranscriptSegment> {
    let mut segments = Vec::new();
    let mut skipped = 0usize;

    for block in blocks(raw) {
        let Some((header, body)) = block.split_first() else {
            continue;
        };

        let Some((start_time, speaker)) = parse_header(header) else {
            debug!("[PARSER] Skipping block with unrecognized header: {:?}", header);
            skipped += 1;
            continue;
        };

        let text = body
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        segments.push(TranscriptSegment {
            start_time,
            speaker,
            text,
        });
    }

    // Stable: equal timestamps keep input order.
    segments.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

    debug!(
        "[PARSER] Parsed {} segments ({} blocks skipped)",
        segments.len(),
        skipped
    );
    segments
}

fn format_time(seconds: f64) -> String {
    // Integral values past u64 would saturate, so they keep the float form.
    if seconds.fract() == 0.0 && seconds < u64::MAX as f64 {
        let total = seconds as u64;
        format!("{:02}:{:02}", total / 60, total % 60)
    } else {
        format!("{}", seconds)
    }
}

/// Canonical text form of parsed segments; `parse` reads it back unchanged.
pub fn serialize(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|seg| {
            let mut block = format_time(seg.start_time);
            if let Some(speaker) = &seg.speaker {
                block.push_str(&format!(" - {}:", speaker));
            }
            if !seg.text.is_empty() {
                block.push('\n');
                block.push_str(&seg.text);
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
