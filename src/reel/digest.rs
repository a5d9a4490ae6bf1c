// SYNOID Digest - Text Summary of a Transcript
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// The written companion to a highlight reel: what the recording covers, who
// speaks, how it opens, the key points in the middle and how it closes.

use super::lexicon::Analysis;
use super::strategy::DigestConfig;
use super::transcript::TranscriptSegment;

const EMPTY_DIGEST: &str = "No transcription available to summarize.";

/// Sentences with more than three words, without their trailing periods.
fn sentences(text: &str) -> Vec<&str> {
    text.split(". ")
        .map(|s| s.trim().trim_end_matches('.'))
        .filter(|s| s.split_whitespace().count() > 3)
        .collect()
}

/// Pick `count` representative sentences: first and last for two, evenly
/// spaced otherwise.
pub fn key_sentences(text: &str, count: usize) -> String {
    let all = sentences(text);
    if all.is_empty() || count == 0 {
        return String::new();
    }

    let chosen: Vec<&str> = if all.len() <= count {
        all
    } else if count == 2 {
        vec![all[0], all[all.len() - 1]]
    } else {
        let step = (all.len() / count).max(1);
        all.iter().step_by(step).take(count).copied().collect()
    };

    format!("{}.", chosen.join(". "))
}

fn joined_text(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Speakers in order of first appearance.
fn speakers(segments: &[TranscriptSegment]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for speaker in segments.iter().filter_map(|s| s.speaker.as_deref()) {
        if !seen.contains(&speaker) {
            seen.push(speaker);
        }
    }
    seen
}

/// Middle segments that mention the most topics; evenly spaced ones when no
/// topic matches.
fn key_points<'a>(
    middle: &'a [TranscriptSegment],
    topics: &[String],
    limit: usize,
) -> Vec<&'a TranscriptSegment> {
    let mut matched: Vec<(usize, &TranscriptSegment)> = middle
        .iter()
        .map(|seg| {
            let lower = seg.text.to_lowercase();
            let hits = topics.iter().filter(|t| lower.contains(t.as_str())).count();
            (hits, seg)
        })
        .filter(|(hits, _)| *hits > 0)
        .collect();

    if matched.is_empty() {
        if middle.is_empty() || limit == 0 {
            return Vec::new();
        }
        let step = (middle.len() / limit).max(1);
        return middle.iter().step_by(step).take(limit).collect();
    }

    // Stable: equal hit counts stay in transcript order.
    matched.sort_by(|a, b| b.0.cmp(&a.0));
    matched.into_iter().take(limit).map(|(_, seg)| seg).collect()
}

/// Render the digest for parsed segments and their lexical analysis.
pub fn digest(
    segments: &[TranscriptSegment],
    analysis: &Analysis,
    config: &DigestConfig,
) -> String {
    if segments.iter().all(|s| s.text.trim().is_empty()) {
        return EMPTY_DIGEST.to_string();
    }

    let total = segments.len();
    let intro_end = ((total as f64 * 0.15) as usize).max(1);
    let outro_start = (total as f64 * 0.85) as usize;
    let middle_start = (total as f64 * 0.15) as usize;

    let intro = &segments[..intro_end.min(total)];
    let outro = &segments[outro_start.min(total)..];
    let middle = &segments[middle_start..outro_start.max(middle_start)];

    let mut sections: Vec<String> = Vec::new();

    if analysis.topics.is_empty() {
        sections.push("This recording covers several key topics.".to_string());
    } else {
        sections.push(format!(
            "This recording primarily discusses: {}.",
            analysis.topics.join(", ")
        ));
    }

    let speakers = speakers(segments);
    if speakers.len() > 1 {
        sections.push(format!(
            "It features {} speakers: {}.",
            speakers.len(),
            speakers.join(", ")
        ));
    }

    let opening = key_sentences(&joined_text(intro), config.opening_sentences);
    if !opening.is_empty() {
        sections.push(format!("At the beginning: {}", opening));
    }

    let points = key_points(middle, &analysis.topics, config.key_points);
    if !points.is_empty() {
        let lines: Vec<String> = points
            .iter()
            .map(|seg| format!("• {}", seg.text.trim()))
            .collect();
        sections.push(format!("Key points covered:\n{}", lines.join("\n")));
    }

    if !analysis.entities.is_empty() {
        sections.push(format!("It mentions: {}.", analysis.entities.join(", ")));
    }

    let closing = key_sentences(&joined_text(outro), config.closing_sentences);
    if !closing.is_empty() {
        sections.push(format!("Towards the end: {}", closing));
    }

    sections.join("\n\n")
}
