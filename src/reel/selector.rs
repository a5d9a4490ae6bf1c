// SYNOID Highlight Selector
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Two-phase selection over scored transcript segments:
//   1. Anchors: the top-ranked segments, wherever they sit in the timeline.
//   2. Coverage: an even stride over the remaining segments in time order,
//      plus one bounded top-up pass if the budget is still open.
// Clips are emitted in chronological order and never leave the source.

use super::scoring::ScoredSegment;
use super::strategy::{FallbackConfig, SelectionConfig};
use super::ReelError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// One span of the source timeline to keep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighlightClip {
    pub start: f64,
    pub duration: f64,
}

impl HighlightClip {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Chronologically ordered clips making up a reel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighlightPlan {
    pub clips: Vec<HighlightClip>,
}

impl HighlightPlan {
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HighlightClip> {
        self.clips.iter()
    }

    pub fn total_duration(&self) -> f64 {
        self.clips.iter().map(|c| c.duration).sum()
    }
}

/// Reject durations that cannot bound a timeline.
pub fn check_duration(source_duration: f64) -> Result<(), ReelError> {
    if source_duration.is_finite() && source_duration > 0.0 {
        Ok(())
    } else {
        Err(ReelError::InvalidDuration(source_duration))
    }
}

/// Reel length the selector aims for.
pub fn target_duration(source_duration: f64, config: &SelectionConfig) -> f64 {
    (source_duration * config.target_fraction).min(config.cap_seconds)
}

/// Running selection state for one `select` call.
struct Budget<'a> {
    source_duration: f64,
    target: f64,
    lead_in: f64,
    accumulated: f64,
    picked: HashSet<usize>,
    clips: Vec<HighlightClip>,
    segments: &'a [ScoredSegment],
}

impl Budget<'_> {
    fn is_open(&self) -> bool {
        self.accumulated < self.target
    }

    /// Add a clip for `segments[pos]`. Returns false once the budget is spent.
    fn take(&mut self, pos: usize, clip_seconds: f64) -> bool {
        if !self.is_open() {
            return false;
        }
        if !self.picked.insert(pos) {
            return true;
        }

        let duration = clip_seconds.min(self.source_duration);
        let wanted = (self.segments[pos].start_time() - self.lead_in).max(0.0);
        // Pull late clips back so they end at the source end.
        let start = wanted.min(self.source_duration - duration).max(0.0);

        self.clips.push(HighlightClip { start, duration });
        self.accumulated += duration;
        true
    }

    /// Unpicked positions in chronological order (ties by index).
    fn remaining_chronological(&self, ranked: &[usize]) -> Vec<usize> {
        let mut rest: Vec<usize> = ranked
            .iter()
            .copied()
            .filter(|p| !self.picked.contains(p))
            .collect();
        rest.sort_by(|&a, &b| {
            self.segments[a]
                .start_time()
                .total_cmp(&self.segments[b].start_time())
                .then(self.segments[a].index.cmp(&self.segments[b].index))
        });
        rest
    }

    fn open_seconds(&self) -> f64 {
        (self.target - self.accumulated).max(0.0)
    }

    /// Pick up to `wanted` of `candidates`, evenly spaced.
    fn stride_pass(&mut self, candidates: &[usize], clip_seconds: f64, wanted: usize) -> usize {
        if candidates.is_empty() || wanted == 0 {
            return 0;
        }
        let stride = (candidates.len() / wanted).max(1);

        let mut added = 0;
        for &pos in candidates.iter().step_by(stride) {
            if added >= wanted || !self.take(pos, clip_seconds) {
                break;
            }
            added += 1;
        }
        added
    }
}

/// Positions into `scored`, best first; equal scores keep transcript order.
fn rank(scored: &[ScoredSegment]) -> Vec<usize> {
    let mut ranked: Vec<usize> = (0..scored.len()).collect();
    ranked.sort_by(|&a, &b| {
        scored[b]
            .importance_score
            .total_cmp(&scored[a].importance_score)
            .then(scored[a].index.cmp(&scored[b].index))
    });
    ranked
}

/// Merge clips that overlap or touch. Input must be sorted by start.
fn merge_overlaps(clips: Vec<HighlightClip>) -> Vec<HighlightClip> {
    let mut merged: Vec<HighlightClip> = Vec::with_capacity(clips.len());
    for clip in clips {
        match merged.last_mut() {
            Some(last) if clip.start <= last.end() => {
                let end = last.end().max(clip.end());
                last.duration = end - last.start;
            }
            _ => merged.push(clip),
        }
    }
    merged
}

/// Choose the clips of a highlight reel.
///
/// An empty `scored` slice yields an empty plan; the caller decides whether
/// to substitute [`fallback_plan`].
pub fn select(
    scored: &[ScoredSegment],
    source_duration: f64,
    config: &SelectionConfig,
) -> Result<HighlightPlan, ReelError> {
    check_duration(source_duration)?;
    config.validate()?;

    if scored.is_empty() {
        debug!("[REEL] No scored segments, returning empty plan");
        return Ok(HighlightPlan::default());
    }

    let target = target_duration(source_duration, config);
    let ranked = rank(scored);

    let mut budget = Budget {
        source_duration,
        target,
        lead_in: config.lead_in_seconds,
        accumulated: 0.0,
        picked: HashSet::new(),
        clips: Vec::new(),
        segments: scored,
    };

    // Phase 1: anchors by importance.
    let mut anchors = 0;
    for &pos in ranked.iter().take(config.anchor_count) {
        if !budget.take(pos, config.anchor_clip_seconds) {
            break;
        }
        anchors += 1;
    }

    // Phase 2: even coverage over what is left, in time order. Only whole
    // extra-length slots are filled here.
    let rest = budget.remaining_chronological(&ranked);
    let wanted = (budget.open_seconds() / config.extra_clip_seconds).floor() as usize;
    let extras = budget.stride_pass(&rest, config.extra_clip_seconds, wanted);

    // Phase 3: one bounded top-up with shorter clips for the remainder.
    let mut top_ups = 0;
    if budget.is_open() {
        let rest = budget.remaining_chronological(&ranked);
        let wanted = (budget.open_seconds() / config.top_up_clip_seconds).ceil() as usize;
        let wanted = wanted.min(config.top_up_limit);
        top_ups = budget.stride_pass(&rest, config.top_up_clip_seconds, wanted);
    }

    let mut clips = budget.clips;
    clips.sort_by(|a, b| a.start.total_cmp(&b.start).then(a.duration.total_cmp(&b.duration)));
    if config.merge_overlaps {
        clips = merge_overlaps(clips);
    }

    let plan = HighlightPlan { clips };
    info!(
        "[REEL] Selected {} anchors, {} extras, {} top-ups -> {} clips, {:.1}s of {:.1}s target",
        anchors,
        extras,
        top_ups,
        plan.len(),
        plan.total_duration(),
        target
    );
    Ok(plan)
}

/// Duration-only plan: head, middle and tail clips.
pub fn fallback_plan(
    source_duration: f64,
    config: &FallbackConfig,
) -> Result<HighlightPlan, ReelError> {
    check_duration(source_duration)?;
    let fraction = config.coverage_fraction;
    if !(fraction.is_finite() && fraction > 0.0 && fraction <= 1.0 / 3.0) {
        return Err(ReelError::InvalidStrategy(format!(
            "fallback.coverage_fraction must be in (0, 1/3], got {}",
            fraction
        )));
    }

    let clip = source_duration * fraction;
    let starts = [
        0.0,
        source_duration / 2.0 - clip / 2.0,
        source_duration - clip,
    ];

    Ok(HighlightPlan {
        clips: starts
            .iter()
            .map(|&start| HighlightClip {
                start,
                duration: clip,
            })
            .collect(),
    })
}
