// SYNOID Segment Scorer
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Additive importance scoring: baseline + position + lexical + length +
// structure. Scores are never multiplied, so equal scores happen and are
// resolved by segment index downstream.

use super::lexicon::{Analysis, LexicalAnalyzer};
use super::strategy::ScoringConfig;
use super::transcript::TranscriptSegment;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSegment {
    /// Position in the parsed transcript.
    pub index: usize,
    #[serde(flatten)]
    pub segment: TranscriptSegment,
    pub importance_score: f64,
    /// Word count.
    pub content_length: usize,
}

impl ScoredSegment {
    pub fn start_time(&self) -> f64 {
        self.segment.start_time
    }
}

/// Lowercased, non-empty phrases for substring matching.
fn lowered(list: &[String]) -> Vec<String> {
    list.iter()
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .collect()
}

pub struct SegmentScorer {
    config: ScoringConfig,
    keywords: Vec<String>,
    transitions: Vec<String>,
}

impl SegmentScorer {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            keywords: lowered(&config.importance_keywords),
            transitions: lowered(&config.transition_phrases),
            config: config.clone(),
        }
    }

    fn positional_bonus(&self, index: usize, total: usize) -> f64 {
        let ratio = index as f64 / total as f64;
        if ratio < self.config.edge_ratio || ratio > 1.0 - self.config.edge_ratio {
            self.config.edge_bonus
        } else {
            self.config.middle_bonus
        }
    }

    /// Score every segment. Output order matches input order.
    ///
    /// Keywords and phrases match as substrings of the lowercased text, so
    /// "result" also fires on "results".
    pub fn score(&self, segments: &[TranscriptSegment], analysis: &Analysis) -> Vec<ScoredSegment> {
        self.score_with(segments, analysis, None)
    }

    /// Like [`score`](Self::score), but topic and entity phrases also match
    /// the analyzer's filler-free form of each segment, where topics that
    /// only formed once fillers were removed can be found.
    pub fn score_normalized(
        &self,
        segments: &[TranscriptSegment],
        analysis: &Analysis,
        analyzer: &LexicalAnalyzer,
    ) -> Vec<ScoredSegment> {
        self.score_with(segments, analysis, Some(analyzer))
    }

    fn score_with(
        &self,
        segments: &[TranscriptSegment],
        analysis: &Analysis,
        analyzer: Option<&LexicalAnalyzer>,
    ) -> Vec<ScoredSegment> {
        let total = segments.len();
        let phrases = lowered(&analysis.phrases());

        let scored: Vec<ScoredSegment> = segments
            .iter()
            .enumerate()
            .map(|(i, seg)| {
                let text = seg.text.to_lowercase();
                let normalized = analyzer.map(|a| a.normalize(&seg.text));
                let content_length = seg.word_count();
                let mut score = self.config.baseline + self.positional_bonus(i, total);

                let salient = self.keywords.iter().any(|k| text.contains(k.as_str()))
                    || phrases.iter().any(|p| {
                        text.contains(p.as_str())
                            || normalized.as_deref().is_some_and(|n| n.contains(p.as_str()))
                    });
                if salient {
                    score += self.config.keyword_bonus;
                }

                if content_length > self.config.long_segment_words {
                    score += self.config.length_bonus;
                }

                let speaker_changed = i > 0
                    && seg.speaker.is_some()
                    && seg.speaker != segments[i - 1].speaker;
                if speaker_changed {
                    score += self.config.speaker_change_bonus;
                }

                if self.transitions.iter().any(|t| text.contains(t.as_str())) {
                    score += self.config.transition_bonus;
                }

                ScoredSegment {
                    index: i,
                    segment: seg.clone(),
                    importance_score: score.max(0.0),
                    content_length,
                }
            })
            .collect();

        debug!("[SCORER] Scored {} segments", scored.len());
        scored
    }
}
