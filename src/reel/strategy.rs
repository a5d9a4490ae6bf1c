// SYNOID Reel Strategy
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Every tunable of the highlight pipeline lives here: word lists, score
// bonuses, clip lengths and budget fractions. Strategies are plain JSON so a
// partial file only overrides what it names.

use super::ReelError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const STRATEGY_FILE: &str = "reel_strategy.json";
const STRATEGY_ENV: &str = "SYNOID_REEL_STRATEGY";

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

/// Word lists and caps for the lexical analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexiconConfig {
    pub filler_words: Vec<String>,
    pub stop_words: Vec<String>,
    pub max_topics: usize,
    pub max_entities: usize,
    /// Break entity runs at clause punctuation and drop lone stop/filler words.
    pub filter_entity_noise: bool,
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            filler_words: words(&[
                "um", "uh", "like", "you know", "so", "actually", "basically", "literally",
                "honestly", "now", "then", "well", "just", "okay", "right", "yeah",
            ]),
            stop_words: words(&[
                "this", "that", "these", "those", "with", "have", "from", "they", "will", "what",
                "when", "where", "their", "there", "here", "about", "which", "were", "would",
                "could", "should", "does", "doing", "because", "through",
            ]),
            max_topics: 8,
            max_entities: 6,
            filter_entity_noise: false,
        }
    }
}

/// Bonuses applied by the segment scorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub baseline: f64,
    /// Ratio bounds of the intro/outro zones, by segment index.
    pub edge_ratio: f64,
    pub edge_bonus: f64,
    pub middle_bonus: f64,
    pub keyword_bonus: f64,
    pub long_segment_words: usize,
    pub length_bonus: f64,
    pub speaker_change_bonus: f64,
    pub transition_bonus: f64,
    pub importance_keywords: Vec<String>,
    pub transition_phrases: Vec<String>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            baseline: 1.0,
            edge_ratio: 0.15,
            edge_bonus: 2.0,
            middle_bonus: 0.5,
            keyword_bonus: 1.5,
            long_segment_words: 20,
            length_bonus: 0.5,
            speaker_change_bonus: 0.5,
            transition_bonus: 0.5,
            importance_keywords: words(&[
                "important", "key", "critical", "essential", "significant", "highlight", "note",
                "remember", "crucial", "main point", "conclusion", "summary", "result", "finding",
                "recommend", "example", "demonstrate", "show", "illustrate", "feature",
            ]),
            transition_phrases: words(&[
                "next", "moving on", "now let's", "turning to", "shifting focus", "another",
                "additionally", "furthermore", "first", "second", "third", "finally",
                "in conclusion", "to sum up", "lastly",
            ]),
        }
    }
}

/// Budget and clip lengths for the highlight selector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Share of the source duration the reel aims for (0.25 - 0.4 typical).
    pub target_fraction: f64,
    /// Hard ceiling on the reel length in seconds.
    pub cap_seconds: f64,
    pub anchor_count: usize,
    pub anchor_clip_seconds: f64,
    pub extra_clip_seconds: f64,
    pub top_up_clip_seconds: f64,
    pub top_up_limit: usize,
    pub lead_in_seconds: f64,
    pub merge_overlaps: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            target_fraction: 0.25,
            cap_seconds: 300.0,
            anchor_count: 3,
            anchor_clip_seconds: 20.0,
            extra_clip_seconds: 20.0,
            top_up_clip_seconds: 15.0,
            top_up_limit: 3,
            lead_in_seconds: 1.0,
            merge_overlaps: true,
        }
    }
}

impl SelectionConfig {
    /// Longest single clip the selector can emit.
    pub fn max_clip_seconds(&self) -> f64 {
        self.anchor_clip_seconds
            .max(self.extra_clip_seconds)
            .max(self.top_up_clip_seconds)
    }

    pub fn validate(&self) -> Result<(), ReelError> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ReelError::InvalidStrategy(format!(
                    "selection.{} must be positive, got {}",
                    name, v
                )))
            }
        };
        positive("target_fraction", self.target_fraction)?;
        positive("cap_seconds", self.cap_seconds)?;
        positive("anchor_clip_seconds", self.anchor_clip_seconds)?;
        positive("extra_clip_seconds", self.extra_clip_seconds)?;
        positive("top_up_clip_seconds", self.top_up_clip_seconds)?;

        if self.target_fraction > 1.0 {
            return Err(ReelError::InvalidStrategy(format!(
                "selection.target_fraction must be at most 1.0, got {}",
                self.target_fraction
            )));
        }
        if !self.lead_in_seconds.is_finite() || self.lead_in_seconds < 0.0 {
            return Err(ReelError::InvalidStrategy(format!(
                "selection.lead_in_seconds must be non-negative, got {}",
                self.lead_in_seconds
            )));
        }
        Ok(())
    }
}

/// Duration-only plan used when the transcript yields nothing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub enabled: bool,
    /// Share of the source each of the head/middle/tail clips covers.
    pub coverage_fraction: f64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            coverage_fraction: 0.10,
        }
    }
}

/// Text digest shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    pub key_points: usize,
    pub opening_sentences: usize,
    pub closing_sentences: usize,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            key_points: 5,
            opening_sentences: 2,
            closing_sentences: 2,
        }
    }
}

/// Full configuration for a reel run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReelStrategy {
    pub lexicon: LexiconConfig,
    pub scoring: ScoringConfig,
    pub selection: SelectionConfig,
    pub fallback: FallbackConfig,
    pub digest: DigestConfig,
}

impl ReelStrategy {
    /// Load from the first strategy file found, falling back to defaults.
    ///
    /// Lookup order: `$SYNOID_REEL_STRATEGY`, `./reel_strategy.json`,
    /// `<config dir>/synoid/reel_strategy.json`. A file that exists but does
    /// not parse is reported and skipped.
    pub fn load() -> Self {
        for path in Self::candidate_paths() {
            if !path.exists() {
                continue;
            }
            match Self::load_from(&path) {
                Ok(strategy) => return strategy,
                Err(e) => warn!("[STRATEGY] Ignoring {:?}: {:#}", path, e),
            }
        }
        info!("[STRATEGY] Using default reel strategy");
        Self::default()
    }

    /// Load and validate a strategy file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read strategy file {:?}", path))?;
        let strategy: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse strategy file {:?}", path))?;
        strategy.validate()?;
        info!("[STRATEGY] Loaded reel strategy from {:?}", path);
        Ok(strategy)
    }

    pub fn validate(&self) -> Result<(), ReelError> {
        self.selection.validate()?;
        let fraction = self.fallback.coverage_fraction;
        if !(fraction.is_finite() && fraction > 0.0 && fraction <= 1.0 / 3.0) {
            return Err(ReelError::InvalidStrategy(format!(
                "fallback.coverage_fraction must be in (0, 1/3], got {}",
                fraction
            )));
        }
        Ok(())
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Ok(env_path) = std::env::var(STRATEGY_ENV) {
            paths.push(PathBuf::from(env_path));
        }
        paths.push(PathBuf::from(STRATEGY_FILE));
        if let Some(config) = dirs::config_dir() {
            paths.push(config.join("synoid").join(STRATEGY_FILE));
        }
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_strategy_is_valid() {
        assert!(ReelStrategy::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "selection": { "target_fraction": 0.4 } }"#;
        let strategy: ReelStrategy = serde_json::from_str(json).unwrap();
        assert_eq!(strategy.selection.target_fraction, 0.4);
        assert_eq!(strategy.selection.anchor_count, 3);
        assert_eq!(strategy.lexicon, LexiconConfig::default());
    }

    #[test]
    fn test_rejects_bad_fraction() {
        let mut strategy = ReelStrategy::default();
        strategy.selection.target_fraction = 1.5;
        assert!(matches!(
            strategy.validate(),
            Err(ReelError::InvalidStrategy(_))
        ));

        let mut strategy = ReelStrategy::default();
        strategy.selection.extra_clip_seconds = 0.0;
        assert!(strategy.validate().is_err());

        let mut strategy = ReelStrategy::default();
        strategy.fallback.coverage_fraction = 0.5;
        assert!(strategy.validate().is_err());
    }

    #[test]
    fn test_max_clip_seconds() {
        let mut config = SelectionConfig::default();
        config.top_up_clip_seconds = 25.0;
        assert_eq!(config.max_clip_seconds(), 25.0);
    }
}
