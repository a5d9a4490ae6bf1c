// SYNOID Lexicon - Frequency-Based Topic & Entity Extraction
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Topics come from repeated n-grams of content words, entities from runs of
// capitalized words in the original text. Purely lexical: no models, no
// knowledge base.

use super::strategy::LexiconConfig;
use super::ReelError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Topics and entities found in a transcript
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub topics: Vec<String>,
    pub entities: Vec<String>,
}

impl Analysis {
    /// Topics followed by entities, lowercased for matching.
    pub fn phrases(&self) -> Vec<String> {
        self.topics
            .iter()
            .chain(self.entities.iter())
            .map(|p| p.to_lowercase())
            .collect()
    }
}

/// Occurrence count plus position of first sighting, for stable ranking.
#[derive(Debug, Clone, Copy)]
struct Tally {
    count: usize,
    first_seen: usize,
}

#[derive(Default)]
struct FrequencyTable {
    tallies: HashMap<String, Tally>,
}

impl FrequencyTable {
    fn record(&mut self, key: String, position: usize) {
        self.tallies
            .entry(key)
            .and_modify(|t| t.count += 1)
            .or_insert(Tally {
                count: 1,
                first_seen: position,
            });
    }

    /// Entries with `count > min_count`, most frequent first.
    fn ranked_above(&self, min_count: f64) -> Vec<String> {
        let mut entries: Vec<(&String, &Tally)> = self
            .tallies
            .iter()
            .filter(|(_, t)| t.count as f64 > min_count)
            .collect();
        entries.sort_by(|a, b| {
            b.1.count
                .cmp(&a.1.count)
                .then(a.1.first_seen.cmp(&b.1.first_seen))
        });
        entries.into_iter().map(|(k, _)| k.clone()).collect()
    }
}

fn strip_punctuation(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric())
}

pub struct LexicalAnalyzer {
    filler: Option<Regex>,
    filler_words: HashSet<String>,
    stop_words: HashSet<String>,
    max_topics: usize,
    max_entities: usize,
    filter_entity_noise: bool,
}

impl LexicalAnalyzer {
    pub fn new(config: &LexiconConfig) -> Result<Self, ReelError> {
        let filler = if config.filler_words.is_empty() {
            None
        } else {
            let alternatives = config
                .filler_words
                .iter()
                .map(|w| regex::escape(&w.to_lowercase()))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&format!(r"\b(?:{})\b", alternatives))?)
        };

        Ok(Self {
            filler,
            filler_words: config.filler_words.iter().map(|w| w.to_lowercase()).collect(),
            stop_words: config.stop_words.iter().map(|w| w.to_lowercase()).collect(),
            max_topics: config.max_topics,
            max_entities: config.max_entities,
            filter_entity_noise: config.filter_entity_noise,
        })
    }

    fn passes(&self, token: &str) -> bool {
        token.chars().count() > 3 && !self.stop_words.contains(token)
    }

    pub fn analyze(&self, text: &str) -> Analysis {
        let analysis = Analysis {
            topics: self.topics(text),
            entities: self.entities(text),
        };
        debug!(
            "[LEXICON] {} topics {:?}, {} entities {:?}",
            analysis.topics.len(),
            analysis.topics,
            analysis.entities.len(),
            analysis.entities
        );
        analysis
    }

    /// Lowercased, filler-free tokens with surrounding punctuation trimmed.
    fn tokens(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let cleaned = match &self.filler {
            Some(re) => re.replace_all(&lowered, " ").into_owned(),
            None => lowered,
        };
        cleaned
            .split_whitespace()
            .map(strip_punctuation)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Text in the form topics are built from, for phrase matching.
    pub fn normalize(&self, text: &str) -> String {
        self.tokens(text).join(" ")
    }

    /// Repeated trigrams, then repeated bigrams, then frequent words.
    pub fn topics(&self, text: &str) -> Vec<String> {
        let tokens = self.tokens(text);
        let passing: Vec<bool> = tokens.iter().map(|t| self.passes(t)).collect();

        let mut unigrams = FrequencyTable::default();
        let mut bigrams = FrequencyTable::default();
        let mut trigrams = FrequencyTable::default();
        let mut filtered_words = 0usize;

        for i in 0..tokens.len() {
            if !passing[i] {
                continue;
            }
            filtered_words += 1;
            unigrams.record(tokens[i].clone(), i);

            if i + 1 < tokens.len() && passing[i + 1] {
                bigrams.record(tokens[i..i + 2].join(" "), i);
                if i + 2 < tokens.len() && passing[i + 2] {
                    trigrams.record(tokens[i..i + 3].join(" "), i);
                }
            }
        }

        let word_threshold = (filtered_words as f64 / 200.0).max(2.0);

        trigrams
            .ranked_above(1.0)
            .into_iter()
            .chain(bigrams.ranked_above(1.0))
            .chain(unigrams.ranked_above(word_threshold))
            .take(self.max_topics)
            .collect()
    }

    /// Sentence-initial "This" or "Okay" is capitalization, not a name.
    fn is_common_word(&self, run: &[&str]) -> bool {
        match run {
            [word] => {
                let lower = word.to_lowercase();
                self.stop_words.contains(&lower) || self.filler_words.contains(&lower)
            }
            _ => false,
        }
    }

    /// Maximal capitalized runs, longest-superstring wins, multi-word first.
    ///
    /// With `filter_entity_noise`, runs also break at clause punctuation and
    /// lone stop or filler words are dropped.
    pub fn entities(&self, text: &str) -> Vec<String> {
        let mut runs: Vec<Vec<&str>> = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for raw in text.split_whitespace() {
            let word = strip_punctuation(raw);
            let capitalized =
                word.chars().count() > 1 && word.chars().next().is_some_and(char::is_uppercase);

            if capitalized {
                current.push(word);
                let clause_end = raw.ends_with(&['.', ',', ';', ':', '!', '?'][..]);
                if self.filter_entity_noise && clause_end {
                    runs.push(std::mem::take(&mut current));
                }
            } else if !current.is_empty() {
                runs.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }

        let mut counts = FrequencyTable::default();
        for (position, run) in runs.iter().enumerate() {
            if !(self.filter_entity_noise && self.is_common_word(run)) {
                counts.record(run.join(" "), position);
            }
        }

        let mut candidates: Vec<(String, Tally)> = counts.tallies.into_iter().collect();
        // Longest first so containment checks only look at survivors.
        candidates.sort_by(|a, b| {
            let len = |s: &str| s.split(' ').count();
            len(&b.0)
                .cmp(&len(&a.0))
                .then(a.1.first_seen.cmp(&b.1.first_seen))
        });

        let mut survivors: Vec<(String, Tally)> = Vec::new();
        for (phrase, tally) in candidates {
            let words: Vec<&str> = phrase.split(' ').collect();
            let contained = survivors.iter().any(|(longer, _)| {
                let longer: Vec<&str> = longer.split(' ').collect();
                longer.len() > words.len() && longer.windows(words.len()).any(|w| w == words.as_slice())
            });
            if !contained {
                survivors.push((phrase, tally));
            }
        }

        let priority = |phrase: &str, tally: &Tally| -> usize {
            let multi_word = usize::from(phrase.contains(' '));
            2 * multi_word + tally.count.min(3)
        };
        survivors.sort_by(|a, b| {
            priority(&b.0, &b.1)
                .cmp(&priority(&a.0, &a.1))
                .then(a.1.first_seen.cmp(&b.1.first_seen))
        });

        survivors
            .into_iter()
            .take(self.max_entities)
            .map(|(phrase, _)| phrase)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> LexicalAnalyzer {
        LexicalAnalyzer::new(&LexiconConfig::default()).unwrap()
    }

    fn noise_filtering_analyzer() -> LexicalAnalyzer {
        LexicalAnalyzer::new(&LexiconConfig {
            filter_entity_noise: true,
            ..LexiconConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_repeated_trigram_ranks_first() {
        let text = "Neural network training matters. Neural network training again. \
                    Gradient descent helps. Gradient descent works.";
        let topics = analyzer().topics(text);
        assert_eq!(topics[0], "neural network training");
        assert!(topics.contains(&"gradient descent".to_string()));
        // Bigrams inside the trigram are also repeated, after it.
        let trigram_pos = topics.iter().position(|t| t == "neural network training");
        let bigram_pos = topics.iter().position(|t| t == "neural network");
        assert!(trigram_pos < bigram_pos);
    }

    #[test]
    fn test_short_and_stop_words_never_form_topics() {
        let text = "this this this that that that cat cat cat dog dog dog";
        assert!(analyzer().topics(text).is_empty());
    }

    #[test]
    fn test_unigram_threshold() {
        // Twice is not enough, three times is.
        let topics = analyzer().topics("rocket apple rocket banana rocket cherry apple");
        assert_eq!(topics, vec!["rocket".to_string()]);
    }

    #[test]
    fn test_filler_words_are_stripped() {
        let text = "basically basically basically literally literally literally";
        assert!(analyzer().topics(text).is_empty());
    }

    #[test]
    fn test_topic_cap() {
        let words = [
            "alpha", "bravo", "charlie", "delta", "echoes", "foxtrot", "golfing", "hotel",
            "india", "juliet",
        ];
        let text = words
            .iter()
            .map(|w| format!("{w} {w} {w} zz"))
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(analyzer().topics(&text).len(), 8);
    }

    #[test]
    fn test_entities_prefer_longest_superstring() {
        let text = "we met with Acme Corp today and Acme Corp Labs later while Acme waited";
        let entities = analyzer().entities(text);
        assert!(entities.contains(&"Acme Corp Labs".to_string()));
        assert!(!entities.contains(&"Acme Corp".to_string()));
        assert!(!entities.contains(&"Acme".to_string()));
    }

    #[test]
    fn test_entity_priority_and_cap() {
        let text = "then Paris and Paris and Paris and Paris also New York once \
                    and Berlin Tokyo no Rome and Oslo and Lima and Kyiv and Bern and Doha";
        let entities = analyzer().entities(text);
        // Multi-word with one hit (2 + 1) ties single-word with capped hits (0 + 3);
        // first occurrence decides.
        assert_eq!(entities[0], "Paris");
        assert_eq!(entities[1], "New York");
        assert_eq!(entities[2], "Berlin Tokyo");
        assert_eq!(entities.len(), 6);
        assert_eq!(entities[3], "Rome");
    }

    #[test]
    fn test_entity_runs_are_maximal_by_default() {
        let entities = analyzer().entities("we flew to Paris, London and then Rome");
        assert_eq!(entities, vec!["Paris London".to_string(), "Rome".to_string()]);

        let entities = analyzer().entities("This is it. Okay then. Just Kidding Corp wins.");
        assert_eq!(
            entities,
            vec![
                "Just Kidding Corp".to_string(),
                "This".to_string(),
                "Okay".to_string()
            ]
        );
    }

    #[test]
    fn test_noise_filter_splits_runs_at_punctuation() {
        let entities = noise_filtering_analyzer().entities("we flew to Paris, London and then Rome");
        assert_eq!(
            entities,
            vec!["Paris".to_string(), "London".to_string(), "Rome".to_string()]
        );
    }

    #[test]
    fn test_noise_filter_drops_capitalized_common_words() {
        let entities =
            noise_filtering_analyzer().entities("This is it. Okay then. Just Kidding Corp wins.");
        assert_eq!(entities, vec!["Just Kidding Corp".to_string()]);
    }

    #[test]
    fn test_normalize_matches_topic_tokens() {
        let analyzer = analyzer();
        assert_eq!(analyzer.normalize("The Budget, um, Review!"), "the budget review");
        let topics = analyzer.topics("budget um review and budget review");
        assert_eq!(topics[0], "budget review");
    }

    #[test]
    fn test_single_letters_are_not_entities() {
        assert!(analyzer().entities("I said A is fine").is_empty());
    }
}
