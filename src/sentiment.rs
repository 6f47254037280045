//! sentiment.rs — classification adapter used by `/predict` and `/predict_batch`.
//!
//! The store does not care where labels come from; the scraper may classify with anything.
//! [`LexiconClassifier`] is the bundled implementation: a word-valence lexicon with short-range
//! negation, squashed into a compound score in (-1, 1).

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::ClassifierConfig;
use crate::review::SentimentLabel;

static LEXICON: Lazy<HashMap<String, i32>> = Lazy::new(|| {
    let raw = include_str!("../sentiment_lexicon.json");
    serde_json::from_str::<HashMap<String, i32>>(raw).expect("valid sentiment lexicon")
});

/// Normalization constant for the compound score.
const ALPHA: f64 = 15.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub sentiment: SentimentLabel,
    pub confidence: f64,
}

/// "Given text, return a label and a confidence."
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, text: &str) -> Classification;
    fn name(&self) -> &'static str;

    async fn classify_batch(&self, texts: &[String]) -> Vec<Classification> {
        let mut out = Vec::with_capacity(texts.len());
        for t in texts {
            out.push(self.classify(t).await);
        }
        out
    }
}

#[derive(Debug, Clone, Default)]
pub struct LexiconClassifier {
    cfg: ClassifierConfig,
}

impl LexiconClassifier {
    pub fn new(cfg: ClassifierConfig) -> Self {
        Self {
            cfg: cfg.sanitized(),
        }
    }

    #[inline]
    fn word_score(&self, w: &str) -> i32 {
        *LEXICON.get(w).unwrap_or(&0)
    }

    /// Summed valence; a negator within the configured window flips a word's sign.
    pub fn raw_score(&self, text: &str) -> i32 {
        let tokens: Vec<String> = tokenize(text).collect();
        let window = self.cfg.negation_window;
        let mut score: i32 = 0;

        for (i, w) in tokens.iter().enumerate() {
            let base = self.word_score(w);
            if base == 0 {
                continue;
            }
            let negated = (1..=window).any(|k| i >= k && is_negator(tokens[i - k].as_str()));
            score += if negated { -base } else { base };
        }
        score
    }

    /// `s / sqrt(s² + 15)`, so 0 stays 0 and the result never reaches ±1.
    pub fn compound(&self, text: &str) -> f64 {
        let s = f64::from(self.raw_score(text));
        if s == 0.0 {
            return 0.0;
        }
        s / (s * s + ALPHA).sqrt()
    }

    pub fn classify_text(&self, text: &str) -> Classification {
        let compound = self.compound(text);
        let sentiment = if compound >= self.cfg.positive_threshold {
            SentimentLabel::Positive
        } else if compound <= self.cfg.negative_threshold {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };
        Classification {
            sentiment,
            confidence: compound.abs(),
        }
    }
}

#[async_trait]
impl Classifier for LexiconClassifier {
    async fn classify(&self, text: &str) -> Classification {
        self.classify_text(text)
    }

    fn name(&self) -> &'static str {
        "lexicon"
    }
}

/// Lower-cased word tokens; apostrophes stay inside words so "isn't" survives.
fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '\u{2019}'))
        .map(|t| t.trim_matches(|c| c == '\'' || c == '\u{2019}'))
        .filter(|t| !t.is_empty())
        .map(|t| t.replace('\u{2019}', "'").to_lowercase())
}

fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not"
            | "no"
            | "never"
            | "isn't"
            | "wasn't"
            | "aren't"
            | "won't"
            | "can't"
            | "cannot"
            | "don't"
            | "doesn't"
            | "didn't"
            | "without"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clf() -> LexiconClassifier {
        LexiconClassifier::new(ClassifierConfig::default())
    }

    #[test]
    fn positive_negative_neutral() {
        let c = clf();
        assert_eq!(
            c.classify_text("Great kettle, I love it").sentiment,
            SentimentLabel::Positive
        );
        assert_eq!(
            c.classify_text("Arrived broken, total junk").sentiment,
            SentimentLabel::Negative
        );
        let n = c.classify_text("It is a kettle.");
        assert_eq!(n.sentiment, SentimentLabel::Neutral);
        assert_eq!(n.confidence, 0.0);
    }

    #[test]
    fn negation_flips_within_window() {
        let c = clf();
        assert!(c.raw_score("not good") < 0);
        assert!(c.raw_score("doesn't feel good at all") < 0);
        // four tokens away: outside the default window
        assert!(c.raw_score("not that it was very good") > 0);
    }

    #[test]
    fn compound_is_bounded() {
        let c = clf();
        let v = c.compound(&"amazing ".repeat(50));
        assert!(v > 0.99 && v < 1.0);
        let n = c.compound(&"terrible ".repeat(50));
        assert!(n < -0.99 && n > -1.0);
    }

    #[tokio::test]
    async fn batch_keeps_order() {
        let c = clf();
        let out = c
            .classify_batch(&["love".to_string(), "awful".to_string()])
            .await;
        assert_eq!(out[0].sentiment, SentimentLabel::Positive);
        assert_eq!(out[1].sentiment, SentimentLabel::Negative);
    }
}
