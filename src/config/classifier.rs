// src/config/classifier.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_PATH: &str = "CLASSIFIER_CONFIG_PATH";

fn default_positive_threshold() -> f64 {
    0.06
}
fn default_negative_threshold() -> f64 {
    -0.04
}
fn default_negation_window() -> usize {
    3
}

/// Thresholds for the lexicon classifier.
///
/// compound >= `positive_threshold` → POSITIVE, compound <= `negative_threshold` → NEGATIVE,
/// anything in between → NEUTRAL.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_positive_threshold")]
    pub positive_threshold: f64,
    #[serde(default = "default_negative_threshold")]
    pub negative_threshold: f64,
    /// How many preceding tokens a negator reaches (0 disables negation).
    #[serde(default = "default_negation_window")]
    pub negation_window: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            positive_threshold: default_positive_threshold(),
            negative_threshold: default_negative_threshold(),
            negation_window: default_negation_window(),
        }
    }
}

impl ClassifierConfig {
    /// Load from an explicit path. Supports TOML or JSON.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading classifier config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        parse_config(&content, ext.as_str()).map(Self::sanitized)
    }

    /// Load using env var + fallbacks:
    /// 1) $CLASSIFIER_CONFIG_PATH
    /// 2) config/classifier.toml
    /// 3) config/classifier.json
    /// 4) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            } else {
                return Err(anyhow!("{ENV_PATH} points to non-existent path"));
            }
        }
        for candidate in ["config/classifier.toml", "config/classifier.json"] {
            let p = PathBuf::from(candidate);
            if p.exists() {
                return Self::load_from(&p);
            }
        }
        Ok(Self::default())
    }

    /// Clamp thresholds into [-1, 1] and keep the neutral band well-formed.
    pub fn sanitized(mut self) -> Self {
        if !self.positive_threshold.is_finite() {
            self.positive_threshold = default_positive_threshold();
        }
        if !self.negative_threshold.is_finite() {
            self.negative_threshold = default_negative_threshold();
        }
        self.positive_threshold = self.positive_threshold.clamp(-1.0, 1.0);
        self.negative_threshold = self.negative_threshold.clamp(-1.0, 1.0);
        if self.negative_threshold > self.positive_threshold {
            std::mem::swap(&mut self.negative_threshold, &mut self.positive_threshold);
        }
        self.negation_window = self.negation_window.min(8);
        self
    }
}

fn parse_config(s: &str, hint_ext: &str) -> Result<ClassifierConfig> {
    if hint_ext == "json" {
        return serde_json::from_str(s).context("parsing classifier config as JSON");
    }
    if let Ok(v) = toml::from_str::<ClassifierConfig>(s) {
        return Ok(v);
    }
    serde_json::from_str(s).map_err(|_| anyhow!("unsupported classifier config format"))
}
