//! review.rs — data model for classified reviews and the products they belong to.
//!
//! A product is keyed by its ASIN (10-character Amazon identifier). Each product carries an
//! append-only list of [`ReviewRecord`]s as submitted by the scraper, after classification.

use std::borrow::Borrow;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ReviewError;

/// Required length of a normalized ASIN.
pub const ASIN_LEN: usize = 10;

/// Normalized product identifier (trimmed + uppercased, exactly [`ASIN_LEN`] chars).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Asin(String);

impl Asin {
    /// Validate a raw identifier as received on ingestion.
    pub fn parse(raw: &str) -> Result<Self, ReviewError> {
        let norm = normalize_asin(raw);
        if norm.chars().count() != ASIN_LEN {
            return Err(ReviewError::InvalidIdentifier(raw.trim().to_string()));
        }
        Ok(Self(norm))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Lets `BTreeMap<Asin, _>` be queried with a plain `&str`.
impl Borrow<str> for Asin {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Asin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trim + uppercase. Lookups use this without the length rule.
pub fn normalize_asin(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Sentiment label of one review.
///
/// The classifier only emits the canonical three, but the ingestion payload is a free string,
/// so anything else is kept verbatim as `Other` and round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
    Other(String),
}

impl SentimentLabel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Positive => "POSITIVE",
            Self::Neutral => "NEUTRAL",
            Self::Negative => "NEGATIVE",
            Self::Other(s) => s.as_str(),
        }
    }

    pub fn is_canonical(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<&str> for SentimentLabel {
    fn from(s: &str) -> Self {
        match s {
            "POSITIVE" => Self::Positive,
            "NEUTRAL" => Self::Neutral,
            "NEGATIVE" => Self::Negative,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SentimentLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SentimentLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}

/// One classified review. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub sentiment: SentimentLabel,
    pub confidence: f64,
    pub text: String,
    /// Raw date string as scraped, e.g. "Reviewed in the United States on 5 August 2025".
    #[serde(default)]
    pub date: Option<String>,
    /// Raw country of origin as scraped.
    #[serde(default)]
    pub country: Option<String>,
}

impl ReviewRecord {
    /// Confidence is the magnitude of the classifier score; anything non-finite becomes 0.
    pub fn sanitized(mut self) -> Self {
        self.confidence = if self.confidence.is_finite() {
            self.confidence.abs()
        } else {
            0.0
        };
        self
    }
}

/// Stored state of one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductEntry {
    pub asin: Asin,
    pub title: String,
    pub results: Vec<ReviewRecord>,
    pub updated_at: DateTime<Utc>,
}
