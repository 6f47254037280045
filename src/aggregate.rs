//! # Aggregator
//! Read-only views over a product's review sequence:
//!
//! - [`summarize`]: POSITIVE/NEUTRAL/NEGATIVE tally (+ mean confidence) for the product list.
//! - [`time_series`]: counts per normalized review date, chronologically ordered.
//! - [`country_breakdown`]: counts per country of origin, in first-seen order.
//!
//! Buckets keep the canonical three labels as fixed columns. Any other label is tallied in a
//! per-bucket map that only ever contains labels seen in that bucket, and is exposed in the
//! outputs as a single `other` column.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::dates;
use crate::review::{ReviewRecord, SentimentLabel};

/// Bucket for reviews without a country.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// Canonical label counts, serialized with the labels as keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    #[serde(rename = "POSITIVE")]
    pub positive: usize,
    #[serde(rename = "NEUTRAL")]
    pub neutral: usize,
    #[serde(rename = "NEGATIVE")]
    pub negative: usize,
}

impl SentimentCounts {
    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }
}

/// Product-level summary used by the product list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SentimentSummary {
    pub counts: SentimentCounts,
    /// Mean stored confidence over all reviews (0.0 when there are none).
    pub avg_confidence: f64,
}

/// Tally of canonical labels; unrecognized labels do not count here.
pub fn count_sentiments(records: &[ReviewRecord]) -> SentimentCounts {
    let mut c = SentimentCounts::default();
    for r in records {
        match r.sentiment {
            SentimentLabel::Positive => c.positive += 1,
            SentimentLabel::Neutral => c.neutral += 1,
            SentimentLabel::Negative => c.negative += 1,
            SentimentLabel::Other(_) => {}
        }
    }
    c
}

pub fn summarize(records: &[ReviewRecord]) -> SentimentSummary {
    let avg_confidence = if records.is_empty() {
        0.0
    } else {
        records.iter().map(|r| r.confidence).sum::<f64>() / records.len() as f64
    };
    SentimentSummary {
        counts: count_sentiments(records),
        avg_confidence,
    }
}

/// Per-bucket label tally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTally {
    pub counts: SentimentCounts,
    /// Unrecognized labels seen in this bucket, and only those.
    pub other: BTreeMap<String, usize>,
}

impl LabelTally {
    pub fn record(&mut self, label: &SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.counts.positive += 1,
            SentimentLabel::Neutral => self.counts.neutral += 1,
            SentimentLabel::Negative => self.counts.negative += 1,
            SentimentLabel::Other(s) => *self.other.entry(s.clone()).or_insert(0) += 1,
        }
    }

    pub fn count(&self, label: &SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.counts.positive,
            SentimentLabel::Neutral => self.counts.neutral,
            SentimentLabel::Negative => self.counts.negative,
            SentimentLabel::Other(s) => self.other.get(s).copied().unwrap_or(0),
        }
    }

    pub fn other_total(&self) -> usize {
        self.other.values().sum()
    }

    pub fn total(&self) -> usize {
        self.counts.total() + self.other_total()
    }
}

/// One grouping bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub key: String,
    pub tally: LabelTally,
}

/// Group records by `key_of`, keeping buckets in first-seen order.
fn group_by<F>(records: &[ReviewRecord], key_of: F) -> Vec<Bucket>
where
    F: Fn(&ReviewRecord) -> String,
{
    let mut buckets: Vec<Bucket> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for r in records {
        let key = key_of(r);
        let i = match index.get(&key) {
            Some(&i) => i,
            None => {
                index.insert(key.clone(), buckets.len());
                buckets.push(Bucket {
                    key,
                    tally: LabelTally::default(),
                });
                buckets.len() - 1
            }
        };
        buckets[i].tally.record(&r.sentiment);
    }
    buckets
}

/// Buckets by normalized date, ordered via [`dates::compare_buckets`].
pub fn date_buckets(records: &[ReviewRecord]) -> Vec<Bucket> {
    let mut buckets = group_by(records, |r| dates::normalize_opt(r.date.as_deref()));
    // stable sort; keys are unique so the order is fully determined
    buckets.sort_by(|a, b| dates::compare_buckets(&a.key, &b.key));
    buckets
}

/// Buckets by country of origin in first-seen order. Blank counts as missing.
pub fn country_buckets(records: &[ReviewRecord]) -> Vec<Bucket> {
    group_by(records, |r| match r.country.as_deref() {
        Some(c) if !c.trim().is_empty() => c.to_string(),
        _ => UNKNOWN_COUNTRY.to_string(),
    })
}

/// Count columns aligned to a key sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeriesColumns {
    pub positive: Vec<usize>,
    pub neutral: Vec<usize>,
    pub negative: Vec<usize>,
    /// Sum of unrecognized labels per bucket.
    pub other: Vec<usize>,
}

impl SeriesColumns {
    fn from_buckets(buckets: &[Bucket]) -> Self {
        let mut cols = Self::default();
        for b in buckets {
            cols.positive.push(b.tally.counts.positive);
            cols.neutral.push(b.tally.counts.neutral);
            cols.negative.push(b.tally.counts.negative);
            cols.other.push(b.tally.other_total());
        }
        cols
    }

    /// Grand total over all columns.
    pub fn total(&self) -> usize {
        [&self.positive, &self.neutral, &self.negative, &self.other]
            .iter()
            .map(|col| col.iter().sum::<usize>())
            .sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimeSeries {
    pub labels: Vec<String>,
    #[serde(flatten)]
    pub columns: SeriesColumns,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CountryBreakdown {
    pub countries: Vec<String>,
    #[serde(flatten)]
    pub columns: SeriesColumns,
}

pub fn time_series(records: &[ReviewRecord]) -> TimeSeries {
    let buckets = date_buckets(records);
    TimeSeries {
        columns: SeriesColumns::from_buckets(&buckets),
        labels: buckets.into_iter().map(|b| b.key).collect(),
    }
}

pub fn country_breakdown(records: &[ReviewRecord]) -> CountryBreakdown {
    let buckets = country_buckets(records);
    CountryBreakdown {
        columns: SeriesColumns::from_buckets(&buckets),
        countries: buckets.into_iter().map(|b| b.key).collect(),
    }
}
