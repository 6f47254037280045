//! store.rs — in-memory review store keyed by ASIN.
//!
//! One coarse `RwLock` guards the whole map. An ingestion batch is appended under a single write
//! guard, so readers never observe half a batch. Entries are created on first ingestion and are
//! never removed; the store lives as long as the process.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::aggregate::{self, SentimentCounts};
use crate::error::ReviewError;
use crate::review::{normalize_asin, Asin, ProductEntry, ReviewRecord};

/// Row of the product list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub asin: Asin,
    pub title: String,
    pub updated_at: DateTime<Utc>,
    pub review_count: usize,
    pub counts: SentimentCounts,
    pub avg_confidence: f64,
}

impl ProductSummary {
    fn of(entry: &ProductEntry) -> Self {
        let summary = aggregate::summarize(&entry.results);
        Self {
            asin: entry.asin.clone(),
            title: entry.title.clone(),
            updated_at: entry.updated_at,
            review_count: entry.results.len(),
            counts: summary.counts,
            avg_confidence: summary.avg_confidence,
        }
    }
}

#[derive(Debug, Default)]
pub struct ReviewStore {
    inner: RwLock<BTreeMap<Asin, ProductEntry>>,
}

impl ReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Writers finish every mutation before releasing the guard, so a poisoned map is still
    // consistent and can be used as is.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<Asin, ProductEntry>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<Asin, ProductEntry>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `records` to the product, creating it if needed. Returns how many were stored.
    ///
    /// The title is overwritten only by a non-empty one. Fails with
    /// [`ReviewError::InvalidIdentifier`] before touching the map when the ASIN is malformed.
    pub fn ingest(
        &self,
        asin: &str,
        title: &str,
        records: Vec<ReviewRecord>,
    ) -> Result<usize, ReviewError> {
        let asin = Asin::parse(asin)?;
        let stored = records.len();
        let now = Utc::now();

        let mut map = self.write();
        let created = !map.contains_key(&asin);
        let entry = map.entry(asin.clone()).or_insert_with(|| ProductEntry {
            asin: asin.clone(),
            title: title.to_string(),
            results: Vec::new(),
            updated_at: now,
        });
        entry
            .results
            .extend(records.into_iter().map(ReviewRecord::sanitized));
        if !title.is_empty() {
            entry.title = title.to_string();
        }
        entry.updated_at = now;
        let total = entry.results.len();
        drop(map);

        info!(target: "store", %asin, stored, total, created, "ingested reviews");
        Ok(stored)
    }

    /// Snapshot of one product.
    pub fn get(&self, asin: &str) -> Result<ProductEntry, ReviewError> {
        self.with_entry(asin, ProductEntry::clone)
    }

    /// Run `f` against one product under the read guard (no clone of the review list).
    pub fn with_entry<T, F>(&self, asin: &str, f: F) -> Result<T, ReviewError>
    where
        F: FnOnce(&ProductEntry) -> T,
    {
        let key = normalize_asin(asin);
        let map = self.read();
        match map.get(key.as_str()) {
            Some(entry) => Ok(f(entry)),
            None => {
                debug!(target: "store", asin = %key, "lookup miss");
                Err(ReviewError::NotFound(key))
            }
        }
    }

    /// Every product with its sentiment summary, ordered by ASIN.
    pub fn list(&self) -> Vec<ProductSummary> {
        self.read().values().map(ProductSummary::of).collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::SentimentLabel;

    fn rec(label: SentimentLabel) -> ReviewRecord {
        ReviewRecord {
            sentiment: label,
            confidence: 0.8,
            text: "great".into(),
            date: None,
            country: None,
        }
    }

    #[test]
    fn ingest_creates_then_appends() {
        let s = ReviewStore::new();
        assert_eq!(
            s.ingest(
                "b0testxx01",
                "Kettle",
                vec![rec(SentimentLabel::Positive)]
            )
            .unwrap(),
            1
        );
        assert_eq!(
            s.ingest(
                " B0TESTXX01 ",
                "",
                vec![
                    rec(SentimentLabel::Negative),
                    rec(SentimentLabel::Neutral)
                ]
            )
            .unwrap(),
            2
        );

        let e = s.get("B0TESTXX01").unwrap();
        assert_eq!(e.title, "Kettle", "empty title must not overwrite");
        assert_eq!(e.results.len(), 3);
        assert_eq!(e.results[0].sentiment, SentimentLabel::Positive);
        assert_eq!(e.results[2].sentiment, SentimentLabel::Neutral);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn non_empty_title_wins() {
        let s = ReviewStore::new();
        s.ingest("B0TESTXX01", "Old", vec![]).unwrap();
        s.ingest("B0TESTXX01", "New", vec![]).unwrap();
        assert_eq!(s.get("b0testxx01").unwrap().title, "New");
    }

    #[test]
    fn invalid_asin_leaves_store_untouched() {
        let s = ReviewStore::new();
        let err = s
            .ingest("TOOSHORT", "x", vec![rec(SentimentLabel::Positive)])
            .unwrap_err();
        assert!(matches!(err, ReviewError::InvalidIdentifier(_)));
        assert!(s.is_empty());
        assert!(s.list().is_empty());
    }

    #[test]
    fn updated_at_moves_forward() {
        let s = ReviewStore::new();
        s.ingest("B0TESTXX01", "t", vec![]).unwrap();
        let first = s.get("B0TESTXX01").unwrap().updated_at;
        s.ingest("B0TESTXX01", "t", vec![rec(SentimentLabel::Positive)])
            .unwrap();
        let second = s.get("B0TESTXX01").unwrap().updated_at;
        assert!(second >= first);
    }

    #[test]
    fn get_unknown_is_not_found() {
        let s = ReviewStore::new();
        assert_eq!(
            s.get(" b0nothere1 ").unwrap_err(),
            ReviewError::NotFound("B0NOTHERE1".into())
        );
    }

    #[test]
    fn list_reports_counts() {
        let s = ReviewStore::new();
        s.ingest(
            "B0TESTXX02",
            "B",
            vec![rec(SentimentLabel::Negative), rec(SentimentLabel::Other("X".into()))],
        )
        .unwrap();
        s.ingest("B0TESTXX01", "A", vec![rec(SentimentLabel::Positive)])
            .unwrap();

        let rows = s.list();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].asin.as_str(), "B0TESTXX01");
        assert_eq!(rows[1].review_count, 2);
        assert_eq!(rows[1].counts.negative, 1);
        assert_eq!(rows[1].counts.total(), 1);
    }
}
