//! query.rs — façade between the HTTP layer and the store/aggregator.
//!
//! Every function is stateless: it takes the shared [`ReviewStore`], runs the aggregation under
//! the store's read guard and returns a serializable view. Errors are [`ReviewError`]s, which the
//! API layer turns into 400/404 responses.

use metrics::{counter, gauge};
use serde::{Deserialize, Serialize};

use crate::aggregate::{self, CountryBreakdown, TimeSeries};
use crate::error::ReviewError;
use crate::review::{ProductEntry, ReviewRecord};
use crate::store::{ProductSummary, ReviewStore};

/// Payload posted by the scraper after classifying a page of reviews.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestRequest {
    pub asin: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub results: Vec<ReviewRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestAck {
    pub ok: bool,
    pub stored: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductList {
    pub products: Vec<ProductSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSeriesView {
    pub asin: String,
    #[serde(flatten)]
    pub series: TimeSeries,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryView {
    pub asin: String,
    #[serde(flatten)]
    pub breakdown: CountryBreakdown,
}

pub fn ingest(store: &ReviewStore, req: IngestRequest) -> Result<IngestAck, ReviewError> {
    counter!("ingest_requests_total").increment(1);
    match store.ingest(&req.asin, &req.title, req.results) {
        Ok(stored) => {
            counter!("reviews_ingested_total").increment(stored as u64);
            gauge!("products_tracked").set(store.len() as f64);
            Ok(IngestAck { ok: true, stored })
        }
        Err(e) => {
            counter!("ingest_rejected_total").increment(1);
            tracing::warn!(target: "api", error = %e, "ingest rejected");
            Err(e)
        }
    }
}

pub fn list_products(store: &ReviewStore) -> ProductList {
    ProductList {
        products: store.list(),
    }
}

pub fn get_product(store: &ReviewStore, asin: &str) -> Result<ProductEntry, ReviewError> {
    store.get(asin).inspect_err(not_found_metric)
}

pub fn get_time_series(store: &ReviewStore, asin: &str) -> Result<TimeSeriesView, ReviewError> {
    store
        .with_entry(asin, |e| TimeSeriesView {
            asin: e.asin.to_string(),
            series: aggregate::time_series(&e.results),
        })
        .inspect_err(not_found_metric)
}

pub fn get_country_breakdown(store: &ReviewStore, asin: &str) -> Result<CountryView, ReviewError> {
    store
        .with_entry(asin, |e| CountryView {
            asin: e.asin.to_string(),
            breakdown: aggregate::country_breakdown(&e.results),
        })
        .inspect_err(not_found_metric)
}

fn not_found_metric(e: &ReviewError) {
    if matches!(e, ReviewError::NotFound(_)) {
        counter!("query_not_found_total").increment(1);
    }
}
