use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

/// Process-wide Prometheus handle. The recorder can be installed only once per process,
/// while routers get built many times (tests build one per case).
static HANDLE: OnceCell<Option<PrometheusHandle>> = OnceCell::new();

#[derive(Clone)]
pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder (first call only) and describe the service series.
    /// Returns `None` when another recorder already owns the global slot.
    pub fn init() -> Option<Self> {
        HANDLE
            .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
                Ok(handle) => {
                    describe_series();
                    Some(handle)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "prometheus: recorder not installed");
                    None
                }
            })
            .clone()
            .map(|handle| Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router<S>(&self) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

fn describe_series() {
    describe_counter!("ingest_requests_total", "Ingestion calls received.");
    describe_counter!(
        "ingest_rejected_total",
        "Ingestion calls rejected (invalid ASIN)."
    );
    describe_counter!("reviews_ingested_total", "Review records appended to the store.");
    describe_gauge!("products_tracked", "Distinct products in the store.");
    describe_counter!("predict_texts_total", "Texts classified via /predict*.");
    describe_counter!(
        "query_not_found_total",
        "Read queries for an unknown ASIN."
    );
}
