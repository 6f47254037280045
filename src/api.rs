use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use metrics::counter;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::config::{ClassifierConfig, ServiceConfig};
use crate::error::ReviewError;
use crate::metrics::Metrics;
use crate::query::{self, CountryView, IngestAck, IngestRequest, ProductList, TimeSeriesView};
use crate::review::ProductEntry;
use crate::sentiment::{Classification, Classifier, LexiconClassifier};
use crate::store::ReviewStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ReviewStore>,
    pub classifier: Arc<dyn Classifier>,
    pub service: ServiceConfig,
}

impl AppState {
    pub fn new(
        store: Arc<ReviewStore>,
        classifier: Arc<dyn Classifier>,
        service: ServiceConfig,
    ) -> Self {
        Self {
            store,
            classifier,
            service,
        }
    }

    /// Fresh empty store, lexicon classifier from config files, switches from env.
    pub fn from_env() -> anyhow::Result<Self> {
        let cfg = ClassifierConfig::load_default()?;
        tracing::info!(
            target: "config",
            positive = cfg.positive_threshold,
            negative = cfg.negative_threshold,
            window = cfg.negation_window,
            "classifier config loaded"
        );
        Ok(Self::new(
            Arc::new(ReviewStore::new()),
            Arc::new(LexiconClassifier::new(cfg)),
            ServiceConfig::from_env(),
        ))
    }
}

pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/predict", post(predict))
        .route("/predict_batch", post(predict_batch))
        .route("/ingest_results", post(ingest_results))
        .route("/products", get(list_products))
        .route("/product/{asin}", get(get_product))
        .route("/timeseries/{asin}", get(timeseries))
        .route("/country_sentiment/{asin}", get(country_sentiment));

    if state.service.debug_routes {
        if let Some(m) = Metrics::init() {
            app = app.merge(m.router::<AppState>());
        }
    }

    app.layer(CorsLayer::very_permissive()).with_state(state)
}

#[derive(Serialize)]
struct RootInfo {
    message: &'static str,
    endpoints: [&'static str; 4],
}

async fn root() -> Json<RootInfo> {
    Json(RootInfo {
        message: "Review sentiment API running.",
        endpoints: [
            "/products",
            "/product/{asin}",
            "/timeseries/{asin}",
            "/country_sentiment/{asin}",
        ],
    })
}

#[derive(Serialize)]
struct HealthResp {
    ok: bool,
}

async fn health() -> Json<HealthResp> {
    Json(HealthResp { ok: true })
}

#[derive(Deserialize)]
struct PredictReq {
    text: String,
}

#[derive(Deserialize)]
struct PredictBatchReq {
    texts: Vec<String>,
}

#[derive(Serialize)]
struct PredictBatchResp {
    results: Vec<Classification>,
}

async fn predict(
    State(state): State<AppState>,
    Json(body): Json<PredictReq>,
) -> Json<Classification> {
    counter!("predict_texts_total").increment(1);
    Json(state.classifier.classify(&body.text).await)
}

async fn predict_batch(
    State(state): State<AppState>,
    Json(body): Json<PredictBatchReq>,
) -> Result<Json<PredictBatchResp>, ReviewError> {
    let max = state.service.max_predict_batch;
    if body.texts.len() > max {
        return Err(ReviewError::BatchTooLarge {
            len: body.texts.len(),
            max,
        });
    }
    counter!("predict_texts_total").increment(body.texts.len() as u64);
    let results = state.classifier.classify_batch(&body.texts).await;
    tracing::debug!(
        target: "api",
        classifier = state.classifier.name(),
        n = results.len(),
        "predict batch"
    );
    Ok(Json(PredictBatchResp { results }))
}

async fn ingest_results(
    State(state): State<AppState>,
    Json(body): Json<IngestRequest>,
) -> Result<Json<IngestAck>, ReviewError> {
    query::ingest(&state.store, body).map(Json)
}

async fn list_products(State(state): State<AppState>) -> Json<ProductList> {
    Json(query::list_products(&state.store))
}

async fn get_product(
    State(state): State<AppState>,
    Path(asin): Path<String>,
) -> Result<Json<ProductEntry>, ReviewError> {
    query::get_product(&state.store, &asin).map(Json)
}

async fn timeseries(
    State(state): State<AppState>,
    Path(asin): Path<String>,
) -> Result<Json<TimeSeriesView>, ReviewError> {
    query::get_time_series(&state.store, &asin).map(Json)
}

async fn country_sentiment(
    State(state): State<AppState>,
    Path(asin): Path<String>,
) -> Result<Json<CountryView>, ReviewError> {
    query::get_country_breakdown(&state.store, &asin).map(Json)
}
