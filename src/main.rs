//! Review Sentiment Service — Binary Entrypoint
//! Boots the Axum HTTP server with an empty review store and the lexicon classifier.

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact tracing logs. `RUST_LOG` overrides the default filter.
/// The hosting runtime may already own the global subscriber; that is fine.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("review_sentiment_api=info,warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let state = review_sentiment_api::AppState::from_env()
        .map_err(|e| shuttle_runtime::Error::Custom(e.context("building app state")))?;
    tracing::info!(
        debug_routes = state.service.debug_routes,
        max_predict_batch = state.service.max_predict_batch,
        "review store ready"
    );

    let router = review_sentiment_api::router(state);
    Ok(router.into())
}
