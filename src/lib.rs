// src/lib.rs
// Public library surface for integration tests, the demo binary and the Shuttle entrypoint.

pub mod aggregate;
pub mod api;
pub mod config;
pub mod dates;
pub mod error;
pub mod metrics;
pub mod query;
pub mod review;
pub mod sentiment;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::error::ReviewError;
pub use crate::review::{Asin, ProductEntry, ReviewRecord, SentimentLabel};
pub use crate::store::ReviewStore;

/// Build the full in-process app the same way the binary does.
pub fn app() -> anyhow::Result<axum::Router> {
    let state = AppState::from_env()?;
    Ok(router(state))
}
