// src/config/mod.rs
pub mod classifier;

pub use classifier::ClassifierConfig;

pub const ENV_DEBUG_ROUTES: &str = "DEBUG_ROUTES";
pub const ENV_MAX_PREDICT_BATCH: &str = "MAX_PREDICT_BATCH";

const DEFAULT_MAX_PREDICT_BATCH: usize = 256;

/// Process-level switches read from the environment (after `.env` is loaded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Mount `/metrics`.
    pub debug_routes: bool,
    /// Upper bound on texts per `/predict_batch` call.
    pub max_predict_batch: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            debug_routes: false,
            max_predict_batch: DEFAULT_MAX_PREDICT_BATCH,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        let debug_routes = std::env::var(ENV_DEBUG_ROUTES)
            .ok()
            .is_some_and(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "yes"));

        let max_predict_batch = std::env::var(ENV_MAX_PREDICT_BATCH)
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_MAX_PREDICT_BATCH);

        Self {
            debug_routes,
            max_predict_batch,
        }
    }
}
