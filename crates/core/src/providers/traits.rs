use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::raw::RawRecord;

/// Source of live exchange rates.
///
/// Failures are never fatal: the currency service falls back to the
/// configured constant and marks the rate accordingly.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait RateProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Units of `quote` per one unit of `base`.
    async fn get_rate(&self, base: &str, quote: &str) -> Result<f64, CoreError>;
}

/// A collaborator that delivers raw holding records: a broker feed, an
/// exported spreadsheet, a fixture in tests.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait HoldingsSource: Send + Sync {
    fn name(&self) -> &str;

    /// A failing required source aborts the refresh; a failing optional
    /// source is logged and skipped.
    fn required(&self) -> bool {
        true
    }

    async fn fetch(&self) -> Result<Vec<RawRecord>, CoreError>;
}

/// Large-language-model endpoint that turns a prompt into markdown prose.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait AnalysisModel: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, CoreError>;
}
