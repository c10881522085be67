use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use super::traits::RateProvider;

const BASE_URL: &str = "https://api.exchangerate-api.com/v4";

/// exchangerate-api.com provider for fiat exchange rates.
///
/// - **Free**: No API key for the `v4/latest` endpoint.
/// - **Endpoint**: `/latest/{base}` returns every rate against `base`.
pub struct ExchangeRateApiProvider {
    client: Client,
    base_url: String,
}

impl ExchangeRateApiProvider {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Point the provider at a different host (mirrors, local stubs).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for ExchangeRateApiProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── exchangerate-api response types ─────────────────────────────────

#[derive(Deserialize)]
struct LatestResponse {
    rates: HashMap<String, f64>,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl RateProvider for ExchangeRateApiProvider {
    fn name(&self) -> &str {
        "ExchangeRate-API"
    }

    async fn get_rate(&self, base: &str, quote: &str) -> Result<f64, CoreError> {
        let base = base.to_uppercase();
        let quote = quote.to_uppercase();

        // Same currency → rate is 1.0
        if base == quote {
            return Ok(1.0);
        }

        let url = format!("{}/latest/{base}", self.base_url);

        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(CoreError::Api {
                provider: self.name().into(),
                message: format!("HTTP {} for {base}/{quote}", resp.status()),
            });
        }

        let body: LatestResponse = resp.json().await.map_err(|e| CoreError::Api {
            provider: self.name().into(),
            message: format!("Failed to parse response for {base}/{quote}: {e}"),
        })?;

        body.rates.get(&quote).copied().ok_or_else(|| CoreError::Api {
            provider: self.name().into(),
            message: format!("No rate found for {base} → {quote}"),
        })
    }
}
