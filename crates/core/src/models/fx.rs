use serde::{Deserialize, Serialize};

/// Where an exchange rate came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateSource {
    /// Fetched from a rate provider during this refresh
    Live { provider: String },
    /// The configured fallback constant; the live fetch failed or was unavailable
    Fallback,
}

/// Conversion rate from a foreign currency into the home currency.
///
/// `rate` is home units per one foreign unit (e.g., 87.5 INR per USD).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxRate {
    /// Foreign currency code ("USD")
    pub from: String,
    /// Home currency code ("INR")
    pub to: String,
    pub rate: f64,
    pub source: RateSource,
}

impl FxRate {
    pub fn live(from: &str, to: &str, rate: f64, provider: impl Into<String>) -> Self {
        Self {
            from: from.to_uppercase(),
            to: to.to_uppercase(),
            rate,
            source: RateSource::Live {
                provider: provider.into(),
            },
        }
    }

    pub fn fallback(from: &str, to: &str, rate: f64) -> Self {
        Self {
            from: from.to_uppercase(),
            to: to.to_uppercase(),
            rate,
            source: RateSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == RateSource::Fallback
    }

    /// Convert an amount in the foreign currency to the home currency.
    pub fn convert(&self, amount: f64) -> f64 {
        amount * self.rate
    }
}
