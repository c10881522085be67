use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::analytics::PortfolioMetrics;
use super::fx::FxRate;
use super::holding::Holding;
use super::insight::Insight;

/// Result of one analysis pass: normalized holdings plus everything derived
/// from them. Each refresh produces a fresh snapshot; nothing is updated in
/// place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// When the pass ran
    pub generated_at: DateTime<Utc>,

    /// Rate applied to foreign-currency records
    pub fx: FxRate,

    pub holdings: Vec<Holding>,

    pub metrics: PortfolioMetrics,

    /// Sorted by impact, high first
    pub insights: Vec<Insight>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    /// Find a holding by symbol (case-insensitive).
    pub fn holding(&self, symbol: &str) -> Option<&Holding> {
        let wanted = symbol.trim();
        self.holdings
            .iter()
            .find(|h| h.symbol.eq_ignore_ascii_case(wanted))
    }
}
