use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::classification::Sector;

/// Rate used when the live exchange-rate lookup fails (home units per
/// foreign unit, INR per USD by default).
pub const DEFAULT_FALLBACK_FX_RATE: f64 = 87.5;

// Credential names in `Settings::credentials`
pub const KITE_API_KEY: &str = "kite_api_key";
pub const KITE_API_SECRET: &str = "kite_api_secret";
pub const KITE_ACCESS_TOKEN: &str = "kite_access_token";
pub const GEMINI_API_KEY: &str = "gemini_api_key";

/// User-configurable settings, stored as JSON next to the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Currency every monetary value is converted into (e.g., "INR").
    pub home_currency: String,

    /// Currency of the overseas holdings sheet (e.g., "USD").
    pub foreign_currency: String,

    /// Explicit fallback for the foreign → home rate. Used, with a warning,
    /// whenever the live rate cannot be fetched.
    pub fallback_fx_rate: f64,

    /// Path of the overseas holdings CSV export, if any.
    pub foreign_holdings_path: Option<String>,

    /// Directory holding one markdown file per saved analysis.
    pub history_dir: String,

    /// Model name passed to the LLM provider.
    pub llm_model: String,

    /// Credentials keyed by name ("kite_api_key", "kite_api_secret",
    /// "kite_access_token", "gemini_api_key").
    pub credentials: HashMap<String, String>,

    /// Extra symbol → sector entries layered over the built-in table.
    pub sector_overrides: HashMap<String, Sector>,

    /// Insight and scoring thresholds.
    pub thresholds: Thresholds,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            home_currency: "INR".to_string(),
            foreign_currency: "USD".to_string(),
            fallback_fx_rate: DEFAULT_FALLBACK_FX_RATE,
            foreign_holdings_path: None,
            history_dir: "public/analyses".to_string(),
            llm_model: "gemini-2.0-flash".to_string(),
            credentials: HashMap::new(),
            sector_overrides: HashMap::new(),
            thresholds: Thresholds::default(),
        }
    }
}

impl Settings {
    /// Look up a non-empty credential.
    pub fn credential(&self, name: &str) -> Option<&str> {
        self.credentials
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}

/// Thresholds for the insight rules and the diversification score.
///
/// Weights and returns are in percent; values and losses are in home
/// currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// A holding above this weight is overweight.
    pub overweight_weight_pct: f64,

    /// Minimum return for a profit-booking candidate.
    pub profit_booking_return_pct: f64,
    /// Minimum current value for a profit-booking candidate.
    pub profit_booking_min_value: f64,

    /// Return below which a holding is an underperformer.
    pub underperformer_return_pct: f64,

    /// Loss beyond which a holding is a tax-loss candidate.
    pub tax_loss_min_loss: f64,
    /// Assumed tax rate for the illustrative offset.
    pub tax_rate: f64,

    /// A sector above this weight is concentrated.
    pub sector_concentration_pct: f64,

    /// Value below which a position counts as small.
    pub small_position_value: f64,
    /// Weight below which a position counts as small.
    pub small_position_weight_pct: f64,
    /// The consolidation insight fires only above this many small positions.
    pub small_position_min_count: usize,

    /// Best sector is surfaced above this return.
    pub best_sector_return_pct: f64,
    /// Worst sector is surfaced below this return.
    pub worst_sector_return_pct: f64,

    /// Share of profitable holdings at or above which the portfolio is healthy.
    pub healthy_profitable_pct: f64,
    /// Share of profitable holdings below which the portfolio is a concern.
    pub concern_profitable_pct: f64,

    /// Average deviation from equal weight that triggers rebalancing.
    pub rebalance_avg_deviation_pct: f64,

    /// Momentum band (exclusive bounds).
    pub momentum_min_return_pct: f64,
    pub momentum_max_return_pct: f64,
    /// Momentum fires with at least this many holdings in the band.
    pub momentum_min_count: usize,

    /// Holdings attached to an insight.
    pub top_k: usize,
    /// Holdings attached to a sector performance insight.
    pub sector_top_k: usize,

    /// Sector weight above which the diversification score is penalized.
    pub diversification_sector_limit_pct: f64,
    /// Points subtracted from the diversification score for that breach.
    pub diversification_sector_penalty: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            overweight_weight_pct: 12.0,
            profit_booking_return_pct: 50.0,
            profit_booking_min_value: 10_000.0,
            underperformer_return_pct: -20.0,
            tax_loss_min_loss: 5_000.0,
            tax_rate: 0.15,
            sector_concentration_pct: 30.0,
            small_position_value: 5_000.0,
            small_position_weight_pct: 1.0,
            small_position_min_count: 5,
            best_sector_return_pct: 20.0,
            worst_sector_return_pct: -10.0,
            healthy_profitable_pct: 70.0,
            concern_profitable_pct: 40.0,
            rebalance_avg_deviation_pct: 5.0,
            momentum_min_return_pct: 30.0,
            momentum_max_return_pct: 80.0,
            momentum_min_count: 3,
            top_k: 5,
            sector_top_k: 3,
            diversification_sector_limit_pct: 30.0,
            diversification_sector_penalty: 20.0,
        }
    }
}
