use serde::{Deserialize, Serialize};

use super::holding::{Holding, InstrumentKind};

/// Coarse risk bucket used for holdings, sectors and overall concentration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

/// Portfolio-level aggregates. A pure function of the holdings array,
/// recomputed on every pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    /// Currency used for all monetary values
    pub currency: String,

    /// Σ quantity × average price
    pub total_investment: f64,

    /// Σ quantity × last price
    pub current_value: f64,

    /// Σ source-reported P&L
    pub total_pnl: f64,

    /// total_pnl / total_investment × 100
    pub total_pnl_pct: f64,

    /// Σ day change × quantity
    pub day_change: f64,

    /// day_change / current_value × 100
    pub day_change_pct: f64,

    pub number_of_holdings: usize,

    /// Distinct sector / category labels
    pub number_of_sectors: usize,

    /// Herfindahl-Hirschman index of holding weights, in percent (0..=100)
    pub hhi: f64,

    /// 1 / HHI as a fraction: number of equal-weighted positions the
    /// portfolio behaves like
    pub effective_holdings: f64,

    /// Sum of the 5 largest weights
    pub top5_concentration: f64,

    /// Sum of the 10 largest weights
    pub top10_concentration: f64,

    /// Weight of the heaviest sector / category
    pub max_sector_weight: f64,

    pub concentration_risk: RiskLevel,

    /// 0..=100, higher is better diversified
    pub diversification_score: f64,

    /// 0..=100, higher is riskier
    pub overall_risk_score: f64,

    /// Largest holding by current value
    pub largest_holding: Option<HoldingMetrics>,

    /// Best price return
    pub top_gainer: Option<HoldingMetrics>,

    /// Worst price return
    pub top_loser: Option<HoldingMetrics>,

    /// Per-holding derived fields, in input order
    pub holdings: Vec<HoldingMetrics>,

    /// Per-label rollups, largest current value first
    pub sectors: Vec<SectorSummary>,

    /// Equity vs fund split
    pub equity: KindBreakdown,
    pub funds: KindBreakdown,
}

/// A holding together with the values derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingMetrics {
    pub holding: Holding,

    pub investment: f64,

    pub current_value: f64,

    /// P&L / investment × 100
    pub return_pct: f64,

    /// (last − average) / average × 100
    pub price_return_pct: f64,

    /// current value / portfolio current value × 100
    pub weight: f64,

    /// Share of the portfolio HHI contributed by this holding, in percent
    pub hhi_contribution: f64,

    pub risk_level: RiskLevel,

    /// Weight above the single-stock limit
    pub is_overweight: bool,
}

impl PortfolioMetrics {
    /// Holdings ordered by weight, largest first (stable for ties).
    pub fn ranked_by_weight(&self) -> Vec<&HoldingMetrics> {
        let mut ranked: Vec<&HoldingMetrics> = self.holdings.iter().collect();
        ranked.sort_by(|a, b| {
            b.weight
                .partial_cmp(&a.weight)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }

    pub fn sector(&self, name: &str) -> Option<&SectorSummary> {
        self.sectors.iter().find(|s| s.name == name)
    }
}

impl HoldingMetrics {
    pub fn symbol(&self) -> &str {
        &self.holding.symbol
    }

    pub fn label(&self) -> &'static str {
        self.holding.label()
    }

    pub fn pnl(&self) -> f64 {
        self.holding.pnl
    }
}

/// Rollup of every holding sharing one sector / category label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorSummary {
    pub name: String,
    pub count: usize,
    pub investment: f64,
    pub current_value: f64,
    pub pnl: f64,
    /// pnl / investment × 100
    pub pnl_pct: f64,
    /// Share of portfolio current value, in percent
    pub weight: f64,
    pub avg_holding_weight: f64,
    pub max_holding_weight: f64,
    pub risk_level: RiskLevel,
    /// Member symbols in input order
    pub symbols: Vec<String>,
}

/// Aggregates for one instrument kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KindBreakdown {
    pub kind: InstrumentKind,
    pub count: usize,
    pub investment: f64,
    pub current_value: f64,
    pub pnl: f64,
    /// Share of portfolio current value, in percent
    pub weight: f64,
}
