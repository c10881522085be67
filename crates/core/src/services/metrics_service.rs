use std::collections::HashMap;

use crate::models::analytics::{
    HoldingMetrics, KindBreakdown, PortfolioMetrics, RiskLevel, SectorSummary,
};
use crate::models::holding::{Holding, InstrumentKind};
use crate::models::settings::Thresholds;

/// Weight above which a single holding is high risk.
const HOLDING_HIGH_RISK_WEIGHT: f64 = 15.0;
/// Weight above which a single holding is medium risk.
const HOLDING_MEDIUM_RISK_WEIGHT: f64 = 8.0;
/// Single-stock limit used for the overweight flag.
const HOLDING_WEIGHT_LIMIT: f64 = 10.0;

const SECTOR_HIGH_RISK_WEIGHT: f64 = 30.0;
const SECTOR_MEDIUM_RISK_WEIGHT: f64 = 20.0;

const HHI_HIGH_RISK: f64 = 30.0;
const HHI_MEDIUM_RISK: f64 = 15.0;

/// Overall risk score add-ons.
const RISK_SECTOR_LIMIT: f64 = 40.0;
const RISK_SECTOR_PENALTY: f64 = 15.0;
const RISK_TOP5_LIMIT: f64 = 60.0;
const RISK_TOP5_PENALTY: f64 = 10.0;

/// Computes [`PortfolioMetrics`] from a normalized holdings array.
///
/// Pure: no I/O, inputs are never mutated, and every division by a
/// possibly-zero denominator yields 0 instead of NaN or infinity.
pub struct MetricsService {
    thresholds: Thresholds,
}

impl MetricsService {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Full metrics pass over `holdings`, all values in `currency`.
    pub fn compute(&self, holdings: &[Holding], currency: &str) -> PortfolioMetrics {
        let total_investment: f64 = holdings.iter().map(Holding::investment).sum();
        let current_value: f64 = holdings.iter().map(Holding::current_value).sum();
        let total_pnl: f64 = holdings.iter().map(|h| h.pnl).sum();
        let day_change: f64 = holdings.iter().map(Holding::day_change_value).sum();

        let weights = holding_weights(holdings);
        let hhi = herfindahl(&weights);
        let hhi_fraction = hhi / 100.0;

        let per_holding: Vec<HoldingMetrics> = holdings
            .iter()
            .zip(&weights)
            .map(|(holding, &weight)| holding_metrics(holding, weight, hhi_fraction))
            .collect();

        let sectors = sector_rollups(&per_holding, current_value);
        let max_sector_weight = sectors.iter().map(|s| s.weight).fold(0.0, f64::max);

        let top5_concentration = top_k_concentration(&weights, 5);
        let top10_concentration = top_k_concentration(&weights, 10);

        // Zero HHI means nothing is held by value; the count is 0 then too
        let effective_holdings = if hhi_fraction > 0.0 {
            1.0 / hhi_fraction
        } else {
            0.0
        };

        let diversification_score = if holdings.is_empty() {
            0.0
        } else {
            diversification_score(hhi, max_sector_weight, &self.thresholds)
        };

        let overall_risk_score = overall_risk_score(hhi, max_sector_weight, top5_concentration);

        PortfolioMetrics {
            currency: currency.to_uppercase(),
            total_investment,
            current_value,
            total_pnl,
            total_pnl_pct: percent_of(total_pnl, total_investment),
            day_change,
            day_change_pct: percent_of(day_change, current_value),
            number_of_holdings: holdings.len(),
            number_of_sectors: sectors.len(),
            hhi,
            effective_holdings,
            top5_concentration,
            top10_concentration,
            max_sector_weight,
            concentration_risk: concentration_risk(hhi),
            diversification_score,
            overall_risk_score,
            largest_holding: largest_holding(&per_holding),
            top_gainer: top_gainer(&per_holding),
            top_loser: top_loser(&per_holding),
            equity: kind_breakdown(&per_holding, InstrumentKind::Equity, current_value),
            funds: kind_breakdown(&per_holding, InstrumentKind::Fund, current_value),
            holdings: per_holding,
            sectors,
        }
    }
}

impl Default for MetricsService {
    fn default() -> Self {
        Self::new(Thresholds::default())
    }
}

// ── Building blocks ─────────────────────────────────────────────────

/// `numerator / denominator × 100`, or 0 when the denominator is not
/// positive or the result is not finite.
pub fn percent_of(numerator: f64, denominator: f64) -> f64 {
    if denominator <= 0.0 {
        return 0.0;
    }
    let pct = numerator / denominator * 100.0;
    if pct.is_finite() { pct } else { 0.0 }
}

/// Weight of each holding in percent of total current value, in input
/// order. All zeros when the total is not positive.
pub fn holding_weights(holdings: &[Holding]) -> Vec<f64> {
    let total: f64 = holdings.iter().map(Holding::current_value).sum();
    holdings
        .iter()
        .map(|h| percent_of(h.current_value(), total))
        .collect()
}

/// Herfindahl-Hirschman index of `weights` (percent), expressed in percent.
/// Equal weights over N holdings give exactly 100 / N.
pub fn herfindahl(weights: &[f64]) -> f64 {
    weights.iter().map(|w| (w / 100.0).powi(2)).sum::<f64>() * 100.0
}

/// Sum of the `k` largest weights.
pub fn top_k_concentration(weights: &[f64], k: usize) -> f64 {
    let mut sorted = weights.to_vec();
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    sorted.iter().take(k).sum()
}

/// `100 − HHI`, minus the configured penalty when the heaviest sector is
/// above the limit, clamped to 0..=100.
pub fn diversification_score(hhi: f64, max_sector_weight: f64, thresholds: &Thresholds) -> f64 {
    let mut score = 100.0 - hhi;
    if max_sector_weight > thresholds.diversification_sector_limit_pct {
        score -= thresholds.diversification_sector_penalty;
    }
    clamp_score(score)
}

pub fn overall_risk_score(hhi: f64, max_sector_weight: f64, top5_concentration: f64) -> f64 {
    let mut score = hhi;
    if max_sector_weight > RISK_SECTOR_LIMIT {
        score += RISK_SECTOR_PENALTY;
    }
    if top5_concentration > RISK_TOP5_LIMIT {
        score += RISK_TOP5_PENALTY;
    }
    clamp_score(score)
}

pub fn concentration_risk(hhi: f64) -> RiskLevel {
    if hhi > HHI_HIGH_RISK {
        RiskLevel::High
    } else if hhi > HHI_MEDIUM_RISK {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}

fn holding_metrics(holding: &Holding, weight: f64, hhi_fraction: f64) -> HoldingMetrics {
    let share = (weight / 100.0).powi(2);
    let hhi_contribution = if hhi_fraction > 0.0 {
        share / hhi_fraction * 100.0
    } else {
        0.0
    };
    let risk_level = if weight > HOLDING_HIGH_RISK_WEIGHT {
        RiskLevel::High
    } else if weight > HOLDING_MEDIUM_RISK_WEIGHT {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };
    HoldingMetrics {
        investment: holding.investment(),
        current_value: holding.current_value(),
        return_pct: holding.return_pct(),
        price_return_pct: holding.price_return_pct(),
        weight,
        hhi_contribution,
        risk_level,
        is_overweight: weight > HOLDING_WEIGHT_LIMIT,
        holding: holding.clone(),
    }
}

/// Group by classification label in first-appearance order, then order the
/// groups by current value (stable, so equal values keep that order).
fn sector_rollups(holdings: &[HoldingMetrics], total_value: f64) -> Vec<SectorSummary> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut sectors: Vec<SectorSummary> = Vec::new();

    for h in holdings {
        let label = h.label();
        let slot = *index.entry(label).or_insert_with(|| {
            sectors.push(SectorSummary {
                name: label.to_string(),
                count: 0,
                investment: 0.0,
                current_value: 0.0,
                pnl: 0.0,
                pnl_pct: 0.0,
                weight: 0.0,
                avg_holding_weight: 0.0,
                max_holding_weight: 0.0,
                risk_level: RiskLevel::Low,
                symbols: Vec::new(),
            });
            sectors.len() - 1
        });
        let sector = &mut sectors[slot];
        sector.count += 1;
        sector.investment += h.investment;
        sector.current_value += h.current_value;
        sector.pnl += h.pnl();
        sector.max_holding_weight = sector.max_holding_weight.max(h.weight);
        sector.symbols.push(h.symbol().to_string());
    }

    for sector in &mut sectors {
        sector.pnl_pct = percent_of(sector.pnl, sector.investment);
        sector.weight = percent_of(sector.current_value, total_value);
        sector.avg_holding_weight = sector.weight / sector.count as f64;
        sector.risk_level = if sector.weight > SECTOR_HIGH_RISK_WEIGHT {
            RiskLevel::High
        } else if sector.weight > SECTOR_MEDIUM_RISK_WEIGHT {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };
    }

    sectors.sort_by(|a, b| {
        b.current_value
            .partial_cmp(&a.current_value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    sectors
}

fn kind_breakdown(
    holdings: &[HoldingMetrics],
    kind: InstrumentKind,
    total_value: f64,
) -> KindBreakdown {
    let members = holdings.iter().filter(|h| h.holding.kind == kind);
    let mut breakdown = KindBreakdown {
        kind,
        count: 0,
        investment: 0.0,
        current_value: 0.0,
        pnl: 0.0,
        weight: 0.0,
    };
    for h in members {
        breakdown.count += 1;
        breakdown.investment += h.investment;
        breakdown.current_value += h.current_value;
        breakdown.pnl += h.pnl();
    }
    breakdown.weight = percent_of(breakdown.current_value, total_value);
    breakdown
}

/// First holding with the highest current value.
fn largest_holding(holdings: &[HoldingMetrics]) -> Option<HoldingMetrics> {
    holdings
        .iter()
        .fold(None, |best: Option<&HoldingMetrics>, h| match best {
            Some(b) if b.current_value >= h.current_value => Some(b),
            _ => Some(h),
        })
        .cloned()
}

/// First holding with the best price return.
fn top_gainer(holdings: &[HoldingMetrics]) -> Option<HoldingMetrics> {
    holdings
        .iter()
        .fold(None, |best: Option<&HoldingMetrics>, h| match best {
            Some(b) if b.price_return_pct >= h.price_return_pct => Some(b),
            _ => Some(h),
        })
        .cloned()
}

/// Last holding with the worst price return (the tail of a stable
/// best-first ordering).
fn top_loser(holdings: &[HoldingMetrics]) -> Option<HoldingMetrics> {
    holdings
        .iter()
        .fold(None, |worst: Option<&HoldingMetrics>, h| match worst {
            Some(w) if w.price_return_pct < h.price_return_pct => Some(w),
            _ => Some(h),
        })
        .cloned()
}
