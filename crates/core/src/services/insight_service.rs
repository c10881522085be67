use crate::models::analytics::{HoldingMetrics, PortfolioMetrics, SectorSummary};
use crate::models::insight::{
    Impact, Insight, InsightCategory, InsightKind, InsightMetric, MetricValue,
};
use crate::models::settings::Thresholds;

type Rule = fn(&PortfolioMetrics, &Thresholds) -> Option<Insight>;

/// Every rule, each evaluated independently. Evaluation order only matters
/// for ties in the final impact sort.
const RULES: &[Rule] = &[
    overweight_positions,
    profit_booking,
    underperformers,
    tax_loss_harvesting,
    sector_concentration,
    small_positions,
    best_sector,
    worst_sector,
    portfolio_health,
    rebalancing,
    momentum,
];

/// Threshold-based advisory rules evaluated over [`PortfolioMetrics`].
///
/// Each rule fires at most once per pass. The result is sorted by impact,
/// high first; rules of equal impact keep evaluation order. An empty
/// portfolio yields no insights.
pub struct InsightService {
    thresholds: Thresholds,
}

impl InsightService {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn generate(&self, metrics: &PortfolioMetrics) -> Vec<Insight> {
        if metrics.holdings.is_empty() {
            return Vec::new();
        }
        let mut insights: Vec<Insight> = RULES
            .iter()
            .filter_map(|rule| rule(metrics, &self.thresholds))
            .collect();
        insights.sort_by_key(|i| i.impact);
        log::debug!(
            "{} insight(s) from {} holding(s)",
            insights.len(),
            metrics.holdings.len()
        );
        insights
    }

    /// Insights suggesting a concrete action.
    pub fn actionable_only(insights: &[Insight]) -> Vec<&Insight> {
        insights.iter().filter(|i| i.actionable).collect()
    }

    pub fn warnings_only(insights: &[Insight]) -> Vec<&Insight> {
        insights
            .iter()
            .filter(|i| i.kind == InsightKind::Warning)
            .collect()
    }
}

impl Default for InsightService {
    fn default() -> Self {
        Self::new(Thresholds::default())
    }
}

// ── Rules ───────────────────────────────────────────────────────────

fn overweight_positions(m: &PortfolioMetrics, t: &Thresholds) -> Option<Insight> {
    let stocks: Vec<HoldingMetrics> = m
        .holdings
        .iter()
        .filter(|h| h.weight > t.overweight_weight_pct)
        .cloned()
        .collect();
    if stocks.is_empty() {
        return None;
    }
    let max_weight = stocks.iter().map(|h| h.weight).fold(f64::MIN, f64::max);
    let total_weight: f64 = stocks.iter().map(|h| h.weight).sum();
    Some(Insight {
        id: "overweight-positions".into(),
        kind: InsightKind::Warning,
        category: InsightCategory::Rebalancing,
        impact: Impact::High,
        title: format!("{} Overweight Position{}", stocks.len(), plural(stocks.len())),
        description: format!(
            "These holdings exceed {}% of your portfolio, creating concentration risk.",
            trim_number(t.overweight_weight_pct)
        ),
        actionable: true,
        metrics: vec![
            InsightMetric::new("Max Weight", MetricValue::Percent(max_weight)),
            InsightMetric::new("Total Overweight", MetricValue::Percent(total_weight)),
        ],
        holdings: stocks,
    })
}

fn profit_booking(m: &PortfolioMetrics, t: &Thresholds) -> Option<Insight> {
    let mut stocks: Vec<&HoldingMetrics> = m
        .holdings
        .iter()
        .filter(|h| h.return_pct > t.profit_booking_return_pct)
        .filter(|h| h.current_value > t.profit_booking_min_value)
        .collect();
    sort_by_return_desc(&mut stocks);
    let stocks = take_top(stocks, t.top_k);
    if stocks.is_empty() {
        return None;
    }
    Some(Insight {
        id: "profit-booking".into(),
        kind: InsightKind::Opportunity,
        category: InsightCategory::Opportunity,
        impact: Impact::Medium,
        title: "Consider Profit Booking".into(),
        description: format!(
            "{} holding{} gained over {}%. Consider booking partial profits to lock in gains.",
            stocks.len(),
            if stocks.len() == 1 { " has" } else { "s have" },
            trim_number(t.profit_booking_return_pct)
        ),
        actionable: true,
        metrics: vec![
            InsightMetric::new("Avg Gain", MetricValue::Percent(average_return(&stocks))),
            InsightMetric::new("Total Profit", MetricValue::Amount(total_pnl(&stocks))),
        ],
        holdings: stocks,
    })
}

fn underperformers(m: &PortfolioMetrics, t: &Thresholds) -> Option<Insight> {
    let mut stocks: Vec<&HoldingMetrics> = m
        .holdings
        .iter()
        .filter(|h| h.return_pct < t.underperformer_return_pct)
        .collect();
    stocks.sort_by(|a, b| {
        a.return_pct
            .partial_cmp(&b.return_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let stocks = take_top(stocks, t.top_k);
    if stocks.is_empty() {
        return None;
    }
    Some(Insight {
        id: "underperformers".into(),
        kind: InsightKind::Warning,
        category: InsightCategory::Performance,
        impact: Impact::High,
        title: "Underperforming Holdings".into(),
        description: format!(
            "{} holding{} down more than {}%. Review your investment thesis for these positions.",
            stocks.len(),
            if stocks.len() == 1 { " is" } else { "s are" },
            trim_number(t.underperformer_return_pct.abs())
        ),
        actionable: true,
        metrics: vec![
            InsightMetric::new("Avg Loss", MetricValue::Percent(average_return(&stocks))),
            InsightMetric::new("Total Loss", MetricValue::Amount(total_pnl(&stocks))),
        ],
        holdings: stocks,
    })
}

/// Harvestable loss is summed over the attached holdings only.
fn tax_loss_harvesting(m: &PortfolioMetrics, t: &Thresholds) -> Option<Insight> {
    let mut stocks: Vec<&HoldingMetrics> = m
        .holdings
        .iter()
        .filter(|h| h.pnl() < -t.tax_loss_min_loss)
        .collect();
    stocks.sort_by(|a, b| {
        a.pnl()
            .partial_cmp(&b.pnl())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let stocks = take_top(stocks, t.top_k);
    if stocks.is_empty() {
        return None;
    }
    let total_loss: f64 = stocks.iter().map(|h| h.pnl().abs()).sum();
    Some(Insight {
        id: "tax-loss".into(),
        kind: InsightKind::Info,
        category: InsightCategory::Tax,
        impact: Impact::Medium,
        title: "Tax Loss Harvesting Opportunity".into(),
        description: format!(
            "You have {} in unrealized losses that could be used to offset capital gains.",
            format_amount(total_loss, &m.currency)
        ),
        actionable: true,
        metrics: vec![
            InsightMetric::new(
                "Potential Tax Offset",
                MetricValue::Amount(total_loss * t.tax_rate),
            ),
            InsightMetric::new("Stocks Eligible", MetricValue::Count(stocks.len())),
        ],
        holdings: stocks,
    })
}

fn sector_concentration(m: &PortfolioMetrics, t: &Thresholds) -> Option<Insight> {
    let sectors: Vec<&SectorSummary> = m
        .sectors
        .iter()
        .filter(|s| s.weight > t.sector_concentration_pct)
        .collect();
    if sectors.is_empty() {
        return None;
    }
    let names: Vec<&str> = sectors.iter().map(|s| s.name.as_str()).collect();
    let max_weight = sectors.iter().map(|s| s.weight).fold(f64::MIN, f64::max);
    Some(Insight {
        id: "sector-concentration".into(),
        kind: InsightKind::Warning,
        category: InsightCategory::Risk,
        impact: Impact::High,
        title: "Sector Concentration Risk".into(),
        description: format!(
            "{} sector{} {} overweight (>{}%). Consider diversifying.",
            names.join(", "),
            plural(names.len()),
            if names.len() > 1 { "are" } else { "is" },
            trim_number(t.sector_concentration_pct)
        ),
        actionable: true,
        holdings: Vec::new(),
        metrics: vec![
            InsightMetric::new("Overweight Sectors", MetricValue::Count(sectors.len())),
            InsightMetric::new("Max Sector Weight", MetricValue::Percent(max_weight)),
        ],
    })
}

fn small_positions(m: &PortfolioMetrics, t: &Thresholds) -> Option<Insight> {
    let mut small: Vec<&HoldingMetrics> = m
        .holdings
        .iter()
        .filter(|h| h.current_value < t.small_position_value)
        .filter(|h| h.weight < t.small_position_weight_pct)
        .collect();
    if small.len() <= t.small_position_min_count {
        return None;
    }
    small.sort_by(|a, b| {
        a.current_value
            .partial_cmp(&b.current_value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let total_value: f64 = small.iter().map(|h| h.current_value).sum();
    let total_weight: f64 = small.iter().map(|h| h.weight).sum();
    let count = small.len();
    Some(Insight {
        id: "small-positions".into(),
        kind: InsightKind::Info,
        category: InsightCategory::Rebalancing,
        impact: Impact::Low,
        title: "Consider Consolidating Small Positions".into(),
        description: format!(
            "You have {count} positions under {}. Consider consolidating to simplify portfolio management.",
            format_amount(t.small_position_value, &m.currency)
        ),
        actionable: true,
        holdings: take_top(small, t.top_k),
        metrics: vec![
            InsightMetric::new("Total Value", MetricValue::Amount(total_value)),
            InsightMetric::new("Portfolio Weight", MetricValue::Percent(total_weight)),
        ],
    })
}

fn best_sector(m: &PortfolioMetrics, t: &Thresholds) -> Option<Insight> {
    let ranked = sectors_by_return(m);
    let best = ranked.first()?;
    if best.pnl_pct <= t.best_sector_return_pct {
        return None;
    }
    Some(Insight {
        id: "best-sector".into(),
        kind: InsightKind::Success,
        category: InsightCategory::Performance,
        impact: Impact::Low,
        title: format!("{} is Your Best Performing Sector", best.name),
        description: format!(
            "Your {} holdings are up {:.0}% overall.",
            best.name, best.pnl_pct
        ),
        actionable: false,
        holdings: sector_members(m, best, t.sector_top_k),
        metrics: sector_metrics(best),
    })
}

fn worst_sector(m: &PortfolioMetrics, t: &Thresholds) -> Option<Insight> {
    let ranked = sectors_by_return(m);
    let worst = ranked.last()?;
    if worst.pnl_pct >= t.worst_sector_return_pct {
        return None;
    }
    Some(Insight {
        id: "worst-sector".into(),
        kind: InsightKind::Warning,
        category: InsightCategory::Performance,
        impact: Impact::Medium,
        title: format!("{} Needs Attention", worst.name),
        description: format!(
            "Your {} holdings are down {:.0}%. Review individual positions.",
            worst.name,
            worst.pnl_pct.abs()
        ),
        actionable: true,
        holdings: sector_members(m, worst, t.sector_top_k),
        metrics: sector_metrics(worst),
    })
}

/// Share of profitable holdings. The band between the concern and healthy
/// thresholds emits nothing.
fn portfolio_health(m: &PortfolioMetrics, t: &Thresholds) -> Option<Insight> {
    let total = m.holdings.len();
    if total == 0 {
        return None;
    }
    let profitable = m.holdings.iter().filter(|h| h.pnl() > 0.0).count();
    let ratio = profitable as f64 / total as f64 * 100.0;
    let profitable_text = MetricValue::Text(format!("{profitable} of {total}"));

    if ratio >= t.healthy_profitable_pct {
        Some(Insight {
            id: "portfolio-health".into(),
            kind: InsightKind::Success,
            category: InsightCategory::Performance,
            impact: Impact::Low,
            title: "Strong Portfolio Performance".into(),
            description: format!(
                "{ratio:.0}% of your holdings are in profit. Your stock selection has been effective."
            ),
            actionable: false,
            holdings: Vec::new(),
            metrics: vec![
                InsightMetric::new("Profitable Stocks", profitable_text),
                InsightMetric::new("Total P&L", MetricValue::Amount(m.total_pnl)),
            ],
        })
    } else if ratio < t.concern_profitable_pct {
        Some(Insight {
            id: "portfolio-concern".into(),
            kind: InsightKind::Warning,
            category: InsightCategory::Performance,
            impact: Impact::High,
            title: "Portfolio Health Concern".into(),
            description: format!(
                "Only {ratio:.0}% of your holdings are profitable. Consider reviewing your investment strategy."
            ),
            actionable: true,
            holdings: Vec::new(),
            metrics: vec![
                InsightMetric::new("Profitable Stocks", profitable_text),
                InsightMetric::new("Losing Stocks", MetricValue::Count(total - profitable)),
            ],
        })
    } else {
        None
    }
}

fn rebalancing(m: &PortfolioMetrics, t: &Thresholds) -> Option<Insight> {
    let n = m.holdings.len();
    if n == 0 {
        return None;
    }
    let ideal = 100.0 / n as f64;
    let avg_deviation =
        m.holdings.iter().map(|h| (h.weight - ideal).abs()).sum::<f64>() / n as f64;
    if avg_deviation <= t.rebalance_avg_deviation_pct {
        return None;
    }
    Some(Insight {
        id: "rebalancing".into(),
        kind: InsightKind::Info,
        category: InsightCategory::Rebalancing,
        impact: Impact::Medium,
        title: "Portfolio Rebalancing Recommended".into(),
        description: "Your portfolio has significant weight deviations from equal allocation. \
                      Consider periodic rebalancing."
            .into(),
        actionable: true,
        holdings: Vec::new(),
        metrics: vec![
            InsightMetric::new("Avg Deviation", MetricValue::Percent(avg_deviation)),
            InsightMetric::new("Ideal Weight", MetricValue::Percent(ideal)),
        ],
    })
}

fn momentum(m: &PortfolioMetrics, t: &Thresholds) -> Option<Insight> {
    let mut stocks: Vec<&HoldingMetrics> = m
        .holdings
        .iter()
        .filter(|h| {
            h.return_pct > t.momentum_min_return_pct && h.return_pct < t.momentum_max_return_pct
        })
        .collect();
    if stocks.len() < t.momentum_min_count {
        return None;
    }
    sort_by_return_desc(&mut stocks);
    let stocks = take_top(stocks, t.top_k);
    Some(Insight {
        id: "momentum".into(),
        kind: InsightKind::Info,
        category: InsightCategory::Opportunity,
        impact: Impact::Low,
        title: "Strong Momentum Stocks".into(),
        description: format!(
            "{} holdings showing strong momentum ({}-{}% gains). Consider riding the trend.",
            stocks.len(),
            trim_number(t.momentum_min_return_pct),
            trim_number(t.momentum_max_return_pct)
        ),
        actionable: false,
        holdings: stocks,
        metrics: Vec::new(),
    })
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Stable, best return first.
fn sort_by_return_desc(stocks: &mut [&HoldingMetrics]) {
    stocks.sort_by(|a, b| {
        b.return_pct
            .partial_cmp(&a.return_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

fn take_top(stocks: Vec<&HoldingMetrics>, k: usize) -> Vec<HoldingMetrics> {
    stocks.into_iter().take(k).cloned().collect()
}

fn average_return(stocks: &[HoldingMetrics]) -> f64 {
    if stocks.is_empty() {
        return 0.0;
    }
    stocks.iter().map(|h| h.return_pct).sum::<f64>() / stocks.len() as f64
}

fn total_pnl(stocks: &[HoldingMetrics]) -> f64 {
    stocks.iter().map(|h| h.pnl()).sum()
}

/// Sectors ordered by return, best first (stable).
fn sectors_by_return(m: &PortfolioMetrics) -> Vec<&SectorSummary> {
    let mut ranked: Vec<&SectorSummary> = m.sectors.iter().collect();
    ranked.sort_by(|a, b| {
        b.pnl_pct
            .partial_cmp(&a.pnl_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

/// First `k` members of a sector, in input order.
fn sector_members(m: &PortfolioMetrics, sector: &SectorSummary, k: usize) -> Vec<HoldingMetrics> {
    m.holdings
        .iter()
        .filter(|h| h.label() == sector.name)
        .take(k)
        .cloned()
        .collect()
}

fn sector_metrics(sector: &SectorSummary) -> Vec<InsightMetric> {
    vec![
        InsightMetric::new("Sector Return", MetricValue::Percent(sector.pnl_pct)),
        InsightMetric::new("Sector Weight", MetricValue::Percent(sector.weight)),
    ]
}

fn plural(n: usize) -> &'static str {
    if n > 1 { "s" } else { "" }
}

/// Threshold for display: no trailing ".0".
fn trim_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

/// Amount with thousands separators and up to two decimals. INR amounts use
/// Indian digit grouping (12,34,567) and the rupee sign.
pub fn format_amount(value: f64, currency: &str) -> String {
    let cents = (value.abs() * 100.0).round();
    let whole = (cents / 100.0).trunc() as u64;
    let fraction = (cents % 100.0) as u64;

    let digits = whole.to_string();
    let indian = currency.eq_ignore_ascii_case("INR");
    let grouped = if indian {
        group_indian(&digits)
    } else {
        group_thousands(&digits)
    };

    let mut out = String::new();
    if value < 0.0 && cents > 0.0 {
        out.push('-');
    }
    if indian {
        out.push('₹');
    } else {
        out.push_str(&currency.to_uppercase());
        out.push(' ');
    }
    out.push_str(&grouped);
    if fraction > 0 {
        let decimals = format!("{fraction:02}");
        out.push('.');
        out.push_str(decimals.trim_end_matches('0'));
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Last three digits, then groups of two.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut out = String::new();
    for (i, ch) in head.chars().enumerate() {
        if i > 0 && (head.len() - i) % 2 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.push(',');
    out.push_str(tail);
    out
}
