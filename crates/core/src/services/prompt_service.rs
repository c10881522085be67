use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::analytics::{HoldingMetrics, PortfolioMetrics};
use crate::models::snapshot::Snapshot;

/// Cells in the sector allocation bar; one cell per 5 %.
const BAR_CELLS: usize = 20;
const BAR_STEP_PCT: f64 = 5.0;

const NO_MONEY_RULE: &str = "NEVER mention or calculate any actual monetary amounts, P&L figures, \
investment values, or currency amounts. Only discuss holdings in terms of PERCENTAGES and \
ALLOCATION weights.";

const PORTFOLIO_BRIEF: &str = "\
## ROLE & EXPERTISE

You are a Chief Investment Officer and portfolio manager with deep experience in Indian and \
global equity markets, asset allocation, risk management, technical and fundamental analysis, \
and sector rotation.

---

## PRIMARY OBJECTIVE

Analyze the user's portfolio against CURRENT market conditions:

1. **Research current market conditions** - latest financial news, market data and economic indicators
2. **Analyze sector dynamics** - which sectors are leading or lagging and why
3. **Evaluate each holding** - assess every position against current market realities
4. **Provide specific, actionable recommendations** - no generic advice

---

## OUTPUT FORMAT

1. **Executive summary** - market pulse, critical drivers and a risk dashboard
2. **Portfolio health scorecard** - overall score out of 10, concentration analysis and critical alerts
3. **Holding-by-holding verdicts** - one table row per holding: ticker, type, sector, current %, \
action (BUY / HOLD / REDUCE / SELL / ACCUMULATE), conviction, target % and rationale
4. **Sector strategy matrix** - portfolio weight vs benchmark weight with outlook
5. **New opportunities** - 3-5 ideas with rationale and suggested allocation %
6. **Rebalancing roadmap** - immediate and short-term actions as % changes
7. **Risk management** - hedges, stop-loss levels in % terms, position sizing
8. **Scenarios** - bull, base and bear case with probability and portfolio impact

---

## STRICT CONSTRAINTS

1. **NO MONETARY VALUES:** only percentages and allocations.
2. **BE DIRECT:** if a holding should be sold, say SELL.
3. **CITE SPECIFIC DATA:** every recommendation references news, data points or technical levels.
4. **CURRENT INFORMATION ONLY:** reflect today's market conditions.
5. **INDIAN MARKET CONTEXT:** primary focus on NSE/BSE, with global context where relevant.
";

const HOLDING_BRIEF: &str = "\
## OBJECTIVE

Produce a focused research note on the holding below using CURRENT information:

1. **Recent news** - earnings, management changes, M&A, regulatory issues, analyst actions
2. **Technical setup** - price vs 50/200 DMA, RSI, volume trends, key support and resistance
3. **Fundamental view** - valuation vs sector, earnings momentum, quality metrics
4. **Risk factors** - specific risks to monitor
5. **Fit in this portfolio** - is the allocation appropriate given its sector exposure?
6. **Verdict** - BUY / HOLD / REDUCE / SELL / ACCUMULATE with conviction and a target allocation %
";

/// Builds the natural-language prompts sent to the analysis model.
///
/// Prompts carry percentages only; no monetary figure from the snapshot is
/// ever interpolated.
pub struct PromptService;

impl PromptService {
    pub fn new() -> Self {
        Self
    }

    /// Whole-portfolio briefing.
    pub fn portfolio_prompt(&self, snapshot: &Snapshot, date: NaiveDate) -> String {
        let m = &snapshot.metrics;
        let mut out = String::new();

        out.push_str("# PORTFOLIO INTELLIGENCE BRIEFING\n");
        out.push_str(&format!("**Analysis Date:** {}\n\n---\n\n", format_date(date)));
        out.push_str(PORTFOLIO_BRIEF);
        out.push_str(&format!("\n**CRITICAL INSTRUCTION:** {NO_MONEY_RULE}\n\n---\n\n"));
        out.push_str("## USER'S PORTFOLIO DATA\n\n");

        out.push_str("### Asset Allocation Summary\n");
        out.push_str(&format!(
            "- **Direct Equity Holdings:** {:.1}% of portfolio ({} stocks)\n",
            m.equity.weight, m.equity.count
        ));
        out.push_str(&format!(
            "- **Mutual Fund Holdings:** {:.1}% of portfolio ({} funds)\n",
            m.funds.weight, m.funds.count
        ));
        out.push_str(&format!("- **Total Positions:** {}\n\n", m.number_of_holdings));

        out.push_str("### Holdings List (Symbol: Allocation %)\n");
        for (i, h) in m.ranked_by_weight().iter().enumerate() {
            out.push_str(&format!(
                "{}. **{}** - {:.2}% | {} | Sector: {}\n",
                i + 1,
                h.symbol(),
                h.weight,
                h.holding.kind,
                h.label()
            ));
        }
        out.push('\n');

        out.push_str("### Sector Allocation Breakdown\n");
        for sector in &m.sectors {
            out.push_str(&format!(
                "- **{}:** {:.1}% {}\n",
                sector.name,
                sector.weight,
                allocation_bar(sector.weight)
            ));
        }
        out.push('\n');

        out.push_str(&statistics_block(m));
        out.push_str("\n---\n\n");
        out.push_str("**NOW EXECUTE THE FULL ANALYSIS FOLLOWING ALL SECTIONS ABOVE.**\n");
        out.push_str("**REMEMBER: NO MONETARY VALUES - ONLY PERCENTAGES AND ALLOCATIONS.**\n");
        out
    }

    /// Deep-dive prompt for one holding of the snapshot.
    pub fn holding_prompt(
        &self,
        snapshot: &Snapshot,
        symbol: &str,
        date: NaiveDate,
    ) -> Result<String, CoreError> {
        let m = &snapshot.metrics;
        let wanted = symbol.trim();
        let h = m
            .holdings
            .iter()
            .find(|h| h.symbol().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::UnknownHolding(wanted.to_string()))?;

        let mut out = String::new();
        out.push_str(&format!("# {} RESEARCH BRIEFING\n", h.symbol().to_uppercase()));
        out.push_str(&format!("**Analysis Date:** {}\n\n---\n\n", format_date(date)));
        out.push_str(HOLDING_BRIEF);
        out.push_str(&format!("\n**CRITICAL INSTRUCTION:** {NO_MONEY_RULE}\n\n---\n\n"));

        out.push_str("## HOLDING DATA\n");
        out.push_str(&holding_block(h));

        if let Some(sector) = m.sector(h.label()) {
            out.push_str("\n## SECTOR CONTEXT\n");
            out.push_str(&format!(
                "- **{}:** {:.1}% of portfolio across {} position{}\n",
                sector.name,
                sector.weight,
                sector.count,
                if sector.count == 1 { "" } else { "s" }
            ));
            let peers: Vec<&str> = sector
                .symbols
                .iter()
                .map(String::as_str)
                .filter(|s| !s.eq_ignore_ascii_case(h.symbol()))
                .collect();
            if !peers.is_empty() {
                out.push_str(&format!("- **Other holdings in sector:** {}\n", peers.join(", ")));
            }
        }

        out.push('\n');
        out.push_str(&statistics_block(m));
        out.push_str("\n---\n\n");
        out.push_str("**REMEMBER: NO MONETARY VALUES - ONLY PERCENTAGES AND ALLOCATIONS.**\n");
        Ok(out)
    }
}

impl Default for PromptService {
    fn default() -> Self {
        Self::new()
    }
}

/// `█` per 5 % of weight (rounded), padded with `░` to 20 cells.
pub fn allocation_bar(weight_pct: f64) -> String {
    let filled = if weight_pct.is_finite() && weight_pct > 0.0 {
        ((weight_pct / BAR_STEP_PCT).round() as usize).min(BAR_CELLS)
    } else {
        0
    };
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_CELLS - filled))
}

fn statistics_block(m: &PortfolioMetrics) -> String {
    let largest_sector = m
        .sectors
        .first()
        .map(|s| format!("{} ({:.1}%)", s.name, s.weight))
        .unwrap_or_else(|| "N/A (0.0%)".to_string());
    let largest_holding = m
        .ranked_by_weight()
        .first()
        .map(|h| format!("{} ({:.1}%)", h.symbol(), h.weight))
        .unwrap_or_else(|| "N/A (0.0%)".to_string());

    let mut out = String::from("### Portfolio Statistics\n");
    out.push_str(&format!("- Total Unique Positions: {}\n", m.number_of_holdings));
    out.push_str(&format!("- Equity Positions: {}\n", m.equity.count));
    out.push_str(&format!("- Mutual Fund Positions: {}\n", m.funds.count));
    out.push_str(&format!("- Number of Sectors: {}\n", m.number_of_sectors));
    out.push_str(&format!("- Largest Sector: {largest_sector}\n"));
    out.push_str(&format!("- Largest Holding: {largest_holding}\n"));
    out.push_str(&format!("- Top 5 Concentration: {:.1}%\n", m.top5_concentration));
    out.push_str(&format!("- Diversification Score: {:.0}/100\n", m.diversification_score));
    out
}

fn holding_block(h: &HoldingMetrics) -> String {
    let mut out = String::new();
    out.push_str(&format!("- **Symbol:** {}\n", h.symbol()));
    out.push_str(&format!("- **Type:** {}\n", h.holding.kind));
    out.push_str(&format!("- **Sector:** {}\n", h.label()));
    if let Some(exchange) = &h.holding.exchange {
        out.push_str(&format!("- **Exchange:** {exchange}\n"));
    }
    out.push_str(&format!("- **Current Allocation:** {:.2}%\n", h.weight));
    out.push_str(&format!("- **Return on Cost:** {:+.1}%\n", h.return_pct));
    if let Some(day) = h.holding.day_change_pct {
        out.push_str(&format!("- **Day Change:** {day:+.2}%\n"));
    }
    out.push_str(&format!("- **Position Risk:** {}\n", h.risk_level));
    out
}

fn format_date(date: NaiveDate) -> String {
    date.format("%A, %-d %B %Y").to_string()
}
