use serde::{Deserialize, Serialize};

use super::classification::Classification;

/// Kind of instrument a holding represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentKind {
    /// Listed equity (domestic broker feed or overseas spreadsheet)
    Equity,
    /// Mutual fund unit holding
    Fund,
}

impl std::fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstrumentKind::Equity => write!(f, "Equity"),
            InstrumentKind::Fund => write!(f, "MF"),
        }
    }
}

/// One position in one instrument, normalized to the home currency.
///
/// Produced by the normalizer once per refresh and never mutated afterwards.
/// Every monetary field is already converted; `source_currency` is kept for
/// display only.
///
/// `pnl` is the figure reported by the source. It may include realized
/// gains and is not required to equal `current_value() - investment()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Trading symbol, or the fund's display name for mutual funds
    pub symbol: String,

    /// Units held (non-negative for every supported source)
    pub quantity: f64,

    /// Average acquisition price per unit
    pub average_price: f64,

    /// Last traded price per unit
    pub last_price: f64,

    /// Profit and loss as reported by the source
    pub pnl: f64,

    /// Price change per unit since the previous close
    #[serde(default)]
    pub day_change: f64,

    /// Day change in percent, when the source reports one
    #[serde(default)]
    pub day_change_pct: Option<f64>,

    /// Sector or fund category
    pub classification: Classification,

    pub kind: InstrumentKind,

    /// ISO code of the currency the source quoted in (e.g. "INR", "USD")
    pub source_currency: String,

    /// Listing exchange, when known (e.g. "NSE", "US")
    #[serde(default)]
    pub exchange: Option<String>,
}

impl Holding {
    /// Current value: quantity × last price.
    pub fn current_value(&self) -> f64 {
        self.quantity * self.last_price
    }

    /// Cost basis: quantity × average price.
    pub fn investment(&self) -> f64 {
        self.quantity * self.average_price
    }

    /// Return on cost in percent (`pnl / investment × 100`), 0 when the cost
    /// basis is zero.
    pub fn return_pct(&self) -> f64 {
        let investment = self.investment();
        if investment > 0.0 {
            (self.pnl / investment) * 100.0
        } else {
            0.0
        }
    }

    /// Price return in percent (`(last − avg) / avg × 100`), 0 when the
    /// average price is zero.
    pub fn price_return_pct(&self) -> f64 {
        if self.average_price > 0.0 {
            ((self.last_price - self.average_price) / self.average_price) * 100.0
        } else {
            0.0
        }
    }

    /// Day change for the whole position.
    pub fn day_change_value(&self) -> f64 {
        self.day_change * self.quantity
    }

    pub fn is_fund(&self) -> bool {
        self.kind == InstrumentKind::Fund
    }

    pub fn label(&self) -> &'static str {
        self.classification.label()
    }
}
