use crate::models::classification::{Classification, Sector};
use crate::models::fx::FxRate;
use crate::models::holding::{Holding, InstrumentKind};
use crate::models::raw::{BrokerEquityRecord, BrokerFundRecord, ForeignRow, RawRecord};
use crate::services::classifier_service::Classifier;

/// Symbol used for spreadsheet rows without a ticker.
const UNKNOWN_SYMBOL: &str = "UNKNOWN";

/// Exchange tag for overseas listings.
const FOREIGN_EXCHANGE: &str = "US";

/// Converts raw source records into canonical [`Holding`]s.
///
/// Pure and deterministic: the same records and rate always yield the same
/// holdings. Numeric fields were already defaulted to 0 when the records
/// were decoded, so no record is ever rejected here. Quantities and prices
/// must also be non-negative; a negative one is malformed and reads as 0.
pub struct NormalizerService {
    classifier: Classifier,
    home_currency: String,
}

impl NormalizerService {
    pub fn new(classifier: Classifier, home_currency: &str) -> Self {
        Self {
            classifier,
            home_currency: home_currency.to_uppercase(),
        }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Normalize a whole batch, preserving input order.
    pub fn normalize(&self, records: &[RawRecord], fx: &FxRate) -> Vec<Holding> {
        records
            .iter()
            .map(|record| self.normalize_record(record, fx))
            .collect()
    }

    pub fn normalize_record(&self, record: &RawRecord, fx: &FxRate) -> Holding {
        match record {
            RawRecord::BrokerEquity(r) => self.equity(r),
            RawRecord::BrokerFund(r) => self.fund(r),
            RawRecord::ForeignRow(r) => self.foreign(r, fx),
        }
    }

    fn equity(&self, r: &BrokerEquityRecord) -> Holding {
        let symbol = r.tradingsymbol.trim().to_string();
        Holding {
            classification: self.classifier.classify_listed(&symbol),
            symbol,
            quantity: non_negative(r.quantity),
            average_price: non_negative(r.average_price),
            last_price: non_negative(r.last_price),
            pnl: r.pnl,
            day_change: r.day_change,
            day_change_pct: r.day_change_percentage,
            kind: InstrumentKind::Equity,
            source_currency: self.home_currency.clone(),
            exchange: r.exchange.clone(),
        }
    }

    /// Funds are identified by display name; the ISIN is used only when the
    /// feed carries no name. A zero P&L is recomputed from prices, since the
    /// fund feed often leaves it unset.
    fn fund(&self, r: &BrokerFundRecord) -> Holding {
        let symbol = r
            .fund
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| r.tradingsymbol.trim())
            .to_string();
        let quantity = non_negative(r.quantity);
        let average_price = non_negative(r.average_price);
        let last_price = non_negative(r.last_price);
        let pnl = if r.pnl != 0.0 {
            r.pnl
        } else {
            (last_price - average_price) * quantity
        };
        Holding {
            classification: Classification::Fund(self.classifier.classify_fund(&symbol)),
            symbol,
            quantity,
            average_price,
            last_price,
            pnl,
            day_change: 0.0,
            day_change_pct: None,
            kind: InstrumentKind::Fund,
            source_currency: self.home_currency.clone(),
            exchange: None,
        }
    }

    /// Every monetary field is multiplied by the rate; quantity and the
    /// percentage day change are not.
    fn foreign(&self, r: &ForeignRow, fx: &FxRate) -> Holding {
        let symbol = r
            .ticker
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(UNKNOWN_SYMBOL)
            .to_string();
        Holding {
            symbol,
            quantity: non_negative(r.quantity),
            average_price: fx.convert(non_negative(r.average_cost)),
            last_price: fx.convert(non_negative(r.current_price)),
            pnl: fx.convert(r.returns),
            day_change: fx.convert(r.daily_change),
            day_change_pct: r.daily_change_pct,
            classification: Classification::Sector(Sector::International),
            kind: InstrumentKind::Equity,
            source_currency: fx.from.clone(),
            exchange: Some(FOREIGN_EXCHANGE.to_string()),
        }
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
