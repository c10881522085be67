use serde::{Deserialize, Serialize};

/// A raw holding record as delivered by one of the data sources, before
/// normalization and currency conversion.
///
/// Only the normalizer consumes this type; metrics and insights work on
/// [`Holding`](super::holding::Holding) exclusively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum RawRecord {
    /// Equity position from the domestic broker feed (home currency)
    BrokerEquity(BrokerEquityRecord),
    /// Mutual fund position from the domestic broker feed (home currency)
    BrokerFund(BrokerFundRecord),
    /// Row of the overseas broker's holdings sheet (foreign currency)
    ForeignRow(ForeignRow),
}

impl RawRecord {
    pub fn symbol(&self) -> &str {
        match self {
            RawRecord::BrokerEquity(r) => &r.tradingsymbol,
            RawRecord::BrokerFund(r) => r.fund.as_deref().unwrap_or(&r.tradingsymbol),
            RawRecord::ForeignRow(r) => r.ticker.as_deref().unwrap_or(""),
        }
    }
}

/// Equity holding as returned by the broker's `/portfolio/holdings` endpoint.
///
/// Monetary fields are lenient: a missing or non-numeric value reads as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrokerEquityRecord {
    #[serde(default)]
    pub tradingsymbol: String,
    #[serde(default)]
    pub exchange: Option<String>,
    #[serde(default)]
    pub isin: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub quantity: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub average_price: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub last_price: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub pnl: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub day_change: f64,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub day_change_percentage: Option<f64>,
}

/// Mutual fund holding as returned by the broker's `/mf/holdings` endpoint.
///
/// `tradingsymbol` is the fund's ISIN; `fund` carries its display name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrokerFundRecord {
    #[serde(default)]
    pub tradingsymbol: String,
    #[serde(default)]
    pub fund: Option<String>,
    #[serde(default)]
    pub folio: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub quantity: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub average_price: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub last_price: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub pnl: f64,
}

/// Row of the overseas holdings sheet. Column names follow the broker's
/// export headers; every monetary value is in the foreign currency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForeignRow {
    #[serde(rename = "Ticker", default)]
    pub ticker: Option<String>,
    #[serde(rename = "Total Shares Held", default, deserialize_with = "lenient::number")]
    pub quantity: f64,
    #[serde(rename = "Average Cost (USD)", default, deserialize_with = "lenient::number")]
    pub average_cost: f64,
    #[serde(rename = "Current Price (USD)", default, deserialize_with = "lenient::number")]
    pub current_price: f64,
    #[serde(rename = "Investment Returns (USD)", default, deserialize_with = "lenient::number")]
    pub returns: f64,
    #[serde(rename = "Daily Change (USD)", default, deserialize_with = "lenient::number")]
    pub daily_change: f64,
    #[serde(rename = "Daily Change (%)", default, deserialize_with = "lenient::optional_number")]
    pub daily_change_pct: Option<f64>,
}

impl ForeignRow {
    /// No ticker and no values: an empty line of the sheet.
    pub fn is_blank(&self) -> bool {
        self.ticker.as_deref().map_or(true, |t| t.trim().is_empty())
            && self.quantity == 0.0
            && self.average_cost == 0.0
            && self.current_price == 0.0
            && self.returns == 0.0
            && self.daily_change == 0.0
            && self.daily_change_pct.is_none()
    }
}

/// Lenient numeric deserialization.
///
/// Accepts numbers, numeric strings (thousands separators stripped), and
/// anything else. Values that are missing, non-numeric or non-finite read as
/// `None`, which `number` maps to 0. One malformed cell therefore zeroes a
/// field instead of aborting the whole import.
pub mod lenient {
    use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
    use std::fmt;

    struct LenientNumber;

    fn finite(v: f64) -> Option<f64> {
        v.is_finite().then_some(v)
    }

    impl<'de> Visitor<'de> for LenientNumber {
        type Value = Option<f64>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number or numeric string")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(finite(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v as f64))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v as f64))
        }

        fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            let cleaned: String = v.trim().chars().filter(|c| *c != ',').collect();
            Ok(cleaned.parse::<f64>().ok().and_then(finite))
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(LenientNumber)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            while seq.next_element::<IgnoredAny>()?.is_some() {}
            Ok(None)
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
            Ok(None)
        }
    }

    /// Deserialize a number, defaulting to 0.
    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(d.deserialize_any(LenientNumber)?.unwrap_or(0.0))
    }

    /// Deserialize an optional number; unparseable values become `None`.
    pub fn optional_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        d.deserialize_any(LenientNumber)
    }
}
