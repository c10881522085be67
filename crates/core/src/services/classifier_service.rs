use std::collections::HashMap;

use crate::models::classification::{Classification, FundCategory, Sector};
use crate::models::sector_table::{SECTOR_SYMBOLS, SYMBOL_ALIASES};
use crate::models::settings::Settings;

/// ISIN prefix shared by Indian mutual fund schemes.
const FUND_ISIN_PREFIX: &str = "INF";
const ISIN_LEN: usize = 12;

/// Symbol → sector lookup table with alias resolution.
///
/// Keys are stored uppercased. The built-in table is loaded by `Default`;
/// callers may start from `empty()` or layer overrides on top.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorTable {
    symbols: HashMap<String, Sector>,
    aliases: HashMap<String, String>,
}

impl SectorTable {
    pub fn empty() -> Self {
        Self {
            symbols: HashMap::new(),
            aliases: HashMap::new(),
        }
    }

    /// The built-in NSE table.
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for (sector, symbols) in SECTOR_SYMBOLS {
            for symbol in *symbols {
                table.insert(symbol, *sector);
            }
        }
        for (alias, key) in SYMBOL_ALIASES {
            table.insert_alias(alias, key);
        }
        table
    }

    pub fn insert(&mut self, symbol: &str, sector: Sector) {
        self.symbols.insert(symbol.trim().to_uppercase(), sector);
    }

    pub fn insert_alias(&mut self, alias: &str, key: &str) {
        self.aliases
            .insert(alias.trim().to_uppercase(), key.trim().to_uppercase());
    }

    /// Apply symbol overrides, replacing any built-in entry.
    pub fn with_overrides(mut self, overrides: &HashMap<String, Sector>) -> Self {
        for (symbol, sector) in overrides {
            self.insert(symbol, *sector);
        }
        self
    }

    /// Exact match first, then through the alias table.
    pub fn lookup(&self, symbol: &str) -> Option<Sector> {
        let key = symbol.trim().to_uppercase();
        if let Some(sector) = self.symbols.get(&key) {
            return Some(*sector);
        }
        self.aliases
            .get(&key)
            .and_then(|alias| self.symbols.get(alias))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Default for SectorTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// One keyword rule of the fund classifier. Matches when the lowercased fund
/// name contains any of the keywords.
#[derive(Debug, Clone, PartialEq)]
pub struct FundRule {
    pub category: FundCategory,
    pub keywords: Vec<String>,
}

impl FundRule {
    pub fn new(category: FundCategory, keywords: &[&str]) -> Self {
        Self {
            category,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    pub fn matches(&self, lowercase_name: &str) -> bool {
        self.keywords.iter().any(|k| lowercase_name.contains(k.as_str()))
    }
}

/// Fund keyword rules in precedence order. First match wins.
///
/// Index terms go first because index funds routinely carry cap-size words
/// ("Nifty Smallcap 250 Index"); tax-saver, liquid, debt, hybrid,
/// international and sectoral follow, then the cap-size buckets.
pub fn default_fund_rules() -> Vec<FundRule> {
    vec![
        FundRule::new(
            FundCategory::Index,
            &["index", "nifty 50", "sensex", "nifty next 50", "nifty50", "etf"],
        ),
        FundRule::new(
            FundCategory::Elss,
            &["elss", "tax saver", "tax saving", "taxsaver"],
        ),
        FundRule::new(FundCategory::Liquid, &["liquid", "money market", "overnight"]),
        FundRule::new(
            FundCategory::Debt,
            &[
                "debt",
                "bond",
                "gilt",
                "corporate bond",
                "credit risk",
                "dynamic bond",
                "short term",
                "ultra short",
                "medium term",
                "long term",
                "banking & psu",
                "floating rate",
            ],
        ),
        FundRule::new(
            FundCategory::Hybrid,
            &[
                "hybrid",
                "balanced",
                "equity savings",
                "arbitrage",
                "aggressive hybrid",
                "conservative hybrid",
                "dynamic asset",
                "multi asset",
            ],
        ),
        FundRule::new(
            FundCategory::International,
            &[
                "international",
                "global",
                "us equity",
                "nasdaq",
                "s&p 500",
                "emerging market",
                "feeder",
                "fof",
                "fund of fund",
            ],
        ),
        FundRule::new(
            FundCategory::Sectoral,
            &[
                "sectoral",
                "thematic",
                "banking",
                "pharma",
                "healthcare",
                "technology",
                "infrastructure",
                "consumption",
                "manufacturing",
                "psu equity",
                "dividend yield",
                "value fund",
                "focused",
            ],
        ),
        FundRule::new(FundCategory::SmallCap, &["small cap", "smallcap"]),
        FundRule::new(FundCategory::MidCap, &["mid cap", "midcap"]),
        FundRule::new(
            FundCategory::LargeCap,
            &["large cap", "largecap", "bluechip", "blue chip"],
        ),
        FundRule::new(FundCategory::FlexiCap, &["flexi cap", "flexicap"]),
        FundRule::new(FundCategory::MultiCap, &["multi cap", "multicap"]),
        // "Large & Mid" names without a cap-size word
        FundRule::new(FundCategory::LargeCap, &["large & mid", "large and mid"]),
    ]
}

/// Maps equity symbols to sectors and fund names to categories.
///
/// Total over its inputs: unknown symbols yield [`Sector::Others`], unmatched
/// fund names yield [`FundCategory::OtherMf`].
#[derive(Debug, Clone)]
pub struct Classifier {
    table: SectorTable,
    fund_rules: Vec<FundRule>,
}

impl Classifier {
    pub fn new(table: SectorTable, fund_rules: Vec<FundRule>) -> Self {
        Self { table, fund_rules }
    }

    /// Built-in tables plus the sector overrides from settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            SectorTable::builtin().with_overrides(&settings.sector_overrides),
            default_fund_rules(),
        )
    }

    /// Sector of an equity symbol.
    pub fn classify_equity(&self, symbol: &str) -> Sector {
        self.table.lookup(symbol).unwrap_or(Sector::Others)
    }

    /// Category of a mutual fund from its display name.
    pub fn classify_fund(&self, name: &str) -> FundCategory {
        let lowered = name.to_lowercase();
        self.fund_rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| rule.category)
            .unwrap_or(FundCategory::OtherMf)
    }

    /// Classification of a symbol arriving on the equity feed. Fund ISINs
    /// occasionally show up there; they are tagged as uncategorized funds.
    pub fn classify_listed(&self, symbol: &str) -> Classification {
        if Self::is_fund_isin(symbol) {
            return Classification::Fund(FundCategory::OtherMf);
        }
        Classification::Sector(self.classify_equity(symbol))
    }

    /// Twelve alphanumerics starting with `INF`. The length check keeps
    /// listed symbols such as `INFY` out.
    pub fn is_fund_isin(symbol: &str) -> bool {
        let symbol = symbol.trim().to_uppercase();
        symbol.len() == ISIN_LEN
            && symbol.starts_with(FUND_ISIN_PREFIX)
            && symbol.chars().all(|c| c.is_ascii_alphanumeric())
    }

    pub fn table(&self) -> &SectorTable {
        &self.table
    }

    pub fn fund_rules(&self) -> &[FundRule] {
        &self.fund_rules
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(SectorTable::builtin(), default_fund_rules())
    }
}

