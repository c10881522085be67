use serde::{Deserialize, Serialize};

/// Equity sector, drawn from a closed set.
///
/// `Others` is the catch-all for symbols missing from the sector table.
/// `International` tags overseas listings imported from the foreign
/// spreadsheet; it shares its label with the fund category of the same name
/// so both roll up into one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sector {
    Banking,
    #[serde(rename = "IT")]
    It,
    Pharma,
    #[serde(rename = "FMCG")]
    Fmcg,
    Auto,
    Metals,
    Energy,
    Realty,
    Telecom,
    Infrastructure,
    Chemicals,
    Textiles,
    Media,
    Financials,
    Insurance,
    Cement,
    #[serde(rename = "Consumer Durables")]
    ConsumerDurables,
    Aviation,
    Hospitality,
    International,
    Others,
}

impl Sector {
    pub const ALL: [Sector; 21] = [
        Sector::Banking,
        Sector::It,
        Sector::Pharma,
        Sector::Fmcg,
        Sector::Auto,
        Sector::Metals,
        Sector::Energy,
        Sector::Realty,
        Sector::Telecom,
        Sector::Infrastructure,
        Sector::Chemicals,
        Sector::Textiles,
        Sector::Media,
        Sector::Financials,
        Sector::Insurance,
        Sector::Cement,
        Sector::ConsumerDurables,
        Sector::Aviation,
        Sector::Hospitality,
        Sector::International,
        Sector::Others,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Sector::Banking => "Banking",
            Sector::It => "IT",
            Sector::Pharma => "Pharma",
            Sector::Fmcg => "FMCG",
            Sector::Auto => "Auto",
            Sector::Metals => "Metals",
            Sector::Energy => "Energy",
            Sector::Realty => "Realty",
            Sector::Telecom => "Telecom",
            Sector::Infrastructure => "Infrastructure",
            Sector::Chemicals => "Chemicals",
            Sector::Textiles => "Textiles",
            Sector::Media => "Media",
            Sector::Financials => "Financials",
            Sector::Insurance => "Insurance",
            Sector::Cement => "Cement",
            Sector::ConsumerDurables => "Consumer Durables",
            Sector::Aviation => "Aviation",
            Sector::Hospitality => "Hospitality",
            Sector::International => "International",
            Sector::Others => "Others",
        }
    }
}

impl std::fmt::Display for Sector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Mutual-fund category, drawn from a second closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FundCategory {
    #[serde(rename = "Index Fund")]
    Index,
    #[serde(rename = "ELSS")]
    Elss,
    Liquid,
    Debt,
    Hybrid,
    International,
    Sectoral,
    #[serde(rename = "Small Cap")]
    SmallCap,
    #[serde(rename = "Mid Cap")]
    MidCap,
    #[serde(rename = "Large Cap")]
    LargeCap,
    #[serde(rename = "Flexi Cap")]
    FlexiCap,
    #[serde(rename = "Multi Cap")]
    MultiCap,
    #[serde(rename = "Other MF")]
    OtherMf,
}

impl FundCategory {
    pub const ALL: [FundCategory; 13] = [
        FundCategory::Index,
        FundCategory::Elss,
        FundCategory::Liquid,
        FundCategory::Debt,
        FundCategory::Hybrid,
        FundCategory::International,
        FundCategory::Sectoral,
        FundCategory::SmallCap,
        FundCategory::MidCap,
        FundCategory::LargeCap,
        FundCategory::FlexiCap,
        FundCategory::MultiCap,
        FundCategory::OtherMf,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FundCategory::Index => "Index Fund",
            FundCategory::Elss => "ELSS",
            FundCategory::Liquid => "Liquid",
            FundCategory::Debt => "Debt",
            FundCategory::Hybrid => "Hybrid",
            FundCategory::International => "International",
            FundCategory::Sectoral => "Sectoral",
            FundCategory::SmallCap => "Small Cap",
            FundCategory::MidCap => "Mid Cap",
            FundCategory::LargeCap => "Large Cap",
            FundCategory::FlexiCap => "Flexi Cap",
            FundCategory::MultiCap => "Multi Cap",
            FundCategory::OtherMf => "Other MF",
        }
    }
}

impl std::fmt::Display for FundCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classification tag attached to a holding: an equity sector or a fund category.
///
/// Rollups key on [`Classification::label`], so two tags with the same label
/// (e.g. `International`) aggregate together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "label")]
pub enum Classification {
    Sector(Sector),
    Fund(FundCategory),
}

impl Classification {
    pub fn label(&self) -> &'static str {
        match self {
            Classification::Sector(s) => s.label(),
            Classification::Fund(c) => c.label(),
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<Sector> for Classification {
    fn from(s: Sector) -> Self {
        Classification::Sector(s)
    }
}

impl From<FundCategory> for Classification {
    fn from(c: FundCategory) -> Self {
        Classification::Fund(c)
    }
}
