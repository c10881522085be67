use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a saved analysis is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisSubject {
    /// Whole-portfolio analysis
    Portfolio,
    /// Deep-dive on a single holding (symbol, uppercased when stored)
    Holding(String),
}

impl AnalysisSubject {
    pub fn title(&self) -> String {
        match self {
            AnalysisSubject::Portfolio => "Portfolio Analysis".to_string(),
            AnalysisSubject::Holding(symbol) => {
                format!("{} Analysis", symbol.trim().to_uppercase())
            }
        }
    }
}

/// Metadata of one saved analysis file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisEntry {
    /// File name without the `.md` extension; used to read or delete it
    pub id: String,
    pub filename: String,
    /// `None` for portfolio analyses
    pub symbol: Option<String>,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    pub created_at: DateTime<Utc>,
}

/// A saved analysis with its markdown body (metadata header included).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisDocument {
    pub filename: String,
    pub content: String,
}

/// Text returned by the analysis model, plus the history entry when it was
/// saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReply {
    pub content: String,
    pub entry: Option<AnalysisEntry>,
}
