use serde::{Deserialize, Serialize};

use super::analytics::HoldingMetrics;

/// Tone of an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Warning,
    Opportunity,
    Info,
    Success,
}

/// Area of the portfolio an insight concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightCategory {
    Rebalancing,
    Performance,
    Risk,
    Tax,
    Opportunity,
}

/// Severity. Declaration order is the display order: high first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Impact::High => write!(f, "high"),
            Impact::Medium => write!(f, "medium"),
            Impact::Low => write!(f, "low"),
        }
    }
}

/// Value of a labelled insight metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum MetricValue {
    /// Percentage points
    Percent(f64),
    /// Home currency amount
    Amount(f64),
    Count(usize),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightMetric {
    pub label: String,
    pub value: MetricValue,
}

impl InsightMetric {
    pub fn new(label: impl Into<String>, value: MetricValue) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// One advisory record produced by the insight engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    /// Stable rule identifier (e.g., "overweight-positions")
    pub id: String,
    pub kind: InsightKind,
    pub category: InsightCategory,
    pub impact: Impact,
    pub title: String,
    pub description: String,
    /// Whether the insight suggests a concrete action
    pub actionable: bool,
    /// Holdings the insight refers to (at most the configured top-K)
    pub holdings: Vec<HoldingMetrics>,
    pub metrics: Vec<InsightMetric>,
}

impl Insight {
    /// Look up a metric by label.
    pub fn metric(&self, label: &str) -> Option<&MetricValue> {
        self.metrics
            .iter()
            .find(|m| m.label == label)
            .map(|m| &m.value)
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.holdings.iter().map(|h| h.symbol()).collect()
    }
}
