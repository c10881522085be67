use crate::models::settings::{
    Settings, GEMINI_API_KEY, KITE_ACCESS_TOKEN, KITE_API_KEY, KITE_API_SECRET,
};

use super::gemini::GeminiClient;
use super::kite::KiteClient;
use super::spreadsheet::ForeignHoldingsFile;
use super::traits::{AnalysisModel, HoldingsSource};

/// Registry of the holdings sources consulted on every refresh.
///
/// Sources are fetched concurrently but their records are merged in
/// registration order, so the holdings array is stable across refreshes.
pub struct SourceRegistry {
    sources: Vec<Box<dyn HoldingsSource>>,
}

impl SourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Create a registry with every source the settings allow.
    pub fn new_with_defaults(settings: &Settings) -> Self {
        let mut registry = Self::new();

        // Kite needs both the API key and a session token
        match (
            settings.credential(KITE_API_KEY),
            settings.credential(KITE_ACCESS_TOKEN),
        ) {
            (Some(key), Some(token)) => {
                let mut kite = KiteClient::new(key).with_access_token(token);
                if let Some(secret) = settings.credential(KITE_API_SECRET) {
                    kite = kite.with_secret(secret);
                }
                registry.register(Box::new(kite));
            }
            (Some(_), None) => {
                log::warn!("Kite API key configured without an access token; broker feed disabled")
            }
            _ => {}
        }

        // Overseas sheet, optional
        if let Some(path) = settings
            .foreign_holdings_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
        {
            registry.register(Box::new(ForeignHoldingsFile::new(path)));
        }

        registry
    }

    /// Register a new source; it is merged after the existing ones.
    pub fn register(&mut self, source: Box<dyn HoldingsSource>) {
        self.sources.push(source);
    }

    pub fn sources(&self) -> &[Box<dyn HoldingsSource>] {
        &self.sources
    }

    pub fn names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The analysis model configured in settings, if its key is present.
pub fn default_analysis_model(settings: &Settings) -> Option<Box<dyn AnalysisModel>> {
    settings
        .credential(GEMINI_API_KEY)
        .map(|key| Box::new(GeminiClient::new(key, &settings.llm_model)) as Box<dyn AnalysisModel>)
}
