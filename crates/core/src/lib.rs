pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::Utc;
use futures::future::join_all;
use models::{
    analysis::{AnalysisDocument, AnalysisEntry, AnalysisReply, AnalysisSubject},
    fx::FxRate,
    raw::RawRecord,
    settings::{Settings, GEMINI_API_KEY, KITE_ACCESS_TOKEN, KITE_API_KEY, KITE_API_SECRET},
    snapshot::Snapshot,
};
use providers::{
    exchange_rate::ExchangeRateApiProvider,
    kite::{KiteClient, SessionToken},
    registry::{default_analysis_model, SourceRegistry},
    traits::{AnalysisModel, RateProvider},
};
use services::{
    classifier_service::Classifier, currency_service::CurrencyService,
    insight_service::InsightService, metrics_service::MetricsService,
    normalizer_service::NormalizerService, prompt_service::PromptService,
};
use storage::{config::ConfigLoader, history::AnalysisHistory};

use errors::CoreError;

/// Main entry point for the FolioLens core library.
///
/// Owns the settings and every collaborator a refresh needs. The analysis
/// pass itself (`analyze`) is synchronous and pure; `refresh` wraps it with
/// the concurrent source fetches and the FX lookup.
#[must_use]
pub struct FolioLens {
    settings: Settings,
    sources: SourceRegistry,
    rate_provider: Option<Box<dyn RateProvider>>,
    analysis_model: Option<Box<dyn AnalysisModel>>,
    history: AnalysisHistory,
    normalizer: NormalizerService,
    metrics_service: MetricsService,
    insight_service: InsightService,
    currency_service: CurrencyService,
    prompt_service: PromptService,
}

impl std::fmt::Debug for FolioLens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolioLens")
            .field("home_currency", &self.settings.home_currency)
            .field("sources", &self.sources.names())
            .field("rate_provider", &self.rate_provider.as_ref().map(|p| p.name()))
            .field("analysis_model", &self.analysis_model.as_ref().map(|m| m.name()))
            .field("history_dir", &self.history.dir())
            .finish()
    }
}

impl FolioLens {
    /// Offline instance: no sources, no rate provider, no analysis model.
    /// Collaborators are attached with the `with_*` methods.
    pub fn new(settings: Settings) -> Self {
        let classifier = Classifier::from_settings(&settings);
        Self {
            normalizer: NormalizerService::new(classifier, &settings.home_currency),
            metrics_service: MetricsService::new(settings.thresholds.clone()),
            insight_service: InsightService::new(settings.thresholds.clone()),
            currency_service: CurrencyService::new(),
            prompt_service: PromptService::new(),
            history: AnalysisHistory::new(&settings.history_dir),
            sources: SourceRegistry::new(),
            rate_provider: None,
            analysis_model: None,
            settings,
        }
    }

    /// Instance wired to the live collaborators the settings allow: the
    /// broker feed and sheet, the exchange-rate API, and the LLM.
    pub fn with_defaults(settings: Settings) -> Self {
        let sources = SourceRegistry::new_with_defaults(&settings);
        let model = default_analysis_model(&settings);
        Self::new(settings)
            .with_sources(sources)
            .with_rate_provider(Box::new(ExchangeRateApiProvider::new()))
            .with_optional_analysis_model(model)
    }

    /// Load settings from a JSON file (defaults if absent), overlay
    /// credentials from the environment, validate, and wire defaults.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(config_path: &str) -> Result<Self, CoreError> {
        let mut settings = ConfigLoader::load_from_file(config_path)?;
        ConfigLoader::apply_env(&mut settings);
        ConfigLoader::validate(&settings)?;
        Ok(Self::with_defaults(settings))
    }

    pub fn with_sources(mut self, sources: SourceRegistry) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_rate_provider(mut self, provider: Box<dyn RateProvider>) -> Self {
        self.rate_provider = Some(provider);
        self
    }

    pub fn with_analysis_model(mut self, model: Box<dyn AnalysisModel>) -> Self {
        self.analysis_model = Some(model);
        self
    }

    fn with_optional_analysis_model(mut self, model: Option<Box<dyn AnalysisModel>>) -> Self {
        self.analysis_model = model;
        self
    }

    pub fn with_history(mut self, history: AnalysisHistory) -> Self {
        self.history = history;
        self
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn sources(&self) -> &SourceRegistry {
        &self.sources
    }

    #[must_use]
    pub fn has_analysis_model(&self) -> bool {
        self.analysis_model.is_some()
    }

    // ── Refresh & Analysis ──────────────────────────────────────────

    /// Fetch every source concurrently, resolve the FX rate once, and run
    /// the analysis pass.
    ///
    /// A failing required source fails the refresh. A failing optional
    /// source is logged and left out. A failing rate lookup falls back to
    /// the configured constant.
    pub async fn refresh(&self) -> Result<Snapshot, CoreError> {
        let fetches = join_all(self.sources.sources().iter().map(|s| s.fetch()));
        let (results, fx) = futures::join!(fetches, self.resolve_fx());

        let mut records: Vec<RawRecord> = Vec::new();
        for (source, result) in self.sources.sources().iter().zip(results) {
            match result {
                Ok(batch) => {
                    log::debug!("{}: {} record(s)", source.name(), batch.len());
                    records.extend(batch);
                }
                Err(e) if source.required() => {
                    log::error!("{} failed: {e}", source.name());
                    return Err(e);
                }
                Err(e) => log::warn!("Skipping optional source {}: {e}", source.name()),
            }
        }

        Ok(self.analyze(&records, fx))
    }

    /// The synchronous pass: normalize → metrics → insights.
    #[must_use]
    pub fn analyze(&self, records: &[RawRecord], fx: FxRate) -> Snapshot {
        let holdings = self.normalizer.normalize(records, &fx);
        let metrics = self
            .metrics_service
            .compute(&holdings, &self.settings.home_currency);
        let insights = self.insight_service.generate(&metrics);
        log::info!(
            "Analyzed {} holding(s), {} insight(s)",
            holdings.len(),
            insights.len()
        );
        Snapshot {
            generated_at: Utc::now(),
            fx,
            holdings,
            metrics,
            insights,
        }
    }

    /// Foreign → home rate for this refresh (fallback on any failure).
    pub async fn resolve_fx(&self) -> FxRate {
        self.currency_service
            .resolve_rate(
                self.rate_provider.as_deref(),
                &self.settings.foreign_currency,
                &self.settings.home_currency,
                self.settings.fallback_fx_rate,
            )
            .await
    }

    // ── Broker session ──────────────────────────────────────────────

    /// Exchange a broker login `request_token` for an access token, store it
    /// in the settings and rebuild the default source registry.
    pub async fn connect_broker(&mut self, request_token: &str) -> Result<SessionToken, CoreError> {
        let key = self
            .settings
            .credential(KITE_API_KEY)
            .ok_or_else(|| CoreError::MissingCredential(KITE_API_KEY.into()))?
            .to_string();
        let secret = self
            .settings
            .credential(KITE_API_SECRET)
            .ok_or_else(|| CoreError::MissingCredential(KITE_API_SECRET.into()))?
            .to_string();

        let mut kite = KiteClient::new(key).with_secret(secret);
        let session = kite.exchange_request_token(request_token).await?;

        self.settings
            .credentials
            .insert(KITE_ACCESS_TOKEN.to_string(), session.access_token.clone());
        self.sources = SourceRegistry::new_with_defaults(&self.settings);
        Ok(session)
    }

    /// Browser URL that starts the broker login, if an API key is set.
    #[must_use]
    pub fn broker_login_url(&self) -> Option<String> {
        self.settings
            .credential(KITE_API_KEY)
            .map(|key| KiteClient::new(key).login_url())
    }

    // ── LLM analysis ────────────────────────────────────────────────

    /// Ask the analysis model about the whole portfolio; optionally save
    /// the answer to the history. A failed save is logged and leaves
    /// `entry` empty; the content is still returned.
    pub async fn request_portfolio_analysis(
        &self,
        snapshot: &Snapshot,
        save: bool,
    ) -> Result<AnalysisReply, CoreError> {
        let prompt = self
            .prompt_service
            .portfolio_prompt(snapshot, Utc::now().date_naive());
        self.run_analysis(&prompt, AnalysisSubject::Portfolio, save)
            .await
    }

    /// Ask the analysis model about one holding of the snapshot.
    pub async fn request_holding_analysis(
        &self,
        snapshot: &Snapshot,
        symbol: &str,
        save: bool,
    ) -> Result<AnalysisReply, CoreError> {
        let prompt = self
            .prompt_service
            .holding_prompt(snapshot, symbol, Utc::now().date_naive())?;
        let subject = AnalysisSubject::Holding(symbol.trim().to_uppercase());
        self.run_analysis(&prompt, subject, save).await
    }

    async fn run_analysis(
        &self,
        prompt: &str,
        subject: AnalysisSubject,
        save: bool,
    ) -> Result<AnalysisReply, CoreError> {
        let model = self
            .analysis_model
            .as_ref()
            .ok_or_else(|| CoreError::MissingCredential(GEMINI_API_KEY.into()))?;

        let content = model.generate(prompt).await?;
        // A failed save must not cost the generated answer
        let entry = if save {
            match self.history.save(&content, &subject) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::error!("Could not save {} to history: {e}", subject.title());
                    None
                }
            }
        } else {
            None
        };
        Ok(AnalysisReply { content, entry })
    }

    // ── History ─────────────────────────────────────────────────────

    pub fn save_analysis(
        &self,
        content: &str,
        subject: &AnalysisSubject,
    ) -> Result<AnalysisEntry, CoreError> {
        self.history.save(content, subject)
    }

    /// Saved analyses, newest first.
    pub fn list_analyses(&self) -> Result<Vec<AnalysisEntry>, CoreError> {
        self.history.list()
    }

    pub fn read_analysis(&self, id: &str) -> Result<AnalysisDocument, CoreError> {
        self.history.read(id)
    }

    pub fn delete_analysis(&self, id: &str) -> Result<(), CoreError> {
        self.history.delete(id)
    }
}
