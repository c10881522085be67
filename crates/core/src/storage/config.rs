use std::collections::HashMap;
use std::path::Path;

use crate::errors::CoreError;
use crate::models::settings::{
    Settings, GEMINI_API_KEY, KITE_ACCESS_TOKEN, KITE_API_KEY, KITE_API_SECRET,
};

/// Environment variable → credential name.
pub const CREDENTIAL_ENV_VARS: [(&str, &str); 4] = [
    ("KITE_API_KEY", KITE_API_KEY),
    ("KITE_API_SECRET", KITE_API_SECRET),
    ("KITE_ACCESS_TOKEN", KITE_ACCESS_TOKEN),
    ("GEMINI_API_KEY", GEMINI_API_KEY),
];

/// Load and save [`Settings`] as pretty-printed JSON.
///
/// Missing keys take their defaults, so a partial file (or `{}`) is valid.
/// Credentials usually come from the environment and are layered on top
/// with [`apply_env`](ConfigLoader::apply_env).
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load_from_bytes(data: &[u8]) -> Result<Settings, CoreError> {
        serde_json::from_slice(data)
            .map_err(|e| CoreError::Config(format!("Invalid settings file: {e}")))
    }

    pub fn save_to_bytes(settings: &Settings) -> Result<Vec<u8>, CoreError> {
        serde_json::to_vec_pretty(settings)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize settings: {e}")))
    }

    /// Load settings from disk; a missing file yields defaults.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Settings, CoreError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Ok(Settings::default());
        }
        let bytes = std::fs::read(path)?;
        Self::load_from_bytes(&bytes)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(settings: &Settings, path: impl AsRef<Path>) -> Result<(), CoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, Self::save_to_bytes(settings)?)?;
        Ok(())
    }

    /// Overlay credentials from the process environment.
    pub fn apply_env(settings: &mut Settings) {
        let vars: HashMap<String, String> = CREDENTIAL_ENV_VARS
            .iter()
            .filter_map(|(var, _)| std::env::var(var).ok().map(|v| (var.to_string(), v)))
            .collect();
        Self::apply_env_from(settings, &vars);
    }

    /// Overlay credentials from `vars` (environment-variable names as keys).
    /// Empty values are ignored so they never shadow a configured key.
    pub fn apply_env_from(settings: &mut Settings, vars: &HashMap<String, String>) {
        for (var, credential) in CREDENTIAL_ENV_VARS {
            if let Some(value) = vars.get(var).map(|v| v.trim()).filter(|v| !v.is_empty()) {
                log::debug!("Credential {credential} taken from {var}");
                settings
                    .credentials
                    .insert(credential.to_string(), value.to_string());
            }
        }
    }

    /// Validate values the pipeline depends on.
    pub fn validate(settings: &Settings) -> Result<(), CoreError> {
        if !(settings.fallback_fx_rate.is_finite() && settings.fallback_fx_rate > 0.0) {
            return Err(CoreError::Config(format!(
                "fallback_fx_rate must be a positive number, got {}",
                settings.fallback_fx_rate
            )));
        }
        for (field, code) in [
            ("home_currency", &settings.home_currency),
            ("foreign_currency", &settings.foreign_currency),
        ] {
            if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(CoreError::Config(format!(
                    "{field} must be a 3-letter currency code, got '{code}'"
                )));
            }
        }
        if settings.history_dir.trim().is_empty() {
            return Err(CoreError::Config("history_dir must not be empty".into()));
        }
        Ok(())
    }
}
