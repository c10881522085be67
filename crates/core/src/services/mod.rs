pub mod classifier_service;
pub mod currency_service;
pub mod insight_service;
pub mod metrics_service;
pub mod normalizer_service;
pub mod prompt_service;
