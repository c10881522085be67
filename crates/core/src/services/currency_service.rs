use crate::models::fx::FxRate;
use crate::providers::traits::RateProvider;

/// Resolves the foreign → home conversion rate once per refresh.
///
/// A failed or implausible live lookup never fails the refresh: the caller's
/// fallback constant is used instead and the returned [`FxRate`] is marked
/// as [`RateSource::Fallback`](crate::models::fx::RateSource::Fallback) so
/// the presentation layer can say so.
pub struct CurrencyService;

impl CurrencyService {
    pub fn new() -> Self {
        Self
    }

    /// Fetch `from` → `to` from the provider, or fall back.
    ///
    /// Same-currency requests resolve to 1.0 without a lookup.
    pub async fn resolve_rate(
        &self,
        provider: Option<&dyn RateProvider>,
        from_currency: &str,
        to_currency: &str,
        fallback: f64,
    ) -> FxRate {
        let from = from_currency.to_uppercase();
        let to = to_currency.to_uppercase();

        if from == to {
            return FxRate::live(&from, &to, 1.0, "identity");
        }

        let Some(provider) = provider else {
            log::warn!("No rate provider configured, using fallback {from}/{to} rate {fallback}");
            return FxRate::fallback(&from, &to, fallback);
        };

        match provider.get_rate(&from, &to).await {
            Ok(rate) if rate.is_finite() && rate > 0.0 => {
                log::debug!("{} quoted {from}/{to} at {rate}", provider.name());
                FxRate::live(&from, &to, rate, provider.name())
            }
            Ok(rate) => {
                log::warn!(
                    "{} returned unusable {from}/{to} rate {rate}, using fallback {fallback}",
                    provider.name()
                );
                FxRate::fallback(&from, &to, fallback)
            }
            Err(e) => {
                log::warn!(
                    "{} rate lookup for {from}/{to} failed ({e}), using fallback {fallback}",
                    provider.name()
                );
                FxRate::fallback(&from, &to, fallback)
            }
        }
    }
}

impl Default for CurrencyService {
    fn default() -> Self {
        Self::new()
    }
}
