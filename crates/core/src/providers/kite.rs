use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::raw::{BrokerEquityRecord, BrokerFundRecord, RawRecord};
use super::traits::HoldingsSource;

const API_URL: &str = "https://api.kite.trade";
const LOGIN_URL: &str = "https://kite.zerodha.com/connect/login";
const KITE_VERSION: &str = "3";
const PROVIDER: &str = "Kite";

/// Kite Connect (v3) client for the domestic broker account.
///
/// - **Auth**: developer token flow. The user logs in at [`login_url`],
///   the redirect carries a `request_token`, and
///   [`exchange_request_token`] trades it for an access token valid until
///   the next morning.
/// - **Endpoints**: `/portfolio/holdings` (equities), `/mf/holdings` (funds).
///
/// [`login_url`]: KiteClient::login_url
/// [`exchange_request_token`]: KiteClient::exchange_request_token
pub struct KiteClient {
    client: Client,
    base_url: String,
    api_key: String,
    api_secret: Option<String>,
    access_token: Option<String>,
}

/// Session returned by `/session/token`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionToken {
    pub user_id: String,
    #[serde(default)]
    pub user_name: Option<String>,
    pub access_token: String,
    #[serde(default)]
    pub public_token: Option<String>,
    #[serde(default)]
    pub login_time: Option<String>,
}

// ── Kite API response envelope ──────────────────────────────────────

#[derive(Deserialize)]
struct Envelope<T> {
    status: String,
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

impl KiteClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: API_URL.to_string(),
            api_key: api_key.into(),
            api_secret: None,
            access_token: None,
        }
    }

    pub fn with_secret(mut self, api_secret: impl Into<String>) -> Self {
        self.api_secret = Some(api_secret.into());
        self
    }

    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    /// Point the client at a different host (sandbox, local stubs).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn has_access_token(&self) -> bool {
        self.access_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Browser URL that starts the login flow.
    pub fn login_url(&self) -> String {
        format!("{LOGIN_URL}?api_key={}&v={KITE_VERSION}", self.api_key)
    }

    /// Hex SHA-256 of `api_key + request_token + api_secret`.
    pub fn checksum(api_key: &str, request_token: &str, api_secret: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(api_key.as_bytes());
        hasher.update(request_token.as_bytes());
        hasher.update(api_secret.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Trade a login `request_token` for a session. The returned access
    /// token is also kept on the client for subsequent calls.
    pub async fn exchange_request_token(
        &mut self,
        request_token: &str,
    ) -> Result<SessionToken, CoreError> {
        let request_token = request_token.trim();
        if request_token.is_empty() {
            return Err(CoreError::MissingCredential("request_token".into()));
        }
        let secret = self
            .api_secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CoreError::MissingCredential("kite_api_secret".into()))?;

        let checksum = Self::checksum(&self.api_key, request_token, secret);
        let form = [
            ("api_key", self.api_key.as_str()),
            ("request_token", request_token),
            ("checksum", checksum.as_str()),
        ];

        let resp = self
            .client
            .post(format!("{}/session/token", self.base_url))
            .header("X-Kite-Version", KITE_VERSION)
            .form(&form)
            .send()
            .await?;
        let session: SessionToken = Self::unwrap_envelope(resp, "session/token").await?;

        log::info!("Kite session established for {}", session.user_id);
        self.access_token = Some(session.access_token.clone());
        Ok(session)
    }

    pub async fn fetch_equity_holdings(&self) -> Result<Vec<BrokerEquityRecord>, CoreError> {
        self.get("portfolio/holdings").await
    }

    pub async fn fetch_fund_holdings(&self) -> Result<Vec<BrokerFundRecord>, CoreError> {
        self.get("mf/holdings").await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, CoreError> {
        let token = self
            .access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CoreError::MissingCredential("kite_access_token".into()))?;

        let resp = self
            .client
            .get(format!("{}/{path}", self.base_url))
            .header("X-Kite-Version", KITE_VERSION)
            .header("Authorization", format!("token {}:{token}", self.api_key))
            .send()
            .await?;
        Self::unwrap_envelope(resp, path).await
    }

    /// Decode `{status, data, message}`; anything but `status: "success"`
    /// with data is an API error carrying the broker's message.
    async fn unwrap_envelope<T: DeserializeOwned>(
        resp: reqwest::Response,
        path: &str,
    ) -> Result<T, CoreError> {
        let http_status = resp.status();
        let body = resp.text().await?;
        let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to parse {path} response (HTTP {http_status}): {e}"),
        })?;

        if !http_status.is_success() || envelope.status != "success" {
            let message = envelope
                .message
                .unwrap_or_else(|| format!("{path} failed with HTTP {http_status}"));
            return Err(CoreError::Api {
                provider: PROVIDER.into(),
                message,
            });
        }

        envelope.data.ok_or_else(|| CoreError::EmptyResponse(format!("{PROVIDER} {path}")))
    }
}

/// Equities first, then funds, each in feed order.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl HoldingsSource for KiteClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn fetch(&self) -> Result<Vec<RawRecord>, CoreError> {
        let (equities, funds) =
            futures::try_join!(self.fetch_equity_holdings(), self.fetch_fund_holdings())?;
        log::debug!(
            "Kite returned {} equity and {} fund holding(s)",
            equities.len(),
            funds.len()
        );
        Ok(equities
            .into_iter()
            .map(RawRecord::BrokerEquity)
            .chain(funds.into_iter().map(RawRecord::BrokerFund))
            .collect())
    }
}
