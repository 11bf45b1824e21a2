//! chainz.cryptoid.info explorer client

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::models::{Observation, WatchTarget};

use super::BalanceProvider;

const SUMMARY_ENDPOINT: &str = "explorer summary";
const BALANCE_ENDPOINT: &str = "balance query";

/// Longest body excerpt included in logs for unreadable balances
const BODY_PREVIEW_LEN: usize = 80;

/// Balance provider backed by the chainz block explorer API
#[derive(Debug, Clone)]
pub struct ChainzProvider {
    client: Client,
    base_url: Url,
    min_summary_bytes: usize,
}

impl ChainzProvider {
    /// Create a provider from configuration
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: Url::parse(&config.base_url)?,
            min_summary_bytes: config.min_summary_bytes,
        })
    }

    /// Explorer base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    async fn get(&self, endpoint: &'static str, url: Url, query: &[(&str, &str)]) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .query(query)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| Error::transport(endpoint, e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::transport(endpoint, e))?;

        debug!(endpoint, %status, bytes = body.len(), "Provider responded");
        Ok(body.to_vec())
    }
}

#[async_trait]
impl BalanceProvider for ChainzProvider {
    async fn is_available(&self) -> Result<bool> {
        let url = self.endpoint("explorer/api.dws")?;
        let body = self.get(SUMMARY_ENDPOINT, url, &[("q", "summary")]).await?;

        Ok(body.len() > self.min_summary_bytes)
    }

    async fn fetch_balance(&self, target: &WatchTarget) -> Result<Observation> {
        let url = self.endpoint(&format!("{}/api.dws", target.coin.to_lowercase()))?;
        let body = self
            .get(
                BALANCE_ENDPOINT,
                url,
                &[
                    ("q", "getbalance"),
                    ("a", target.address.as_str()),
                    ("key", target.api_key.as_str()),
                ],
            )
            .await?;

        let text = String::from_utf8_lossy(&body);
        let observation = Observation::from_body(&text);

        match observation {
            Observation::Amount(amount) => {
                info!(
                    symbol = %target.symbol(),
                    amount = %crate::format::amount(amount),
                    "Current amount of {}",
                    target.symbol()
                );
            }
            Observation::Unavailable => {
                let preview: String = text.trim().chars().take(BODY_PREVIEW_LEN).collect();
                warn!(body = %preview, "Balance response is not a number");
            }
        }

        Ok(observation)
    }
}
