use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::config::Config;

use super::error::{Result, ScrapeError};
use super::rules::ExtractRules;

/// Renders a page remotely and returns the extracted field bundle as raw bytes.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn fetch(&self, url: &str, rules: &ExtractRules) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone)]
pub struct ScrapingBeeClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl ScrapingBeeClient {
    pub fn new(config: &Config) -> Result<ScrapingBeeClient> {
        let mut builder = reqwest::Client::builder();
        if let Some(seconds) = config.scrape_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        Ok(ScrapingBeeClient {
            client: builder.build()?,
            endpoint: config.scrapingbee_url.clone(),
            api_key: config.scrapingbee_api_key.clone(),
        })
    }
}

#[async_trait]
impl Extractor for ScrapingBeeClient {
    async fn fetch(&self, url: &str, rules: &ExtractRules) -> Result<Vec<u8>> {
        Url::parse(url).map_err(|e| ScrapeError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let extract_rules = rules.to_json()?;
        let mut params: Vec<(&str, &str)> = vec![
            ("api_key", self.api_key.as_str()),
            ("url", url),
            ("extract_rules", extract_rules.as_str()),
        ];
        if let Some(wait_for) = rules.wait_for.as_deref() {
            params.push(("wait_for", wait_for));
        }

        info!("Extracting {} field(s) from {}", rules.fields.len(), url);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ScrapeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        debug!("Extraction of {} returned {} bytes", url, body.len());

        Ok(body.to_vec())
    }
}

/// Parses an extraction response into the expected field bundle.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let text = String::from_utf8_lossy(bytes);
    Ok(serde_json::from_str(&text)?)
}
