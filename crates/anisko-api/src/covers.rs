//! Cover image downloads.

use std::time::Duration;

use reqwest::Client;

use anisko_core::config::AppConfig;

use crate::allanime::CatalogError;
use crate::traits::CoverSource;

/// Plain HTTP downloader for cover thumbnails.
#[derive(Clone)]
pub struct HttpCoverSource {
    http: Client,
}

impl HttpCoverSource {
    pub fn new(config: &AppConfig) -> Result<Self, CatalogError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.covers.timeout_secs))
            .user_agent(config.catalog.user_agent.as_str())
            .build()?;
        Ok(Self { http })
    }
}

impl CoverSource for HttpCoverSource {
    type Error = CatalogError;

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        tracing::debug!(url, "Fetching cover");
        let resp = self.http.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: format!("cover request failed: {url}"),
            });
        }
        let bytes = resp.bytes().await?;
        if bytes.is_empty() {
            return Err(CatalogError::Parse(format!("empty cover body: {url}")));
        }
        Ok(bytes.to_vec())
    }
}
