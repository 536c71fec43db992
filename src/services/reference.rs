// src/services/reference.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::extract;

/// Source of the reference-pricing text blob fed into the prompt.
///
/// Failure of any kind means "no reference data available"; the report is
/// generated without it and the user never sees an error.
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    async fn fetch(&self) -> Option<String>;
}

/// Fetches the fixed salary-scale PDF and extracts its text.
pub struct ReferenceFetcher {
    client: Client,
    url: String,
    timeout: Duration,
}

impl ReferenceFetcher {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl ReferenceSource for ReferenceFetcher {
    async fn fetch(&self) -> Option<String> {
        let response = match self
            .client
            .get(&self.url)
            .header(reqwest::header::USER_AGENT, "Mozilla/5.0")
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                debug!("Reference fetch failed: {}", err);
                return None;
            }
        };

        if response.status() != reqwest::StatusCode::OK {
            debug!("Reference fetch returned {}", response.status());
            return None;
        }

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!("Reference body read failed: {}", err);
                return None;
            }
        };

        extract::try_extract_text(&bytes)
    }
}
