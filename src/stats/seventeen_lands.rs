//! Public card ratings endpoint.
//!
//! One GET per archetype. The aggregate request omits the `colors`
//! filter; two-color requests pass the archetype tag.
//!
//! Endpoint: `https://www.17lands.com/card_ratings/data`
//! Auth: None required.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use reqwest::Client;
use tracing::debug;

use super::StatsSource;
use crate::config::StatsConfig;
use crate::types::{Archetype, DraftError, StatRecord};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// HTTP client for the ratings endpoint.
pub struct SeventeenLandsClient {
    http: Client,
    base_url: String,
    expansion: String,
    format: String,
    lookback_days: i64,
}

impl SeventeenLandsClient {
    pub fn new(cfg: &StatsConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(cfg.timeout_secs))
            .user_agent("DRAFTSIGNAL/0.1.0")
            .build()
            .context("Failed to build ratings HTTP client")?;

        Ok(Self {
            http,
            base_url: cfg.base_url.clone(),
            expansion: cfg.expansion.clone(),
            format: cfg.format.clone(),
            lookback_days: cfg.lookback_days,
        })
    }

    /// Request URL for one archetype, with the date window ending `today`.
    fn query_url(&self, archetype: Archetype, today: NaiveDate) -> String {
        let start = today - Duration::days(self.lookback_days);
        let mut url = format!(
            "{}?expansion={}&format={}&start_date={}&end_date={}",
            self.base_url,
            urlencoding::encode(&self.expansion),
            urlencoding::encode(&self.format),
            start.format(DATE_FORMAT),
            today.format(DATE_FORMAT),
        );
        if !archetype.is_aggregate() {
            url.push_str("&colors=");
            url.push_str(archetype.as_str());
        }
        url
    }
}

#[async_trait]
impl StatsSource for SeventeenLandsClient {
    async fn fetch_ratings(&self, archetype: Archetype) -> Result<Vec<StatRecord>> {
        let url = self.query_url(archetype, Utc::now().date_naive());
        debug!(url = %url, archetype = %archetype, "Fetching card ratings");

        let resp = self.http.get(&url).send().await.map_err(|e| DraftError::FetchFailed {
            archetype,
            message: e.to_string(),
        })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DraftError::FetchFailed {
                archetype,
                message: format!("HTTP {status}: {body}"),
            }
            .into());
        }

        let records: Vec<StatRecord> = resp.json().await.map_err(|e| DraftError::Malformed {
            source_name: format!("ratings response ({archetype})"),
            message: e.to_string(),
        })?;

        Ok(records)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
