// HTTP client for the location backend
use crate::application::location_repository::LocationRepository;
use crate::domain::error::ViewerError;
use crate::domain::position::PositionBatch;
use crate::domain::selection::DateSelection;
use crate::infrastructure::payload::{decode_available_dates, decode_positions};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use std::time::Duration;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Clone)]
pub struct LocationApiRepository {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl LocationApiRepository {
    pub fn new(base_url: String, token: Option<String>, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    fn query_url(&self, selection: &DateSelection) -> Result<String, ViewerError> {
        let params = match *selection {
            DateSelection::Day { date, period } => format!(
                "date={}&duration={}",
                encode_instant(date.and_time(chrono::NaiveTime::MIN).and_utc()),
                period.as_str()
            ),
            DateSelection::Range { .. } => {
                let (from, to) = selection.window()?;
                format!("start={}&end={}", encode_instant(from), encode_instant(to))
            }
        };
        Ok(self.with_token(format!("{}/api/query?{}", self.base_url, params)))
    }

    fn available_url(&self) -> String {
        let url = format!("{}/api/available", self.base_url);
        match self.token {
            Some(_) => self.with_token(format!("{}?", url)),
            None => url,
        }
    }

    fn with_token(&self, url: String) -> String {
        match &self.token {
            Some(token) => {
                let separator = if url.ends_with('?') { "" } else { "&" };
                format!("{}{}token={}", url, separator, urlencoding::encode(token))
            }
            None => url,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request to location backend")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Location backend answered {}: {}", status, body);
        }

        response
            .json::<T>()
            .await
            .context("Failed to parse location backend response")
    }
}

fn encode_instant(instant: DateTime<Utc>) -> String {
    urlencoding::encode(&instant.format(TIMESTAMP_FORMAT).to_string()).into_owned()
}

#[async_trait]
impl LocationRepository for LocationApiRepository {
    async fn fetch_positions(&self, selection: &DateSelection) -> Result<PositionBatch> {
        let url = self.query_url(selection)?;
        let payload: serde_json::Value = self.get_json(&url).await?;
        let batch = decode_positions(payload)?;
        tracing::debug!(
            "Decoded {} positions for {} device(s)",
            batch.record_count(),
            batch.device_count()
        );
        Ok(batch)
    }

    async fn fetch_available_dates(&self) -> Result<Vec<NaiveDate>> {
        let days: Vec<String> = self.get_json(&self.available_url()).await?;
        Ok(decode_available_dates(days))
    }
}
