//! HTTP leaderboard client

use super::{
    Acknowledgement, RemoteEntry, ReportError, ScoreReporter, ScoreSubmission, parse_leaderboard,
};
use crate::settings::Settings;

const SCORE_PATH: &str = "/api/game/score";
const LEADERBOARD_PATH: &str = "/api/game/leaderboard";
const API_KEY_HEADER: &str = "X-API-Key";

/// JSON-over-HTTP reporter. The credential, if any, comes from configuration.
#[derive(Debug, Clone)]
pub struct HttpReporter {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpReporter {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, ReportError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        reqwest::Url::parse(trimmed).map_err(|e| ReportError::InvalidUrl(format!("{trimmed}: {e}")))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: trimmed.to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    /// Build from settings; fails with `NotConfigured` when no server is set
    pub fn from_settings(settings: &Settings) -> Result<Self, ReportError> {
        let url = settings.server_url.trim();
        if url.is_empty() {
            return Err(ReportError::NotConfigured);
        }
        if settings.api_key.is_none() {
            log::warn!("No API key configured; requests are sent without credentials");
        }
        Self::new(url, settings.api_key.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, self.endpoint(path))
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        match &self.api_key {
            Some(key) => builder.header(API_KEY_HEADER, key),
            None => builder,
        }
    }

    async fn read_json(response: reqwest::Response) -> Result<serde_json::Value, ReportError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ReportError::Status(status.as_u16()));
        }
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl ScoreReporter for HttpReporter {
    async fn submit_score(&self, name: &str, score: u64) -> Result<Acknowledgement, ReportError> {
        let body = ScoreSubmission {
            player: name.to_string(),
            score,
        };
        let response = self
            .request(reqwest::Method::POST, SCORE_PATH)
            .json(&body)
            .send()
            .await?;
        let ack = Self::read_json(response).await?;
        log::info!("Score {} submitted for {}", score, name);
        Ok(Acknowledgement(ack))
    }

    async fn fetch_leaderboard(&self) -> Result<Vec<RemoteEntry>, ReportError> {
        let response = self
            .request(reqwest::Method::GET, LEADERBOARD_PATH)
            .send()
            .await?;
        let body = Self::read_json(response).await?;
        let entries = parse_leaderboard(body)?;
        log::info!("Fetched {} leaderboard entries", entries.len());
        Ok(entries)
    }
}
