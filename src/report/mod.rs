//! Remote score reporting
//!
//! The leaderboard service is reached through [`ScoreReporter`]. The game core
//! never blocks on it; calls only happen while no session is playing.

mod http;

pub use http::HttpReporter;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Server responded with status {0}")]
    Status(u16),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),
    #[error("Leaderboard response is not a list")]
    UnexpectedBody,
    #[error("No score server configured")]
    NotConfigured,
}

/// Body of a score submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub player: String,
    pub score: u64,
}

/// Whatever the server returns for an accepted submission
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Acknowledgement(pub serde_json::Value);

/// One row of the remote leaderboard. Older servers send `name`, newer ones
/// send `player`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RemoteEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub score: u64,
}

impl RemoteEntry {
    pub fn new(player: impl Into<String>, score: u64) -> Self {
        Self {
            player: Some(player.into()),
            name: None,
            score,
        }
    }

    pub fn display_name(&self) -> &str {
        self.player
            .as_deref()
            .filter(|p| !p.is_empty())
            .or(self.name.as_deref())
            .unwrap_or("")
    }
}

/// Parse a leaderboard body. Anything other than a JSON array is rejected.
pub fn parse_leaderboard(body: serde_json::Value) -> Result<Vec<RemoteEntry>, ReportError> {
    if !body.is_array() {
        return Err(ReportError::UnexpectedBody);
    }
    Ok(serde_json::from_value(body)?)
}

/// Remote leaderboard service
#[allow(async_fn_in_trait)]
pub trait ScoreReporter {
    async fn submit_score(&self, name: &str, score: u64) -> Result<Acknowledgement, ReportError>;

    async fn fetch_leaderboard(&self) -> Result<Vec<RemoteEntry>, ReportError>;
}
