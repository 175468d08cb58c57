use std::time::Duration;

use serde::{Deserialize, Serialize};

use carchase_core::report::ScoreSubmission;

use crate::config::LeaderboardConfig;
use crate::error::LeaderboardError;

const ANONYMOUS: &str = "anonymous";

/// Body of `POST /log`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LogScoreRequest<'a> {
    username: &'a str,
    game: &'a str,
    score: u64,
    time_played_seconds: u64,
}

/// One row of `GET /leaderboard`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub username: String,
    pub game: String,
    pub high_score: u64,
    #[serde(default)]
    pub time_played: u64,
}

/// HTTP client for the leaderboard service.
#[derive(Debug, Clone)]
pub struct LeaderboardClient {
    config: LeaderboardConfig,
    http: reqwest::Client,
}

impl LeaderboardClient {
    pub fn new(config: LeaderboardConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("carchase-leaderboard/0.1")
            .timeout(Duration::from_secs(config.request_timeout_secs.max(1)))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to build HTTP client, using defaults");
                reqwest::Client::new()
            });
        Self { config, http }
    }

    pub fn config(&self) -> &LeaderboardConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// Pick the identity to submit under. Blank names count as missing.
    pub fn resolve_username<'a>(
        &self,
        username: Option<&'a str>,
    ) -> Result<&'a str, LeaderboardError> {
        match username.map(str::trim).filter(|u| !u.is_empty()) {
            Some(name) => Ok(name),
            None if self.config.allow_anonymous => Ok(ANONYMOUS),
            None => Err(LeaderboardError::Validation(
                "username is required".to_string(),
            )),
        }
    }

    /// `POST {base_url}/log` with the final score of one run.
    pub async fn post_score(&self, submission: &ScoreSubmission) -> Result<(), LeaderboardError> {
        let username = self.resolve_username(submission.username.as_deref())?;
        let game = if submission.game.is_empty() {
            self.config.game.as_str()
        } else {
            submission.game.as_str()
        };
        let body = LogScoreRequest {
            username,
            game,
            score: submission.score,
            time_played_seconds: submission.time_played_secs,
        };

        let resp = self
            .http
            .post(self.endpoint("log"))
            .json(&body)
            .send()
            .await
            .map_err(|e| LeaderboardError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(LeaderboardError::Status(resp.status().as_u16()));
        }
        Ok(())
    }

    /// `GET {base_url}/leaderboard`.
    pub async fn fetch_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let resp = self
            .http
            .get(self.endpoint("leaderboard"))
            .send()
            .await
            .map_err(|e| LeaderboardError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(LeaderboardError::Status(resp.status().as_u16()));
        }

        let text = resp
            .text()
            .await
            .map_err(|e| LeaderboardError::Network(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| LeaderboardError::Decode(e.to_string()))
    }

    /// Highest recorded score for `username` in the configured game.
    pub async fn personal_best(&self, username: &str) -> Result<Option<u64>, LeaderboardError> {
        let entries = self.fetch_leaderboard().await?;
        Ok(best_for(&entries, username, &self.config.game))
    }
}

fn best_for(entries: &[LeaderboardEntry], username: &str, game: &str) -> Option<u64> {
    entries
        .iter()
        .filter(|e| e.username == username && e.game == game)
        .map(|e| e.high_score)
        .max()
}
