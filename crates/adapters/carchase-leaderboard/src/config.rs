use serde::{Deserialize, Serialize};

/// Configuration for the leaderboard service connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardConfig {
    /// Service root, e.g. `http://localhost:3000/api`. Empty disables reporting.
    pub base_url: String,
    /// Game identifier sent with every score and used to find the personal best.
    pub game: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Submit as "anonymous" when no username is configured instead of
    /// rejecting the score.
    pub allow_anonymous: bool,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            game: "Car Chase".to_string(),
            request_timeout_secs: 5,
            allow_anonymous: true,
        }
    }
}

impl LeaderboardConfig {
    pub fn is_enabled(&self) -> bool {
        !self.base_url.trim().is_empty()
    }
}
