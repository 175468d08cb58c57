/// Failures talking to the leaderboard service.
///
/// None of these reach the game loop; the reporter logs them and turns them
/// into a failed submission outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaderboardError {
    /// The request was rejected before sending (e.g. missing identity).
    Validation(String),
    /// Transport failure: connect, timeout, or body write.
    Network(String),
    /// The service answered with a non-success status.
    Status(u16),
    /// The response body could not be decoded.
    Decode(String),
}

impl std::fmt::Display for LeaderboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(m) => write!(f, "invalid submission: {m}"),
            Self::Network(m) => write!(f, "network error: {m}"),
            Self::Status(code) => write!(f, "leaderboard returned HTTP {code}"),
            Self::Decode(m) => write!(f, "malformed leaderboard response: {m}"),
        }
    }
}

impl std::error::Error for LeaderboardError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_detail() {
        assert_eq!(
            LeaderboardError::Status(503).to_string(),
            "leaderboard returned HTTP 503"
        );
        assert!(
            LeaderboardError::Validation("username is required".into())
                .to_string()
                .contains("username is required")
        );
    }
}
