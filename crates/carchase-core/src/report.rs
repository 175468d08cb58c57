use serde::{Deserialize, Serialize};

use crate::generation::GenerationId;

/// Final result of one generation, handed to the score reporting gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub generation: GenerationId,
    /// Player identity; `None` when the host has no signed-in user.
    pub username: Option<String>,
    pub game: String,
    pub score: u64,
    pub time_played_secs: u64,
}

/// Outcome of a submission, reported back to the session that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionStatus {
    Accepted,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    pub generation: GenerationId,
    pub status: SubmissionStatus,
}

/// Score reporting gateway.
///
/// `submit` is fire-and-forget: implementations must return without
/// blocking and must never surface delivery failures to the caller.
pub trait ScoreSink: Send + Sync {
    fn submit(&self, submission: ScoreSubmission);
}

/// Sink used when no leaderboard is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardSink;

impl ScoreSink for DiscardSink {
    fn submit(&self, submission: ScoreSubmission) {
        tracing::debug!(
            generation = %submission.generation,
            score = submission.score,
            "No leaderboard configured, discarding score"
        );
    }
}
