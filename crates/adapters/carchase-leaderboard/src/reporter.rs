use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use carchase_core::report::{ScoreSink, ScoreSubmission, SubmissionOutcome, SubmissionStatus};

use crate::client::LeaderboardClient;

/// Fire-and-forget score sink backed by the leaderboard service.
///
/// Each submission runs on its own tokio task that owns a copy of the data,
/// so `submit` returns immediately and never blocks the tick loop. Results
/// come back, tagged with their generation, on the optional outcome channel.
pub struct LeaderboardReporter {
    client: Arc<LeaderboardClient>,
    runtime: Handle,
    outcomes: Option<mpsc::UnboundedSender<SubmissionOutcome>>,
}

impl LeaderboardReporter {
    pub fn new(client: LeaderboardClient, runtime: Handle) -> Self {
        Self {
            client: Arc::new(client),
            runtime,
            outcomes: None,
        }
    }

    /// Build a reporter together with the receiving end of its outcome channel.
    pub fn with_outcomes(
        client: LeaderboardClient,
        runtime: Handle,
    ) -> (Self, mpsc::UnboundedReceiver<SubmissionOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut reporter = Self::new(client, runtime);
        reporter.outcomes = Some(tx);
        (reporter, rx)
    }
}

impl ScoreSink for LeaderboardReporter {
    fn submit(&self, submission: ScoreSubmission) {
        let client = Arc::clone(&self.client);
        let outcomes = self.outcomes.clone();

        self.runtime.spawn(async move {
            let generation = submission.generation;
            let status = match client.post_score(&submission).await {
                Ok(()) => {
                    tracing::info!(
                        %generation,
                        score = submission.score,
                        "Score submitted"
                    );
                    SubmissionStatus::Accepted
                },
                Err(e) => {
                    tracing::warn!(%generation, error = %e, "Score submission failed");
                    SubmissionStatus::Failed
                },
            };
            if let Some(tx) = outcomes {
                // The session may already be gone
                let _ = tx.send(SubmissionOutcome { generation, status });
            }
        });
    }
}
