pub mod generation;
pub mod geometry;
pub mod input;
pub mod powerup;
pub mod render;
pub mod report;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::sync::{Arc, Mutex};

    use crate::generation::GenerationId;
    use crate::report::{ScoreSink, ScoreSubmission};

    /// Score sink that keeps every submission in memory.
    ///
    /// Clones share the same buffer, so a test can hand one clone to the
    /// session and inspect the other.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingSink {
        submissions: Arc<Mutex<Vec<ScoreSubmission>>>,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn submissions(&self) -> Vec<ScoreSubmission> {
            self.submissions
                .lock()
                .map(|s| s.clone())
                .unwrap_or_default()
        }

        pub fn count(&self) -> usize {
            self.submissions.lock().map(|s| s.len()).unwrap_or(0)
        }

        /// Number of submissions produced by one generation.
        pub fn count_for(&self, generation: GenerationId) -> usize {
            self.submissions()
                .iter()
                .filter(|s| s.generation == generation)
                .count()
        }
    }

    impl ScoreSink for RecordingSink {
        fn submit(&self, submission: ScoreSubmission) {
            if let Ok(mut s) = self.submissions.lock() {
                s.push(submission);
            }
        }
    }

    /// Build a submission with fixed metadata for gateway tests.
    pub fn make_submission(generation: u64, username: Option<&str>, score: u64) -> ScoreSubmission {
        ScoreSubmission {
            generation: GenerationId::new(generation),
            username: username.map(str::to_string),
            game: "Car Chase".to_string(),
            score,
            time_played_secs: 42,
        }
    }

}
