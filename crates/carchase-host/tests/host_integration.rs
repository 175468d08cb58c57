mod common;

use carchase_core::generation::GenerationId;
use carchase_core::report::SubmissionStatus;
use carchase_runner::render::RESTART_PROMPT;

use common::{MockLeaderboard, batch_config, unreachable_url};

#[tokio::test]
async fn plays_requested_runs_without_leaderboard() {
    let report = carchase_host::run(batch_config(2)).await;

    assert_eq!(report.runs.len(), 2);
    assert_eq!(report.runs[0].generation, GenerationId::FIRST);
    assert_eq!(report.runs[1].generation, GenerationId::new(2));
    assert!(report.last_submission.is_none());

    let frame = report.recorder.last_frame();
    assert!(frame.contains_text("GAME OVER"));
    assert!(frame.contains_text(RESTART_PROMPT));
    assert!(report.recorder.frames() > 100);
}

#[tokio::test]
async fn seeded_runs_are_reproducible() {
    let a = carchase_host::run(batch_config(2)).await;
    let b = carchase_host::run(batch_config(2)).await;
    assert_eq!(a.runs, b.runs);
}

#[tokio::test]
async fn submits_once_per_run_and_shows_saved() {
    let server = MockLeaderboard::new(serde_json::json!([
        {"username": "ada", "game": "Car Chase", "highScore": 5, "timePlayed": 3}
    ]))
    .await;
    let mut config = batch_config(2);
    config.username = Some("ada".to_string());
    config.leaderboard.base_url = server.base_url();

    let report = carchase_host::run(config).await;

    assert_eq!(report.runs.len(), 2);
    let posts = server.posts();
    assert_eq!(posts.len(), 2);
    for (post, run) in posts.iter().zip(&report.runs) {
        assert_eq!(post["username"], "ada");
        assert_eq!(post["game"], "Car Chase");
        assert_eq!(post["score"], run.final_score);
        assert_eq!(post["timePlayedSeconds"], run.time_played_secs);
    }

    assert_eq!(report.last_submission, Some(SubmissionStatus::Accepted));
    assert!(report.recorder.last_frame().contains_text("Score saved"));
    assert!(report.personal_best >= Some(5));
}

#[tokio::test]
async fn network_failure_still_renders_overlay() {
    let mut config = batch_config(1);
    config.username = Some("ada".to_string());
    config.leaderboard.base_url = unreachable_url().await;

    let report = carchase_host::run(config).await;

    assert_eq!(report.runs.len(), 1);
    assert_eq!(report.last_submission, Some(SubmissionStatus::Failed));

    let frame = report.recorder.last_frame();
    assert!(frame.contains_text("GAME OVER"));
    assert!(frame.contains_text(&format!("Final score: {}", report.runs[0].final_score)));
    assert!(!frame.contains_text("Score saved"));
    assert!(!frame.contains_text("Best:"), "failed lookup leaves personal best empty");
}

#[tokio::test]
async fn server_error_is_swallowed() {
    let server = MockLeaderboard::failing().await;
    let mut config = batch_config(1);
    config.leaderboard.base_url = server.base_url();

    let report = carchase_host::run(config).await;

    assert_eq!(report.runs.len(), 1);
    assert_eq!(report.last_submission, Some(SubmissionStatus::Failed));
    assert!(report.recorder.last_frame().contains_text("GAME OVER"));
}
