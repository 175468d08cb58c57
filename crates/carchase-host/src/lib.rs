pub mod autopilot;
pub mod config;
pub mod recorder;

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use carchase_core::input::InputAction;
use carchase_core::report::{DiscardSink, ScoreSink, SubmissionOutcome, SubmissionStatus};
use carchase_leaderboard::{LeaderboardClient, LeaderboardReporter};
use carchase_runner::{Phase, RunSummary, Session, TickEvent};

use autopilot::Autopilot;
use config::HostConfig;
use recorder::FrameRecorder;

/// What a host session produced.
#[derive(Debug)]
pub struct HostReport {
    pub runs: Vec<RunSummary>,
    pub personal_best: Option<u64>,
    /// Submission status of the final run, if it arrived in time.
    pub last_submission: Option<SubmissionStatus>,
    pub recorder: FrameRecorder,
}

impl HostReport {
    pub fn best_score(&self) -> Option<u64> {
        self.runs.iter().map(|r| r.final_score).max()
    }
}

/// Wire the session to its collaborators and drive it until `max_runs`
/// runs have finished.
pub async fn run(config: HostConfig) -> HostReport {
    let runner = Arc::new(config.runner.clone());

    let (sink, mut outcomes, personal_best) = if config.leaderboard.is_enabled() {
        let client = LeaderboardClient::new(config.leaderboard.clone());
        let best = fetch_personal_best(&client, config.username.as_deref()).await;
        let (reporter, rx) = LeaderboardReporter::with_outcomes(client, Handle::current());
        let sink: Arc<dyn ScoreSink> = Arc::new(reporter);
        (sink, Some(rx), best)
    } else {
        tracing::info!("Leaderboard disabled, scores will not be submitted");
        let sink: Arc<dyn ScoreSink> = Arc::new(DiscardSink);
        (sink, None, None)
    };

    let mut session = Session::new(runner, sink).with_personal_best(personal_best);
    if let Some(name) = &config.username {
        session = session.with_username(name.clone());
    }

    let (width, height) = (config.runner.field.width, config.runner.field.height);
    let mut recorder = FrameRecorder::new(width, height);
    let mut pilot = Autopilot::new(&config.autopilot);
    let mut runs = Vec::new();

    let tick_interval = Duration::try_from_secs_f32(1.0 / config.runner.tick_rate_hz)
        .unwrap_or(Duration::from_millis(16));
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    tracing::info!(
        max_runs = config.max_runs,
        tick_rate = config.runner.tick_rate_hz,
        realtime = config.realtime,
        "Host loop starting"
    );

    loop {
        if config.realtime {
            interval.tick().await;
        } else {
            tokio::task::yield_now().await;
        }

        if let Some(rx) = outcomes.as_mut() {
            drain_outcomes(rx, &mut session);
        }

        match pilot.poll(session.engine()) {
            Some(InputAction::Restart) if runs.len() >= config.max_runs as usize => break,
            Some(action) => {
                session.handle_input(action);
            },
            None => {},
        }

        for event in session.tick() {
            if let TickEvent::GameOver(summary) = event {
                tracing::info!(
                    run = runs.len() + 1,
                    generation = %summary.generation,
                    score = summary.final_score,
                    time_played_secs = summary.time_played_secs,
                    "Run finished"
                );
                runs.push(summary);
            }
        }

        if session.phase() == Phase::Running
            && session.engine().elapsed_ticks() >= config.max_ticks_per_run
        {
            tracing::warn!(
                generation = %session.generation(),
                ticks = config.max_ticks_per_run,
                "Run hit the tick limit, stopping"
            );
            break;
        }

        session.render(&mut recorder);
    }

    // The last submission may still be in flight
    if let Some(rx) = outcomes.as_mut()
        && session.phase() == Phase::GameOver
        && session.last_submission().is_none()
    {
        let wait = Duration::from_secs(config.leaderboard.request_timeout_secs.max(1) + 1);
        let deadline = tokio::time::Instant::now() + wait;
        // Stale outcomes from earlier runs may arrive first
        while session.last_submission().is_none() {
            match tokio::time::timeout_at(deadline, rx.recv()).await {
                Ok(Some(outcome)) => {
                    session.apply_outcome(outcome);
                },
                _ => break,
            }
        }
        session.render(&mut recorder);
    }

    let personal_best = session
        .personal_best()
        .max(runs.iter().map(|r| r.final_score).max());
    HostReport {
        runs,
        personal_best,
        last_submission: session.last_submission(),
        recorder,
    }
}

fn drain_outcomes(rx: &mut mpsc::UnboundedReceiver<SubmissionOutcome>, session: &mut Session) {
    while let Ok(outcome) = rx.try_recv() {
        session.apply_outcome(outcome);
    }
}

/// Look up the stored best for the configured player. Failures only cost
/// the HUD line.
async fn fetch_personal_best(client: &LeaderboardClient, username: Option<&str>) -> Option<u64> {
    let username = username?;
    match client.personal_best(username).await {
        Ok(best) => {
            tracing::info!(username, ?best, "Fetched personal best");
            best
        },
        Err(e) => {
            tracing::warn!(username, error = %e, "Failed to fetch personal best");
            None
        },
    }
}
