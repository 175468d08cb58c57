use std::sync::Arc;

use rand::Rng;

use carchase_core::generation::GenerationId;
use carchase_core::input::InputAction;
use carchase_core::render::DrawSurface;
use carchase_core::report::{ScoreSink, ScoreSubmission, SubmissionOutcome, SubmissionStatus};

use crate::config::RunnerConfig;
use crate::engine::{Engine, Phase, RunSummary, TickEvent};
use crate::render::{self, Hud};

/// Owns the current generation and everything that outlives a single run:
/// the score sink, the player identity and the personal best.
pub struct Session {
    config: Arc<RunnerConfig>,
    engine: Engine,
    sink: Arc<dyn ScoreSink>,
    username: Option<String>,
    personal_best: Option<u64>,
    last_submission: Option<SubmissionStatus>,
    reported: Option<GenerationId>,
}

impl Session {
    pub fn new(config: Arc<RunnerConfig>, sink: Arc<dyn ScoreSink>) -> Self {
        let generation = GenerationId::FIRST;
        let engine = Engine::new(generation, Arc::clone(&config), seed_for(&config, generation));
        tracing::info!(%generation, seed = engine.seed(), "Run started");
        Self {
            config,
            engine,
            sink,
            username: None,
            personal_best: None,
            last_submission: None,
            reported: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        let username = username.into();
        self.username = if username.trim().is_empty() {
            None
        } else {
            Some(username)
        };
        self
    }

    pub fn with_personal_best(mut self, best: Option<u64>) -> Self {
        self.personal_best = best;
        self
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn generation(&self) -> GenerationId {
        self.engine.generation()
    }

    pub fn phase(&self) -> Phase {
        self.engine.phase()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn personal_best(&self) -> Option<u64> {
        self.personal_best
    }

    /// Status of the current generation's submission, once known.
    pub fn last_submission(&self) -> Option<SubmissionStatus> {
        self.last_submission
    }

    /// Route a discrete input. Jump is ignored after game over and Restart
    /// is ignored while running. Returns whether the action had an effect.
    pub fn handle_input(&mut self, action: InputAction) -> bool {
        match (action, self.engine.phase()) {
            (InputAction::Jump, Phase::Running) => self.engine.jump(),
            (InputAction::Restart, _) => self.restart(),
            _ => false,
        }
    }

    /// Advance the current generation by one tick and report its score on
    /// the tick that ends the run.
    pub fn tick(&mut self) -> Vec<TickEvent> {
        let events = self.engine.tick();
        for event in &events {
            if let TickEvent::GameOver(summary) = event {
                self.report(*summary);
            }
        }
        events
    }

    /// Discard the finished generation and start a fresh one. A running
    /// generation is never discarded; returns whether a new run started.
    pub fn restart(&mut self) -> bool {
        if self.engine.phase() != Phase::GameOver {
            tracing::debug!(
                generation = %self.engine.generation(),
                "Restart ignored while running"
            );
            return false;
        }
        if let Some(summary) = self.engine.summary() {
            self.personal_best = Some(
                self.personal_best
                    .map_or(summary.final_score, |b| b.max(summary.final_score)),
            );
        }
        let generation = self.engine.generation().next();
        self.engine = Engine::new(
            generation,
            Arc::clone(&self.config),
            seed_for(&self.config, generation),
        );
        self.last_submission = None;
        tracing::info!(%generation, seed = self.engine.seed(), "Run started");
        true
    }

    /// Record a submission outcome. Outcomes from replaced generations are
    /// dropped and `false` is returned.
    pub fn apply_outcome(&mut self, outcome: SubmissionOutcome) -> bool {
        if outcome.generation != self.engine.generation() {
            tracing::debug!(
                outcome = %outcome.generation,
                current = %self.engine.generation(),
                "Dropping stale submission outcome"
            );
            return false;
        }
        self.last_submission = Some(outcome.status);
        true
    }

    pub fn render(&self, surface: &mut dyn DrawSurface) {
        let hud = Hud {
            personal_best: self.personal_best,
            submission: self.last_submission,
        };
        render::draw_frame(&self.engine, &hud, surface);
    }

    fn report(&mut self, summary: RunSummary) {
        if self.reported == Some(summary.generation) {
            return;
        }
        self.reported = Some(summary.generation);
        self.sink.submit(ScoreSubmission {
            generation: summary.generation,
            username: self.username.clone(),
            game: self.config.game_name.clone(),
            score: summary.final_score,
            time_played_secs: summary.time_played_secs,
        });
    }
}

/// A fixed config seed gives each generation a distinct but reproducible
/// stream; otherwise every run is random.
fn seed_for(config: &RunnerConfig, generation: GenerationId) -> u64 {
    match config.seed {
        Some(seed) => seed.wrapping_add(generation.get().wrapping_sub(1)),
        None => rand::rng().random(),
    }
}
