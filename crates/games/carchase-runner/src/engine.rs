use std::sync::Arc;

use serde::{Deserialize, Serialize};

use carchase_core::generation::GenerationId;

use crate::collision;
use crate::config::RunnerConfig;
use crate::physics::{self, Player};
use crate::powerups::{EffectState, PowerUp, PowerUpKind};
use crate::scoring;
use crate::spawner::{self, Difficulty, Obstacle, Spawner};

/// Lifecycle phase of one generation. The only transition is
/// `Running -> GameOver`, taken at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Running,
    GameOver,
}

/// Captured on entry to `GameOver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub generation: GenerationId,
    pub final_score: u64,
    pub time_played_secs: u64,
}

/// Something that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TickEvent {
    ObstacleSpawned,
    PowerUpSpawned(PowerUpKind),
    ShieldAbsorbed { obstacle_id: u32 },
    PowerUpCollected(PowerUpKind),
    EffectExpired(PowerUpKind),
    GameOver(RunSummary),
}

/// Mutable simulation values owned by one generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    pub score: f64,
    pub difficulty: Difficulty,
    pub ground_level: f32,
    pub elapsed_ticks: u64,
    pub phase: Phase,
    pub effects: EffectState,
    /// Horizontal scroll of the background, wrapped to the field width.
    pub background_offset: f32,
}

/// One generation of the simulation: a single run from start to game over.
///
/// A new run never reuses an engine; the session builds a fresh one.
#[derive(Debug, Clone)]
pub struct Engine {
    generation: GenerationId,
    config: Arc<RunnerConfig>,
    seed: u64,
    pub(crate) player: Player,
    pub(crate) obstacles: Vec<Obstacle>,
    pub(crate) powerups: Vec<PowerUp>,
    pub(crate) state: SimulationState,
    spawner: Spawner,
    summary: Option<RunSummary>,
}

impl Engine {
    pub fn new(generation: GenerationId, config: Arc<RunnerConfig>, seed: u64) -> Self {
        let ground_level = config.field.ground_level;
        Self {
            generation,
            player: Player::new(&config.physics, ground_level),
            obstacles: Vec::new(),
            powerups: Vec::new(),
            state: SimulationState {
                score: 0.0,
                difficulty: Difficulty::new(&config),
                ground_level,
                elapsed_ticks: 0,
                phase: Phase::Running,
                effects: EffectState::new(config.physics.jump_force),
                background_offset: 0.0,
            },
            spawner: Spawner::new(seed),
            summary: None,
            seed,
            config,
        }
    }

    pub fn generation(&self) -> GenerationId {
        self.generation
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.phase == Phase::Running
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn powerups(&self) -> &[PowerUp] {
        &self.powerups
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn score(&self) -> f64 {
        self.state.score
    }

    pub fn score_multiplier(&self) -> u32 {
        self.state.effects.score_multiplier
    }

    pub fn shield_active(&self) -> bool {
        self.state.effects.shield_active
    }

    pub fn time_dilation_active(&self) -> bool {
        self.state.effects.time_dilation_active
    }

    pub fn obstacle_speed(&self) -> f32 {
        self.state.difficulty.obstacle_speed
    }

    pub fn obstacle_spawn_interval(&self) -> f32 {
        self.state.difficulty.obstacle_spawn_interval
    }

    pub fn elapsed_ticks(&self) -> u64 {
        self.state.elapsed_ticks
    }

    /// Simulated seconds since the run started.
    pub fn elapsed_secs(&self) -> f32 {
        self.state.elapsed_ticks as f32 / self.config.tick_rate_hz
    }

    /// Final result, present once the run has ended.
    pub fn summary(&self) -> Option<RunSummary> {
        self.summary
    }

    /// Active effects with seconds remaining, for the HUD.
    pub fn active_effects(&self) -> Vec<(PowerUpKind, f32)> {
        self.state
            .effects
            .remaining(self.state.elapsed_ticks, self.config.tick_rate_hz)
    }

    /// Jump with the current jump force. Ignored while airborne or after game over.
    pub fn jump(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        physics::jump(&mut self.player, self.state.effects.jump_force)
    }

    /// Activate a power-up effect as if it had been picked up this tick.
    pub fn grant_power_up(&mut self, kind: PowerUpKind) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state.effects.activate(
            kind,
            self.generation,
            self.state.elapsed_ticks,
            &self.config,
        );
        true
    }

    /// Advance the simulation by one tick.
    pub fn tick(&mut self) -> Vec<TickEvent> {
        if !self.is_running() {
            return Vec::new();
        }

        let mut events = Vec::new();
        self.state.elapsed_ticks += 1;
        let now_tick = self.state.elapsed_ticks;
        let dilated = self.state.effects.time_dilation_active;

        // Physics
        physics::integrate(
            &mut self.player,
            self.config.physics.gravity,
            self.state.ground_level,
        );

        // Spawning, scrolling and difficulty ramp
        let spawned = self.spawner.spawn_due(
            self.elapsed_secs(),
            &self.state.difficulty,
            dilated,
            &self.config,
            &mut self.obstacles,
            &mut self.powerups,
        );
        if spawned.obstacle {
            events.push(TickEvent::ObstacleSpawned);
        }
        if let Some(kind) = spawned.powerup {
            events.push(TickEvent::PowerUpSpawned(kind));
        }

        let dx = self.state.difficulty.effective_speed(dilated);
        spawner::scroll(&mut self.obstacles, &mut self.powerups, dx);
        self.state.background_offset =
            (self.state.background_offset + dx).rem_euclid(self.config.field.width);
        self.state.difficulty.ramp(&self.config, dilated);

        // Collisions
        let bounds = self.player.bounds();
        let hits =
            collision::check_obstacles(&bounds, &mut self.obstacles, &mut self.state.effects);
        for obstacle_id in hits.absorbed {
            tracing::debug!(generation = %self.generation, obstacle_id, "Shield absorbed hit");
            events.push(TickEvent::ShieldAbsorbed { obstacle_id });
        }
        if hits.fatal {
            if let Some(summary) = self.end_run() {
                events.push(TickEvent::GameOver(summary));
            }
            return events;
        }

        for kind in collision::collect_powerups(&bounds, &mut self.powerups) {
            self.state
                .effects
                .activate(kind, self.generation, now_tick, &self.config);
            events.push(TickEvent::PowerUpCollected(kind));
        }

        // Effect expiry
        for kind in self
            .state
            .effects
            .expire(self.generation, now_tick, &self.config)
        {
            events.push(TickEvent::EffectExpired(kind));
        }

        // Score
        self.state.score = scoring::accumulate(
            self.state.score,
            self.config.score_increment,
            self.state.effects.score_multiplier,
        );

        events
    }

    /// Take the `Running -> GameOver` transition. Returns the summary only on
    /// the call that performs the transition.
    pub(crate) fn end_run(&mut self) -> Option<RunSummary> {
        if self.state.phase == Phase::GameOver {
            return None;
        }
        self.state.phase = Phase::GameOver;
        let summary = RunSummary {
            generation: self.generation,
            final_score: scoring::final_score(self.state.score),
            time_played_secs: scoring::time_played_secs(
                self.state.elapsed_ticks,
                self.config.tick_rate_hz,
            ),
        };
        self.summary = Some(summary);
        tracing::info!(
            generation = %self.generation,
            score = summary.final_score,
            time_played_secs = summary.time_played_secs,
            "Run ended"
        );
        Some(summary)
    }
}
