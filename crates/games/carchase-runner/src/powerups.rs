use serde::{Deserialize, Serialize};

use carchase_core::generation::GenerationId;
use carchase_core::geometry::Aabb;
use carchase_core::powerup::{self, EffectSchedule, ticks_for};

use crate::config::RunnerConfig;

/// Car Chase power-up types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    ScoreMultiplier,
    Shield,
    HighJump,
    TimeDilation,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::ScoreMultiplier,
        PowerUpKind::Shield,
        PowerUpKind::HighJump,
        PowerUpKind::TimeDilation,
    ];

    /// Short HUD label.
    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::ScoreMultiplier => "2x Score",
            PowerUpKind::Shield => "Shield",
            PowerUpKind::HighJump => "High Jump",
            PowerUpKind::TimeDilation => "Slow-Mo",
        }
    }
}

impl powerup::PowerUpKind for PowerUpKind {
    fn duration(&self) -> f32 {
        match self {
            PowerUpKind::ScoreMultiplier => 10.0,
            PowerUpKind::Shield => 10.0,
            PowerUpKind::HighJump => 8.0,
            PowerUpKind::TimeDilation => 5.0,
        }
    }
}

/// Active power-up effect in the current run.
pub type ActivePowerUp = powerup::ActivePowerUp<PowerUpKind>;

/// A power-up pickup scrolling across the field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PowerUp {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub kind: PowerUpKind,
}

impl PowerUp {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.size, self.size)
    }
}

/// Global modifiers controlled by power-ups, plus the schedule that expires them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectState {
    pub score_multiplier: u32,
    pub shield_active: bool,
    pub jump_force: f32,
    pub time_dilation_active: bool,
    schedule: EffectSchedule<PowerUpKind>,
}

impl EffectState {
    pub fn new(base_jump_force: f32) -> Self {
        Self {
            score_multiplier: 1,
            shield_active: false,
            jump_force: base_jump_force,
            time_dilation_active: false,
            schedule: EffectSchedule::new(),
        }
    }

    /// Apply an effect and schedule its expiry at full duration. Picking up a
    /// kind that is already active restarts its timer.
    pub fn activate(
        &mut self,
        kind: PowerUpKind,
        generation: GenerationId,
        now_tick: u64,
        config: &RunnerConfig,
    ) {
        let duration = ticks_for(config.effects.for_kind(kind), config.tick_rate_hz);
        let fresh = self
            .schedule
            .activate(ActivePowerUp::new(kind, generation, now_tick, duration));
        self.set(kind, true, config);
        tracing::debug!(?kind, fresh, expires_in_ticks = duration, "Power-up activated");
    }

    /// Use up the shield to absorb one hit. Returns `false` if none was active.
    pub fn consume_shield(&mut self) -> bool {
        if !self.shield_active {
            return false;
        }
        self.shield_active = false;
        self.schedule.cancel(PowerUpKind::Shield);
        true
    }

    /// Deactivate every effect whose expiry tick has been reached.
    pub fn expire(
        &mut self,
        generation: GenerationId,
        now_tick: u64,
        config: &RunnerConfig,
    ) -> Vec<PowerUpKind> {
        let expired = self.schedule.drain_expired(generation, now_tick);
        for &kind in &expired {
            self.set(kind, false, config);
        }
        expired
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.schedule.is_active(kind)
    }

    /// Active effects with remaining seconds, in activation order.
    pub fn remaining(&self, now_tick: u64, tick_rate_hz: f32) -> Vec<(PowerUpKind, f32)> {
        self.schedule
            .iter()
            .map(|e| (e.kind, e.remaining_ticks(now_tick) as f32 / tick_rate_hz))
            .collect()
    }

    fn set(&mut self, kind: PowerUpKind, on: bool, config: &RunnerConfig) {
        match kind {
            PowerUpKind::ScoreMultiplier => self.score_multiplier = if on { 2 } else { 1 },
            PowerUpKind::Shield => self.shield_active = on,
            PowerUpKind::HighJump => {
                self.jump_force = if on {
                    config.physics.high_jump_force
                } else {
                    config.physics.jump_force
                };
            },
            PowerUpKind::TimeDilation => self.time_dilation_active = on,
        }
    }
}
