use serde::{Deserialize, Serialize};

use carchase_core::powerup::PowerUpKind as _;

use crate::powerups::PowerUpKind;

/// Play field geometry in logical units.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub width: f32,
    pub height: f32,
    /// Y coordinate of the ground line (y grows downward).
    pub ground_level: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
            ground_level: 350.0,
        }
    }
}

/// Player body and vertical motion, in units per tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerPhysicsConfig {
    pub gravity: f32,
    pub jump_force: f32,
    /// Jump force while High-Jump is active.
    pub high_jump_force: f32,
    pub player_x: f32,
    pub player_width: f32,
    pub player_height: f32,
}

impl Default for RunnerPhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.6,
            jump_force: 12.0,
            high_jump_force: 16.0,
            player_x: 50.0,
            player_width: 50.0,
            player_height: 30.0,
        }
    }
}

/// Entity spawning and difficulty ramp. Intervals are in seconds of
/// simulated time, speeds and increments in units per tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub obstacle_width: f32,
    pub obstacle_min_height: f32,
    pub obstacle_max_height: f32,
    pub initial_speed: f32,
    pub speed_increment: f32,
    pub initial_spawn_interval: f32,
    pub spawn_interval_decrement: f32,
    pub min_spawn_interval: f32,
    pub powerup_spawn_interval: f32,
    pub powerup_size: f32,
    /// Highest altitude of a power-up's bottom edge above the ground line.
    pub powerup_max_altitude: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            obstacle_width: 30.0,
            obstacle_min_height: 30.0,
            obstacle_max_height: 60.0,
            initial_speed: 5.0,
            speed_increment: 0.001,
            initial_spawn_interval: 1.5,
            spawn_interval_decrement: 0.0005,
            min_spawn_interval: 0.6,
            powerup_spawn_interval: 8.0,
            powerup_size: 25.0,
            powerup_max_altitude: 110.0,
        }
    }
}

/// Effect durations in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectDurations {
    pub score_multiplier: f32,
    pub shield: f32,
    pub high_jump: f32,
    pub time_dilation: f32,
}

impl Default for EffectDurations {
    fn default() -> Self {
        Self {
            score_multiplier: PowerUpKind::ScoreMultiplier.duration(),
            shield: PowerUpKind::Shield.duration(),
            high_jump: PowerUpKind::HighJump.duration(),
            time_dilation: PowerUpKind::TimeDilation.duration(),
        }
    }
}

impl EffectDurations {
    pub fn for_kind(&self, kind: PowerUpKind) -> f32 {
        match kind {
            PowerUpKind::ScoreMultiplier => self.score_multiplier,
            PowerUpKind::Shield => self.shield,
            PowerUpKind::HighJump => self.high_jump,
            PowerUpKind::TimeDilation => self.time_dilation,
        }
    }
}

/// A configuration value that cannot drive a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(m) => write!(f, "invalid configuration: {m}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub game_name: String,
    pub tick_rate_hz: f32,
    /// Score added per tick before the multiplier.
    pub score_increment: f64,
    /// Base RNG seed; `None` draws a fresh seed per run.
    pub seed: Option<u64>,
    pub field: FieldConfig,
    pub physics: RunnerPhysicsConfig,
    pub spawn: SpawnConfig,
    pub effects: EffectDurations,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            game_name: "Car Chase".to_string(),
            tick_rate_hz: 60.0,
            score_increment: 0.1,
            seed: None,
            field: FieldConfig::default(),
            physics: RunnerPhysicsConfig::default(),
            spawn: SpawnConfig::default(),
            effects: EffectDurations::default(),
        }
    }
}

impl RunnerConfig {
    /// Load config from a TOML file. Falls back to defaults if the file is missing
    /// or unparseable.
    pub fn load() -> Self {
        let path = std::env::var("CARCHASE_RUNNER_CONFIG")
            .unwrap_or_else(|_| "config/runner.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<RunnerConfig>(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    RunnerConfig::default()
                },
            },
            Err(_) => RunnerConfig::default(),
        }
    }

    /// Check internal consistency. Returns a description of the first problem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tick_rate_hz.is_finite() || self.tick_rate_hz <= 0.0 {
            return Err(ConfigError::Invalid("tick_rate_hz must be > 0".to_string()));
        }
        for (name, value) in self.float_fields() {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!("{name} must be finite")));
            }
        }
        if self.field.width <= 0.0 {
            return Err(ConfigError::Invalid("field.width must be > 0".to_string()));
        }
        if self.field.ground_level <= self.physics.player_height {
            return Err(ConfigError::Invalid(
                "field.ground_level must exceed physics.player_height".to_string(),
            ));
        }
        if self.field.ground_level > self.field.height {
            return Err(ConfigError::Invalid(
                "field.ground_level must lie inside the field".to_string(),
            ));
        }
        if self.physics.gravity <= 0.0 {
            return Err(ConfigError::Invalid("physics.gravity must be > 0".to_string()));
        }
        if self.spawn.obstacle_min_height > self.spawn.obstacle_max_height {
            return Err(ConfigError::Invalid(
                "spawn.obstacle_min_height exceeds obstacle_max_height".to_string(),
            ));
        }
        if self.spawn.speed_increment < 0.0 {
            return Err(ConfigError::Invalid("spawn.speed_increment must be >= 0".to_string()));
        }
        if self.spawn.spawn_interval_decrement < 0.0 {
            return Err(ConfigError::Invalid(
                "spawn.spawn_interval_decrement must be >= 0".to_string(),
            ));
        }
        if self.spawn.min_spawn_interval <= 0.0 {
            return Err(ConfigError::Invalid("spawn.min_spawn_interval must be > 0".to_string()));
        }
        if self.spawn.initial_spawn_interval < self.spawn.min_spawn_interval {
            return Err(ConfigError::Invalid(
                "spawn.initial_spawn_interval is below min_spawn_interval".to_string(),
            ));
        }
        if self.spawn.powerup_spawn_interval <= 0.0 {
            return Err(ConfigError::Invalid(
                "spawn.powerup_spawn_interval must be > 0".to_string(),
            ));
        }
        if !self.score_increment.is_finite() || self.score_increment < 0.0 {
            return Err(ConfigError::Invalid("score_increment must be >= 0".to_string()));
        }
        Ok(())
    }

    fn float_fields(&self) -> [(&'static str, f32); 24] {
        let (field, physics, spawn, effects) =
            (&self.field, &self.physics, &self.spawn, &self.effects);
        [
            ("field.width", field.width),
            ("field.height", field.height),
            ("field.ground_level", field.ground_level),
            ("physics.gravity", physics.gravity),
            ("physics.jump_force", physics.jump_force),
            ("physics.high_jump_force", physics.high_jump_force),
            ("physics.player_x", physics.player_x),
            ("physics.player_width", physics.player_width),
            ("physics.player_height", physics.player_height),
            ("spawn.obstacle_width", spawn.obstacle_width),
            ("spawn.obstacle_min_height", spawn.obstacle_min_height),
            ("spawn.obstacle_max_height", spawn.obstacle_max_height),
            ("spawn.initial_speed", spawn.initial_speed),
            ("spawn.speed_increment", spawn.speed_increment),
            ("spawn.initial_spawn_interval", spawn.initial_spawn_interval),
            ("spawn.spawn_interval_decrement", spawn.spawn_interval_decrement),
            ("spawn.min_spawn_interval", spawn.min_spawn_interval),
            ("spawn.powerup_spawn_interval", spawn.powerup_spawn_interval),
            ("spawn.powerup_size", spawn.powerup_size),
            ("spawn.powerup_max_altitude", spawn.powerup_max_altitude),
            ("effects.score_multiplier", effects.score_multiplier),
            ("effects.shield", effects.shield),
            ("effects.high_jump", effects.high_jump),
            ("effects.time_dilation", effects.time_dilation),
        ]
    }
}
