use serde::{Deserialize, Serialize};

use carchase_leaderboard::LeaderboardConfig;
use carchase_runner::{ConfigError, RunnerConfig};

/// Top-level host configuration, loaded from `carchase.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Player identity for score submission. `None` submits anonymously.
    pub username: Option<String>,
    /// Number of runs to play before the host exits.
    pub max_runs: u32,
    /// Safety bound on the length of a single run.
    pub max_ticks_per_run: u64,
    /// Pace ticks against the wall clock. When false the loop runs as fast
    /// as it can, which is what tests and batch simulations want.
    pub realtime: bool,
    pub autopilot: AutopilotConfig,
    /// Engine settings. Falls back to `config/runner.toml` when the section
    /// is absent.
    #[serde(default = "RunnerConfig::load")]
    pub runner: RunnerConfig,
    pub leaderboard: LeaderboardConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            username: None,
            max_runs: 3,
            max_ticks_per_run: 60 * 60 * 10,
            realtime: true,
            autopilot: AutopilotConfig::default(),
            runner: RunnerConfig::default(),
            leaderboard: LeaderboardConfig::default(),
        }
    }
}

/// Scripted input source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutopilotConfig {
    /// Press jump when an obstacle is this close ahead of the player.
    pub look_ahead: f32,
    /// When false the autopilot never jumps and only restarts.
    pub jumps: bool,
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            look_ahead: 80.0,
            jumps: true,
        }
    }
}

impl HostConfig {
    /// Load config from the file named by `CARCHASE_CONFIG` (default
    /// `carchase.toml`), then apply env var overrides.
    pub fn load() -> Self {
        let path =
            std::env::var("CARCHASE_CONFIG").unwrap_or_else(|_| "carchase.toml".to_string());
        let content = std::fs::read_to_string(&path).ok();
        let mut config = Self::from_source(&path, content.as_deref(), RunnerConfig::load);
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Parse `content` read from `path`. A missing or unparseable file
    /// falls back to defaults with the engine section from `load_runner`.
    fn from_source(
        path: &str,
        content: Option<&str>,
        load_runner: impl FnOnce() -> RunnerConfig,
    ) -> Self {
        match content.map(toml::from_str::<HostConfig>) {
            Some(Ok(cfg)) => {
                tracing::info!("Loaded configuration from {path}");
                return cfg;
            },
            Some(Err(e)) => tracing::warn!("Failed to parse {path}: {e}, using defaults"),
            None => tracing::info!("No {path} found, using defaults"),
        }
        HostConfig {
            runner: load_runner(),
            ..HostConfig::default()
        }
    }

    /// Apply `CARCHASE_*` overrides from `lookup`. Empty or unparseable
    /// values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup("CARCHASE_USERNAME")
            && !name.trim().is_empty()
        {
            self.username = Some(name);
        }
        if let Some(url) = lookup("CARCHASE_LEADERBOARD_URL")
            && !url.is_empty()
        {
            self.leaderboard.base_url = url;
        }
        if let Some(val) = lookup("CARCHASE_TICK_RATE")
            && let Ok(rate) = val.parse::<f32>()
        {
            self.runner.tick_rate_hz = rate;
        }
        if let Some(val) = lookup("CARCHASE_SEED")
            && let Ok(seed) = val.parse::<u64>()
        {
            self.runner.seed = Some(seed);
        }
        if let Some(val) = lookup("CARCHASE_MAX_RUNS")
            && let Ok(n) = val.parse::<u32>()
        {
            self.max_runs = n;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.runner.validate()?;
        if self.max_runs == 0 {
            return Err(ConfigError::Invalid("max_runs must be > 0".to_string()));
        }
        if self.max_ticks_per_run == 0 {
            return Err(ConfigError::Invalid(
                "max_ticks_per_run must be > 0".to_string(),
            ));
        }
        if !self.autopilot.look_ahead.is_finite() || self.autopilot.look_ahead < 0.0 {
            return Err(ConfigError::Invalid(
                "autopilot.look_ahead must be >= 0".to_string(),
            ));
        }
        if self.leaderboard.is_enabled() && self.leaderboard.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "leaderboard.request_timeout_secs must be > 0".to_string(),
            ));
        }
        if self.leaderboard.is_enabled()
            && self.username.is_none()
            && !self.leaderboard.allow_anonymous
        {
            tracing::warn!("No username configured and anonymous scores are disabled");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_values() {
        let cfg = HostConfig::default();
        assert!(cfg.username.is_none());
        assert_eq!(cfg.max_runs, 3);
        assert!(cfg.realtime);
        assert!(!cfg.leaderboard.is_enabled());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn parse_toml_with_sections() {
        let toml_str = r#"
username = "ada"
max_runs = 1
realtime = false

[autopilot]
look_ahead = 95.0

[runner]
seed = 11

[runner.physics]
jump_force = 13.0

[leaderboard]
base_url = "http://localhost:3000/api"
"#;
        let cfg: HostConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.username.as_deref(), Some("ada"));
        assert_eq!(cfg.max_runs, 1);
        assert!(!cfg.realtime);
        assert_eq!(cfg.autopilot.look_ahead, 95.0);
        assert!(cfg.autopilot.jumps);
        assert_eq!(cfg.runner.seed, Some(11));
        assert_eq!(cfg.runner.physics.jump_force, 13.0);
        assert_eq!(cfg.runner.physics.gravity, 0.6);
        assert!(cfg.leaderboard.is_enabled());
    }

    #[test]
    fn env_overrides_apply() {
        let mut cfg = HostConfig::default();
        cfg.apply_overrides(lookup_from(&[
            ("CARCHASE_USERNAME", "grace"),
            ("CARCHASE_LEADERBOARD_URL", "http://scores.test"),
            ("CARCHASE_TICK_RATE", "30"),
            ("CARCHASE_SEED", "99"),
            ("CARCHASE_MAX_RUNS", "7"),
        ]));
        assert_eq!(cfg.username.as_deref(), Some("grace"));
        assert_eq!(cfg.leaderboard.base_url, "http://scores.test");
        assert_eq!(cfg.runner.tick_rate_hz, 30.0);
        assert_eq!(cfg.runner.seed, Some(99));
        assert_eq!(cfg.max_runs, 7);
    }

    #[test]
    fn bad_env_values_are_ignored() {
        let mut cfg = HostConfig::default();
        cfg.apply_overrides(lookup_from(&[
            ("CARCHASE_USERNAME", "  "),
            ("CARCHASE_TICK_RATE", "fast"),
            ("CARCHASE_MAX_RUNS", "-1"),
        ]));
        assert!(cfg.username.is_none());
        assert_eq!(cfg.runner.tick_rate_hz, 60.0);
        assert_eq!(cfg.max_runs, 3);
    }

    #[test]
    fn missing_and_malformed_files_share_the_runner_fallback() {
        let runner = || RunnerConfig {
            seed: Some(77),
            ..RunnerConfig::default()
        };

        let missing = HostConfig::from_source("carchase.toml", None, runner);
        assert_eq!(missing.runner.seed, Some(77));
        assert_eq!(missing.max_runs, 3);

        let malformed = HostConfig::from_source("carchase.toml", Some("max_runs = ["), runner);
        assert_eq!(malformed.runner.seed, Some(77));
        assert_eq!(malformed.max_runs, 3);

        let parsed = HostConfig::from_source("carchase.toml", Some("max_runs = 5"), runner);
        assert_eq!(parsed.max_runs, 5);
    }

    #[test]
    fn validate_rejects_zero_runs() {
        let cfg = HostConfig {
            max_runs: 0,
            ..HostConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn validate_surfaces_runner_errors() {
        let mut cfg = HostConfig::default();
        cfg.runner.tick_rate_hz = -1.0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("tick_rate_hz"));
    }
}
