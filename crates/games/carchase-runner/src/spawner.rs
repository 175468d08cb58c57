use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use carchase_core::geometry::Aabb;

use crate::config::RunnerConfig;
use crate::powerups::{PowerUp, PowerUpKind};

/// A ground obstacle scrolling toward the player.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Obstacle {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Obstacle {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }
}

/// Obstacle speed and spawn cadence; both ramp every running tick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Difficulty {
    /// Scroll speed in units per tick, before time dilation.
    pub obstacle_speed: f32,
    /// Seconds between obstacles, before time dilation.
    pub obstacle_spawn_interval: f32,
}

impl Difficulty {
    pub fn new(config: &RunnerConfig) -> Self {
        Self {
            obstacle_speed: config.spawn.initial_speed,
            obstacle_spawn_interval: config.spawn.initial_spawn_interval,
        }
    }

    /// Apply one tick of the difficulty ramp.
    pub fn ramp(&mut self, config: &RunnerConfig, dilated: bool) {
        let increment = if dilated {
            config.spawn.speed_increment * 0.5
        } else {
            config.spawn.speed_increment
        };
        self.obstacle_speed += increment;
        self.obstacle_spawn_interval = (self.obstacle_spawn_interval
            - config.spawn.spawn_interval_decrement)
            .max(config.spawn.min_spawn_interval);
    }

    /// Distance entities move this tick.
    pub fn effective_speed(&self, dilated: bool) -> f32 {
        if dilated {
            self.obstacle_speed * 0.5
        } else {
            self.obstacle_speed
        }
    }
}

/// Stretch an interval while time dilation is active.
fn dilate(interval: f32, dilated: bool) -> f32 {
    if dilated { interval * 2.0 } else { interval }
}

/// Entities spawned during one tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SpawnReport {
    pub obstacle: bool,
    pub powerup: Option<PowerUpKind>,
}

/// Time-gated entity creation with independent obstacle and power-up clocks.
#[derive(Debug, Clone)]
pub struct Spawner {
    rng: StdRng,
    last_obstacle_secs: f32,
    last_powerup_secs: f32,
    next_id: u32,
}

impl Spawner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            last_obstacle_secs: 0.0,
            last_powerup_secs: 0.0,
            next_id: 1,
        }
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn whatever is due at `now_secs` at the right edge of the field.
    pub fn spawn_due(
        &mut self,
        now_secs: f32,
        difficulty: &Difficulty,
        dilated: bool,
        config: &RunnerConfig,
        obstacles: &mut Vec<Obstacle>,
        powerups: &mut Vec<PowerUp>,
    ) -> SpawnReport {
        let mut report = SpawnReport::default();

        let obstacle_interval = dilate(difficulty.obstacle_spawn_interval, dilated);
        if now_secs - self.last_obstacle_secs > obstacle_interval {
            obstacles.push(self.make_obstacle(config));
            self.last_obstacle_secs = now_secs;
            report.obstacle = true;
        }

        let powerup_interval = dilate(config.spawn.powerup_spawn_interval, dilated);
        if now_secs - self.last_powerup_secs > powerup_interval {
            let powerup = self.make_powerup(config);
            report.powerup = Some(powerup.kind);
            powerups.push(powerup);
            self.last_powerup_secs = now_secs;
        }

        report
    }

    fn make_obstacle(&mut self, config: &RunnerConfig) -> Obstacle {
        let spawn = &config.spawn;
        let height = if spawn.obstacle_max_height > spawn.obstacle_min_height {
            self.rng
                .random_range(spawn.obstacle_min_height..=spawn.obstacle_max_height)
        } else {
            spawn.obstacle_min_height
        };
        Obstacle {
            id: self.next_entity_id(),
            x: config.field.width,
            y: config.field.ground_level - height,
            width: spawn.obstacle_width,
            height,
        }
    }

    fn make_powerup(&mut self, config: &RunnerConfig) -> PowerUp {
        let spawn = &config.spawn;
        let kind = PowerUpKind::ALL[self.rng.random_range(0..PowerUpKind::ALL.len())];
        let altitude = if spawn.powerup_max_altitude > 0.0 {
            self.rng.random_range(0.0..=spawn.powerup_max_altitude)
        } else {
            0.0
        };
        let y = (config.field.ground_level - spawn.powerup_size - altitude).max(0.0);
        PowerUp {
            id: self.next_entity_id(),
            x: config.field.width,
            y,
            size: spawn.powerup_size,
            kind,
        }
    }
}

/// Move every entity left by `dx` and drop the ones fully off-screen.
pub fn scroll(obstacles: &mut Vec<Obstacle>, powerups: &mut Vec<PowerUp>, dx: f32) {
    for o in obstacles.iter_mut() {
        o.x -= dx;
    }
    obstacles.retain(|o| o.x + o.width >= 0.0);

    for p in powerups.iter_mut() {
        p.x -= dx;
    }
    powerups.retain(|p| p.x + p.size >= 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_spawner(
        spawner: &mut Spawner,
        difficulty: &Difficulty,
        dilated: bool,
        cfg: &RunnerConfig,
        secs: f32,
    ) -> (Vec<Obstacle>, Vec<PowerUp>) {
        let mut obstacles = Vec::new();
        let mut powerups = Vec::new();
        let ticks = (secs * cfg.tick_rate_hz) as u64;
        for tick in 1..=ticks {
            let now = tick as f32 / cfg.tick_rate_hz;
            spawner.spawn_due(now, difficulty, dilated, cfg, &mut obstacles, &mut powerups);
        }
        (obstacles, powerups)
    }

    #[test]
    fn obstacle_spawns_after_interval() {
        let cfg = RunnerConfig::default();
        let difficulty = Difficulty::new(&cfg);
        let mut spawner = Spawner::new(1);
        let mut obstacles = Vec::new();
        let mut powerups = Vec::new();

        let r = spawner.spawn_due(1.4, &difficulty, false, &cfg, &mut obstacles, &mut powerups);
        assert!(!r.obstacle);
        let r = spawner.spawn_due(1.6, &difficulty, false, &cfg, &mut obstacles, &mut powerups);
        assert!(r.obstacle);
        assert_eq!(obstacles.len(), 1);

        let o = &obstacles[0];
        assert_eq!(o.x, cfg.field.width);
        assert!(o.height >= cfg.spawn.obstacle_min_height);
        assert!(o.height <= cfg.spawn.obstacle_max_height);
        assert_eq!(o.y + o.height, cfg.field.ground_level);
    }

    #[test]
    fn dilation_halves_spawn_rate() {
        let cfg = RunnerConfig::default();
        let difficulty = Difficulty::new(&cfg);

        let (normal, _) = run_spawner(&mut Spawner::new(3), &difficulty, false, &cfg, 30.0);
        let (dilated, _) = run_spawner(&mut Spawner::new(3), &difficulty, true, &cfg, 30.0);

        // 30s at 1.5s vs 3.0s intervals (one tick of slack per spawn)
        assert!((18..=20).contains(&normal.len()), "normal: {}", normal.len());
        assert!((9..=10).contains(&dilated.len()), "dilated: {}", dilated.len());
    }

    #[test]
    fn powerups_use_their_own_clock() {
        let cfg = RunnerConfig::default();
        let difficulty = Difficulty::new(&cfg);
        let (obstacles, powerups) =
            run_spawner(&mut Spawner::new(9), &difficulty, false, &cfg, 17.0);
        assert_eq!(powerups.len(), 2);
        assert!(obstacles.len() > powerups.len());
        for p in &powerups {
            assert!(p.y >= 0.0);
            assert!(p.y + p.size <= cfg.field.ground_level);
        }
    }

    #[test]
    fn all_powerup_kinds_eventually_spawn() {
        let mut cfg = RunnerConfig::default();
        cfg.spawn.powerup_spawn_interval = 0.01;
        let difficulty = Difficulty::new(&cfg);
        let (_, powerups) = run_spawner(&mut Spawner::new(5), &difficulty, false, &cfg, 10.0);
        for kind in PowerUpKind::ALL {
            assert!(powerups.iter().any(|p| p.kind == kind), "{kind:?} never spawned");
        }
    }

    #[test]
    fn same_seed_same_entities() {
        let cfg = RunnerConfig::default();
        let difficulty = Difficulty::new(&cfg);
        let a = run_spawner(&mut Spawner::new(77), &difficulty, false, &cfg, 20.0);
        let b = run_spawner(&mut Spawner::new(77), &difficulty, false, &cfg, 20.0);
        assert_eq!(a, b);
    }

    #[test]
    fn ramp_is_monotonic_and_floored() {
        let cfg = RunnerConfig::default();
        let mut d = Difficulty::new(&cfg);
        let mut prev = d;
        for _ in 0..10_000 {
            d.ramp(&cfg, false);
            assert!(d.obstacle_speed >= prev.obstacle_speed);
            assert!(d.obstacle_spawn_interval <= prev.obstacle_spawn_interval);
            assert!(d.obstacle_spawn_interval >= cfg.spawn.min_spawn_interval);
            prev = d;
        }
        assert_eq!(d.obstacle_spawn_interval, cfg.spawn.min_spawn_interval);
    }

    #[test]
    fn dilated_ramp_is_slower() {
        let cfg = RunnerConfig::default();
        let mut normal = Difficulty::new(&cfg);
        let mut slow = Difficulty::new(&cfg);
        for _ in 0..100 {
            normal.ramp(&cfg, false);
            slow.ramp(&cfg, true);
        }
        let base = cfg.spawn.initial_speed;
        let gained_normal = normal.obstacle_speed - base;
        let gained_slow = slow.obstacle_speed - base;
        assert!((gained_slow * 2.0 - gained_normal).abs() < 1e-3);
        assert_eq!(slow.effective_speed(true), slow.obstacle_speed * 0.5);
    }

    #[test]
    fn scroll_moves_left_and_culls() {
        let mut obstacles = vec![
            Obstacle {
                id: 1,
                x: 10.0,
                y: 300.0,
                width: 30.0,
                height: 50.0,
            },
            Obstacle {
                id: 2,
                x: 500.0,
                y: 300.0,
                width: 30.0,
                height: 50.0,
            },
        ];
        let mut powerups = vec![PowerUp {
            id: 3,
            x: -20.0,
            y: 200.0,
            size: 25.0,
            kind: PowerUpKind::Shield,
        }];

        scroll(&mut obstacles, &mut powerups, 5.0);
        assert_eq!(obstacles[0].x, 5.0);
        assert_eq!(powerups.len(), 1);

        scroll(&mut obstacles, &mut powerups, 36.0);
        assert_eq!(obstacles.len(), 1, "obstacle 1 is off-screen");
        assert_eq!(obstacles[0].id, 2);
        assert!(powerups.is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn obstacle_heights_stay_in_range(seed in 0u64..1000) {
                let cfg = RunnerConfig::default();
                let difficulty = Difficulty::new(&cfg);
                let (obstacles, _) =
                    run_spawner(&mut Spawner::new(seed), &difficulty, false, &cfg, 10.0);
                for o in &obstacles {
                    prop_assert!(o.height >= cfg.spawn.obstacle_min_height);
                    prop_assert!(o.height <= cfg.spawn.obstacle_max_height);
                }
            }
        }
    }
}
