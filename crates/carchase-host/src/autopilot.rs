use carchase_core::input::{EdgeTrigger, InputAction};
use carchase_runner::{Engine, Phase};

use crate::config::AutopilotConfig;

/// Scripted input source for headless runs.
///
/// Models two keys. Jump is held while the player is grounded with an
/// obstacle inside the look-ahead window; Restart is held while the run is
/// over. Both go through edge triggers, so a held key acts once.
#[derive(Debug, Clone)]
pub struct Autopilot {
    look_ahead: f32,
    jumps: bool,
    jump_key: EdgeTrigger,
    restart_key: EdgeTrigger,
}

impl Autopilot {
    pub fn new(config: &AutopilotConfig) -> Self {
        Self {
            look_ahead: config.look_ahead,
            jumps: config.jumps,
            jump_key: EdgeTrigger::new(),
            restart_key: EdgeTrigger::new(),
        }
    }

    /// Input for this frame, if any.
    pub fn poll(&mut self, engine: &Engine) -> Option<InputAction> {
        let running = engine.phase() == Phase::Running;

        let jump_down = running && self.jumps && engine.player().grounded && self.threat(engine);
        let restart_down = !running;

        let jump = self.jump_key.update(jump_down);
        let restart = self.restart_key.update(restart_down);

        if restart {
            Some(InputAction::Restart)
        } else if jump {
            Some(InputAction::Jump)
        } else {
            None
        }
    }

    /// An obstacle whose leading edge is within `look_ahead` of the player's
    /// front edge.
    fn threat(&self, engine: &Engine) -> bool {
        let player = engine.player().bounds();
        let front = player.right();
        engine.obstacles().iter().any(|o| {
            let gap = o.x - front;
            (0.0..=self.look_ahead).contains(&gap)
        })
    }
}
