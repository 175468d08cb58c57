use serde::{Deserialize, Serialize};

use carchase_core::geometry::Aabb;

use crate::config::RunnerPhysicsConfig;

/// The player's car. `x` is fixed for the whole run; only `y` moves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Vertical velocity in units per tick (negative is upward).
    pub vy: f32,
    pub grounded: bool,
}

impl Player {
    /// A player resting on the ground line.
    pub fn new(physics: &RunnerPhysicsConfig, ground_level: f32) -> Self {
        Self {
            x: physics.player_x,
            y: ground_level - physics.player_height,
            width: physics.player_width,
            height: physics.player_height,
            vy: 0.0,
            grounded: true,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }

    /// Resting `y` for this player on the given ground line.
    pub fn ground_y(&self, ground_level: f32) -> f32 {
        ground_level - self.height
    }
}

/// Start a jump with the given upward force. Only effective when grounded.
pub fn jump(player: &mut Player, force: f32) -> bool {
    if !player.grounded {
        return false;
    }
    player.grounded = false;
    player.vy = -force;
    true
}

/// Advance the player by one tick of gravity and velocity.
pub fn integrate(player: &mut Player, gravity: f32, ground_level: f32) {
    if player.grounded {
        return;
    }

    player.vy += gravity;
    player.y += player.vy;

    let ground_y = player.ground_y(ground_level);
    if player.y >= ground_y {
        player.y = ground_y;
        player.vy = 0.0;
        player.grounded = true;
    } else if player.y < 0.0 {
        // Top of the field
        player.y = 0.0;
        if player.vy < 0.0 {
            player.vy = 0.0;
        }
    }
}
