use carchase_core::geometry::Aabb;

use crate::powerups::{EffectState, PowerUp, PowerUpKind};
use crate::spawner::Obstacle;

/// Result of testing the player against every obstacle in one tick.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ObstacleCollisions {
    /// Obstacles destroyed by the shield.
    pub absorbed: Vec<u32>,
    /// An unshielded hit occurred; the run must end.
    pub fatal: bool,
}

/// Test the player against every obstacle.
///
/// A shield absorbs exactly one hit and destroys that obstacle. The pass
/// stops at the first unshielded hit, so a tick reports at most one fatal
/// collision no matter how many obstacles overlap.
pub fn check_obstacles(
    player: &Aabb,
    obstacles: &mut Vec<Obstacle>,
    effects: &mut EffectState,
) -> ObstacleCollisions {
    let mut result = ObstacleCollisions::default();

    for obstacle in obstacles.iter() {
        if !player.overlaps(&obstacle.bounds()) {
            continue;
        }
        if effects.consume_shield() {
            result.absorbed.push(obstacle.id);
            continue;
        }
        result.fatal = true;
        break;
    }

    if !result.absorbed.is_empty() {
        obstacles.retain(|o| !result.absorbed.contains(&o.id));
    }
    result
}

/// Remove every power-up the player touches and return their kinds in
/// pickup order.
pub fn collect_powerups(player: &Aabb, powerups: &mut Vec<PowerUp>) -> Vec<PowerUpKind> {
    let mut collected = Vec::new();
    powerups.retain(|p| {
        if player.overlaps(&p.bounds()) {
            collected.push(p.kind);
            false
        } else {
            true
        }
    });
    collected
}
