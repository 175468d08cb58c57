use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::generation::GenerationId;

/// Trait for game-specific power-up kind enums.
pub trait PowerUpKind: Clone + Copy + PartialEq + Serialize + DeserializeOwned {
    /// Default duration in seconds for this power-up.
    fn duration(&self) -> f32;
}

/// Convert a duration in seconds to a whole number of ticks, rounding up so
/// that a non-zero duration always lasts at least one tick.
pub fn ticks_for(duration_secs: f32, tick_rate_hz: f32) -> u64 {
    if !duration_secs.is_finite() || duration_secs <= 0.0 || tick_rate_hz <= 0.0 {
        return 0;
    }
    (duration_secs * tick_rate_hz).ceil() as u64
}

/// An activated effect, scheduled to expire at a fixed tick of the
/// generation that activated it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ActivePowerUp<K: PowerUpKind> {
    pub kind: K,
    pub generation: GenerationId,
    pub expires_at_tick: u64,
}

impl<K: PowerUpKind> ActivePowerUp<K> {
    pub fn new(kind: K, generation: GenerationId, now_tick: u64, duration_ticks: u64) -> Self {
        Self {
            kind,
            generation,
            expires_at_tick: now_tick.saturating_add(duration_ticks),
        }
    }

    pub fn is_expired(&self, now_tick: u64) -> bool {
        now_tick >= self.expires_at_tick
    }

    pub fn remaining_ticks(&self, now_tick: u64) -> u64 {
        self.expires_at_tick.saturating_sub(now_tick)
    }
}

/// Per-generation table of active effects.
///
/// At most one entry per kind: re-activating a kind that is already active
/// replaces its expiry (latest pickup wins, no stacking).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct EffectSchedule<K: PowerUpKind> {
    entries: Vec<ActivePowerUp<K>>,
}

impl<K: PowerUpKind> Default for EffectSchedule<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: PowerUpKind> EffectSchedule<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an effect. Returns `true` if the kind was not already active.
    pub fn activate(&mut self, entry: ActivePowerUp<K>) -> bool {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.kind == entry.kind) {
            *existing = entry;
            false
        } else {
            self.entries.push(entry);
            true
        }
    }

    pub fn is_active(&self, kind: K) -> bool {
        self.entries.iter().any(|e| e.kind == kind)
    }

    pub fn get(&self, kind: K) -> Option<&ActivePowerUp<K>> {
        self.entries.iter().find(|e| e.kind == kind)
    }

    /// Remove a kind before its expiry. Returns `true` if it was active.
    pub fn cancel(&mut self, kind: K) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.kind != kind);
        self.entries.len() != before
    }

    /// Remove every entry that has expired at `now_tick` and return the kinds
    /// whose deactivation must be applied. Entries scheduled by any other
    /// generation are dropped without being returned.
    pub fn drain_expired(&mut self, current: GenerationId, now_tick: u64) -> Vec<K> {
        let mut expired = Vec::new();
        self.entries.retain(|e| {
            if e.generation != current {
                tracing::debug!(
                    stale = %e.generation,
                    current = %current,
                    "Discarding effect scheduled by a previous generation"
                );
                return false;
            }
            if e.is_expired(now_tick) {
                expired.push(e.kind);
                return false;
            }
            true
        });
        expired
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActivePowerUp<K>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
