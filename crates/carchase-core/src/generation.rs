use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one independently-owned run of the simulation.
///
/// Every side effect that may outlive its run (power-up expiries, score
/// submissions and their outcomes) carries the id of the generation that
/// produced it, and is discarded when that id is no longer current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GenerationId(u64);

impl GenerationId {
    /// The id of the first run in a session.
    pub const FIRST: GenerationId = GenerationId(1);

    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// The id the following run will use.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for GenerationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen-{}", self.0)
    }
}
