use serde::{Deserialize, Serialize};

/// Discrete player actions delivered by the host input source.
///
/// Sources are edge-triggered: a held key produces one action on press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    /// Jump, accepted only while a run is in progress.
    Jump,
    /// Start a new run, accepted only after the current run has ended.
    Restart,
}

/// Converts a level-triggered "is the key down" signal into press edges.
#[derive(Debug, Clone, Default)]
pub struct EdgeTrigger {
    was_down: bool,
}

impl EdgeTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current key state. Returns `true` only on the frame the key
    /// goes from released to pressed.
    pub fn update(&mut self, is_down: bool) -> bool {
        let pressed = is_down && !self.was_down;
        self.was_down = is_down;
        pressed
    }
}
