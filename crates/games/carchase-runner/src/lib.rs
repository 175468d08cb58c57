pub mod collision;
pub mod config;
pub mod engine;
pub mod physics;
pub mod powerups;
pub mod render;
pub mod scoring;
pub mod session;
pub mod spawner;

pub use config::{ConfigError, RunnerConfig};
pub use engine::{Engine, Phase, RunSummary, TickEvent};
pub use powerups::PowerUpKind;
pub use session::Session;
