pub mod client;
pub mod config;
pub mod error;
pub mod reporter;

pub use client::{LeaderboardClient, LeaderboardEntry};
pub use config::LeaderboardConfig;
pub use error::LeaderboardError;
pub use reporter::LeaderboardReporter;
