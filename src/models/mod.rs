//! Core data models for the league.

mod attendance;
mod ids;
mod player;
mod season;
mod stats;

pub use attendance::*;
pub use ids::*;
pub use player::*;
pub use season::*;
pub use stats::*;
