//! Core data models for the game tracker.

mod achievement;
mod game;
mod player;
mod sport;
mod stats;
mod streak;
mod user;

pub use achievement::*;
pub use game::*;
pub use player::*;
pub use sport::*;
pub use stats::*;
pub use streak::*;
pub use user::*;
