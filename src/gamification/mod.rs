//! Streak tracking and achievement unlocking.
//!
//! [`StreakTracker`] advances a user's consecutive-day counter when a game
//! is logged. [`AchievementEvaluator`] compares derived statistics against
//! the seeded [`AchievementCatalog`] and records unlocks; an unlock is a
//! one-way transition, at most once per (user, achievement) pair.

mod catalog;
mod evaluator;
mod streak;

pub use catalog::{seed_definitions, AchievementCatalog};
pub use evaluator::AchievementEvaluator;
pub use streak::StreakTracker;
