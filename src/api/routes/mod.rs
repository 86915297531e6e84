//! Route handlers, grouped by resource.

pub mod auth;
pub mod games;
pub mod gamification;
pub mod meta;
pub mod players;
pub mod statistics;
