//! # Rally Tracker
//!
//! A self-hosted game tracker for racket sports, with achievements and
//! play streaks.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (users, players, games, achievements)
//! - **storage**: SQLite persistence layer
//! - **stats**: Aggregates derived from the game log
//! - **gamification**: Achievement catalog, evaluator, and streak tracking
//! - **auth**: Password hashing and bearer tokens
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod auth;
pub mod config;
pub mod gamification;
pub mod models;
pub mod stats;
pub mod storage;

pub use models::*;
