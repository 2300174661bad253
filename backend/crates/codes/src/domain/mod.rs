//! Domain Layer
//!
//! Contains entities, read models, generation logic, and repository traits.

pub mod entity;
pub mod repository;
pub mod services;

// Re-exports
pub use entity::{
    code::Code,
    leaderboard::{HistoryEntry, LeaderboardEntry},
};
pub use repository::CodeRepository;
