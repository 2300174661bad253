//! Domain Entities

pub mod code;
pub mod leaderboard;
