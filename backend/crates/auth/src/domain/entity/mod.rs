//! Domain Entities

pub mod telegram_user;
pub mod user;
