//! Value Objects

pub mod user_role;
