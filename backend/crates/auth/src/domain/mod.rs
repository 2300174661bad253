//! Domain Layer
//!
//! Contains entities, value objects, validation logic, and repository traits.

pub mod entity;
pub mod repository;
pub mod services;
pub mod value_object;

// Re-exports
pub use entity::{
    telegram_user::{TelegramAuthData, TelegramUser},
    user::User,
};
pub use repository::UserRepository;
pub use value_object::user_role::UserRole;
