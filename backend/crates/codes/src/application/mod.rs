//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod generate_code;
pub mod notifier;
pub mod queries;
pub mod redeem_code;

// Re-exports
pub use config::CodesConfig;
pub use generate_code::{GenerateCodeUseCase, GenerateInput};
pub use notifier::{LeaderboardNotifier, Subscription};
pub use queries::{CodeHistoryQuery, LeaderboardQuery};
pub use redeem_code::{RedeemCodeUseCase, RedeemInput, RedeemOutput};
