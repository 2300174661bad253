//! Shared Kernel
//!
//! The smallest core shared by every backend crate:
//! - The unified error model: classification, wire projection, RFC 7807
//!   problem-details rendering
//! - Typed entity IDs
//! - The authenticated request context the middleware attaches
//!
//! Only things with one meaning across all domains belong here.

pub mod context;
pub mod error {
    pub mod app_error;
    pub mod kind;
}
pub mod id;
