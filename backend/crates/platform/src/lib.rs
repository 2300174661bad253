//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, HMAC constructions)
//! - Client identification helpers (forwarded IP extraction)
//! - Cookie management

pub mod client;
pub mod cookie;
pub mod crypto;
