//! Presentation Layer
//!
//! HTTP handlers, DTOs, routers, and the WebSocket endpoint.

pub mod dto;
pub mod handlers;
pub mod router;
pub mod ws;

pub use handlers::CodesAppState;
pub use router::{
    admin_router, admin_router_generic, leaderboard_router, leaderboard_router_generic,
    redeem_router, redeem_router_generic, ws_router, ws_router_generic,
};
