//! Client Identification
//!
//! Resolves the caller's IP behind reverse proxies, for log correlation.

use std::net::IpAddr;

use axum::http::HeaderMap;

/// Resolve the client IP: the first `X-Forwarded-For` entry when the
/// request came through a proxy, the connection peer otherwise.
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|list| list.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok());

    forwarded.or(direct_ip)
}
