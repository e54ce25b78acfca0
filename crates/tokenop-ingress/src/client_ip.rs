//! Client network identity used to key rate-limit buckets.

use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Priority: `CF-Connecting-IP` > `X-Real-IP` > `X-Forwarded-For` (first hop)
/// > the TCP peer address.
pub fn extract_client_ip(headers: &HeaderMap, peer_addr: Option<SocketAddr>) -> String {
    let cf_ip = headers
        .get("cf-connecting-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .map(str::to_string);

    let real_ip = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .map(str::to_string);

    let forwarded_for = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .map(str::to_string);

    cf_ip
        .or(real_ip)
        .or(forwarded_for)
        .or_else(|| peer_addr.map(|a| a.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}
