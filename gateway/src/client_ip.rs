//! Client IP resolution.
//!
//! The admission key is the client IP address. Behind a load balancer the
//! connection peer is not the client, so forwarded headers take priority:
//!
//! 1. `X-Forwarded-For` (first IP in the list)
//! 2. `X-Real-IP`
//! 3. Connection peer address (`ConnectInfo`)
//! 4. Localhost fallback

use axum::extract::connect_info::ConnectInfo;
use http::{Extensions, HeaderMap};
use std::net::{IpAddr, SocketAddr};

/// Resolve the client IP for a request.
#[must_use]
pub fn client_ip(headers: &HeaderMap, extensions: &Extensions) -> IpAddr {
    // Try X-Forwarded-For (take first IP)
    if let Some(forwarded) = headers.get("X-Forwarded-For") {
        if let Ok(forwarded_str) = forwarded.to_str() {
            if let Some(first_ip) = forwarded_str.split(',').next() {
                if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                    return ip;
                }
            }
        }
    }

    // Try X-Real-IP
    if let Some(real_ip) = headers.get("X-Real-IP") {
        if let Ok(ip_str) = real_ip.to_str() {
            if let Ok(ip) = ip_str.parse::<IpAddr>() {
                return ip;
            }
        }
    }

    // Connection peer, present when served with connect info
    if let Some(ConnectInfo(addr)) = extensions.get::<ConnectInfo<SocketAddr>>() {
        return addr.ip();
    }

    IpAddr::from([127, 0, 0, 1])
}
