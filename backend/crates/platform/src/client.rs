//! Client Address Resolution

use http::HeaderMap;
use std::net::IpAddr;

/// Client IP for per-client limits.
///
/// The socket peer is used unless `trust_forwarded_for` is set, in which
/// case the first parseable `X-Forwarded-For` entry wins. Enable it only
/// behind a reverse proxy that overwrites the header.
pub fn extract_client_ip(
    headers: &HeaderMap,
    direct_ip: Option<IpAddr>,
    trust_forwarded_for: bool,
) -> Option<IpAddr> {
    if !trust_forwarded_for {
        return direct_ip;
    }

    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|xff| xff.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok())
        .or(direct_ip)
}
