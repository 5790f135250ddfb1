use axum::http::HeaderMap;
use std::net::SocketAddr;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

// Work out who is calling.
// Proxy headers first, then the socket peer. Header values are untrusted and used as-is.
pub fn client_key(headers: &HeaderMap, peer: SocketAddr) -> String {
    if let Some(forwarded) = usable_header(headers, X_FORWARDED_FOR) {
        // "client, proxy1, proxy2" -> "client"
        let first = forwarded.split(',').next().unwrap_or(forwarded).trim();
        return first.to_string();
    }

    if let Some(real_ip) = usable_header(headers, X_REAL_IP) {
        return real_ip.to_string();
    }

    peer.ip().to_string()
}

// Present, valid text, non-empty and not the literal "unknown"
fn usable_header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case("unknown"))
}
