// src/client_key.rs

// deriving a stable client key from a peer address

// dependencies
use crate::errors::AdmissionError;
use std::net::SocketAddr;

/// Extract the host part of a `host:port` peer address to use as the
/// admission key.
///
/// Accepts `1.2.3.4:80`, `[::1]:80` and `hostname:80`. The port may be empty
/// (`1.2.3.4:`) but otherwise must be a valid port number. An IPv6 zone
/// (`[fe80::1%eth0]:80`) is dropped so every interface of one host shares a
/// key. Any failure must be answered as a server error by the caller; it is
/// never a reason to skip the admission check.
pub fn client_key_from_peer(addr: &str) -> Result<String, AdmissionError> {
    if let Ok(socket) = addr.parse::<SocketAddr>() {
        return Ok(socket.ip().to_string());
    }

    let fail = |reason: &'static str| -> Result<String, AdmissionError> {
        tracing::warn!(peer = addr, reason, "could not derive client key");
        Err(AdmissionError::ClientKey {
            addr: addr.to_owned(),
            reason,
        })
    };

    let (host, port) = if let Some(bracketed) = addr.strip_prefix('[') {
        let Some((host, rest)) = bracketed.split_once(']') else {
            return fail("missing ']' in address");
        };
        let Some(port) = rest.strip_prefix(':') else {
            if rest.is_empty() {
                return fail("missing port in address");
            }
            return fail("unexpected characters after ']'");
        };
        let host = host.split_once('%').map_or(host, |(ip, _zone)| ip);
        (host, port)
    } else {
        let Some((host, port)) = addr.rsplit_once(':') else {
            return fail("missing port in address");
        };
        if host.contains(':') {
            return fail("too many colons in address");
        }
        if host.contains(['[', ']']) {
            return fail("unexpected bracket in address");
        }
        (host, port)
    };

    if host.is_empty() {
        return fail("missing host in address");
    }
    if !port.is_empty() && port.parse::<u16>().is_err() {
        return fail("invalid port");
    }
    Ok(host.to_owned())
}

/// Key for a peer whose socket address is already parsed.
pub fn client_key_from_socket(addr: &SocketAddr) -> String {
    addr.ip().to_string()
}
