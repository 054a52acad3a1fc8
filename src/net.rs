//! Discovery of the URL other devices on the network can reach us at.

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

use crate::config::Settings;

/// The configured public URL, or `http://<lan-address>:<port>`.
pub fn reachable_url(settings: &Settings, bind: IpAddr) -> String {
    if let Some(url) = &settings.public_url {
        return url.clone();
    }

    let host = if bind.is_unspecified() || bind.is_loopback() {
        primary_local_ip().unwrap_or(bind)
    } else {
        bind
    };
    format_url(host, settings.port)
}

/// Address of the interface that routes to the outside world.
///
/// Connecting a UDP socket only selects a route; no packet is sent.
pub fn primary_local_ip() -> Option<IpAddr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect((Ipv4Addr::new(10, 255, 255, 255), 1)).ok()?;
    let ip = socket.local_addr().ok()?.ip();
    (!ip.is_unspecified()).then_some(ip)
}

fn format_url(host: IpAddr, port: u16) -> String {
    match host {
        IpAddr::V4(v4) => format!("http://{}:{}", v4, port),
        IpAddr::V6(v6) => format!("http://[{}]:{}", v6, port),
    }
}
