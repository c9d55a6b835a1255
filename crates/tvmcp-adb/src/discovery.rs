//! LAN address discovery

use std::net::{IpAddr, SocketAddr, UdpSocket};
use tracing::debug;

use tvmcp_core::Discovery;

const DEFAULT_PROBE_TARGET: ([u8; 4], u16) = ([8, 8, 8, 8], 80);

/// Finds the outbound interface address by connecting a UDP socket.
///
/// `connect` on UDP only selects a route; no packet is sent.
#[derive(Debug, Clone)]
pub struct UdpProbeDiscovery {
    probe_target: SocketAddr,
}

impl Default for UdpProbeDiscovery {
    fn default() -> Self {
        Self { probe_target: SocketAddr::from(DEFAULT_PROBE_TARGET) }
    }
}

impl UdpProbeDiscovery {
    pub fn new(probe_target: SocketAddr) -> Self {
        Self { probe_target }
    }

    fn probe(&self) -> std::io::Result<IpAddr> {
        let bind_addr: SocketAddr = if self.probe_target.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };
        let socket = UdpSocket::bind(bind_addr)?;
        socket.connect(self.probe_target)?;
        Ok(socket.local_addr()?.ip())
    }
}

impl Discovery for UdpProbeDiscovery {
    fn local_address(&self) -> Option<String> {
        match self.probe() {
            Ok(ip) if !ip.is_unspecified() => Some(ip.to_string()),
            Ok(_) => None,
            Err(e) => {
                debug!(error = %e, "local address probe failed");
                None
            }
        }
    }
}
