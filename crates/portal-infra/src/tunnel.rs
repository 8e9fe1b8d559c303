//! Listener endpoint selection.
//!
//! Local runs bind the loopback interface and are reached on `localhost`.
//! Remote runs bind every interface so a tunnel agent running beside the
//! portal can forward its public endpoint to the port. The tunnel itself is
//! managed outside this process and reads its own credential; the portal
//! only needs the public URL it exposes.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Port bound when none is configured.
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug)]
pub enum ListenMode {
    Local {
        port: u16,
    },
    Remote {
        port: u16,
        /// Public URL the tunnel exposes.
        public_url: String,
    },
}

impl ListenMode {
    pub fn is_local(&self) -> bool {
        matches!(self, ListenMode::Local { .. })
    }

    /// Address to bind the listener on.
    pub fn bind_addr(&self) -> SocketAddr {
        match self {
            ListenMode::Local { port } => SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), *port),
            ListenMode::Remote { port, .. } => {
                SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), *port)
            }
        }
    }

    /// URL users open once the listener is bound to `bound`.
    ///
    /// Local URLs use the actually bound port, so port 0 works.
    pub fn public_url(&self, bound: SocketAddr) -> String {
        match self {
            ListenMode::Local { .. } => format!("http://localhost:{}", bound.port()),
            ListenMode::Remote { public_url, .. } => public_url.trim_end_matches('/').to_string(),
        }
    }
}
