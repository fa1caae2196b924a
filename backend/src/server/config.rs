//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use user_registry::inbound::http::state::HttpState;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) http_state: HttpState,
}

impl ServerConfig {
    /// Construct a server configuration serving `http_state` on `bind_addr`.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, http_state: HttpState) -> Self {
        Self {
            bind_addr,
            http_state,
        }
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
