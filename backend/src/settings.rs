//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `USER_REGISTRY_*` environment variables and
//! configuration files, in OrthoConfig's usual precedence order.

use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_DATA_FILE: &str = "data/users.json";

/// Configuration values for the user registry service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USER_REGISTRY")]
pub struct AppSettings {
    /// Address the HTTP listener binds to.
    pub host: Option<String>,
    /// Port the HTTP listener binds to.
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// Path of the JSON file holding user records.
    pub data_file: Option<PathBuf>,
}

impl AppSettings {
    /// Return the configured host, falling back to all interfaces.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Return the configured port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Return the configured store path, falling back to `data/users.json`.
    pub fn data_file(&self) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE))
    }

    /// Socket address assembled from [`Self::host`] and [`Self::port`].
    ///
    /// # Errors
    /// Returns [`AddrParseError`] when the host is not an IP address literal.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        let ip: IpAddr = self.host().parse()?;
        Ok(SocketAddr::new(ip, self.port()))
    }
}
