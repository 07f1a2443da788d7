use super::types::DEFAULT_API_PORT;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub bind_address: IpAddr,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub max_body_size: usize,
    pub cors_enabled: bool,
    /// Empty means any origin.
    pub cors_origins: Vec<String>,
}

impl ApiConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_API_PORT,
            request_timeout_secs: 30,
            max_body_size: 256 * 1024,
            cors_enabled: true,
            cors_origins: vec![],
        }
    }
}
