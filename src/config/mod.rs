use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

/// Application configuration, built once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: Arc<PathBuf>,
    pub static_dir: Arc<PathBuf>,
    pub template_dir: Arc<PathBuf>,
    pub host: IpAddr,
    pub port: u16,
    pub version: &'static str,
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            data_dir: Arc::new(PathBuf::from("data")),
            static_dir: Arc::new(PathBuf::from("static")),
            template_dir: Arc::new(PathBuf::from("static/html")),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 5000,
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    /// Create configuration with custom values
    pub fn with_custom(
        data_dir: PathBuf,
        static_dir: PathBuf,
        port: Option<u16>,
        host: Option<IpAddr>,
    ) -> Self {
        let template_dir = static_dir.join("html");
        Self {
            data_dir: Arc::new(data_dir),
            static_dir: Arc::new(static_dir),
            template_dir: Arc::new(template_dir),
            port: port.unwrap_or(5000),
            host: host.unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST)),
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    /// Get the socket address for binding
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_bind_localhost() {
        let config = Config::new();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:5000");
        assert_eq!(config.data_dir.as_path(), std::path::Path::new("data"));
    }

    #[test]
    fn test_custom_template_dir_follows_static_dir() {
        let config = Config::with_custom(PathBuf::from("/srv/pages"), PathBuf::from("/srv/assets"), Some(8080), None);
        assert_eq!(config.template_dir.as_path(), std::path::Path::new("/srv/assets/html"));
        assert_eq!(config.port, 8080);
    }
}
