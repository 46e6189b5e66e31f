//! HTTP server configuration object.

use std::net::SocketAddr;

/// Builder-style configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    bind_addr: SocketAddr,
    database_url: String,
    pool_max_size: u32,
}

impl ServerConfig {
    /// Construct a configuration with the default pool size.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, database_url: impl Into<String>) -> Self {
        Self {
            bind_addr,
            database_url: database_url.into(),
            pool_max_size: 10,
        }
    }

    /// Set the maximum number of pooled database connections.
    #[must_use]
    pub fn with_pool_max_size(mut self, pool_max_size: u32) -> Self {
        self.pool_max_size = pool_max_size;
        self
    }

    /// Socket address the server binds to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// PostgreSQL connection string.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Maximum number of pooled database connections.
    #[must_use]
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size
    }
}

#[cfg(test)]
mod tests {
    use super::ServerConfig;

    #[test]
    fn builder_overrides_the_pool_size() {
        let config = ServerConfig::new(
            "127.0.0.1:8080".parse().expect("valid addr"),
            "postgres://localhost/pengaduan",
        )
        .with_pool_max_size(32);

        assert_eq!(config.pool_max_size(), 32);
        assert_eq!(config.database_url(), "postgres://localhost/pengaduan");
    }
}
