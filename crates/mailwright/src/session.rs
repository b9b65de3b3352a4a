//! Mail session configuration.

use mailwright_mime::Address;
use std::time::Duration;

/// Default SMTP port.
pub const DEFAULT_SMTP_PORT: u16 = 25;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(60);

/// Transport session configuration resolved from an [`Email`](crate::Email).
///
/// Holds the connection parameters a mail transport needs. No connection
/// is opened here; transport is owned by the consumer of this config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Mail server hostname.
    pub host: String,
    /// Mail server port.
    pub port: u16,
    /// Socket connection timeout.
    pub connect_timeout: Duration,
    /// Socket read/write timeout.
    pub io_timeout: Duration,
    /// Address delivery failures are redirected to.
    pub bounce_address: Option<Address>,
}

impl SessionConfig {
    /// Creates a configuration for the given host with default port and
    /// timeouts.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_SMTP_PORT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            io_timeout: DEFAULT_IO_TIMEOUT,
            bounce_address: None,
        }
    }

    /// Sets the port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the socket connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the socket read/write timeout.
    #[must_use]
    pub const fn io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout = timeout;
        self
    }

    /// Sets the bounce address.
    #[must_use]
    pub fn bounce_address(mut self, address: Address) -> Self {
        self.bounce_address = Some(address);
        self
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn test_session_defaults() {
        let config = SessionConfig::new("smtp.example.com");
        assert_eq!(config.host, "smtp.example.com");
        assert_eq!(config.port, DEFAULT_SMTP_PORT);
        assert_eq!(config.connect_timeout, Duration::from_secs(60));
        assert_eq!(config.io_timeout, Duration::from_secs(60));
        assert!(config.bounce_address.is_none());
    }

    #[test]
    fn test_session_setters() {
        let bounce = Address::new("bounces@example.com").unwrap();
        let config = SessionConfig::new("smtp.example.com")
            .port(587)
            .connect_timeout(Duration::from_secs(10))
            .io_timeout(Duration::from_secs(20))
            .bounce_address(bounce.clone());

        assert_eq!(config.port, 587);
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.io_timeout, Duration::from_secs(20));
        assert_eq!(config.bounce_address, Some(bounce));
    }
}
