use std::time::Duration;

use serde::Deserialize;

use crate::{
    constants::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_PORT, DEFAULT_READ_SIZE, MAX_READ_SIZE},
    error::SessionError,
    Result,
};

/// Where to connect and how the session reads and dials. The library never
/// picks a server on its own; front-ends build one of these, usually from a
/// TOML file.
///
/// ```toml
/// host = "mud.example.org"
/// port = 8000
/// read_size = 8192
/// connect_timeout_secs = 5
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on bytes requested per `Session::receive`, between 1 and
    /// [`MAX_READ_SIZE`].
    pub read_size: usize,
    /// `None` waits as long as the operating system does.
    pub connect_timeout_secs: Option<u64>,
    pub nodelay: bool,
}

impl SessionConfig {
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        SessionConfig { host: host.into(), port, ..SessionConfig::default() }
    }

    /// Parses a configuration from TOML. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] for malformed TOML or unknown keys and
    /// [`SessionError::InvalidReadSize`] for an unusable `read_size`.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: SessionConfig = toml::from_str(source)?;
        config.validate()?;

        Ok(config)
    }

    /// Checks the values TOML alone cannot constrain.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidReadSize`] if `read_size` is zero or
    /// above [`MAX_READ_SIZE`].
    pub fn validate(&self) -> Result<()> {
        check_read_size(self.read_size)?;
        Ok(())
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }
}

pub(crate) fn check_read_size(read_size: usize) -> Result<usize> {
    if read_size == 0 || read_size > MAX_READ_SIZE {
        return Err(SessionError::InvalidReadSize(read_size));
    }

    Ok(read_size)
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            read_size: DEFAULT_READ_SIZE,
            connect_timeout_secs: Some(DEFAULT_CONNECT_TIMEOUT_SECS),
            nodelay: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 4000);
        assert_eq!(config.read_size, 4096);
        assert_eq!(config.connect_timeout(), Some(Duration::from_secs(10)));
        assert!(config.nodelay);
    }

    #[test]
    fn test_from_toml_fills_missing_keys() {
        let config = SessionConfig::from_toml_str("host = \"mud.example.org\"\nport = 8000\n").unwrap();
        assert_eq!(config, SessionConfig::new("mud.example.org", 8000));
    }

    #[test]
    fn test_from_toml_overrides() {
        let source = r#"
            host = "10.0.0.7"
            port = 23
            read_size = 512
            connect_timeout_secs = 3
            nodelay = false
        "#;
        let config = SessionConfig::from_toml_str(source).unwrap();
        assert_eq!(config.read_size, 512);
        assert_eq!(config.connect_timeout(), Some(Duration::from_secs(3)));
        assert!(!config.nodelay);
    }

    #[test]
    fn test_from_toml_rejects_unknown_keys() {
        let result = SessionConfig::from_toml_str("hostname = \"typo\"\n");
        assert!(matches!(result, Err(SessionError::Config(_))));
    }

    #[test]
    fn test_from_toml_rejects_zero_read_size() {
        let result = SessionConfig::from_toml_str("read_size = 0\n");
        assert!(matches!(result, Err(SessionError::InvalidReadSize(0))));
    }

    #[test]
    fn test_from_toml_rejects_oversized_read_size() {
        let result = SessionConfig::from_toml_str("read_size = 1_000_000_000\n");
        assert!(matches!(result, Err(SessionError::InvalidReadSize(1_000_000_000))));
    }

    #[test]
    fn test_validate_accepts_bounds() {
        let mut config = SessionConfig::default();
        config.read_size = 1;
        assert!(config.validate().is_ok());
        config.read_size = MAX_READ_SIZE;
        assert!(config.validate().is_ok());
        config.read_size = MAX_READ_SIZE + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_rejects_bad_port() {
        assert!(SessionConfig::from_toml_str("port = 70000\n").is_err());
    }
}
