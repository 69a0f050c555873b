// ============================================
// File: crates/ccnl-relay/src/config.rs
// ============================================
//! # Relay Configuration
//!
//! ## Creation Reason
//! Provides configuration management for the relay's crypto face,
//! loaded from a TOML file.
//!
//! ## Main Functionality
//! - `RelayConfig`: Main configuration structure
//! - TOML file loading and parsing
//! - Configuration validation
//! - Default values for a local crypto service
//!
//! ## Configuration Sections
//! - `crypto`: Crypto face socket paths, callback label, buffer sizing
//! - `logging`: Log level
//!
//! ## Example Configuration
//! ```toml
//! [crypto]
//! enabled = true
//! socket_path = "/tmp/.ccnl-relay-crypto.sock"
//! service_path = "/tmp/.ccnl-crypto-server.sock"
//! callback = "ccnl_mgmt_crypto"
//! buffer_packets = 4
//!
//! [logging]
//! level = "info"
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - All config changes require relay restart
//! - Validate config before relay startup
//!
//! ## Last Modified
//! v0.1.0 - Initial configuration implementation

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use ccnl_core::protocol::dtag::{DEFAULT_CALLBACK, MAX_LABEL_LEN, MAX_PACKET_SIZE};

use crate::error::{RelayError, Result};

/// Upper bound for `crypto.buffer_packets`.
pub const MAX_BUFFER_PACKETS: usize = 64;

// ============================================
// RelayConfig
// ============================================

/// Main relay configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Crypto face configuration.
    #[serde(default)]
    pub crypto: CryptoConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RelayConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    /// Returns error if file cannot be read, parsed or validated.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        info!("Loading configuration from: {}", path_str);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RelayError::config_load(&path_str, e.to_string()))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| RelayError::config_load(&path_str, e.to_string()))?;

        config.validate()?;

        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Loads configuration from a string (useful for testing).
    ///
    /// # Errors
    /// Returns error if the text cannot be parsed or validated.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| RelayError::config_load("<string>", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns `ConfigInvalid` naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        self.crypto.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Serializes configuration to TOML string.
    #[must_use]
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}

// ============================================
// CryptoConfig
// ============================================

/// Crypto face configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CryptoConfig {
    /// Whether the crypto face is created at startup.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Relay side of the crypto face.
    #[serde(default = "default_socket_path")]
    pub socket_path: PathBuf,

    /// Socket the crypto service listens on.
    #[serde(default = "default_service_path")]
    pub service_path: PathBuf,

    /// Callback label put on relay-originated requests.
    #[serde(default = "default_callback")]
    pub callback: String,

    /// Kernel socket buffers, in packets of `MAX_PACKET_SIZE` bytes.
    #[serde(default = "default_buffer_packets")]
    pub buffer_packets: usize,
}

fn default_enabled() -> bool {
    true
}

fn default_socket_path() -> PathBuf {
    PathBuf::from("/tmp/.ccnl-relay-crypto.sock")
}

fn default_service_path() -> PathBuf {
    PathBuf::from("/tmp/.ccnl-crypto-server.sock")
}

fn default_callback() -> String {
    DEFAULT_CALLBACK.to_string()
}

fn default_buffer_packets() -> usize {
    4
}

impl CryptoConfig {
    fn validate(&self) -> Result<()> {
        if self.socket_path.as_os_str().is_empty() {
            return Err(RelayError::config_invalid(
                "crypto.socket_path",
                "cannot be empty",
            ));
        }

        if self.service_path.as_os_str().is_empty() {
            return Err(RelayError::config_invalid(
                "crypto.service_path",
                "cannot be empty",
            ));
        }

        if self.socket_path == self.service_path {
            return Err(RelayError::config_invalid(
                "crypto.service_path",
                "must differ from crypto.socket_path",
            ));
        }

        if self.callback.is_empty() {
            return Err(RelayError::config_invalid(
                "crypto.callback",
                "cannot be empty",
            ));
        }

        if self.callback.len() > MAX_LABEL_LEN {
            return Err(RelayError::config_invalid(
                "crypto.callback",
                format!("cannot exceed {MAX_LABEL_LEN} bytes"),
            ));
        }

        if !(1..=MAX_BUFFER_PACKETS).contains(&self.buffer_packets) {
            return Err(RelayError::config_invalid(
                "crypto.buffer_packets",
                format!("must be between 1 and {MAX_BUFFER_PACKETS}"),
            ));
        }

        Ok(())
    }

    /// Kernel buffer size in bytes.
    #[must_use]
    pub const fn buffer_size(&self) -> usize {
        self.buffer_packets * MAX_PACKET_SIZE
    }
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            socket_path: default_socket_path(),
            service_path: default_service_path(),
            callback: default_callback(),
            buffer_packets: default_buffer_packets(),
        }
    }
}

// ============================================
// LoggingConfig
// ============================================

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl LoggingConfig {
    fn validate(&self) -> Result<()> {
        if self.level.trim().is_empty() {
            return Err(RelayError::config_invalid("logging.level", "cannot be empty"));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RelayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.crypto.callback, "ccnl_mgmt_crypto");
        assert_eq!(config.crypto.buffer_size(), 4 * 8096);
    }

    #[test]
    fn test_full_config_format() {
        let toml = r#"
            [crypto]
            enabled = true
            socket_path = "/var/run/ccnl/relay.sock"
            service_path = "/var/run/ccnl/crypto.sock"
            callback = "ccnl_mgmt_crypto"
            buffer_packets = 8

            [logging]
            level = "debug"
        "#;

        let config = RelayConfig::from_str(toml).unwrap();
        assert_eq!(config.crypto.socket_path, PathBuf::from("/var/run/ccnl/relay.sock"));
        assert_eq!(config.crypto.buffer_packets, 8);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = RelayConfig::from_str("").unwrap();
        assert!(config.crypto.enabled);
        assert_eq!(config.logging.level, "info");

        let config = RelayConfig::from_str("[crypto]\nenabled = false\n").unwrap();
        assert!(!config.crypto.enabled);
        assert_eq!(config.crypto.buffer_packets, 4);
    }

    #[test]
    fn test_validation_failures() {
        let cases = [
            "[crypto]\nbuffer_packets = 0\n",
            "[crypto]\nbuffer_packets = 65\n",
            "[crypto]\ncallback = \"\"\n",
            "[crypto]\nsocket_path = \"\"\n",
            "[crypto]\nsocket_path = \"/tmp/a\"\nservice_path = \"/tmp/a\"\n",
            "[logging]\nlevel = \" \"\n",
        ];
        for toml in cases {
            let err = RelayConfig::from_str(toml).unwrap_err();
            assert!(err.is_config_error(), "{toml:?} accepted");
        }

        let long = format!("[crypto]\ncallback = \"{}\"\n", "c".repeat(MAX_LABEL_LEN + 1));
        assert!(RelayConfig::from_str(&long).is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = RelayConfig::default();
        config.crypto.buffer_packets = 16;
        let text = config.to_toml();
        let parsed = RelayConfig::from_str(&text).unwrap();
        assert_eq!(parsed.crypto.buffer_packets, 16);
        assert_eq!(parsed.crypto.service_path, config.crypto.service_path);
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relay.toml");
        tokio::fs::write(&path, "[crypto]\nbuffer_packets = 2\n")
            .await
            .unwrap();

        let config = RelayConfig::load(&path).await.unwrap();
        assert_eq!(config.crypto.buffer_packets, 2);

        let err = RelayConfig::load(dir.path().join("missing.toml")).await.unwrap_err();
        assert!(matches!(err, RelayError::ConfigLoad { .. }));
    }
}
