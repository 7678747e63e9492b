//! Configuration for the phone-cluster server and agent
//!
//! Resolution order for every field: environment variable, then the TOML
//! config file, then the built-in default. Default config files are
//! written on first load so an operator has something to edit.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, Result};

const DEFAULT_SERVER_TOML: &str = "\
# Phone Cluster - Server Configuration

[server]
host = \"0.0.0.0\"
port = 8787
";

const DEFAULT_CLIENT_TOML: &str = "\
# Phone Cluster - Client Configuration

[client]
server_url = \"http://127.0.0.1:8787\"
client_name = \"example-client\"
";

/// Server (registry) configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8787,
        }
    }
}

/// Agent (client) configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the registry server
    pub server_url: String,

    /// Name this agent registers under
    pub client_name: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8787".to_string(),
            client_name: "example-client".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ServerConfigFile {
    #[serde(default)]
    server: ServerConfig,
}

#[derive(Debug, Default, Deserialize)]
struct ClientConfigFile {
    #[serde(default)]
    client: ClientConfig,
}

/// Return the config directory, creating it if needed
///
/// `~/.config/phone-cluster/` on Linux
#[must_use]
pub fn config_dir() -> PathBuf {
    let dir = directories::ProjectDirs::from("", "", "phone-cluster").map_or_else(
        || PathBuf::from(".config/phone-cluster"),
        |d| d.config_dir().to_path_buf(),
    );

    if let Err(e) = std::fs::create_dir_all(&dir) {
        tracing::warn!(path = %dir.display(), error = %e, "failed to create config directory");
    }

    dir
}

/// Return the data directory (database location), creating it if needed
///
/// `~/.local/share/phone-cluster/` on Linux
#[must_use]
pub fn data_dir() -> PathBuf {
    let dir = directories::ProjectDirs::from("", "", "phone-cluster").map_or_else(
        || PathBuf::from(".local/share/phone-cluster"),
        |d| d.data_dir().to_path_buf(),
    );

    if let Err(e) = std::fs::create_dir_all(&dir) {
        tracing::warn!(path = %dir.display(), error = %e, "failed to create data directory");
    }

    dir
}

impl ServerConfig {
    /// Load the server configuration from the default location
    ///
    /// # Errors
    ///
    /// Returns error if the config file cannot be read or parsed, or an
    /// environment override is malformed.
    pub fn load() -> Result<Self> {
        let config = Self::load_from(&config_dir().join("server.toml"))?;
        config.with_env(|key| std::env::var(key).ok())
    }

    /// Load the server configuration from an explicit path
    ///
    /// Writes the default config file if the path does not exist.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, written, or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = read_or_create(path, DEFAULT_SERVER_TOML)?;
        let file: ServerConfigFile = toml::from_str(&contents)?;
        Ok(file.server)
    }

    /// Apply environment overrides (`PHONE_CLUSTER_HOST`, `PHONE_CLUSTER_PORT`)
    ///
    /// # Errors
    ///
    /// Returns error if `PHONE_CLUSTER_PORT` is not a valid port number.
    pub fn with_env(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(host) = var("PHONE_CLUSTER_HOST") {
            self.host = host;
        }
        if let Some(port) = var("PHONE_CLUSTER_PORT") {
            self.port = port
                .parse()
                .map_err(|_| Error::Config(format!("invalid PHONE_CLUSTER_PORT: {port}")))?;
        }
        Ok(self)
    }
}

impl ClientConfig {
    /// Load the client configuration from the default location
    ///
    /// # Errors
    ///
    /// Returns error if the config file cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let config = Self::load_from(&config_dir().join("client.toml"))?;
        Ok(config.with_env(|key| std::env::var(key).ok()))
    }

    /// Load the client configuration from an explicit path
    ///
    /// Writes the default config file if the path does not exist.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, written, or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = read_or_create(path, DEFAULT_CLIENT_TOML)?;
        let file: ClientConfigFile = toml::from_str(&contents)?;
        Ok(file.client)
    }

    /// Apply environment overrides (`PHONE_CLUSTER_URL`, `PHONE_CLUSTER_CLIENT_NAME`)
    #[must_use]
    pub fn with_env(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = var("PHONE_CLUSTER_URL") {
            self.server_url = url;
        }
        if let Some(name) = var("PHONE_CLUSTER_CLIENT_NAME") {
            self.client_name = name;
        }
        self
    }
}

fn read_or_create(path: &Path, default: &str) -> Result<String> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "creating default config");
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, default)?;
    }

    Ok(std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8787);
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");

        let config = ServerConfig::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.port, 8787);
    }

    #[test]
    fn test_load_from_reads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        std::fs::write(&path, "[server]\nhost = \"127.0.0.1\"\nport = 9000\n").unwrap();

        let config = ServerConfig::load_from(&path).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_env_overrides_file_values() {
        let config = ServerConfig::default()
            .with_env(|key| match key {
                "PHONE_CLUSTER_HOST" => Some("10.0.0.1".to_string()),
                "PHONE_CLUSTER_PORT" => Some("9999".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.host, "10.0.0.1");
        assert_eq!(config.port, 9999);
    }

    #[test]
    fn test_invalid_port_env_is_an_error() {
        let err = ServerConfig::default()
            .with_env(|key| (key == "PHONE_CLUSTER_PORT").then(|| "not-a-port".to_string()))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_client_config_env_precedence() {
        let config = ClientConfig::default().with_env(|key| match key {
            "PHONE_CLUSTER_URL" => Some("http://10.0.0.1:8787".to_string()),
            _ => None,
        });

        assert_eq!(config.server_url, "http://10.0.0.1:8787");
        assert_eq!(config.client_name, "example-client");
    }

    #[test]
    fn test_client_config_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.toml");
        std::fs::write(&path, "[client]\nclient_name = \"pixel-7\"\n").unwrap();

        let config = ClientConfig::load_from(&path).unwrap();
        assert_eq!(config.client_name, "pixel-7");
        assert_eq!(config.server_url, "http://127.0.0.1:8787");
    }
}
