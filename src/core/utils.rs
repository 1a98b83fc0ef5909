/// Utility Functions for Configuration and Environment Management
///
/// Configuration comes from an optional YAML file (`kmcp.yaml` in the working
/// directory, or the path in `MCP_CONFIG`) with environment variables taking
/// precedence over file values.
///
/// ```yaml
/// server:
///   name: business-assistant
///   transport: stdio
///   port: 3000
/// history_limit: 50
/// max_sessions: 256
/// data_file: mock-data.yaml
/// ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::core::error::{AssistantError, Result};

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "kmcp.yaml";

/// Transport the server listens on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Stdio,
    Http,
    Both,
}

impl FromStr for TransportMode {
    type Err = AssistantError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "stdio" => Ok(TransportMode::Stdio),
            "http" => Ok(TransportMode::Http),
            "both" => Ok(TransportMode::Both),
            other => Err(AssistantError::Config(format!(
                "Invalid transport mode '{}'. Must be 'stdio', 'http', or 'both'",
                other
            ))),
        }
    }
}

/// Server metadata and transport settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Name reported in MCP initialize responses
    pub name: String,
    /// Version reported in MCP initialize responses
    pub version: String,
    pub transport: TransportMode,
    /// Bind address for HTTP mode
    pub host: String,
    pub port: u16,
    /// HTTP worker threads; CPU count capped at 16 when unset
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "mcp-business-assistant".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            transport: TransportMode::Both,
            host: "0.0.0.0".to_string(),
            port: 3000,
            workers: None,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn worker_count(&self) -> usize {
        self.workers
            .unwrap_or_else(|| num_cpus::get().min(16))
            .max(1)
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    /// Maximum query log entries kept per session; unbounded when unset
    pub history_limit: Option<usize>,
    /// Maximum sessions held at once; the store default applies when unset
    pub max_sessions: Option<usize>,
    /// YAML file with mock record overrides
    pub data_file: Option<PathBuf>,
}

impl Config {
    /// Parse a YAML configuration document
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AssistantError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let mut config = Self::from_yaml(&content)?;
        // data_file is relative to the config file
        if let (Some(data), Some(dir)) = (config.data_file.as_ref(), path.parent()) {
            if data.is_relative() {
                config.data_file = Some(dir.join(data));
            }
        }
        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables.
    ///
    /// Recognized: SERVER_NAME, SERVER_VERSION, MCP_TRANSPORT_MODE, HOST,
    /// PORT, WORKER_THREADS, MCP_HISTORY_LIMIT, MCP_MAX_SESSIONS,
    /// MCP_DATA_FILE.
    ///
    /// # Arguments
    /// * `lookup` - Reads one variable; `std::env::var(key).ok()` in production
    ///
    /// # Returns
    /// A `Config` error for an invalid transport mode or numeric limit. An
    /// invalid PORT or WORKER_THREADS is logged and ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("SERVER_NAME") {
            self.server.name = name;
        }
        if let Some(version) = lookup("SERVER_VERSION") {
            self.server.version = version;
        }
        if let Some(transport) = lookup("MCP_TRANSPORT_MODE") {
            self.server.transport = transport.parse()?;
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            match port.parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(port = %port, "Ignoring invalid PORT"),
            }
        }
        if let Some(workers) = lookup("WORKER_THREADS") {
            match workers.parse::<usize>() {
                Ok(workers) => self.server.workers = Some(workers),
                Err(_) => tracing::warn!(workers = %workers, "Ignoring invalid WORKER_THREADS"),
            }
        }
        if let Some(limit) = lookup("MCP_HISTORY_LIMIT") {
            let limit = limit.parse::<usize>().map_err(|_| {
                AssistantError::Config(format!("Invalid MCP_HISTORY_LIMIT: {}", limit))
            })?;
            self.history_limit = Some(limit);
        }
        if let Some(max) = lookup("MCP_MAX_SESSIONS") {
            let max = max
                .parse::<usize>()
                .ok()
                .filter(|max| *max > 0)
                .ok_or_else(|| AssistantError::Config(format!("Invalid MCP_MAX_SESSIONS: {}", max)))?;
            self.max_sessions = Some(max);
        }
        if let Some(path) = lookup("MCP_DATA_FILE") {
            self.data_file = Some(PathBuf::from(path));
        }
        Ok(())
    }
}

/// Load configuration from the YAML file (if any) and the process environment.
///
/// `MCP_CONFIG` names the file explicitly and must exist; otherwise
/// `kmcp.yaml` is used when present and defaults apply when it is not.
pub fn load_config() -> Result<Config> {
    let mut config = match std::env::var("MCP_CONFIG") {
        Ok(path) => Config::from_file(path)?,
        Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => Config::from_file(DEFAULT_CONFIG_FILE)?,
        Err(_) => Config::default(),
    };
    config.apply_env(|key| std::env::var(key).ok())?;
    Ok(config)
}

/// Get environment variable value with a default fallback.
pub fn get_env_var(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.transport, TransportMode::Both);
        assert_eq!(config.server.bind_addr(), "0.0.0.0:3000");
        assert!(config.history_limit.is_none());
        assert!(config.server.worker_count() >= 1);
        assert!(config.server.worker_count() <= 16);
    }

    #[test]
    fn test_yaml_partial_document() {
        let config = Config::from_yaml("server:\n  transport: stdio\nhistory_limit: 5\n").unwrap();
        assert_eq!(config.server.transport, TransportMode::Stdio);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.history_limit, Some(5));
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
    }

    #[test]
    fn test_yaml_rejects_bad_transport() {
        assert!(Config::from_yaml("server:\n  transport: carrier-pigeon\n").is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = Config::from_yaml("server:\n  port: 4000\n  name: file\n").unwrap();
        config
            .apply_env(env(&[("PORT", "5000"), ("MCP_TRANSPORT_MODE", "http"), ("WORKER_THREADS", "2")]))
            .unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.name, "file");
        assert_eq!(config.server.transport, TransportMode::Http);
        assert_eq!(config.server.worker_count(), 2);
    }

    #[test]
    fn test_invalid_port_keeps_previous() {
        let mut config = Config::default();
        config.apply_env(env(&[("PORT", "not-a-port")])).unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_invalid_transport_env_is_error() {
        let mut config = Config::default();
        let err = config.apply_env(env(&[("MCP_TRANSPORT_MODE", "smoke")])).unwrap_err();
        assert!(err.to_string().contains("Invalid transport mode 'smoke'"));
    }

    #[test]
    fn test_max_sessions_from_file_and_env() {
        let mut config = Config::from_yaml("max_sessions: 8\n").unwrap();
        assert_eq!(config.max_sessions, Some(8));
        config.apply_env(env(&[("MCP_MAX_SESSIONS", "64")])).unwrap();
        assert_eq!(config.max_sessions, Some(64));
        assert!(config.apply_env(env(&[("MCP_MAX_SESSIONS", "0")])).is_err());
        assert!(config.apply_env(env(&[("MCP_MAX_SESSIONS", "many")])).is_err());
        assert!(Config::default().max_sessions.is_none());
    }

    #[test]
    fn test_data_file_relative_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kmcp.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "data_file: data.yaml").unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.data_file, Some(dir.path().join("data.yaml")));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = Config::from_file("/nonexistent/kmcp.yaml").unwrap_err();
        assert!(matches!(err, AssistantError::Config(_)));
    }
}
