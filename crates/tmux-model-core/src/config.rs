//! Configuration types for tmux-model.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{Error, Result};

/// Separator placed between fields of a list record.
pub const DEFAULT_FIELD_SEPARATOR: &str = "::tmux-model::";

/// Client configuration loaded from YAML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// How to reach the tmux server
    pub tmux: TmuxSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

impl ClientConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ClientConfig =
            serde_yaml::from_str(yaml).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.tmux.binary.trim().is_empty() {
            return Err(Error::Config("tmux.binary must not be empty".to_string()));
        }

        if self.tmux.socket_name.is_some() && self.tmux.socket_path.is_some() {
            return Err(Error::Config(
                "tmux.socket_name and tmux.socket_path are mutually exclusive".to_string(),
            ));
        }

        let separator = &self.tmux.field_separator;
        if separator.is_empty() || separator.contains('\n') {
            return Err(Error::Config(
                "tmux.field_separator must be non-empty and single-line".to_string(),
            ));
        }

        Ok(())
    }
}

/// Settings for the tmux binary and server socket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TmuxSettings {
    /// Program to execute
    pub binary: String,
    /// Server socket name (`-L`)
    pub socket_name: Option<String>,
    /// Server socket path (`-S`)
    pub socket_path: Option<String>,
    /// Configuration file handed to the server (`-f`)
    pub config_file: Option<String>,
    /// Separator between fields of list output
    pub field_separator: String,
}

impl Default for TmuxSettings {
    fn default() -> Self {
        Self {
            binary: "tmux".to_string(),
            socket_name: None,
            socket_path: None,
            config_file: None,
            field_separator: DEFAULT_FIELD_SEPARATOR.to_string(),
        }
    }
}

impl TmuxSettings {
    /// Global arguments placed before every tmux command.
    pub fn global_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(name) = &self.socket_name {
            args.push("-L".to_string());
            args.push(name.clone());
        }
        if let Some(path) = &self.socket_path {
            args.push("-S".to_string());
            args.push(path.clone());
        }
        if let Some(file) = &self.config_file {
            args.push("-f".to_string());
            args.push(file.clone());
        }
        args
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.tmux.binary, "tmux");
        assert_eq!(config.tmux.field_separator, DEFAULT_FIELD_SEPARATOR);
        assert_eq!(config.logging.level, "info");
        assert!(config.tmux.global_args().is_empty());
    }

    #[test]
    fn test_config_validation() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_binary() {
        let mut config = ClientConfig::default();
        config.tmux.binary = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_socket_name_and_path_exclusive() {
        let mut config = ClientConfig::default();
        config.tmux.socket_name = Some("work".to_string());
        config.tmux.socket_path = Some("/tmp/tmux-work".to_string());
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_bad_separator() {
        let mut config = ClientConfig::default();
        config.tmux.field_separator = String::new();
        assert!(config.validate().is_err());

        config.tmux.field_separator = "a\nb".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
tmux:
  binary: /usr/local/bin/tmux
  socket_name: tmux_model_test
  config_file: /dev/null

logging:
  level: debug
"#;

        let config = ClientConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.tmux.binary, "/usr/local/bin/tmux");
        assert_eq!(config.tmux.socket_name.as_deref(), Some("tmux_model_test"));
        assert_eq!(config.tmux.field_separator, DEFAULT_FIELD_SEPARATOR);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(
            config.tmux.global_args(),
            vec!["-L", "tmux_model_test", "-f", "/dev/null"]
        );
    }

    #[test]
    fn test_invalid_yaml() {
        let result = ClientConfig::from_yaml("tmux: [unclosed");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_yaml_validation_runs() {
        let yaml = r#"
tmux:
  socket_name: a
  socket_path: /tmp/b
"#;
        assert!(ClientConfig::from_yaml(yaml).is_err());
    }
}
