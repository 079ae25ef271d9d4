//! Error types for txdesk-config

use std::path::PathBuf;
use thiserror::Error;

/// Why a configuration could not be produced
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ConfigError {
    /// Hint printed under the error at startup
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ConfigError::FileNotFound { .. } => {
                Some("Pass --config <path>, or run with --print-default-config to get a template.")
            }
            ConfigError::InvalidYaml(_) => Some("Compare against the output of --print-default-config."),
            ConfigError::IoError { .. } | ConfigError::InvalidValue { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_error_keeps_parser_message() {
        let source = serde_yaml::from_str::<serde_yaml::Value>("server: [").unwrap_err();
        let expected = source.to_string();
        let error = ConfigError::from(source);
        assert!(error.to_string().contains(&expected));
        assert!(error.hint().is_some());
    }

    #[test]
    fn test_io_error_keeps_source() {
        let error = ConfigError::IoError {
            path: PathBuf::from("/etc/txdesk.yaml"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(error.to_string(), "Failed to read /etc/txdesk.yaml: denied");
        let source = std::error::Error::source(&error).unwrap();
        assert_eq!(source.to_string(), "denied");
    }
}
