//! Error types for configuration loading and network resolution.

use thiserror::Error;

/// Exit codes used by the `contract-tools` binary.
pub struct ExitCode;

impl ExitCode {
    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration could not be loaded or failed validation
    pub const CONFIG_ERROR: i32 = 2;

    /// Configuration file could not be read
    pub const IO_ERROR: i32 = 3;
}

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("malformed configuration at `{field}`: {reason}")]
    MalformedConfiguration { field: String, reason: String },

    #[error("duplicate network name: {0}")]
    DuplicateNetworkName(String),

    #[error("unknown network `{name}` (configured: {})", display_known(.known))]
    UnknownNetwork { name: String, known: Vec<String> },

    #[error("missing credentials for network `{0}`: no deployment accounts configured")]
    MissingCredentials(String),

    #[error("no configuration file found in {} (looked for {})", .dir.display(), .searched.join(", "))]
    ConfigNotFound {
        dir: std::path::PathBuf,
        searched: Vec<String>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::MalformedConfiguration {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Malformed input that cannot be tied to a single field.
    pub fn malformed_input(reason: impl Into<String>) -> Self {
        Self::malformed(crate::config::raw::INPUT_FIELD, reason)
    }

    /// Exit code the CLI reports for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConfigError::Io(_) => ExitCode::IO_ERROR,
            ConfigError::MissingCredentials(_) => ExitCode::ERROR,
            _ => ExitCode::CONFIG_ERROR,
        }
    }
}

fn display_known(known: &[String]) -> String {
    if known.is_empty() {
        "none".to_string()
    } else {
        known.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message_names_field() {
        let err = ConfigError::malformed("optimizer.runs", "must be a non-negative integer");
        assert_eq!(
            err.to_string(),
            "malformed configuration at `optimizer.runs`: must be a non-negative integer"
        );
    }

    #[test]
    fn test_unknown_network_lists_known_names() {
        let err = ConfigError::UnknownNetwork {
            name: "goerli".to_string(),
            known: vec!["bscTestnet".to_string(), "bsc".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "unknown network `goerli` (configured: bscTestnet, bsc)"
        );

        let err = ConfigError::UnknownNetwork {
            name: "bsc".to_string(),
            known: vec![],
        };
        assert!(err.to_string().ends_with("(configured: none)"));
    }

    #[test]
    fn test_config_not_found_message() {
        let err = ConfigError::ConfigNotFound {
            dir: std::path::PathBuf::from("/work/project"),
            searched: vec!["contract-tools.toml".into(), "contract-tools.json".into()],
        };
        assert_eq!(
            err.to_string(),
            "no configuration file found in /work/project \
             (looked for contract-tools.toml, contract-tools.json)"
        );
        assert_eq!(err.exit_code(), ExitCode::CONFIG_ERROR);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            ConfigError::DuplicateNetworkName("bsc".into()).exit_code(),
            ExitCode::CONFIG_ERROR
        );
        assert_eq!(
            ConfigError::MissingCredentials("bsc".into()).exit_code(),
            ExitCode::ERROR
        );
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(ConfigError::from(io).exit_code(), ExitCode::IO_ERROR);
    }
}
