//! Contract Tools Library
//!
//! Provides build configuration loading, network resolution and deployment
//! preflight checks for smart contract tooling.

pub mod config;
pub mod credentials;
pub mod deploy;
pub mod error;
pub mod logging;

pub use config::{load, resolve_network, BuildConfiguration, NetworkEndpoint, RawConfig};
pub use credentials::{ConfiguredAccounts, CredentialSource, EnvAccounts};
pub use deploy::DeploymentTarget;
pub use error::ConfigError;
