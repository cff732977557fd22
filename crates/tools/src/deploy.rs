//! Deployment preflight.
//!
//! Gathers everything a deployment against one network needs and refuses to
//! go further when no accounts are available. Signing, broadcasting and any
//! RPC traffic belong to the external toolchain.

use semver::Version;
use tracing::info;
use url::Url;

use crate::config::{resolve_network, BuildConfiguration, Optimizer};
use crate::credentials::CredentialSource;
use crate::error::ConfigError;

/// A network that is ready to be handed to the deployment toolchain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentTarget {
    pub network: String,
    pub url: Url,
    pub chain_id: Option<u64>,
    pub accounts: Vec<String>,
    pub compiler_version: Version,
    pub optimizer: Optimizer,
}

impl DeploymentTarget {
    /// Resolve `network` and obtain its deployment accounts.
    ///
    /// # Errors
    ///
    /// - `UnknownNetwork` if `network` is not configured
    /// - `MissingCredentials` if `credentials` yields no accounts
    pub fn prepare(
        config: &BuildConfiguration,
        network: &str,
        credentials: &dyn CredentialSource,
    ) -> Result<Self, ConfigError> {
        let endpoint = resolve_network(config, network)?;

        let accounts = credentials
            .accounts(endpoint)
            .filter(|accounts| !accounts.is_empty())
            .ok_or_else(|| ConfigError::MissingCredentials(network.to_string()))?;

        info!(
            network,
            chain_id = ?endpoint.chain_id(),
            accounts = accounts.len(),
            "deployment target ready"
        );

        Ok(DeploymentTarget {
            network: endpoint.name().to_string(),
            url: endpoint.url().clone(),
            chain_id: endpoint.chain_id(),
            accounts,
            compiler_version: config.compiler_version().clone(),
            optimizer: *config.optimizer(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{load, NetworkEndpoint, RawConfig, RawNetwork};
    use crate::credentials::ConfiguredAccounts;

    struct FixedAccounts(Vec<String>);

    impl CredentialSource for FixedAccounts {
        fn accounts(&self, _network: &NetworkEndpoint) -> Option<Vec<String>> {
            Some(self.0.clone())
        }
    }

    fn config() -> BuildConfiguration {
        load(
            RawConfig::new("0.8.22")
                .with_optimizer(true, 200)
                .with_network(
                    "bscTestnet",
                    RawNetwork::new("https://data-seed-prebsc-1-s1.binance.org:8545", 97),
                )
                .with_network(
                    "bsc",
                    RawNetwork::new("https://bsc-dataseed.binance.org/", 56)
                        .with_accounts(["deployer"]),
                ),
        )
        .unwrap()
    }

    #[test]
    fn test_missing_credentials() {
        let err = DeploymentTarget::prepare(&config(), "bscTestnet", &ConfiguredAccounts)
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredentials(ref n) if n == "bscTestnet"));
    }

    #[test]
    fn test_empty_accounts_are_missing() {
        let err = DeploymentTarget::prepare(&config(), "bsc", &FixedAccounts(vec![])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredentials(_)));
    }

    #[test]
    fn test_unknown_network() {
        let err = DeploymentTarget::prepare(&config(), "ethereum", &ConfiguredAccounts)
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownNetwork { .. }));
    }

    #[test]
    fn test_prepare_carries_compiler_settings() {
        let target = DeploymentTarget::prepare(&config(), "bsc", &ConfiguredAccounts).unwrap();
        assert_eq!(target.network, "bsc");
        assert_eq!(target.chain_id, Some(56));
        assert_eq!(target.accounts, vec!["deployer".to_string()]);
        assert_eq!(target.compiler_version, Version::new(0, 8, 22));
        assert_eq!(target.optimizer.effective_runs(), Some(200));
    }

    #[test]
    fn test_source_supplies_accounts_for_bare_network() {
        let source = FixedAccounts(vec!["from-vault".to_string()]);
        let target = DeploymentTarget::prepare(&config(), "bscTestnet", &source).unwrap();
        assert_eq!(target.accounts, vec!["from-vault".to_string()]);
        assert_eq!(target.url.port(), Some(8545));
    }
}
