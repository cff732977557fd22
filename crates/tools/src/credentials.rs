//! Deployment account sources.
//!
//! Account references are never required by the configuration itself. A
//! [`CredentialSource`] supplies them at deployment time; callers pick the
//! source, and the loader never reads the environment on its own.

use tracing::debug;

use crate::config::NetworkEndpoint;

/// Default prefix for [`EnvAccounts`].
pub const DEFAULT_ENV_PREFIX: &str = "CONTRACT_TOOLS";

/// Supplies the accounts used to deploy against a network.
pub trait CredentialSource {
    /// Accounts for `network`, or `None` when the source has none.
    fn accounts(&self, network: &NetworkEndpoint) -> Option<Vec<String>>;
}

/// Uses only the `accounts` recorded in the configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfiguredAccounts;

impl CredentialSource for ConfiguredAccounts {
    fn accounts(&self, network: &NetworkEndpoint) -> Option<Vec<String>> {
        network
            .accounts()
            .filter(|accounts| !accounts.is_empty())
            .map(<[String]>::to_vec)
    }
}

/// Reads `<PREFIX>_<NETWORK>_ACCOUNTS` (comma separated), falling back to
/// the accounts recorded in the configuration.
///
/// `bscTestnet` maps to `CONTRACT_TOOLS_BSC_TESTNET_ACCOUNTS` with the
/// default prefix.
#[derive(Debug, Clone)]
pub struct EnvAccounts {
    prefix: String,
}

impl EnvAccounts {
    pub fn new(prefix: impl Into<String>) -> Self {
        EnvAccounts {
            prefix: prefix.into(),
        }
    }

    /// Environment variable consulted for `network`.
    pub fn var_name(&self, network: &str) -> String {
        format!("{}_{}_ACCOUNTS", self.prefix, env_segment(network))
    }
}

impl Default for EnvAccounts {
    fn default() -> Self {
        EnvAccounts::new(DEFAULT_ENV_PREFIX)
    }
}

impl CredentialSource for EnvAccounts {
    fn accounts(&self, network: &NetworkEndpoint) -> Option<Vec<String>> {
        let var = self.var_name(network.name());
        let from_env = std::env::var(&var).ok().map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|account| !account.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        });

        match from_env {
            Some(accounts) if !accounts.is_empty() => {
                debug!(network = network.name(), var = %var, "using accounts from environment");
                Some(accounts)
            }
            _ => ConfiguredAccounts.accounts(network),
        }
    }
}

/// `bscTestnet` -> `BSC_TESTNET`, `arbitrum-one` -> `ARBITRUM_ONE`.
fn env_segment(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if c.is_ascii_uppercase() && prev_lower {
                out.push('_');
            }
            out.push(c.to_ascii_uppercase());
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        } else {
            out.push('_');
            prev_lower = false;
        }
    }
    out
}
