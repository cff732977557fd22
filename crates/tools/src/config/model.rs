//! Validated build configuration.
//!
//! Values in this module are only produced by [`crate::config::load`], so
//! holding one means every field already passed validation. They are never
//! mutated afterwards and can be shared freely between readers.

use indexmap::IndexMap;
use semver::Version;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt::Write as _;
use url::Url;

/// Optimizer runs used when the input leaves `runs` out.
pub const DEFAULT_OPTIMIZER_RUNS: u32 = 200;

/// Compiler optimizer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Optimizer {
    pub(crate) enabled: bool,
    pub(crate) runs: u32,
}

impl Optimizer {
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Configured runs, whether or not the optimizer is enabled.
    pub fn runs(&self) -> u32 {
        self.runs
    }

    /// Runs that actually reach the compiler: `None` while disabled.
    pub fn effective_runs(&self) -> Option<u32> {
        self.enabled.then_some(self.runs)
    }
}

impl Default for Optimizer {
    fn default() -> Self {
        Optimizer {
            enabled: false,
            runs: DEFAULT_OPTIMIZER_RUNS,
        }
    }
}

/// A named deployment target: RPC endpoint plus chain identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkEndpoint {
    pub(crate) name: String,
    pub(crate) url: Url,
    pub(crate) chain_id: Option<u64>,
    pub(crate) accounts: Option<Vec<String>>,
}

impl NetworkEndpoint {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    /// Credential references configured in the record, if any.
    pub fn accounts(&self) -> Option<&[String]> {
        self.accounts.as_deref()
    }

    pub fn has_credentials(&self) -> bool {
        self.accounts.as_ref().is_some_and(|a| !a.is_empty())
    }
}

/// Complete, validated build configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfiguration {
    pub(crate) compiler_version: Version,
    pub(crate) optimizer: Optimizer,
    pub(crate) networks: IndexMap<String, NetworkEndpoint>,
    pub(crate) plugins: Vec<String>,
    pub(crate) default_network: Option<String>,
}

impl BuildConfiguration {
    pub fn compiler_version(&self) -> &Version {
        &self.compiler_version
    }

    pub fn optimizer(&self) -> &Optimizer {
        &self.optimizer
    }

    /// Endpoints in declaration order.
    pub fn networks(&self) -> impl Iterator<Item = &NetworkEndpoint> {
        self.networks.values()
    }

    pub fn network_names(&self) -> Vec<String> {
        self.networks.keys().cloned().collect()
    }

    pub(crate) fn network(&self, name: &str) -> Option<&NetworkEndpoint> {
        self.networks.get(name)
    }

    /// Toolchain plugins, in the order they were declared.
    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    /// Endpoint named by `defaultNetwork`, if one was declared.
    pub fn default_network(&self) -> Option<&NetworkEndpoint> {
        self.default_network
            .as_deref()
            .and_then(|name| self.networks.get(name))
    }

    /// Human-readable multi-line summary of the resolved configuration.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "  Compiler:            {}", self.compiler_version);
        match self.optimizer.effective_runs() {
            Some(runs) => {
                let _ = writeln!(out, "  Optimizer:           enabled ({runs} runs)");
            }
            None => {
                let _ = writeln!(out, "  Optimizer:           disabled");
            }
        }

        if self.plugins.is_empty() {
            let _ = writeln!(out, "  Plugins:             (none)");
        } else {
            let _ = writeln!(out, "  Plugins:             {}", self.plugins.join(", "));
        }

        if self.networks.is_empty() {
            let _ = writeln!(out, "  Networks:            (none)");
        }
        for network in self.networks.values() {
            let _ = writeln!(out, "{}", endpoint_line(network, self.is_default(network)));
        }
        out
    }

    /// Get configuration as JSON, with account references redacted.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn is_default(&self, network: &NetworkEndpoint) -> bool {
        self.default_network.as_deref() == Some(network.name.as_str())
    }
}

/// One summary line for a network endpoint.
pub fn endpoint_line(network: &NetworkEndpoint, is_default: bool) -> String {
    let chain = network
        .chain_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "?".to_string());
    let accounts = match network.accounts.as_ref().map(Vec::len) {
        Some(n) if n > 0 => format!("{n} account(s)"),
        _ => "no accounts".to_string(),
    };
    format!(
        "  Network {}{}: {} (chain {}, {})",
        network.name,
        if is_default { " [default]" } else { "" },
        network.url,
        chain,
        accounts
    )
}

impl Serialize for Optimizer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("enabled", &self.enabled)?;
        map.serialize_entry("runs", &self.runs)?;
        map.end()
    }
}

impl Serialize for NetworkEndpoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("url", self.url.as_str())?;
        if let Some(chain_id) = self.chain_id {
            map.serialize_entry("chainId", &chain_id)?;
        }
        if let Some(accounts) = &self.accounts {
            let redacted = vec!["<redacted>"; accounts.len()];
            map.serialize_entry("accounts", &redacted)?;
        }
        map.end()
    }
}

impl Serialize for BuildConfiguration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("compilerVersion", &self.compiler_version.to_string())?;
        map.serialize_entry("optimizer", &self.optimizer)?;
        map.serialize_entry("networks", &self.networks)?;
        if !self.plugins.is_empty() {
            map.serialize_entry("plugins", &self.plugins)?;
        }
        if let Some(default_network) = &self.default_network {
            map.serialize_entry("defaultNetwork", default_network)?;
        }
        map.end()
    }
}
