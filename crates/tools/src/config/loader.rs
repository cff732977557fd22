//! Turning raw input into a [`BuildConfiguration`].
//!
//! Validation stops at the first problem and reports the dotted path of the
//! offending field. Nothing is returned on failure, so a half-checked
//! configuration can never reach downstream tooling.

use indexmap::IndexMap;
use semver::Version;
use serde_json::Number;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use url::Url;

use super::model::{BuildConfiguration, NetworkEndpoint, Optimizer, DEFAULT_OPTIMIZER_RUNS};
use super::raw::{RawConfig, RawNetwork, RawOptimizer};
use crate::error::ConfigError;

/// File names searched by [`ConfigLoader::discover`], in priority order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["contract-tools.toml", "contract-tools.json"];

/// Validate raw input and build an immutable configuration.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - `compilerVersion` is missing or not `major.minor.patch`
/// - `optimizer.runs` is negative, fractional or too large
/// - a network has no usable http(s) `url` or a non-positive `chainId`
/// - two networks share a name (`DuplicateNetworkName`)
pub fn load(raw: RawConfig) -> Result<BuildConfiguration, ConfigError> {
    check_unique_network_names(&raw.networks.0)?;

    let compiler_version = parse_compiler_version(raw.compiler_version.as_deref())?;
    let optimizer = parse_optimizer(raw.optimizer.as_ref())?;
    let networks = parse_networks(raw.networks.0)?;
    let plugins = parse_plugins(raw.plugins.unwrap_or_default())?;

    if let Some(name) = &raw.default_network {
        if !networks.contains_key(name) {
            return Err(ConfigError::malformed(
                "defaultNetwork",
                format!("names undeclared network `{name}`"),
            ));
        }
    }

    warn_on_shared_chain_ids(&networks);

    debug!(
        compiler = %compiler_version,
        networks = networks.len(),
        "build configuration validated"
    );

    Ok(BuildConfiguration {
        compiler_version,
        optimizer,
        networks,
        plugins,
        default_network: raw.default_network,
    })
}

/// Look up a network by name.
pub fn resolve_network<'a>(
    config: &'a BuildConfiguration,
    name: &str,
) -> Result<&'a NetworkEndpoint, ConfigError> {
    config.network(name).ok_or_else(|| ConfigError::UnknownNetwork {
        name: name.to_string(),
        known: config.network_names(),
    })
}

fn parse_compiler_version(version: Option<&str>) -> Result<Version, ConfigError> {
    const FIELD: &str = "compilerVersion";

    let version = version.ok_or_else(|| ConfigError::malformed(FIELD, "missing required field"))?;
    if version.trim().is_empty() {
        return Err(ConfigError::malformed(FIELD, "must not be empty"));
    }

    let parsed = Version::parse(version).map_err(|e| {
        ConfigError::malformed(FIELD, format!("`{version}` is not major.minor.patch: {e}"))
    })?;
    if !parsed.pre.is_empty() || !parsed.build.is_empty() {
        return Err(ConfigError::malformed(
            FIELD,
            format!("`{version}` is not major.minor.patch"),
        ));
    }
    Ok(parsed)
}

fn parse_optimizer(raw: Option<&RawOptimizer>) -> Result<Optimizer, ConfigError> {
    let Some(raw) = raw else {
        return Ok(Optimizer::default());
    };

    let enabled = raw.enabled.unwrap_or(false);
    let runs = match &raw.runs {
        Some(runs) => parse_runs(runs)?,
        None => DEFAULT_OPTIMIZER_RUNS,
    };

    if !enabled && raw.runs.is_some() {
        debug!(runs, "optimizer disabled, configured runs are ignored");
    }

    Ok(Optimizer { enabled, runs })
}

fn parse_runs(runs: &Number) -> Result<u32, ConfigError> {
    const FIELD: &str = "optimizer.runs";

    let value = runs
        .as_u64()
        .ok_or_else(|| ConfigError::malformed(FIELD, format!("{runs} is not a non-negative integer")))?;
    u32::try_from(value)
        .map_err(|_| ConfigError::malformed(FIELD, format!("{value} exceeds {}", u32::MAX)))
}

/// Repeated names are reported before any entry is validated.
fn check_unique_network_names(entries: &[(String, RawNetwork)]) -> Result<(), ConfigError> {
    let mut seen = HashSet::with_capacity(entries.len());
    for (name, _) in entries {
        if !seen.insert(name.as_str()) {
            return Err(ConfigError::DuplicateNetworkName(name.clone()));
        }
    }
    Ok(())
}

fn parse_networks(
    entries: Vec<(String, RawNetwork)>,
) -> Result<IndexMap<String, NetworkEndpoint>, ConfigError> {
    let mut networks = IndexMap::with_capacity(entries.len());

    for (name, raw) in entries {
        if name.trim().is_empty() {
            return Err(ConfigError::malformed(
                "networks",
                "network names must not be empty",
            ));
        }
        let endpoint = parse_network(&name, raw)?;
        networks.insert(name, endpoint);
    }

    Ok(networks)
}

fn parse_network(name: &str, raw: RawNetwork) -> Result<NetworkEndpoint, ConfigError> {
    let field = |key: &str| format!("networks.{name}.{key}");

    let url = parse_url(raw.url.as_deref(), &field("url"))?;

    let chain_id = match &raw.chain_id {
        Some(id) => match id.as_u64() {
            Some(id) if id > 0 => Some(id),
            _ => {
                return Err(ConfigError::malformed(
                    field("chainId"),
                    format!("{id} is not a positive integer"),
                ))
            }
        },
        None => None,
    };

    if let Some(accounts) = &raw.accounts {
        if let Some(index) = accounts.iter().position(|a| a.trim().is_empty()) {
            return Err(ConfigError::malformed(
                format!("{}[{index}]", field("accounts")),
                "account reference must not be empty",
            ));
        }
    }

    Ok(NetworkEndpoint {
        name: name.to_string(),
        url,
        chain_id,
        accounts: raw.accounts,
    })
}

fn parse_url(url: Option<&str>, field: &str) -> Result<Url, ConfigError> {
    let url = url.ok_or_else(|| ConfigError::malformed(field, "missing required field"))?;
    if url.trim().is_empty() {
        return Err(ConfigError::malformed(field, "must not be empty"));
    }

    let parsed = Url::parse(url)
        .map_err(|e| ConfigError::malformed(field, format!("`{url}` is not a valid URL: {e}")))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::malformed(
            field,
            format!("URL must start with http:// or https://: {url}"),
        ));
    }
    if parsed.host_str().is_none() {
        return Err(ConfigError::malformed(field, format!("URL has no host: {url}")));
    }
    Ok(parsed)
}

fn parse_plugins(plugins: Vec<String>) -> Result<Vec<String>, ConfigError> {
    let mut seen = HashSet::with_capacity(plugins.len());
    for (index, plugin) in plugins.iter().enumerate() {
        let field = format!("plugins[{index}]");
        if plugin.trim().is_empty() {
            return Err(ConfigError::malformed(field, "plugin name must not be empty"));
        }
        if !seen.insert(plugin.as_str()) {
            return Err(ConfigError::malformed(
                field,
                format!("plugin `{plugin}` is listed twice"),
            ));
        }
    }
    Ok(plugins)
}

/// Pairs of networks declaring the same chain id, as `(chain_id, first, second)`.
fn shared_chain_ids(networks: &IndexMap<String, NetworkEndpoint>) -> Vec<(u64, &str, &str)> {
    let mut by_chain: HashMap<u64, &str> = HashMap::new();
    let mut shared = Vec::new();
    for endpoint in networks.values() {
        let Some(chain_id) = endpoint.chain_id else {
            continue;
        };
        if let Some(first) = by_chain.insert(chain_id, endpoint.name.as_str()) {
            shared.push((chain_id, first, endpoint.name.as_str()));
        }
    }
    shared
}

/// Aliasing a chain is allowed, but usually a copy-paste mistake.
fn warn_on_shared_chain_ids(networks: &IndexMap<String, NetworkEndpoint>) {
    for (chain_id, first, second) in shared_chain_ids(networks) {
        warn!(chain_id, first, second, "two networks share the same chain id");
    }
}

/// Reads configuration files from disk.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate a configuration file.
    ///
    /// The format follows the extension: `.toml` or `.json`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<BuildConfiguration, ConfigError> {
        let path = path.as_ref();
        let raw = Self::read_raw(path)?;
        let config = load(raw)?;
        info!(path = %path.display(), "loaded build configuration");
        Ok(config)
    }

    /// Parse a configuration file without validating it.
    pub fn read_raw(path: &Path) -> Result<RawConfig, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let parse: fn(&str) -> Result<RawConfig, ConfigError> = match extension.as_deref() {
            Some("toml") => RawConfig::from_toml_str,
            Some("json") => RawConfig::from_json_str,
            _ => {
                return Err(ConfigError::malformed_input(format!(
                    "unsupported configuration file `{}`: expected .toml or .json",
                    path.display()
                )))
            }
        };

        let content = std::fs::read_to_string(path)?;
        parse(&content)
    }

    /// Like [`ConfigLoader::discover`], but a missing file is an error.
    pub fn discover_required(dir: impl AsRef<Path>) -> Result<PathBuf, ConfigError> {
        let dir = dir.as_ref();
        Self::discover(dir).ok_or_else(|| ConfigError::ConfigNotFound {
            dir: dir.to_path_buf(),
            searched: CONFIG_FILE_NAMES.iter().map(|n| n.to_string()).collect(),
        })
    }

    /// Find the configuration file in `dir`.
    pub fn discover(dir: impl AsRef<Path>) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.as_ref().join(name))
            .find(|path| path.is_file())
    }
}
