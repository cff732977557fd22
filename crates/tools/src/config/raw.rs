//! Raw, loosely-typed configuration input.
//!
//! These types mirror the on-disk shape of a build configuration without
//! enforcing any of its rules. Numbers stay as [`serde_json::Number`] so a
//! negative or fractional `runs` reaches the validator intact, and the
//! network table keeps every entry in declaration order, duplicates
//! included.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Number;
use std::fmt;

use crate::error::ConfigError;

/// Field path used for errors that cannot be tied to a single key.
pub const INPUT_FIELD: &str = "<input>";

/// Unvalidated configuration record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimizer: Option<RawOptimizer>,
    #[serde(default)]
    pub networks: RawNetworks,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_network: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawOptimizer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runs: Option<Number>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawNetwork {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accounts: Option<Vec<String>>,
}

/// Network table in declaration order.
///
/// Unlike a map type this keeps repeated keys, so the loader can reject
/// them instead of letting the last entry win.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawNetworks(pub Vec<(String, RawNetwork)>);

impl RawConfig {
    /// Start a raw record with the given compiler version.
    pub fn new(compiler_version: impl Into<String>) -> Self {
        RawConfig {
            compiler_version: Some(compiler_version.into()),
            ..Default::default()
        }
    }

    pub fn with_optimizer(mut self, enabled: bool, runs: i64) -> Self {
        self.optimizer = Some(RawOptimizer {
            enabled: Some(enabled),
            runs: Some(Number::from(runs)),
        });
        self
    }

    pub fn with_network(mut self, name: impl Into<String>, network: RawNetwork) -> Self {
        self.networks.0.push((name.into(), network));
        self
    }

    pub fn with_plugin(mut self, plugin: impl Into<String>) -> Self {
        self.plugins.get_or_insert_with(Vec::new).push(plugin.into());
        self
    }

    pub fn with_default_network(mut self, name: impl Into<String>) -> Self {
        self.default_network = Some(name.into());
        self
    }

    /// Parse a JSON document.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(input).map_err(|e| ConfigError::malformed_input(e.to_string()))
    }

    /// Parse a TOML document.
    ///
    /// The TOML parser refuses repeated keys itself; when the repeated key
    /// is a network name the error is reported as a duplicate network.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        toml::from_str(input).map_err(|e| {
            let message = e.message().to_string();
            match duplicate_network_key(&message) {
                Some(name) => ConfigError::DuplicateNetworkName(name),
                None => ConfigError::malformed_input(message.trim_end()),
            }
        })
    }

    /// Serialize back to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl RawNetwork {
    pub fn new(url: impl Into<String>, chain_id: u64) -> Self {
        RawNetwork {
            url: Some(url.into()),
            chain_id: Some(Number::from(chain_id)),
            accounts: None,
        }
    }

    pub fn with_accounts<I, S>(mut self, accounts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accounts = Some(accounts.into_iter().map(Into::into).collect());
        self
    }
}

/// Extract the key from a `duplicate key `x` in table `networks`` message.
fn duplicate_network_key(message: &str) -> Option<String> {
    const MARKER: &str = "duplicate key `";
    let start = message.find(MARKER)? + MARKER.len();
    let rest = &message[start..];
    let end = rest.find('`')?;
    let (key, tail) = rest.split_at(end);
    if tail[1..].starts_with(" in table `networks`") {
        Some(key.trim_matches('"').to_string())
    } else {
        None
    }
}

impl Serialize for RawNetworks {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, network) in &self.0 {
            map.serialize_entry(name, network)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RawNetworks {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NetworksVisitor;

        impl<'de> Visitor<'de> for NetworksVisitor {
            type Value = RawNetworks;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of network name to endpoint")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, network)) = access.next_entry::<String, RawNetwork>()? {
                    entries.push((name, network));
                }
                Ok(RawNetworks(entries))
            }
        }

        deserializer.deserialize_map(NetworksVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_keeps_duplicate_networks_in_order() {
        let raw = RawConfig::from_json_str(
            r#"{
                "compilerVersion": "0.8.22",
                "networks": {
                    "bsc": { "url": "https://a.example.org", "chainId": 56 },
                    "bscTestnet": { "url": "https://b.example.org", "chainId": 97 },
                    "bsc": { "url": "https://c.example.org", "chainId": 56 }
                }
            }"#,
        )
        .unwrap();

        let names: Vec<&str> = raw.networks.0.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["bsc", "bscTestnet", "bsc"]);
    }

    #[test]
    fn test_negative_runs_survive_parsing() {
        let raw = RawConfig::from_json_str(
            r#"{ "compilerVersion": "0.8.22", "optimizer": { "enabled": true, "runs": -1 } }"#,
        )
        .unwrap();
        let runs = raw.optimizer.unwrap().runs.unwrap();
        assert_eq!(runs.as_i64(), Some(-1));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = RawConfig::from_json_str(r#"{ "compilerVersion": "0.8.22", "solc": "x" }"#)
            .unwrap_err();
        match err {
            ConfigError::MalformedConfiguration { field, reason } => {
                assert_eq!(field, INPUT_FIELD);
                assert!(reason.contains("solc"), "{reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_toml_parses_networks() {
        let raw = RawConfig::from_toml_str(
            r#"
compilerVersion = "0.8.22"

[optimizer]
enabled = true
runs = 200

[networks.bscTestnet]
url = "https://data-seed-prebsc-1-s1.binance.org:8545"
chainId = 97
"#,
        )
        .unwrap();

        assert_eq!(raw.compiler_version.as_deref(), Some("0.8.22"));
        assert_eq!(raw.networks.0.len(), 1);
        assert_eq!(raw.networks.0[0].0, "bscTestnet");
        assert_eq!(
            raw.networks.0[0].1.chain_id.as_ref().and_then(Number::as_u64),
            Some(97)
        );
    }

    #[test]
    fn test_toml_duplicate_network_table() {
        let err = RawConfig::from_toml_str(
            r#"
compilerVersion = "0.8.22"

[networks.bsc]
url = "https://bsc-dataseed.binance.org/"
chainId = 56

[networks.bsc]
url = "https://bsc-dataseed.binance.org/"
chainId = 56
"#,
        )
        .unwrap_err();

        assert!(
            matches!(err, ConfigError::DuplicateNetworkName(ref name) if name == "bsc"),
            "{err:?}"
        );
    }

    #[test]
    fn test_duplicate_key_outside_networks_is_malformed() {
        assert_eq!(
            duplicate_network_key("duplicate key `enabled` in table `optimizer`"),
            None
        );
        assert_eq!(
            duplicate_network_key("duplicate key `bsc` in table `networks`"),
            Some("bsc".to_string())
        );
    }

    #[test]
    fn test_builder_serializes_to_json_shape() {
        let raw = RawConfig::new("0.8.22")
            .with_optimizer(true, 200)
            .with_network("bsc", RawNetwork::new("https://bsc-dataseed.binance.org/", 56));
        let json: serde_json::Value = serde_json::from_str(&raw.to_json().unwrap()).unwrap();

        assert_eq!(json["compilerVersion"], "0.8.22");
        assert_eq!(json["optimizer"]["runs"], 200);
        assert_eq!(json["networks"]["bsc"]["chainId"], 56);
        assert!(json.get("plugins").is_none());
    }
}
