//! Build and network configuration for contract tooling
//!
//! This module turns a declarative configuration record (compiler version,
//! optimizer settings, named network endpoints) into a typed, validated
//! [`BuildConfiguration`]. Input is accepted as TOML or JSON:
//!
//! ```toml
//! compilerVersion = "0.8.22"
//!
//! [optimizer]
//! enabled = true
//! runs = 200
//!
//! [networks.bsc]
//! url = "https://bsc-dataseed.binance.org/"
//! chainId = 56
//! ```
//!
//! # Examples
//!
//! ```rust
//! use contract_tools::config::{load, resolve_network, RawConfig, RawNetwork};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let raw = RawConfig::new("0.8.22")
//!     .with_optimizer(true, 200)
//!     .with_network("bsc", RawNetwork::new("https://bsc-dataseed.binance.org/", 56));
//! let config = load(raw)?;
//! assert_eq!(resolve_network(&config, "bsc")?.chain_id(), Some(56));
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod model;
pub mod raw;

pub use loader::{load, resolve_network, ConfigLoader, CONFIG_FILE_NAMES};
pub use model::{BuildConfiguration, NetworkEndpoint, Optimizer, DEFAULT_OPTIMIZER_RUNS};
pub use raw::{RawConfig, RawNetwork, RawNetworks, RawOptimizer};
