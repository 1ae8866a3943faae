//! MWC network definitions

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Network type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkType {
    /// Mainnet
    Mainnet,
    /// Floonet (public testnet)
    Floonet,
}

impl NetworkType {
    /// Canonical name, as stored in wallet snapshots
    pub const fn name(&self) -> &'static str {
        match self {
            NetworkType::Mainnet => "Mainnet",
            NetworkType::Floonet => "Floonet",
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NetworkType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(NetworkType::Mainnet),
            "floonet" => Ok(NetworkType::Floonet),
            _ => Err(Error::InvalidNetwork(s.to_string())),
        }
    }
}

/// Network configuration
#[derive(Debug, Clone)]
pub struct Network {
    /// Network type
    pub network_type: NetworkType,
    /// Default node endpoint
    pub default_node_url: &'static str,
    /// Default MWC MQS (relay box) domain
    pub default_mqs_domain: &'static str,
    /// Foreign API port
    pub foreign_api_port: u16,
    /// Owner API port
    pub owner_api_port: u16,
    /// Coinbase maturity (blocks)
    pub coinbase_maturity: u64,
}

impl Network {
    /// Get mainnet parameters
    pub const fn mainnet() -> Self {
        Self {
            network_type: NetworkType::Mainnet,
            default_node_url: "https://mwc713.mwc.mw:443",
            default_mqs_domain: "mqs.mwc.mw",
            foreign_api_port: 3415,
            owner_api_port: 3420,
            coinbase_maturity: 1440,
        }
    }

    /// Get floonet parameters
    pub const fn floonet() -> Self {
        Self {
            network_type: NetworkType::Floonet,
            default_node_url: "https://mwc713.floonet.mwc.mw:443",
            default_mqs_domain: "mqs.floonet.mwc.mw",
            foreign_api_port: 13415,
            owner_api_port: 13420,
            coinbase_maturity: 1440,
        }
    }

    /// Get network by type
    pub const fn from_type(network_type: NetworkType) -> Self {
        match network_type {
            NetworkType::Mainnet => Self::mainnet(),
            NetworkType::Floonet => Self::floonet(),
        }
    }

    /// Human-readable name
    pub const fn name(&self) -> &'static str {
        self.network_type.name()
    }
}
