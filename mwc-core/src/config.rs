//! Wallet configuration value
//!
//! The configuration is replaced as a whole. A caller that wants to change
//! one setting clones the current value, edits the field and submits the
//! full value back.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Allowed range for the number of input confirmations
pub const INPUT_CONFIRMATIONS_RANGE: std::ops::RangeInclusive<u32> = 1..=10;

/// Allowed range for the number of change outputs
pub const CHANGE_OUTPUTS_RANGE: std::ops::RangeInclusive<u32> = 1..=99;

/// Default auto-logout timeout (20 minutes)
pub const DEFAULT_LOGOUT_TIMEOUT_SECS: u32 = 20 * 60;

/// Wallet configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Wallet data directory name
    pub data_path: String,
    /// MQS relay domain, empty for the network default
    pub mqs_domain: String,
    /// Node endpoint, empty for the network default
    pub node_url: String,
    /// Confirmations required before an input can be spent
    pub input_confirmations: u32,
    /// Number of change outputs created by a send
    pub change_outputs: u32,
    /// Wallet logs written to disk
    pub logs_enabled: bool,
    /// Start the MQS listener after login
    pub auto_start_mqs: bool,
    /// Start the Tor listener after login
    pub auto_start_tor: bool,
    /// Desktop notifications
    pub notifications_enabled: bool,
    /// UI scale factor
    pub gui_scale: f64,
    /// Lock outputs only once the slate is finalized
    pub lock_later: bool,
    /// Allow manual output locking
    pub output_locking_enabled: bool,
    /// Auto-logout timeout; `None` never logs out
    pub logout_timeout_secs: Option<u32>,
    /// Foreign API listen address
    pub foreign_api_address: String,
    /// Foreign API secret, empty for none
    pub foreign_api_secret: String,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            data_path: "mwc_wallet_data".to_string(),
            mqs_domain: String::new(),
            node_url: String::new(),
            input_confirmations: 10,
            change_outputs: 1,
            logs_enabled: true,
            auto_start_mqs: true,
            auto_start_tor: true,
            notifications_enabled: true,
            gui_scale: 1.0,
            lock_later: false,
            output_locking_enabled: false,
            logout_timeout_secs: Some(DEFAULT_LOGOUT_TIMEOUT_SECS),
            foreign_api_address: "127.0.0.1:3415".to_string(),
            foreign_api_secret: String::new(),
        }
    }
}

impl WalletConfig {
    /// Check every field against its allowed range
    pub fn validate(&self) -> Result<()> {
        if self.data_path.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "Please specify non empty wallet data path".to_string(),
            ));
        }
        if !INPUT_CONFIRMATIONS_RANGE.contains(&self.input_confirmations) {
            return Err(Error::InvalidConfig(format!(
                "Please input the number of confirmations in the range from {} to {}",
                INPUT_CONFIRMATIONS_RANGE.start(),
                INPUT_CONFIRMATIONS_RANGE.end()
            )));
        }
        if !CHANGE_OUTPUTS_RANGE.contains(&self.change_outputs) {
            return Err(Error::InvalidConfig(format!(
                "Please input the change output number in the range from {} to {}",
                CHANGE_OUTPUTS_RANGE.start(),
                CHANGE_OUTPUTS_RANGE.end()
            )));
        }
        if self.mqs_domain.chars().any(char::is_whitespace) || self.mqs_domain.contains("://") {
            return Err(Error::InvalidConfig(format!(
                "'{}' is not a valid MQS host name",
                self.mqs_domain
            )));
        }
        if !self.gui_scale.is_finite() || self.gui_scale <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "GUI scale {} is not supported",
                self.gui_scale
            )));
        }
        Ok(())
    }

    /// MQS domain in effect for a network
    pub fn effective_mqs_domain(&self, network: &mwc_params::Network) -> String {
        if self.mqs_domain.is_empty() {
            network.default_mqs_domain.to_string()
        } else {
            self.mqs_domain.clone()
        }
    }
}
