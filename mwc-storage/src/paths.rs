//! Wallet data directory resolution

use directories::ProjectDirs;
use std::path::PathBuf;

/// Environment variable overriding the base data directory
pub const DATA_DIR_ENV: &str = "MWC_WALLET_DATA_DIR";

/// Base directory holding every wallet instance
pub fn wallet_base_dir() -> PathBuf {
    if let Ok(path) = std::env::var(DATA_DIR_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    ProjectDirs::from("mw", "MWC", "MwcWallet")
        .map(|dirs| dirs.data_local_dir().join("wallets"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Data directory of a named wallet instance
pub fn wallet_data_dir(instance: &str) -> PathBuf {
    wallet_base_dir().join(instance)
}
