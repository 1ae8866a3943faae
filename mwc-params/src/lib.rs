//! MWC network parameters and constants
//!
//! This crate provides network definitions, default endpoints and the
//! denomination constants shared by the wallet crates.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod network;

pub use network::{Network, NetworkType};

/// Nano-MWC per MWC coin
pub const NANO_PER_MWC: u64 = 1_000_000_000;

/// Number of fractional digits in a decimal MWC amount
pub const MWC_DECIMALS: usize = 9;

/// Error types for parameter operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid network specified
    #[error("Invalid network: {0}")]
    InvalidNetwork(String),
}

/// Result type for parameter operations
pub type Result<T> = std::result::Result<T, Error>;
