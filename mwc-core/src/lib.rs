//! MWC wallet core
//!
//! Data model, error taxonomy, in-memory wallet state and the [`Wallet`]
//! interface shared by every wallet backend.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod amount;
pub mod config;
pub mod error;
pub mod listen;
pub mod models;
pub mod state;
pub mod wallet;

pub use amount::{format_amount, parse_amount};
pub use config::{WalletConfig, CHANGE_OUTPUTS_RANGE, INPUT_CONFIRMATIONS_RANGE};
pub use error::{Error, ErrorCategory, Result};
pub use listen::{ListenChannel, ListenState};
pub use models::*;
pub use state::{WalletState, DEFAULT_ACCOUNT};
pub use wallet::Wallet;
