//! Error types for MWC Core
//!
//! Every recoverable failure of a wallet operation is one of these variants.
//! Its `Display` text is the human-readable message handed back to the UI.

use std::fmt;

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

/// MWC Core errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Account name already taken
    #[error("Account with this name already exists: {0}")]
    AccountExists(String),

    /// Account name unknown
    #[error("Account doesn't exist: {0}")]
    AccountNotFound(String),

    /// Account name rejected
    #[error("Invalid account name: {0}")]
    InvalidAccountName(String),

    /// Contact was upserted over an existing entry
    #[error("Contact for {0} already exists.")]
    ContactExists(String),

    /// Contact name unknown
    #[error("Not found contact '{0}' to delete.")]
    ContactNotFound(String),

    /// Contact rejected before any mutation
    #[error("Invalid contact: {0}")]
    InvalidContact(String),

    /// Password does not match the initialized wallet
    #[error("Wrong password")]
    WrongPassword,

    /// Operation needs an initialized wallet
    #[error("Wallet is not initialized: {0}")]
    NotInitialized(String),

    /// Recovery phrase is not a valid mnemonic
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// Recovery phrase does not match this wallet
    #[error("Unable to recover the wallet with provided seed")]
    SeedMismatch,

    /// Listener precondition not met
    #[error("{0}")]
    ListenerUnavailable(String),

    /// Listener transport failure
    #[error("Listener error: {0}")]
    Listener(String),

    /// Foreign API failure
    #[error("Foreign API error: {0}")]
    ForeignApi(String),

    /// Invalid amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Insufficient funds for transaction
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    /// Invalid address format
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configured host cannot be resolved
    #[error("Host {0} is not reachable")]
    UnreachableHost(String),

    /// Transaction not found
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    /// Transaction history that breaks the index invariant
    #[error("Invalid transaction history: {0}")]
    InvalidTransaction(String),

    /// Output not found
    #[error("Output not found: {0}")]
    OutputNotFound(String),

    /// Output locking switched off in the configuration
    #[error("Output locking is disabled in the wallet configuration")]
    OutputLockingDisabled,

    /// Slate could not be read, produced or finalized
    #[error("Slate error: {0}")]
    Slate(String),

    /// Transaction proof error
    #[error("Proof error: {0}")]
    Proof(String),

    /// Node or relay communication error
    #[error("Network error: {0}")]
    Network(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid parameter
    #[error(transparent)]
    Params(#[from] mwc_params::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Check if error is a user-facing error (vs internal error)
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::AccountExists(_)
                | Error::AccountNotFound(_)
                | Error::InvalidAccountName(_)
                | Error::ContactExists(_)
                | Error::ContactNotFound(_)
                | Error::InvalidContact(_)
                | Error::WrongPassword
                | Error::InvalidMnemonic(_)
                | Error::SeedMismatch
                | Error::ListenerUnavailable(_)
                | Error::InvalidAmount(_)
                | Error::InsufficientFunds(_)
                | Error::InvalidAddress(_)
                | Error::InvalidConfig(_)
                | Error::UnreachableHost(_)
                | Error::OutputLockingDisabled
                | Error::Params(_)
        )
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Error::WrongPassword => {
                "The password is incorrect. Please check it and try again.".to_string()
            }
            Error::InvalidMnemonic(_) | Error::SeedMismatch => {
                "The recovery phrase is invalid. Please check and try again.".to_string()
            }
            Error::InsufficientFunds(_) => {
                "You don't have enough funds for this transaction. Please check your balance and try again.".to_string()
            }
            Error::InvalidAddress(_) => {
                "The recipient address is invalid. Please check and try again.".to_string()
            }
            Error::InvalidAmount(_) => {
                "The amount is invalid. Please enter a valid amount.".to_string()
            }
            Error::Network(_) => {
                "Unable to reach the MWC node. Please check your connection and try again.".to_string()
            }
            _ => self.to_string(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::AccountExists(_) | Error::AccountNotFound(_) | Error::InvalidAccountName(_) => {
                ErrorCategory::Account
            }
            Error::ContactExists(_) | Error::ContactNotFound(_) | Error::InvalidContact(_) => {
                ErrorCategory::Contact
            }
            Error::WrongPassword
            | Error::NotInitialized(_)
            | Error::InvalidMnemonic(_)
            | Error::SeedMismatch => ErrorCategory::Wallet,
            Error::ListenerUnavailable(_) | Error::Listener(_) | Error::ForeignApi(_) => {
                ErrorCategory::Listener
            }
            Error::InvalidAmount(_) | Error::InsufficientFunds(_) => ErrorCategory::Amount,
            Error::InvalidAddress(_) => ErrorCategory::Address,
            Error::InvalidConfig(_) | Error::UnreachableHost(_) | Error::Params(_) => {
                ErrorCategory::Config
            }
            Error::TransactionNotFound(_)
            | Error::InvalidTransaction(_)
            | Error::Slate(_)
            | Error::Proof(_) => {
                ErrorCategory::Transaction
            }
            Error::OutputNotFound(_) | Error::OutputLockingDisabled => ErrorCategory::Output,
            Error::Network(_) => ErrorCategory::Network,
            Error::Storage(_) => ErrorCategory::Storage,
            Error::Io(_) | Error::Serialization(_) | Error::Other(_) => ErrorCategory::Internal,
        }
    }
}

/// Error categories for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Account-related errors
    Account,
    /// Contact-related errors
    Contact,
    /// Wallet lifecycle errors (password, seed)
    Wallet,
    /// Listener and foreign API errors
    Listener,
    /// Amount-related errors
    Amount,
    /// Address-related errors
    Address,
    /// Configuration errors
    Config,
    /// Transaction, slate and proof errors
    Transaction,
    /// Output errors
    Output,
    /// Network-related errors
    Network,
    /// Storage-related errors
    Storage,
    /// Internal/system errors
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Account => write!(f, "Account"),
            ErrorCategory::Contact => write!(f, "Contact"),
            ErrorCategory::Wallet => write!(f, "Wallet"),
            ErrorCategory::Listener => write!(f, "Listener"),
            ErrorCategory::Amount => write!(f, "Amount"),
            ErrorCategory::Address => write!(f, "Address"),
            ErrorCategory::Config => write!(f, "Config"),
            ErrorCategory::Transaction => write!(f, "Transaction"),
            ErrorCategory::Output => write!(f, "Output"),
            ErrorCategory::Network => write!(f, "Network"),
            ErrorCategory::Storage => write!(f, "Storage"),
            ErrorCategory::Internal => write!(f, "Internal"),
        }
    }
}
