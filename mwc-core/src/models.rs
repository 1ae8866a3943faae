//! Wallet data model
//!
//! Records exchanged across the [`Wallet`](crate::Wallet) interface.

use serde::{Deserialize, Serialize};

/// Account entry as seen by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account name (unique)
    pub name: String,
    /// Whether this is the selected account
    pub selected: bool,
}

/// Address book contact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletContact {
    /// Contact name (unique)
    pub name: String,
    /// Opaque address string
    pub address: String,
}

impl WalletContact {
    /// Create a contact
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

/// Transaction direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TxDirection {
    /// Outbound
    Send = 1,
    /// Inbound
    Receive = 2,
}

impl TxDirection {
    /// Get direction from its wire byte
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(TxDirection::Send),
            2 => Some(TxDirection::Receive),
            _ => None,
        }
    }

    /// Get as u8
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

/// Wallet transaction record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletTransaction {
    /// Wallet-local index, strictly increasing
    pub idx: i64,
    /// Direction
    pub direction: TxDirection,
    /// Counterparty / slate identifier
    pub tx_id: String,
    /// Counterparty address
    pub address: String,
    /// Creation time (unix seconds)
    pub timestamp: i64,
    /// Confirmed on chain
    pub confirmed: bool,
    /// Optional message attached by the sender
    pub message: Option<String>,
    /// Amount in nano-MWC
    pub amount: u64,
    /// Loaded from history rather than created in this session
    pub historical: bool,
    /// Cancelled by the user
    pub cancelled: bool,
}

impl WalletTransaction {
    /// New unconfirmed transaction created in this session.
    ///
    /// The index is a placeholder; [`WalletState::push_transaction`](crate::WalletState::push_transaction)
    /// assigns the real one.
    pub fn pending(
        direction: TxDirection,
        tx_id: impl Into<String>,
        address: impl Into<String>,
        amount: u64,
        message: Option<String>,
    ) -> Self {
        Self {
            idx: 0,
            direction,
            tx_id: tx_id.into(),
            address: address.into(),
            timestamp: chrono::Utc::now().timestamp(),
            confirmed: false,
            message: message.filter(|m| !m.is_empty()),
            amount,
            historical: false,
            cancelled: false,
        }
    }

    /// Can this transaction still be cancelled
    pub fn can_cancel(&self) -> bool {
        !self.confirmed && !self.cancelled
    }
}

/// Output status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputStatus {
    /// Not yet confirmed
    Unconfirmed,
    /// Confirmed and spendable once mature
    Confirmed,
    /// Locked by a pending transaction or by the user
    Locked,
    /// Spent
    Spent,
}

/// Spendable unit produced by chain scanning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletOutput {
    /// Commitment (hex)
    pub commitment: String,
    /// Block height
    pub height: u64,
    /// Number of confirmations
    pub confirmations: u64,
    /// Coinbase output
    pub coinbase: bool,
    /// Status
    pub status: OutputStatus,
    /// Locked by the user
    pub locked: bool,
    /// Lock height
    pub lock_height: u64,
    /// Amount in nano-MWC
    pub amount: u64,
    /// Index of the transaction that produced the output
    pub tx_idx: i64,
}

/// Connected node snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStatus {
    /// Peer connections
    pub connections: u32,
    /// Status label
    pub status: String,
    /// Node tip height
    pub height: u64,
    /// Highest height reported by peers
    pub peer_height: u64,
}

impl NodeStatus {
    /// Status when no node has been reached
    pub fn offline() -> Self {
        Self {
            connections: 0,
            status: "Offline".to_string(),
            height: 0,
            peer_height: 0,
        }
    }

    /// Node has caught up with its peers
    pub fn is_synced(&self) -> bool {
        self.connections > 0 && self.height >= self.peer_height
    }
}

/// Balance summary of the selected account (nano-MWC)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletInfo {
    /// Account the summary belongs to
    pub account: String,
    /// Total
    pub total: u64,
    /// Confirmed
    pub confirmed: u64,
    /// Waiting for confirmations
    pub awaiting_confirmation: u64,
    /// Locked by previous transactions
    pub locked: u64,
    /// Currently spendable
    pub spendable: u64,
}

impl WalletInfo {
    /// Empty summary for an account
    pub fn empty(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            total: 0,
            confirmed: 0,
            awaiting_confirmation: 0,
            locked: 0,
            spendable: 0,
        }
    }
}

/// Transaction proof result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofInfo {
    /// Proof generated or verified
    Verified {
        /// Proven amount (nano-MWC)
        amount: u64,
        /// Sender address
        from_address: String,
        /// Receiver address
        to_address: String,
        /// Output commitment
        output: String,
        /// Kernel excess
        kernel: String,
    },
    /// Proof could not be generated or verified
    Failed {
        /// Reason
        message: String,
    },
}

impl ProofInfo {
    /// Failed proof with a reason
    pub fn failed(message: impl Into<String>) -> Self {
        ProofInfo::Failed {
            message: message.into(),
        }
    }

    /// Check if the proof succeeded
    pub fn is_verified(&self) -> bool {
        matches!(self, ProofInfo::Verified { .. })
    }
}

/// Signature over an output ownership challenge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoSignature {
    /// Output amount (nano-MWC)
    pub amount: u64,
    /// Hash of the signed message
    pub message_hash: String,
    /// Public key (hex)
    pub public_key: String,
    /// Signature (hex)
    pub signature: String,
}

/// Outcome of opening a wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitWalletStatus {
    /// Wallet open
    Ok,
    /// First run; a seed must be created or recovered
    NeedInit,
    /// Password does not match
    WrongPassword,
}
