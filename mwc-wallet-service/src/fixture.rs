//! Canned data for the offline wallet

use mwc_core::{
    NodeStatus, OutputStatus, TxDirection, WalletContact, WalletOutput, WalletTransaction,
    DEFAULT_ACCOUNT,
};
use mwc_params::NANO_PER_MWC;

const MOCK_SEED: [&str; 24] = [
    "local", "donor", "often", "upon", "copper", "minimum", "message", "gossip", "vendor", "route",
    "rival", "brick", "suffer", "gravity", "mom", "daring", "else", "exile", "brush", "mansion",
    "shift", "load", "harbor", "close",
];

const MOCK_BOX_ADDRESSES: [&str; 4] = [
    "jkh2jhv88y7yWdo7nWtzYiCwHmFbbLxJyA5jbPr2HeTH",
    "kdfjiewuyrqwieudkj387423942jkkdjsfgsd938iufd",
    "eriweriutyreity43985ieujhgfdsjh43057qpojlkdj",
    "587634ijkdhgfjkdhgvqo87rt562974qrdjfkgfsdhfg",
];

const MOCK_COMMITMENT: &str = "08710be0b3fffa79b9423f8e007709a815f237dcfd31340cfa1fdfefd823dca30e";

/// Identifiers placed in generated transaction proofs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofFixture {
    /// Sender address
    pub from_address: String,
    /// Output commitment
    pub output: String,
    /// Kernel excess
    pub kernel: String,
}

/// Everything the offline wallet reports that doesn't come from the caller
#[derive(Debug, Clone, PartialEq)]
pub struct MockFixture {
    /// Recovery phrase returned by `init` and accepted by `recover`
    pub seed_words: Vec<String>,
    /// Receive address pool, indexed by the rotation index
    pub box_addresses: Vec<String>,
    /// Accounts of a fresh wallet
    pub accounts: Vec<String>,
    /// Contacts of a fresh wallet
    pub contacts: Vec<WalletContact>,
    /// History shown until the wallet has persisted its own
    pub transactions: Vec<WalletTransaction>,
    /// Outputs reported by every scan
    pub outputs: Vec<WalletOutput>,
    /// Node the wallet pretends to be connected to
    pub node_status: NodeStatus,
    /// Whether the keybase companion app is running
    pub keybase_available: bool,
    /// Proof identifiers
    pub proof: ProofFixture,
}

impl Default for MockFixture {
    fn default() -> Self {
        Self {
            seed_words: MOCK_SEED.iter().map(|w| w.to_string()).collect(),
            box_addresses: MOCK_BOX_ADDRESSES.iter().map(|a| a.to_string()).collect(),
            accounts: vec![DEFAULT_ACCOUNT.to_string()],
            contacts: vec![WalletContact::new(
                "bob",
                "43596834659876323897658564253876538",
            )],
            transactions: vec![
                history(
                    4,
                    TxDirection::Send,
                    "xd7auPddUmmEzSte48a2aZ9tWkjjCppgn41pemUfcVSqjxHHZ6cT",
                    1_556_304_900,
                    false,
                    9,
                ),
                history(
                    5,
                    TxDirection::Receive,
                    "xd7546UmmEzSte48a2aZ9tWkjjCppgn41pemUfcVSqjxHHZ6cT",
                    1_556_308_691,
                    true,
                    10,
                ),
                history(
                    6,
                    TxDirection::Receive,
                    "xd7auPdkfjsld;fkfsld;jjCppgn41pemUfcVSqjxHHZ6cT",
                    1_556_391_662,
                    true,
                    12,
                ),
            ],
            outputs: default_outputs(),
            node_status: NodeStatus {
                connections: 17,
                status: "Ready".to_string(),
                height: 73_264,
                peer_height: 73_264,
            },
            keybase_available: false,
            proof: ProofFixture {
                from_address: "xd7auPddUmmEzSte48a2aZ9tWkjjCppgn41pemUfcVSqjxHHZ6cT".to_string(),
                output: MOCK_COMMITMENT.to_string(),
                kernel: "099c8a166acd426481c1b09707b9e6cdabb69718ee3ca86694579bf98a42c0c80d"
                    .to_string(),
            },
        }
    }
}

fn history(
    idx: i64,
    direction: TxDirection,
    address: &str,
    timestamp: i64,
    confirmed: bool,
    coins: u64,
) -> WalletTransaction {
    WalletTransaction {
        idx,
        direction,
        tx_id: "8454935873498593487".to_string(),
        address: address.to_string(),
        timestamp,
        confirmed,
        message: None,
        amount: coins * NANO_PER_MWC,
        historical: true,
        cancelled: false,
    }
}

fn default_outputs() -> Vec<WalletOutput> {
    let confirmed = WalletOutput {
        commitment: MOCK_COMMITMENT.to_string(),
        height: 23,
        confirmations: 3,
        coinbase: true,
        status: OutputStatus::Confirmed,
        locked: false,
        lock_height: 4,
        amount: NANO_PER_MWC * 9 / 2,
        tx_idx: 9,
    };
    let unconfirmed = WalletOutput {
        status: OutputStatus::Unconfirmed,
        ..confirmed.clone()
    };
    let other = WalletOutput {
        commitment: "0478532478593247852397592376590379475".to_string(),
        ..unconfirmed.clone()
    };
    vec![confirmed, unconfirmed, other]
}
