//! Wallet interface
//!
//! The capability surface the application depends on. Every backend (the
//! offline mock, the node-backed wallet) implements all of it with identical
//! error semantics, and callers only ever hold a `Box<dyn Wallet>`.
//!
//! Recoverable failures (bad name, wrong password, unmet precondition, I/O on
//! a caller-supplied path) come back as `Err`, whose `Display` is the message
//! to show. Only programmer errors panic.
//!
//! The interface assumes a single logical caller: mutating operations must not
//! overlap. Long-running calls ([`Wallet::check`], [`Wallet::refresh`], the
//! slate file operations) may be moved to a worker thread, which is why the
//! trait requires `Send`.

use crate::config::WalletConfig;
use crate::listen::ListenState;
use crate::models::{
    Account, InitWalletStatus, NodeStatus, ProofInfo, UtxoSignature, WalletContact, WalletInfo,
    WalletOutput, WalletTransaction,
};
use crate::Result;
use mwc_params::NetworkType;
use std::path::Path;

/// Wallet backend contract
pub trait Wallet: Send {
    // ---- lifecycle -------------------------------------------------------

    /// Open the wallet.
    ///
    /// On first run returns [`InitWalletStatus::NeedInit`] and remembers the
    /// password as the one to confirm. Once initialized, a mismatching password
    /// yields [`InitWalletStatus::WrongPassword`]; otherwise the network is bound.
    fn open(&mut self, network: NetworkType, password: &str) -> Result<InitWalletStatus>;

    /// Release the session. Idempotent.
    fn close(&mut self) -> bool;

    /// Produce a new recovery phrase. Nothing is committed yet.
    fn init(&mut self) -> Result<Vec<String>>;

    /// Commit initialization with the phrase returned by [`Wallet::init`].
    fn confirm_new_seed(&mut self) -> Result<()>;

    /// Recover from a phrase; initialization state is untouched on failure.
    fn recover(&mut self, seed: &[String]) -> Result<()>;

    // ---- listening -------------------------------------------------------

    /// Currently active channels
    fn listening_status(&self) -> ListenState;

    /// Start the requested channels. An empty request always succeeds.
    fn start_listening(&mut self, requested: ListenState) -> Result<()>;

    /// Stop the requested channels. An empty request always succeeds.
    fn stop_listening(&mut self, requested: ListenState) -> Result<()>;

    /// Current receive address and its rotation index
    fn mwc_box_address(&self) -> (String, u32);

    /// Select a receive address by index (negative clamps to 0)
    fn change_mwc_box_address(&mut self, idx: i64) -> Result<()>;

    /// Rotate to the next receive address
    fn next_box_address(&mut self) -> Result<()>;

    /// Foreign API listener state
    fn is_foreign_api_running(&self) -> bool;

    /// Start the foreign API listener
    fn start_foreign_api(&mut self, port: u16, secret: &str) -> Result<()>;

    /// Stop the foreign API listener
    fn stop_foreign_api(&mut self) -> Result<()>;

    // ---- accounts --------------------------------------------------------

    /// Accounts in creation order
    fn account_list(&self) -> Vec<Account>;

    /// Create an account; fails if the name is taken
    fn create_account(&mut self, name: &str) -> Result<()>;

    /// Select an account; fails if the name is unknown
    fn switch_account(&mut self, name: &str) -> Result<()>;

    // ---- maintenance -----------------------------------------------------

    /// Integrity check and repair. May take a long time.
    fn check(&mut self) -> Result<()>;

    /// Pull node state (outputs, transactions, balance, status) into memory
    fn refresh(&mut self) -> Result<()>;

    /// Current configuration
    fn wallet_config(&self) -> WalletConfig;

    /// Replace the whole configuration
    fn set_wallet_config(&mut self, config: WalletConfig) -> Result<()>;

    /// Connected node status
    fn node_status(&self) -> NodeStatus;

    /// Balance of the selected account
    fn wallet_balance(&self) -> WalletInfo;

    // ---- transactions ----------------------------------------------------

    /// Mark a transaction cancelled
    fn cancel_transaction(&mut self, tx_id: &str) -> bool;

    /// Write a proof for transaction `tx_idx` to `output`
    fn generate_transaction_proof(&mut self, tx_idx: i64, output: &Path) -> ProofInfo;

    /// Verify the proof stored at `proof`
    fn verify_transaction_proof(&self, proof: &Path) -> ProofInfo;

    /// Start a file-based send: write the initial slate to `slate_out`
    fn send_file(&mut self, amount: u64, slate_out: &Path) -> Result<()>;

    /// Read a slate and write the response slate to `response_out`
    fn receive_file(&mut self, slate_in: &Path, response_out: &Path) -> Result<()>;

    /// Finalize a response slate and broadcast the transaction
    fn finalize_file(&mut self, response_in: &Path) -> Result<()>;

    /// Send directly to an address; appends one pending outbound transaction
    fn send_to(
        &mut self,
        amount: u64,
        address: &str,
        message: &str,
        input_confirmations: u32,
        change_outputs: u32,
    ) -> Result<()>;

    // ---- inspection ------------------------------------------------------

    /// Outputs of the selected account
    fn outputs(&self) -> Vec<WalletOutput>;

    /// Lock or unlock an output
    fn set_output_locked(&mut self, commitment: &str, locked: bool) -> Result<()>;

    /// Transactions, newest first; `limit <= 0` returns all
    fn transactions(&self, limit: i32) -> Vec<WalletTransaction>;

    /// Address book
    fn contacts(&self) -> Vec<WalletContact>;

    /// Insert or overwrite a contact; overwriting reports `ContactExists`
    fn add_contact(&mut self, contact: WalletContact) -> Result<()>;

    /// Delete a contact by name
    fn delete_contact(&mut self, name: &str) -> Result<()>;

    /// Sign an ownership challenge for an output
    fn sign_utxo(&self, output_id: &str, hash: &str) -> Result<UtxoSignature>;
}
