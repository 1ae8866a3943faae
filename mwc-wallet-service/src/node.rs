//! Node-backed wallet
//!
//! [`NodeWallet`] keeps the local view (accounts, contacts, history, outputs,
//! configuration) and delegates everything that needs keys or the network to
//! a [`NodeClient`]. Reads are served from memory; [`Wallet::refresh`] pulls
//! the node's view into it.
//!
//! Credentials stay with the client. The snapshot written by this wallet
//! always carries an empty password, and the session password only lives in
//! a zeroizing buffer until `close`.

use crate::validation::{validate_amount, validate_send};
use bip39::{Language, Mnemonic};
use mwc_core::{
    Account, Error, InitWalletStatus, ListenChannel, ListenState, NodeStatus, ProofInfo, Result,
    UtxoSignature, Wallet, WalletConfig, WalletContact, WalletInfo, WalletOutput, WalletState,
    WalletTransaction,
};
use mwc_params::NetworkType;
use mwc_storage::{write_atomic, SnapshotFile, WalletSnapshot};
use rand::RngCore;
use std::fs;
use std::path::Path;
use zeroize::Zeroizing;

/// Number of words in a generated recovery phrase
pub const SEED_WORD_COUNT: usize = 24;

/// Transport to the wallet node and relay
///
/// Implementations own the keys and the connection. Every call is blocking
/// and may take as long as the network needs.
pub trait NodeClient: Send {
    /// Authenticate against the node's wallet
    fn login(&self, network: NetworkType, password: &str) -> Result<InitWalletStatus>;

    /// End the session
    fn logout(&self) -> Result<()>;

    /// Create the wallet from a freshly generated phrase
    fn init_wallet(&self, password: &str, seed: &[String]) -> Result<()>;

    /// Restore the wallet from a phrase
    fn recover_wallet(&self, password: &str, seed: &[String]) -> Result<()>;

    /// Account names known to the node
    fn accounts(&self) -> Result<Vec<String>>;

    /// Create an account
    fn create_account(&self, name: &str) -> Result<()>;

    /// Make an account the active one
    fn switch_account(&self, name: &str) -> Result<()>;

    /// Start a listener
    fn start_listener(&self, channel: ListenChannel) -> Result<()>;

    /// Stop a listener
    fn stop_listener(&self, channel: ListenChannel) -> Result<()>;

    /// Receive address at a rotation index
    fn box_address(&self, index: u32) -> Result<String>;

    /// Whether a host name resolves
    fn resolve_host(&self, host: &str) -> bool;

    /// Start the foreign API
    fn start_foreign_api(&self, address: &str, port: u16, secret: &str) -> Result<()>;

    /// Stop the foreign API
    fn stop_foreign_api(&self) -> Result<()>;

    /// Scan the chain and repair the wallet
    fn check_repair(&self) -> Result<()>;

    /// Status of the connected node
    fn node_status(&self) -> Result<NodeStatus>;

    /// Balance of an account
    fn balance(&self, account: &str) -> Result<WalletInfo>;

    /// History of an account
    fn transactions(&self, account: &str) -> Result<Vec<WalletTransaction>>;

    /// Outputs of an account
    fn outputs(&self, account: &str) -> Result<Vec<WalletOutput>>;

    /// Build an initial slate; returns its serialized form
    fn init_send(&self, amount: u64, input_confirmations: u32, change_outputs: u32)
        -> Result<String>;

    /// Answer a slate; returns the serialized response
    fn receive(&self, slate: &str) -> Result<String>;

    /// Finalize a response slate and broadcast it
    fn finalize(&self, response: &str) -> Result<()>;

    /// Send to an address; returns the transaction id
    fn send(
        &self,
        amount: u64,
        address: &str,
        message: Option<&str>,
        input_confirmations: u32,
        change_outputs: u32,
    ) -> Result<String>;

    /// Cancel a transaction
    fn cancel(&self, tx_id: &str) -> Result<()>;

    /// Build a proof; returns its data and its serialized form
    fn generate_proof(&self, tx_idx: i64) -> Result<(ProofInfo, String)>;

    /// Check a serialized proof
    fn verify_proof(&self, proof: &str) -> Result<ProofInfo>;

    /// Lock or unlock an output
    fn lock_output(&self, commitment: &str, locked: bool) -> Result<()>;

    /// Sign an ownership challenge for an output
    fn sign_utxo(&self, output_id: &str, hash: &str) -> Result<UtxoSignature>;
}

/// Generate a random 24-word BIP-39 phrase
pub fn generate_seed() -> Result<Zeroizing<Vec<String>>> {
    let mut entropy = Zeroizing::new([0u8; 32]);
    rand::thread_rng().fill_bytes(&mut entropy[..]);
    let mnemonic = Mnemonic::from_entropy(&entropy[..])
        .map_err(|e| Error::Other(format!("Unable to generate seed: {}", e)))?;
    Ok(Zeroizing::new(
        mnemonic.words().map(str::to_string).collect(),
    ))
}

/// Check a phrase against the BIP-39 English word list and checksum
pub fn validate_seed(seed: &[String]) -> Result<()> {
    if seed.len() != SEED_WORD_COUNT {
        return Err(Error::InvalidMnemonic(format!(
            "expected {} words, got {}",
            SEED_WORD_COUNT,
            seed.len()
        )));
    }
    let phrase = Zeroizing::new(
        seed.iter()
            .map(|w| w.trim().to_lowercase())
            .collect::<Vec<_>>()
            .join(" "),
    );
    Mnemonic::parse_in_normalized(Language::English, &phrase)
        .map_err(|e| Error::InvalidMnemonic(e.to_string()))?;
    Ok(())
}

/// Wallet backed by a node
pub struct NodeWallet<C: NodeClient> {
    client: C,
    store: SnapshotFile,
    state: WalletState,
    network: Option<NetworkType>,
    initialized: bool,
    password: Zeroizing<String>,
    pending_seed: Option<Zeroizing<Vec<String>>>,
    listening: ListenState,
    foreign_api_running: bool,
    node_status: NodeStatus,
    balance: Option<WalletInfo>,
    box_address: String,
    last_save_error: Option<String>,
}

impl<C: NodeClient> NodeWallet<C> {
    /// Wallet over `client`, loading any snapshot in `data_dir`
    pub fn new(client: C, data_dir: impl AsRef<Path>) -> Self {
        let store = SnapshotFile::new(data_dir);
        let mut wallet = Self {
            client,
            state: WalletState::new(),
            network: None,
            initialized: false,
            password: Zeroizing::new(String::new()),
            pending_seed: None,
            listening: ListenState::OFFLINE,
            foreign_api_running: false,
            node_status: NodeStatus::offline(),
            balance: None,
            box_address: String::new(),
            last_save_error: None,
            store,
        };

        if let Some(snapshot) = wallet.store.load() {
            if !snapshot.password.is_empty() {
                tracing::warn!("Ignoring a password stored in the wallet snapshot");
            }
            wallet.network = snapshot.network;
            wallet.initialized = snapshot.initialized;
            wallet.state = snapshot.state;
        }
        wallet
    }

    /// The transport
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Write the current state to disk, without credentials
    pub fn save(&self) -> Result<()> {
        let snapshot = WalletSnapshot::new(self.network, self.initialized, "", self.state.clone());
        self.store.save(&snapshot)?;
        Ok(())
    }

    /// Error of the last save attempt, cleared by the next successful one
    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    // Best-effort: the change stays in memory and a later save may succeed.
    fn persist(&mut self) {
        match self.save() {
            Ok(()) => self.last_save_error = None,
            Err(e) => {
                tracing::warn!("Unable to save wallet: {}", e);
                self.last_save_error = Some(e.to_string());
            }
        }
    }

    fn selected_account(&self) -> String {
        self.state.selected_account().unwrap_or_default().to_string()
    }

    fn require_password(&self) -> Result<&str> {
        if self.password.is_empty() {
            return Err(Error::NotInitialized(
                "Open the wallet with a password first".to_string(),
            ));
        }
        Ok(self.password.as_str())
    }

    /// Pull history, outputs and balance of the selected account.
    /// Nothing is replaced unless all three arrive.
    fn refresh_history(&mut self) -> Result<()> {
        let account = self.selected_account();
        let transactions = self.client.transactions(&account)?;
        let outputs = self.client.outputs(&account)?;
        let balance = self.client.balance(&account)?;
        self.state.replace_transactions(transactions)?;
        self.state.replace_outputs(outputs);
        self.balance = Some(balance);
        self.persist();
        Ok(())
    }

    /// Refresh after the node accepted a change; a failure only leaves the view stale
    fn refresh_after_change(&mut self) {
        if let Err(e) = self.refresh_history() {
            tracing::warn!("Wallet view not refreshed: {}", e);
        }
    }
}

impl<C: NodeClient> Drop for NodeWallet<C> {
    fn drop(&mut self) {
        if let Err(e) = self.save() {
            tracing::warn!("Unable to save wallet on shutdown: {}", e);
        }
    }
}

impl<C: NodeClient> Wallet for NodeWallet<C> {
    fn open(&mut self, network: NetworkType, password: &str) -> Result<InitWalletStatus> {
        let status = self.client.login(network, password)?;
        match status {
            InitWalletStatus::WrongPassword => {
                tracing::info!("Wallet open rejected: wrong password");
                return Ok(status);
            }
            InitWalletStatus::NeedInit => {
                self.password = Zeroizing::new(password.to_string());
                self.initialized = false;
                tracing::info!("Wallet on {} needs a seed", network);
                return Ok(status);
            }
            InitWalletStatus::Ok => {}
        }

        self.password = Zeroizing::new(password.to_string());
        self.network = Some(network);
        self.initialized = true;
        tracing::info!("Wallet open on {}", network);

        if let Err(e) = self.refresh() {
            tracing::warn!("Initial refresh failed: {}", e);
        }
        Ok(InitWalletStatus::Ok)
    }

    fn close(&mut self) -> bool {
        for channel in self.listening.channels() {
            if let Err(e) = self.client.stop_listener(channel) {
                tracing::warn!("Unable to stop {} listener: {}", channel, e);
            }
        }
        self.listening = ListenState::OFFLINE;
        if self.foreign_api_running {
            if let Err(e) = self.client.stop_foreign_api() {
                tracing::warn!("Unable to stop foreign API: {}", e);
            }
            self.foreign_api_running = false;
        }
        if let Err(e) = self.client.logout() {
            tracing::warn!("Logout failed: {}", e);
        }
        self.password = Zeroizing::new(String::new());
        self.pending_seed = None;
        true
    }

    fn init(&mut self) -> Result<Vec<String>> {
        let seed = generate_seed()?;
        let words = seed.to_vec();
        self.pending_seed = Some(seed);
        Ok(words)
    }

    fn confirm_new_seed(&mut self) -> Result<()> {
        let seed = self
            .pending_seed
            .as_ref()
            .ok_or_else(|| Error::NotInitialized("No new seed to confirm".to_string()))?;
        let password = self.require_password()?;
        self.client.init_wallet(password, seed)?;

        self.pending_seed = None;
        self.initialized = true;
        tracing::info!("New wallet seed committed");
        self.persist();
        Ok(())
    }

    fn recover(&mut self, seed: &[String]) -> Result<()> {
        validate_seed(seed)?;
        let password = self.require_password()?;
        self.client.recover_wallet(password, seed)?;

        self.initialized = true;
        tracing::info!("Wallet recovered from seed");
        self.persist();
        Ok(())
    }

    fn listening_status(&self) -> ListenState {
        self.listening
    }

    fn start_listening(&mut self, requested: ListenState) -> Result<()> {
        let mut started = Vec::new();
        for channel in requested.without(self.listening).channels() {
            if let Err(e) = self.client.start_listener(channel) {
                for done in started.into_iter().rev() {
                    if let Err(stop_err) = self.client.stop_listener(done) {
                        tracing::warn!("Unable to roll back {} listener: {}", done, stop_err);
                    }
                }
                return Err(e);
            }
            started.push(channel);
        }
        for channel in started {
            tracing::info!("{} listener started", channel);
            self.listening = self.listening | ListenState::from(channel);
        }
        Ok(())
    }

    fn stop_listening(&mut self, requested: ListenState) -> Result<()> {
        let active = ListenState {
            mwc_box: requested.mwc_box && self.listening.mwc_box,
            keybase: requested.keybase && self.listening.keybase,
        };
        for channel in active.channels() {
            self.client.stop_listener(channel)?;
            self.listening = self.listening.without(ListenState::from(channel));
            tracing::info!("{} listener stopped", channel);
        }
        Ok(())
    }

    fn mwc_box_address(&self) -> (String, u32) {
        (self.box_address.clone(), self.state.box_address_index())
    }

    fn change_mwc_box_address(&mut self, idx: i64) -> Result<()> {
        let previous = self.state.box_address_index();
        self.state.set_box_address_index(idx);
        match self.client.box_address(self.state.box_address_index()) {
            Ok(address) => self.box_address = address,
            Err(e) => {
                self.state.set_box_address_index(i64::from(previous));
                return Err(e);
            }
        }
        self.persist();
        Ok(())
    }

    fn next_box_address(&mut self) -> Result<()> {
        let next = i64::from(self.state.box_address_index()) + 1;
        self.change_mwc_box_address(next)
    }

    fn is_foreign_api_running(&self) -> bool {
        self.foreign_api_running
    }

    fn start_foreign_api(&mut self, port: u16, secret: &str) -> Result<()> {
        if port == 0 {
            return Err(Error::ForeignApi("Port 0 is not a valid listening port".to_string()));
        }
        if self.foreign_api_running {
            return Ok(());
        }
        let host = self
            .state
            .config()
            .foreign_api_address
            .split(':')
            .next()
            .unwrap_or("127.0.0.1")
            .to_string();
        self.client.start_foreign_api(&host, port, secret)?;
        self.foreign_api_running = true;
        tracing::info!("Foreign API listening on {}:{}", host, port);
        Ok(())
    }

    fn stop_foreign_api(&mut self) -> Result<()> {
        if !self.foreign_api_running {
            return Ok(());
        }
        self.client.stop_foreign_api()?;
        self.foreign_api_running = false;
        Ok(())
    }

    fn account_list(&self) -> Vec<Account> {
        self.state.accounts()
    }

    fn create_account(&mut self, name: &str) -> Result<()> {
        let mut next = self.state.clone();
        next.create_account(name)?;
        self.client.create_account(name)?;
        self.state = next;
        tracing::info!("Created account '{}'", name);
        self.persist();
        Ok(())
    }

    fn switch_account(&mut self, name: &str) -> Result<()> {
        let mut next = self.state.clone();
        next.switch_account(name)?;
        self.client.switch_account(name)?;
        self.state = next;
        self.balance = None;
        tracing::debug!("Switched to account '{}'", name);
        self.persist();
        Ok(())
    }

    fn check(&mut self) -> Result<()> {
        tracing::info!("Starting wallet check");
        self.client.check_repair()?;
        tracing::info!("Wallet check finished");
        self.refresh()
    }

    fn refresh(&mut self) -> Result<()> {
        if !self.initialized || self.password.is_empty() {
            tracing::debug!("Wallet not open, nothing to refresh");
            return Ok(());
        }
        self.node_status = self.client.node_status()?;
        self.state.replace_accounts(self.client.accounts()?)?;
        self.box_address = self.client.box_address(self.state.box_address_index())?;
        self.refresh_history()
    }

    fn wallet_config(&self) -> WalletConfig {
        self.state.config().clone()
    }

    fn set_wallet_config(&mut self, config: WalletConfig) -> Result<()> {
        config.validate()?;
        if !config.mqs_domain.is_empty() && !self.client.resolve_host(&config.mqs_domain) {
            return Err(Error::UnreachableHost(config.mqs_domain));
        }
        self.state.set_config(config)?;
        self.persist();
        Ok(())
    }

    fn node_status(&self) -> NodeStatus {
        self.node_status.clone()
    }

    fn wallet_balance(&self) -> WalletInfo {
        match &self.balance {
            Some(info) => info.clone(),
            None => WalletInfo::empty(self.selected_account()),
        }
    }

    fn cancel_transaction(&mut self, tx_id: &str) -> bool {
        if !self
            .state
            .transactions()
            .iter()
            .any(|t| t.tx_id == tx_id && t.can_cancel())
        {
            return false;
        }
        if let Err(e) = self.client.cancel(tx_id) {
            tracing::warn!("Unable to cancel transaction {}: {}", tx_id, e);
            return false;
        }
        self.state.cancel_transaction(tx_id);
        self.persist();
        true
    }

    fn generate_transaction_proof(&mut self, tx_idx: i64, output: &Path) -> ProofInfo {
        if self.state.transaction(tx_idx).is_none() {
            return ProofInfo::failed(format!("Transaction {} not found", tx_idx));
        }
        let (info, document) = match self.client.generate_proof(tx_idx) {
            Ok(proof) => proof,
            Err(e) => return ProofInfo::failed(e.to_string()),
        };
        match write_atomic(output, document.as_bytes()) {
            Ok(()) => info,
            Err(e) => ProofInfo::failed(e.to_string()),
        }
    }

    fn verify_transaction_proof(&self, proof: &Path) -> ProofInfo {
        let document = match fs::read_to_string(proof) {
            Ok(text) => text,
            Err(e) => {
                return ProofInfo::failed(format!("Unable to read {}: {}", proof.display(), e))
            }
        };
        match self.client.verify_proof(&document) {
            Ok(info) => info,
            Err(e) => ProofInfo::failed(e.to_string()),
        }
    }

    fn send_file(&mut self, amount: u64, slate_out: &Path) -> Result<()> {
        validate_amount(amount)?;
        let config = self.state.config();
        let slate =
            self.client
                .init_send(amount, config.input_confirmations, config.change_outputs)?;
        write_atomic(slate_out, slate.as_bytes())?;
        self.refresh_after_change();
        Ok(())
    }

    fn receive_file(&mut self, slate_in: &Path, response_out: &Path) -> Result<()> {
        let slate = fs::read_to_string(slate_in)?;
        let response = self.client.receive(&slate)?;
        write_atomic(response_out, response.as_bytes())?;
        self.refresh_after_change();
        Ok(())
    }

    fn finalize_file(&mut self, response_in: &Path) -> Result<()> {
        let response = fs::read_to_string(response_in)?;
        self.client.finalize(&response)?;
        self.refresh_after_change();
        Ok(())
    }

    fn send_to(
        &mut self,
        amount: u64,
        address: &str,
        message: &str,
        input_confirmations: u32,
        change_outputs: u32,
    ) -> Result<()> {
        validate_send(amount, address, input_confirmations, change_outputs)?;
        let message = Some(message).filter(|m| !m.is_empty());
        let tx_id = self.client.send(
            amount,
            address,
            message,
            input_confirmations,
            change_outputs,
        )?;
        tracing::info!("Sent transaction {}", tx_id);
        self.refresh_after_change();
        Ok(())
    }

    fn outputs(&self) -> Vec<WalletOutput> {
        self.state.outputs().to_vec()
    }

    fn set_output_locked(&mut self, commitment: &str, locked: bool) -> Result<()> {
        let mut next = self.state.clone();
        next.set_output_locked(commitment, locked)?;
        self.client.lock_output(commitment, locked)?;
        self.state = next;
        Ok(())
    }

    fn transactions(&self, limit: i32) -> Vec<WalletTransaction> {
        self.state.recent_transactions(limit)
    }

    fn contacts(&self) -> Vec<WalletContact> {
        self.state.contacts().to_vec()
    }

    fn add_contact(&mut self, contact: WalletContact) -> Result<()> {
        let result = self.state.upsert_contact(contact);
        if matches!(result, Ok(()) | Err(Error::ContactExists(_))) {
            self.persist();
        }
        result
    }

    fn delete_contact(&mut self, name: &str) -> Result<()> {
        self.state.delete_contact(name)?;
        self.persist();
        Ok(())
    }

    fn sign_utxo(&self, output_id: &str, hash: &str) -> Result<UtxoSignature> {
        self.client.sign_utxo(output_id, hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_seed_is_valid() {
        let seed = generate_seed().unwrap();
        assert_eq!(seed.len(), SEED_WORD_COUNT);
        validate_seed(&seed).unwrap();
    }

    #[test]
    fn test_validate_seed_rejects_bad_phrases() {
        let short = vec!["abandon".to_string(); 12];
        assert!(matches!(validate_seed(&short), Err(Error::InvalidMnemonic(_))));

        let mut words = generate_seed().unwrap().to_vec();
        words[0] = "notaword".to_string();
        assert!(matches!(validate_seed(&words), Err(Error::InvalidMnemonic(_))));
    }
}
