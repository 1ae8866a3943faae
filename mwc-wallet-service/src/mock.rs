//! Offline wallet
//!
//! Implements the whole [`Wallet`] interface against local state and the
//! canned data of a [`MockFixture`]. Slates and proofs are real files, so the
//! file-based flows can be exercised end to end without a node.
//!
//! The password is kept in the snapshot as plain text. `NodeWallet` never
//! writes it.

use crate::documents::{ProofDocument, SlateDocument, SlateStage};
use crate::fixture::MockFixture;
use crate::validation::{validate_amount, validate_send};
use mwc_core::{
    Account, Error, InitWalletStatus, ListenState, NodeStatus, ProofInfo, Result, TxDirection,
    UtxoSignature, Wallet, WalletConfig, WalletContact, WalletInfo, WalletOutput, WalletState,
    WalletTransaction, DEFAULT_ACCOUNT,
};
use mwc_params::{NetworkType, NANO_PER_MWC};
use mwc_storage::{SnapshotFile, WalletSnapshot};
use sha2::{Digest, Sha256};
use std::path::Path;
use zeroize::Zeroizing;

const KEYBASE_NOT_RUNNING: &str = "Please start your keybase app first. Then retry to start listener";

/// Wallet that never talks to a node
pub struct MockWallet {
    fixture: MockFixture,
    store: SnapshotFile,
    state: WalletState,
    network: Option<NetworkType>,
    initialized: bool,
    password: Zeroizing<String>,
    seed_issued: bool,
    session_open: bool,
    listening: ListenState,
    foreign_api_port: Option<u16>,
    last_save_error: Option<String>,
}

impl MockWallet {
    /// Offline wallet with the default fixture, loading any snapshot in `data_dir`
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self> {
        Self::with_fixture(data_dir, MockFixture::default())
    }

    /// Offline wallet with custom canned data
    pub fn with_fixture(data_dir: impl AsRef<Path>, fixture: MockFixture) -> Result<Self> {
        let store = SnapshotFile::new(data_dir);

        let mut state = WalletState::from_parts(
            fixture.accounts.clone(),
            0,
            fixture.contacts.clone(),
            WalletConfig::default(),
            0,
        )?;
        state.replace_transactions(fixture.transactions.clone())?;

        let mut network = None;
        let mut initialized = false;
        let mut password = Zeroizing::new(String::new());

        if let Some(snapshot) = store.load() {
            tracing::info!(
                "Restored offline wallet from {} (version {:#x})",
                store.path().display(),
                snapshot.version
            );
            let restored_history = snapshot.restored_history();
            network = snapshot.network;
            initialized = snapshot.initialized;
            password = snapshot.password;
            state = snapshot.state;
            if !restored_history {
                state.replace_transactions(fixture.transactions.clone())?;
            }
        }

        if state.account_names().is_empty() {
            state.create_account(DEFAULT_ACCOUNT)?;
        }
        state.replace_outputs(fixture.outputs.clone());

        Ok(Self {
            fixture,
            store,
            state,
            network,
            initialized,
            password,
            seed_issued: false,
            session_open: false,
            listening: ListenState::OFFLINE,
            foreign_api_port: None,
            last_save_error: None,
        })
    }

    /// Snapshot file backing this wallet
    pub fn snapshot_path(&self) -> &Path {
        self.store.path()
    }

    /// Network bound by the last successful `open`
    pub fn network(&self) -> Option<NetworkType> {
        self.network
    }

    /// Whether a seed has been committed
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Write the current state to disk
    pub fn save(&self) -> Result<()> {
        let snapshot = WalletSnapshot::new(
            self.network,
            self.initialized,
            &self.password,
            self.state.clone(),
        );
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
                tracing::warn!("Unable to save offline wallet: {}", e);
                self.last_save_error = Some(e.to_string());
            }
        }
    }

    fn current_box_address(&self) -> String {
        let pool = &self.fixture.box_addresses;
        if pool.is_empty() {
            return String::new();
        }
        let idx = self.state.box_address_index() as usize % pool.len();
        pool[idx].clone()
    }

    fn balance_for(&self, selected: usize) -> WalletInfo {
        let s = selected as u64;
        let coins = |n: u64| n.saturating_add(s).saturating_mul(NANO_PER_MWC);
        let total = coins(20);
        let awaiting = coins(2);
        WalletInfo {
            account: self.state.selected_account().unwrap_or_default().to_string(),
            total,
            confirmed: total.saturating_sub(awaiting),
            awaiting_confirmation: awaiting,
            locked: coins(1),
            spendable: coins(17),
        }
    }

    fn check_spendable(&self, amount: u64) -> Result<()> {
        let spendable = self.wallet_balance().spendable;
        if amount > spendable {
            return Err(Error::InsufficientFunds(format!(
                "requested {} nano-MWC, spendable {}",
                amount, spendable
            )));
        }
        Ok(())
    }
}

impl Drop for MockWallet {
    fn drop(&mut self) {
        if let Err(e) = self.save() {
            tracing::warn!("Unable to save offline wallet on shutdown: {}", e);
        }
    }
}

impl Wallet for MockWallet {
    fn open(&mut self, network: NetworkType, password: &str) -> Result<InitWalletStatus> {
        if !self.initialized {
            self.password = Zeroizing::new(password.to_string());
            tracing::info!("Offline wallet not initialized yet");
            return Ok(InitWalletStatus::NeedInit);
        }

        if self.password.as_str() != password {
            tracing::info!("Offline wallet open rejected: wrong password");
            return Ok(InitWalletStatus::WrongPassword);
        }

        self.network = Some(network);
        self.session_open = true;
        tracing::info!("Offline wallet open on {}", network);
        Ok(InitWalletStatus::Ok)
    }

    fn close(&mut self) -> bool {
        if self.session_open {
            tracing::info!("Offline wallet closed");
        }
        self.session_open = false;
        self.listening = ListenState::OFFLINE;
        self.foreign_api_port = None;
        true
    }

    fn init(&mut self) -> Result<Vec<String>> {
        self.seed_issued = true;
        Ok(self.fixture.seed_words.clone())
    }

    fn confirm_new_seed(&mut self) -> Result<()> {
        if !self.seed_issued {
            return Err(Error::NotInitialized("No new seed to confirm".to_string()));
        }
        self.initialized = true;
        self.seed_issued = false;
        tracing::info!("Offline wallet seed confirmed");
        self.persist();
        Ok(())
    }

    fn recover(&mut self, seed: &[String]) -> Result<()> {
        if seed.len() != self.fixture.seed_words.len() {
            return Err(Error::InvalidMnemonic(format!(
                "expected {} words, got {}",
                self.fixture.seed_words.len(),
                seed.len()
            )));
        }
        let matches = seed
            .iter()
            .zip(&self.fixture.seed_words)
            .all(|(given, expected)| given.trim().eq_ignore_ascii_case(expected));
        if !matches {
            return Err(Error::SeedMismatch);
        }

        self.initialized = true;
        tracing::info!("Offline wallet recovered from seed");
        self.persist();
        Ok(())
    }

    fn listening_status(&self) -> ListenState {
        self.listening
    }

    fn start_listening(&mut self, requested: ListenState) -> Result<()> {
        if requested.keybase && !self.fixture.keybase_available {
            return Err(Error::ListenerUnavailable(KEYBASE_NOT_RUNNING.to_string()));
        }
        self.listening = self.listening | requested;
        Ok(())
    }

    fn stop_listening(&mut self, requested: ListenState) -> Result<()> {
        self.listening = self.listening.without(requested);
        Ok(())
    }

    fn mwc_box_address(&self) -> (String, u32) {
        (self.current_box_address(), self.state.box_address_index())
    }

    fn change_mwc_box_address(&mut self, idx: i64) -> Result<()> {
        self.state.set_box_address_index(idx);
        self.persist();
        Ok(())
    }

    fn next_box_address(&mut self) -> Result<()> {
        self.state.advance_box_address();
        self.persist();
        Ok(())
    }

    fn is_foreign_api_running(&self) -> bool {
        self.foreign_api_port.is_some()
    }

    fn start_foreign_api(&mut self, port: u16, _secret: &str) -> Result<()> {
        if port == 0 {
            return Err(Error::ForeignApi("Port 0 is not a valid listening port".to_string()));
        }
        if self.foreign_api_port != Some(port) {
            tracing::info!("Offline foreign API listening on port {}", port);
        }
        self.foreign_api_port = Some(port);
        Ok(())
    }

    fn stop_foreign_api(&mut self) -> Result<()> {
        self.foreign_api_port = None;
        Ok(())
    }

    fn account_list(&self) -> Vec<Account> {
        self.state.accounts()
    }

    fn create_account(&mut self, name: &str) -> Result<()> {
        self.state.create_account(name)?;
        tracing::info!("Created account '{}'", name);
        self.persist();
        Ok(())
    }

    fn switch_account(&mut self, name: &str) -> Result<()> {
        self.state.switch_account(name)?;
        tracing::debug!("Switched to account '{}'", name);
        self.persist();
        Ok(())
    }

    fn check(&mut self) -> Result<()> {
        tracing::info!("Offline wallet check finished, nothing to repair");
        Ok(())
    }

    fn refresh(&mut self) -> Result<()> {
        // a rescan keeps the lock state of outputs it still finds, each known
        // output matched at most once
        let mut known: Vec<&WalletOutput> = self.state.outputs().iter().collect();
        let outputs = self
            .fixture
            .outputs
            .iter()
            .cloned()
            .map(|mut output| {
                if let Some(pos) = known.iter().position(|k| k.commitment == output.commitment) {
                    let previous = known.remove(pos);
                    output.locked = previous.locked;
                    output.status = previous.status;
                }
                output
            })
            .collect();
        self.state.replace_outputs(outputs);
        Ok(())
    }

    fn wallet_config(&self) -> WalletConfig {
        self.state.config().clone()
    }

    fn set_wallet_config(&mut self, config: WalletConfig) -> Result<()> {
        self.state.set_config(config)?;
        self.persist();
        Ok(())
    }

    fn node_status(&self) -> NodeStatus {
        self.fixture.node_status.clone()
    }

    fn wallet_balance(&self) -> WalletInfo {
        self.balance_for(self.state.selected_index())
    }

    fn cancel_transaction(&mut self, tx_id: &str) -> bool {
        if !self.state.cancel_transaction(tx_id) {
            tracing::debug!("Nothing to cancel for transaction {}", tx_id);
            return false;
        }
        self.persist();
        true
    }

    fn generate_transaction_proof(&mut self, tx_idx: i64, output: &Path) -> ProofInfo {
        let tx = match self.state.transaction(tx_idx) {
            Some(tx) => tx,
            None => return ProofInfo::failed(format!("Transaction {} not found", tx_idx)),
        };
        if tx.direction != TxDirection::Send || tx.cancelled {
            return ProofInfo::failed(format!(
                "Transaction {} is not a sent transaction that can be proven",
                tx_idx
            ));
        }

        let proof = ProofDocument::new(
            tx.tx_id.clone(),
            tx.amount,
            self.fixture.proof.from_address.clone(),
            tx.address.clone(),
            self.fixture.proof.output.clone(),
            self.fixture.proof.kernel.clone(),
        );
        match proof.write(output) {
            Ok(()) => proof.info(),
            Err(e) => ProofInfo::failed(e.to_string()),
        }
    }

    fn verify_transaction_proof(&self, proof: &Path) -> ProofInfo {
        match ProofDocument::read(proof) {
            Ok(proof) => proof.info(),
            Err(e) => ProofInfo::failed(e.to_string()),
        }
    }

    fn send_file(&mut self, amount: u64, slate_out: &Path) -> Result<()> {
        validate_amount(amount)?;
        self.check_spendable(amount)?;

        self.state.next_transaction_index()?;

        let slate = SlateDocument::send(amount, self.current_box_address());
        slate.write(slate_out)?;

        let idx = self.state.push_transaction(WalletTransaction::pending(
            TxDirection::Send,
            slate.id.clone(),
            slate_out.display().to_string(),
            amount,
            None,
        ))?;
        tracing::info!("Slate {} written as transaction {}", slate.id, idx);
        self.persist();
        Ok(())
    }

    fn receive_file(&mut self, slate_in: &Path, response_out: &Path) -> Result<()> {
        let slate = SlateDocument::read(slate_in, SlateStage::Send)?;
        self.state.next_transaction_index()?;
        let response = slate.respond(self.current_box_address());
        response.write(response_out)?;

        let idx = self.state.push_transaction(WalletTransaction::pending(
            TxDirection::Receive,
            slate.id.clone(),
            slate.sender.clone(),
            slate.amount,
            None,
        ))?;
        tracing::info!("Slate {} received as transaction {}", slate.id, idx);
        self.persist();
        Ok(())
    }

    fn finalize_file(&mut self, response_in: &Path) -> Result<()> {
        let response = SlateDocument::read(response_in, SlateStage::Response)?;
        let pending = self.state.transactions().iter().any(|t| {
            t.tx_id == response.id && t.direction == TxDirection::Send && !t.cancelled
        });
        if !pending {
            return Err(Error::Slate(format!(
                "No pending send transaction for slate {}",
                response.id
            )));
        }
        tracing::info!("Slate {} finalized", response.id);
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
        self.check_spendable(amount)?;

        let idx = self.state.push_transaction(WalletTransaction::pending(
            TxDirection::Send,
            uuid::Uuid::new_v4().to_string(),
            address,
            amount,
            Some(message.to_string()),
        ))?;
        tracing::info!("Send transaction {} created", idx);
        self.persist();
        Ok(())
    }

    fn outputs(&self) -> Vec<WalletOutput> {
        self.state.outputs().to_vec()
    }

    fn set_output_locked(&mut self, commitment: &str, locked: bool) -> Result<()> {
        self.state.set_output_locked(commitment, locked)
    }

    fn transactions(&self, limit: i32) -> Vec<WalletTransaction> {
        self.state.recent_transactions(limit)
    }

    fn contacts(&self) -> Vec<WalletContact> {
        self.state.contacts().to_vec()
    }

    fn add_contact(&mut self, contact: WalletContact) -> Result<()> {
        // an overwrite is reported as an error but still changes the state
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
        let output = self
            .state
            .output(output_id)
            .ok_or_else(|| Error::OutputNotFound(output_id.to_string()))?;

        let mut key = Sha256::new();
        for word in &self.fixture.seed_words {
            key.update(word.as_bytes());
        }
        let public_key = hex::encode(key.finalize());
        let message_hash = hex::encode(Sha256::digest(hash.as_bytes()));

        let mut signature = Sha256::new();
        signature.update(public_key.as_bytes());
        signature.update(output_id.as_bytes());
        signature.update(message_hash.as_bytes());

        Ok(UtxoSignature {
            amount: output.amount,
            message_hash,
            public_key,
            signature: hex::encode(signature.finalize()),
        })
    }
}
