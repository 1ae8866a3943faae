//! Node-backed wallet against an in-memory node

use mwc_core::{
    Error, InitWalletStatus, ListenChannel, ListenState, NodeStatus, OutputStatus, ProofInfo,
    Result, TxDirection, UtxoSignature, Wallet, WalletInfo, WalletOutput, WalletTransaction,
};
use mwc_params::{NetworkType, NANO_PER_MWC};
use mwc_storage::{SnapshotFile, SNAPSHOT_FILE_NAME};
use mwc_wallet_service::{generate_seed, NodeClient, NodeWallet, SEED_WORD_COUNT};
use std::collections::HashSet;
use std::fs;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ============================================================================
// In-memory node
// ============================================================================

#[derive(Default)]
struct FakeNode {
    password: Option<String>,
    seed: Option<Vec<String>>,
    accounts: Vec<String>,
    active_account: String,
    listeners: HashSet<ListenChannel>,
    failing_listener: Option<ListenChannel>,
    foreign_api: Option<(String, u16)>,
    transactions: Vec<WalletTransaction>,
    outputs: Vec<WalletOutput>,
    locked: Vec<(String, bool)>,
    checks: usize,
    balance_unavailable: bool,
    calls: Vec<String>,
}

impl FakeNode {
    fn push_tx(&mut self, direction: TxDirection, amount: u64) -> String {
        let tx_id = format!("node-tx-{}", self.transactions.len());
        let mut tx = WalletTransaction::pending(direction, tx_id.clone(), "xd7peer", amount, None);
        tx.idx = self.transactions.len() as i64;
        self.transactions.push(tx);
        tx_id
    }
}

#[derive(Clone, Default)]
struct FakeClient {
    node: Arc<Mutex<FakeNode>>,
}

impl FakeClient {
    fn initialized(password: &str) -> Self {
        let client = Self::default();
        {
            let mut node = client.node.lock().unwrap();
            node.password = Some(password.to_string());
            node.accounts = vec!["default".to_string(), "mining".to_string()];
            node.active_account = "default".to_string();
            node.outputs = vec![WalletOutput {
                commitment: "c0ffee".to_string(),
                height: 10,
                confirmations: 5,
                coinbase: false,
                status: OutputStatus::Confirmed,
                locked: false,
                lock_height: 0,
                amount: 5 * NANO_PER_MWC,
                tx_idx: 0,
            }];
            node.push_tx(TxDirection::Receive, 5 * NANO_PER_MWC);
        }
        client
    }

    fn with<T>(&self, f: impl FnOnce(&mut FakeNode) -> T) -> T {
        let mut node = self.node.lock().unwrap();
        f(&mut node)
    }
}

impl NodeClient for FakeClient {
    fn login(&self, _network: NetworkType, password: &str) -> Result<InitWalletStatus> {
        self.with(|n| {
            Ok(match &n.password {
                None => InitWalletStatus::NeedInit,
                Some(p) if p == password => InitWalletStatus::Ok,
                Some(_) => InitWalletStatus::WrongPassword,
            })
        })
    }

    fn logout(&self) -> Result<()> {
        self.with(|n| n.calls.push("logout".to_string()));
        Ok(())
    }

    fn init_wallet(&self, password: &str, seed: &[String]) -> Result<()> {
        self.with(|n| {
            n.password = Some(password.to_string());
            n.seed = Some(seed.to_vec());
            n.accounts = vec!["default".to_string()];
        });
        Ok(())
    }

    fn recover_wallet(&self, password: &str, seed: &[String]) -> Result<()> {
        self.init_wallet(password, seed)
    }

    fn accounts(&self) -> Result<Vec<String>> {
        Ok(self.with(|n| n.accounts.clone()))
    }

    fn create_account(&self, name: &str) -> Result<()> {
        self.with(|n| {
            n.calls.push(format!("create_account {}", name));
            n.accounts.push(name.to_string());
        });
        Ok(())
    }

    fn switch_account(&self, name: &str) -> Result<()> {
        self.with(|n| n.active_account = name.to_string());
        Ok(())
    }

    fn start_listener(&self, channel: ListenChannel) -> Result<()> {
        self.with(|n| {
            n.calls.push(format!("start {}", channel));
            if n.failing_listener == Some(channel) {
                return Err(Error::Listener(format!("{} unavailable", channel)));
            }
            n.listeners.insert(channel);
            Ok(())
        })
    }

    fn stop_listener(&self, channel: ListenChannel) -> Result<()> {
        self.with(|n| {
            n.calls.push(format!("stop {}", channel));
            n.listeners.remove(&channel);
        });
        Ok(())
    }

    fn box_address(&self, index: u32) -> Result<String> {
        Ok(format!("box-{}", index))
    }

    fn resolve_host(&self, host: &str) -> bool {
        host != "unreachable.example"
    }

    fn start_foreign_api(&self, address: &str, port: u16, _secret: &str) -> Result<()> {
        self.with(|n| n.foreign_api = Some((address.to_string(), port)));
        Ok(())
    }

    fn stop_foreign_api(&self) -> Result<()> {
        self.with(|n| n.foreign_api = None);
        Ok(())
    }

    fn check_repair(&self) -> Result<()> {
        self.with(|n| n.checks += 1);
        Ok(())
    }

    fn node_status(&self) -> Result<NodeStatus> {
        Ok(NodeStatus {
            connections: 8,
            status: "Ready".to_string(),
            height: 100,
            peer_height: 100,
        })
    }

    fn balance(&self, account: &str) -> Result<WalletInfo> {
        if self.with(|n| n.balance_unavailable) {
            return Err(Error::Network("balance service down".to_string()));
        }
        let total = self.with(|n| n.outputs.iter().map(|o| o.amount).sum());
        Ok(WalletInfo {
            account: account.to_string(),
            total,
            confirmed: total,
            awaiting_confirmation: 0,
            locked: 0,
            spendable: total,
        })
    }

    fn transactions(&self, _account: &str) -> Result<Vec<WalletTransaction>> {
        Ok(self.with(|n| n.transactions.clone()))
    }

    fn outputs(&self, _account: &str) -> Result<Vec<WalletOutput>> {
        Ok(self.with(|n| n.outputs.clone()))
    }

    fn init_send(&self, amount: u64, _confirmations: u32, _change: u32) -> Result<String> {
        let id = self.with(|n| n.push_tx(TxDirection::Send, amount));
        Ok(format!("slate:{}", id))
    }

    fn receive(&self, slate: &str) -> Result<String> {
        let id = slate
            .strip_prefix("slate:")
            .ok_or_else(|| Error::Slate("not a slate".to_string()))?;
        self.with(|n| n.push_tx(TxDirection::Receive, NANO_PER_MWC));
        Ok(format!("response:{}", id))
    }

    fn finalize(&self, response: &str) -> Result<()> {
        if !response.starts_with("response:") {
            return Err(Error::Slate("not a response".to_string()));
        }
        Ok(())
    }

    fn send(
        &self,
        amount: u64,
        _address: &str,
        _message: Option<&str>,
        _confirmations: u32,
        _change: u32,
    ) -> Result<String> {
        Ok(self.with(|n| n.push_tx(TxDirection::Send, amount)))
    }

    fn cancel(&self, tx_id: &str) -> Result<()> {
        self.with(|n| {
            for tx in n.transactions.iter_mut().filter(|t| t.tx_id == tx_id) {
                tx.cancelled = true;
            }
        });
        Ok(())
    }

    fn generate_proof(&self, tx_idx: i64) -> Result<(ProofInfo, String)> {
        Ok((proof_info(), format!("proof-{}", tx_idx)))
    }

    fn verify_proof(&self, proof: &str) -> Result<ProofInfo> {
        if proof.starts_with("proof-") {
            Ok(proof_info())
        } else {
            Err(Error::Proof("unknown proof".to_string()))
        }
    }

    fn lock_output(&self, commitment: &str, locked: bool) -> Result<()> {
        self.with(|n| n.locked.push((commitment.to_string(), locked)));
        Ok(())
    }

    fn sign_utxo(&self, output_id: &str, hash: &str) -> Result<UtxoSignature> {
        Ok(UtxoSignature {
            amount: 5 * NANO_PER_MWC,
            message_hash: hash.to_string(),
            public_key: "pk".to_string(),
            signature: format!("sig-{}", output_id),
        })
    }
}

fn proof_info() -> ProofInfo {
    ProofInfo::Verified {
        amount: NANO_PER_MWC,
        from_address: "from".to_string(),
        to_address: "to".to_string(),
        output: "output".to_string(),
        kernel: "kernel".to_string(),
    }
}

fn open_wallet(dir: &TempDir) -> (NodeWallet<FakeClient>, FakeClient) {
    let client = FakeClient::initialized("pw");
    let mut wallet = NodeWallet::new(client.clone(), dir.path());
    assert_eq!(
        wallet.open(NetworkType::Mainnet, "pw").unwrap(),
        InitWalletStatus::Ok
    );
    (wallet, client)
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_new_wallet_commits_generated_seed() {
    let dir = TempDir::new().unwrap();
    let client = FakeClient::default();
    let mut wallet = NodeWallet::new(client.clone(), dir.path());

    assert_eq!(
        wallet.open(NetworkType::Floonet, "pw").unwrap(),
        InitWalletStatus::NeedInit
    );
    let words = wallet.init().unwrap();
    assert_eq!(words.len(), SEED_WORD_COUNT);
    assert!(client.with(|n| n.seed.is_none()));

    wallet.confirm_new_seed().unwrap();
    assert_eq!(client.with(|n| n.seed.clone()), Some(words));
    assert!(matches!(
        wallet.confirm_new_seed(),
        Err(Error::NotInitialized(_))
    ));
}

#[test]
fn test_snapshot_never_holds_password() {
    let dir = TempDir::new().unwrap();
    {
        let (mut wallet, _client) = open_wallet(&dir);
        wallet.create_account("savings").unwrap();
    }
    let snapshot = SnapshotFile::new(dir.path()).load().unwrap();
    assert!(snapshot.password.is_empty());
    assert!(snapshot.initialized);
    assert_eq!(snapshot.network, Some(NetworkType::Mainnet));
}

#[test]
fn test_open_refreshes_from_node() {
    let dir = TempDir::new().unwrap();
    let (wallet, _client) = open_wallet(&dir);

    let names: Vec<String> = wallet.account_list().into_iter().map(|a| a.name).collect();
    assert_eq!(names, vec!["default".to_string(), "mining".to_string()]);
    assert_eq!(wallet.node_status().connections, 8);
    assert_eq!(wallet.mwc_box_address(), ("box-0".to_string(), 0));
    assert_eq!(wallet.wallet_balance().spendable, 5 * NANO_PER_MWC);
    assert_eq!(wallet.transactions(0).len(), 1);
    assert_eq!(wallet.outputs().len(), 1);
}

#[test]
fn test_wrong_password() {
    let dir = TempDir::new().unwrap();
    let mut wallet = NodeWallet::new(FakeClient::initialized("pw"), dir.path());
    assert_eq!(
        wallet.open(NetworkType::Mainnet, "nope").unwrap(),
        InitWalletStatus::WrongPassword
    );
    // nothing was pulled from the node
    assert_eq!(wallet.node_status(), NodeStatus::offline());
}

#[test]
fn test_recover_validates_phrase_first() {
    let dir = TempDir::new().unwrap();
    let client = FakeClient::default();
    let mut wallet = NodeWallet::new(client.clone(), dir.path());
    wallet.open(NetworkType::Floonet, "pw").unwrap();

    let bad = vec!["notaword".to_string(); SEED_WORD_COUNT];
    assert!(matches!(
        wallet.recover(&bad),
        Err(Error::InvalidMnemonic(_))
    ));
    assert!(client.with(|n| n.seed.is_none()));

    let good = generate_seed().unwrap().to_vec();
    wallet.recover(&good).unwrap();
    assert_eq!(client.with(|n| n.seed.clone()), Some(good));
}

#[test]
fn test_close_stops_everything() {
    let dir = TempDir::new().unwrap();
    let (mut wallet, client) = open_wallet(&dir);
    wallet.start_listening(ListenState::MWC_BOX).unwrap();
    wallet.start_foreign_api(3415, "secret").unwrap();

    assert!(wallet.close());
    assert!(wallet.listening_status().is_empty());
    assert!(!wallet.is_foreign_api_running());
    assert!(client.with(|n| n.listeners.is_empty() && n.foreign_api.is_none()));

    // closed wallets don't pull from the node
    client.with(|n| n.push_tx(TxDirection::Receive, NANO_PER_MWC));
    wallet.refresh().unwrap();
    assert_eq!(wallet.transactions(0).len(), 1);
}

// ============================================================================
// Listeners & foreign API
// ============================================================================

#[test]
fn test_listener_failure_rolls_back() {
    let dir = TempDir::new().unwrap();
    let (mut wallet, client) = open_wallet(&dir);
    client.with(|n| n.failing_listener = Some(ListenChannel::Keybase));

    assert!(wallet
        .start_listening(ListenState::MWC_BOX | ListenState::KEYBASE)
        .is_err());
    assert!(wallet.listening_status().is_empty());
    assert!(client.with(|n| n.listeners.is_empty()));
    let calls = client.with(|n| n.calls.clone());
    assert!(calls.contains(&"stop MWC MQS".to_string()));

    wallet.start_listening(ListenState::MWC_BOX).unwrap();
    assert_eq!(wallet.listening_status(), ListenState::MWC_BOX);
}

#[test]
fn test_listening_skips_active_channels() {
    let dir = TempDir::new().unwrap();
    let (mut wallet, client) = open_wallet(&dir);
    wallet.start_listening(ListenState::MWC_BOX).unwrap();
    wallet.start_listening(ListenState::MWC_BOX).unwrap();
    wallet.start_listening(ListenState::OFFLINE).unwrap();
    let starts = client.with(|n| n.calls.iter().filter(|c| c.starts_with("start")).count());
    assert_eq!(starts, 1);

    wallet.stop_listening(ListenState::KEYBASE).unwrap();
    assert_eq!(wallet.listening_status(), ListenState::MWC_BOX);
    wallet.stop_listening(ListenState::MWC_BOX).unwrap();
    assert!(wallet.listening_status().is_empty());
}

#[test]
fn test_foreign_api_uses_configured_host() {
    let dir = TempDir::new().unwrap();
    let (mut wallet, client) = open_wallet(&dir);
    assert!(wallet.start_foreign_api(0, "s").is_err());
    wallet.start_foreign_api(3415, "s").unwrap();
    wallet.start_foreign_api(3415, "s").unwrap();
    assert_eq!(
        client.with(|n| n.foreign_api.clone()),
        Some(("127.0.0.1".to_string(), 3415))
    );
    wallet.stop_foreign_api().unwrap();
    assert!(!wallet.is_foreign_api_running());
}

// ============================================================================
// Accounts, config, addresses
// ============================================================================

#[test]
fn test_account_changes_go_through_node() {
    let dir = TempDir::new().unwrap();
    let (mut wallet, client) = open_wallet(&dir);

    wallet.create_account("savings").unwrap();
    assert!(matches!(
        wallet.create_account("savings"),
        Err(Error::AccountExists(_))
    ));
    let creates = client.with(|n| {
        n.calls
            .iter()
            .filter(|c| c.starts_with("create_account"))
            .count()
    });
    assert_eq!(creates, 1);

    wallet.switch_account("savings").unwrap();
    assert_eq!(client.with(|n| n.active_account.clone()), "savings");
    assert!(wallet.switch_account("ghost").is_err());
    assert_eq!(client.with(|n| n.active_account.clone()), "savings");
    assert_eq!(wallet.wallet_balance().account, "savings");
}

#[test]
fn test_unreachable_mqs_host_rejected() {
    let dir = TempDir::new().unwrap();
    let (mut wallet, _client) = open_wallet(&dir);
    let mut config = wallet.wallet_config();
    config.mqs_domain = "unreachable.example".to_string();
    assert!(matches!(
        wallet.set_wallet_config(config.clone()),
        Err(Error::UnreachableHost(_))
    ));

    config.mqs_domain = "mqs.example".to_string();
    wallet.set_wallet_config(config.clone()).unwrap();
    assert_eq!(wallet.wallet_config(), config);
}

#[test]
fn test_box_address_from_node() {
    let dir = TempDir::new().unwrap();
    let (mut wallet, _client) = open_wallet(&dir);
    wallet.next_box_address().unwrap();
    assert_eq!(wallet.mwc_box_address(), ("box-1".to_string(), 1));
    wallet.change_mwc_box_address(-1).unwrap();
    assert_eq!(wallet.mwc_box_address(), ("box-0".to_string(), 0));
}

// ============================================================================
// Transactions & files
// ============================================================================

#[test]
fn test_send_to_shows_after_refresh() {
    let dir = TempDir::new().unwrap();
    let (mut wallet, _client) = open_wallet(&dir);
    assert!(wallet.send_to(NANO_PER_MWC, "", "", 10, 1).is_err());

    wallet.send_to(NANO_PER_MWC, "xd7peer", "hi", 10, 1).unwrap();
    let txs = wallet.transactions(0);
    assert_eq!(txs.len(), 2);
    assert_eq!(txs[0].direction, TxDirection::Send);
    assert_eq!(txs[0].idx, 1);
}

#[test]
fn test_slate_files() {
    let dir = TempDir::new().unwrap();
    let files = TempDir::new().unwrap();
    let (mut wallet, _client) = open_wallet(&dir);
    let slate = files.path().join("out.tx");
    let response = files.path().join("out.tx.response");

    wallet.send_file(NANO_PER_MWC, &slate).unwrap();
    assert!(fs::read_to_string(&slate).unwrap().starts_with("slate:"));
    wallet.receive_file(&slate, &response).unwrap();
    wallet.finalize_file(&response).unwrap();
    assert_eq!(wallet.transactions(0).len(), 3);

    let junk = files.path().join("junk.tx");
    let junk_response = files.path().join("junk.tx.response");
    fs::write(&junk, "garbage").unwrap();
    assert!(wallet.receive_file(&junk, &junk_response).is_err());
    assert!(!junk_response.exists());
    assert!(wallet.finalize_file(&junk).is_err());
}

#[test]
fn test_cancel_through_node() {
    let dir = TempDir::new().unwrap();
    let (mut wallet, client) = open_wallet(&dir);
    wallet.send_to(NANO_PER_MWC, "xd7peer", "", 10, 1).unwrap();
    let tx_id = wallet.transactions(1)[0].tx_id.clone();

    assert!(wallet.cancel_transaction(&tx_id));
    assert!(wallet.transactions(1)[0].cancelled);
    assert!(client.with(|n| n.transactions.iter().any(|t| t.tx_id == tx_id && t.cancelled)));
    assert!(!wallet.cancel_transaction(&tx_id));
    assert!(!wallet.cancel_transaction("unknown"));
}

#[test]
fn test_proofs_through_node() {
    let dir = TempDir::new().unwrap();
    let files = TempDir::new().unwrap();
    let (mut wallet, _client) = open_wallet(&dir);
    let path = files.path().join("tx.proof");

    assert!(wallet.generate_transaction_proof(0, &path).is_verified());
    assert!(wallet.verify_transaction_proof(&path).is_verified());
    assert!(!wallet
        .generate_transaction_proof(42, &files.path().join("x.proof"))
        .is_verified());

    fs::write(&path, "tampered").unwrap();
    assert!(matches!(
        wallet.verify_transaction_proof(&path),
        ProofInfo::Failed { .. }
    ));
}

#[test]
fn test_output_lock_and_sign() {
    let dir = TempDir::new().unwrap();
    let (mut wallet, client) = open_wallet(&dir);
    assert!(matches!(
        wallet.set_output_locked("c0ffee", true),
        Err(Error::OutputLockingDisabled)
    ));
    assert!(client.with(|n| n.locked.is_empty()));

    let mut config = wallet.wallet_config();
    config.output_locking_enabled = true;
    wallet.set_wallet_config(config).unwrap();
    wallet.set_output_locked("c0ffee", true).unwrap();
    assert_eq!(wallet.outputs()[0].status, OutputStatus::Locked);
    assert_eq!(
        client.with(|n| n.locked.clone()),
        vec![("c0ffee".to_string(), true)]
    );

    let signature = wallet.sign_utxo("c0ffee", "hash").unwrap();
    assert_eq!(signature.signature, "sig-c0ffee");
}

#[test]
fn test_check_runs_repair_then_refresh() {
    let dir = TempDir::new().unwrap();
    let (mut wallet, client) = open_wallet(&dir);
    client.with(|n| n.push_tx(TxDirection::Receive, NANO_PER_MWC));
    wallet.check().unwrap();
    assert_eq!(client.with(|n| n.checks), 1);
    assert_eq!(wallet.transactions(0).len(), 2);
}

// ============================================================================
// Failures after the node accepted a change
// ============================================================================

#[test]
fn test_send_succeeds_when_refresh_fails() {
    let dir = TempDir::new().unwrap();
    let files = TempDir::new().unwrap();
    let (mut wallet, client) = open_wallet(&dir);
    client.with(|n| n.balance_unavailable = true);

    wallet.send_to(NANO_PER_MWC, "xd7peer", "", 10, 1).unwrap();
    assert_eq!(client.with(|n| n.transactions.len()), 2);
    // local view stays as it was until a refresh gets through
    assert_eq!(wallet.transactions(0).len(), 1);
    assert_eq!(wallet.wallet_balance().spendable, 5 * NANO_PER_MWC);

    let slate = files.path().join("out.tx");
    wallet.send_file(NANO_PER_MWC, &slate).unwrap();
    assert!(slate.exists());
    assert_eq!(client.with(|n| n.transactions.len()), 3);

    assert!(wallet.refresh().is_err());
    client.with(|n| n.balance_unavailable = false);
    wallet.refresh().unwrap();
    assert_eq!(wallet.transactions(0).len(), 3);
}

#[test]
fn test_unwritable_snapshot_does_not_fail_operations() {
    let dir = TempDir::new().unwrap();
    let files = TempDir::new().unwrap();
    let (mut wallet, client) = open_wallet(&dir);
    let snapshot = dir.path().join(SNAPSHOT_FILE_NAME);
    fs::remove_file(&snapshot).unwrap();
    fs::create_dir(&snapshot).unwrap();

    wallet.send_to(NANO_PER_MWC, "xd7peer", "", 10, 1).unwrap();
    assert_eq!(client.with(|n| n.transactions.len()), 2);
    assert_eq!(wallet.transactions(0).len(), 2);
    assert!(wallet.last_save_error().is_some());

    let slate = files.path().join("out.tx");
    wallet.send_file(NANO_PER_MWC, &slate).unwrap();
    assert!(slate.exists());

    wallet.create_account("savings").unwrap();
    assert!(matches!(
        wallet.create_account("savings"),
        Err(Error::AccountExists(_))
    ));
    wallet.switch_account("savings").unwrap();
    wallet.next_box_address().unwrap();

    fs::remove_dir(&snapshot).unwrap();
    wallet.change_mwc_box_address(0).unwrap();
    assert!(wallet.last_save_error().is_none());
}

#[test]
fn test_refresh_rejects_shared_indices() {
    let dir = TempDir::new().unwrap();
    let (mut wallet, client) = open_wallet(&dir);
    client.with(|n| {
        let mut twin = n.transactions[0].clone();
        twin.tx_id = "twin".to_string();
        n.transactions.push(twin);
    });

    assert!(matches!(
        wallet.refresh(),
        Err(Error::InvalidTransaction(_))
    ));
    let txs = wallet.transactions(0);
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].tx_id, "node-tx-0");
}
