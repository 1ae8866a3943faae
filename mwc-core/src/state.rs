//! In-memory wallet state
//!
//! Holds accounts, contacts, transactions, outputs and configuration, and is
//! the only place their invariants are enforced:
//!
//! - account names are unique and the selected index is always valid once
//!   any account exists; accounts are never removed
//! - contact names are unique; insertion order is kept, upserts rewrite in place
//! - transaction indices are strictly increasing; cancellation only marks

use crate::config::WalletConfig;
use crate::models::{Account, OutputStatus, WalletContact, WalletOutput, WalletTransaction};
use crate::{Error, Result};
use std::collections::HashSet;

/// Name of the account every new wallet starts with
pub const DEFAULT_ACCOUNT: &str = "default";

/// Wallet state store
#[derive(Debug, Clone, PartialEq)]
pub struct WalletState {
    accounts: Vec<String>,
    selected_account: usize,
    contacts: Vec<WalletContact>,
    transactions: Vec<WalletTransaction>,
    outputs: Vec<WalletOutput>,
    config: WalletConfig,
    box_address_index: u32,
}

impl Default for WalletState {
    fn default() -> Self {
        Self::new()
    }
}

impl WalletState {
    /// Fresh state with only the default account
    pub fn new() -> Self {
        Self {
            accounts: vec![DEFAULT_ACCOUNT.to_string()],
            selected_account: 0,
            contacts: Vec::new(),
            transactions: Vec::new(),
            outputs: Vec::new(),
            config: WalletConfig::default(),
            box_address_index: 0,
        }
    }

    /// Rebuild the persisted part of a state, checking every invariant
    pub fn from_parts(
        accounts: Vec<String>,
        selected_account: usize,
        contacts: Vec<WalletContact>,
        config: WalletConfig,
        box_address_index: u32,
    ) -> Result<Self> {
        let mut names = HashSet::with_capacity(accounts.len());
        for account in &accounts {
            validate_account_name(account)?;
            if !names.insert(account.as_str()) {
                return Err(Error::AccountExists(account.clone()));
            }
        }
        if !accounts.is_empty() && selected_account >= accounts.len() {
            return Err(Error::AccountNotFound(format!(
                "selected index {} of {} accounts",
                selected_account,
                accounts.len()
            )));
        }
        if accounts.is_empty() && selected_account != 0 {
            return Err(Error::AccountNotFound(format!(
                "selected index {} with no accounts",
                selected_account
            )));
        }

        let mut contact_names = HashSet::with_capacity(contacts.len());
        for contact in &contacts {
            if !contact_names.insert(contact.name.as_str()) {
                return Err(Error::ContactExists(contact.name.clone()));
            }
        }

        Ok(Self {
            accounts,
            selected_account,
            contacts,
            transactions: Vec::new(),
            outputs: Vec::new(),
            config,
            box_address_index,
        })
    }

    // ---------------------------------------------------------------------
    // Accounts
    // ---------------------------------------------------------------------

    /// Accounts with their selection flag
    pub fn accounts(&self) -> Vec<Account> {
        self.accounts
            .iter()
            .enumerate()
            .map(|(i, name)| Account {
                name: name.clone(),
                selected: i == self.selected_account,
            })
            .collect()
    }

    /// Account names in creation order
    pub fn account_names(&self) -> &[String] {
        &self.accounts
    }

    /// Index of the selected account
    pub fn selected_index(&self) -> usize {
        self.selected_account
    }

    /// Name of the selected account
    pub fn selected_account(&self) -> Option<&str> {
        self.accounts.get(self.selected_account).map(String::as_str)
    }

    /// Create an account; names are unique and accounts are never deleted
    pub fn create_account(&mut self, name: &str) -> Result<()> {
        validate_account_name(name)?;
        if self.accounts.iter().any(|a| a == name) {
            return Err(Error::AccountExists(name.to_string()));
        }
        self.accounts.push(name.to_string());
        Ok(())
    }

    /// Select an existing account
    pub fn switch_account(&mut self, name: &str) -> Result<()> {
        let idx = self
            .accounts
            .iter()
            .position(|a| a == name)
            .ok_or_else(|| Error::AccountNotFound(name.to_string()))?;
        self.selected_account = idx;
        Ok(())
    }

    /// Replace the account list with the node's view, keeping the selection by name
    pub fn replace_accounts(&mut self, accounts: Vec<String>) -> Result<()> {
        let selected = self.selected_account().map(str::to_string);
        let state = Self::from_parts(accounts, 0, Vec::new(), WalletConfig::default(), 0)?;
        self.accounts = state.accounts;
        self.selected_account = selected
            .and_then(|name| self.accounts.iter().position(|a| *a == name))
            .unwrap_or(0);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Contacts
    // ---------------------------------------------------------------------

    /// Contacts in insertion order
    pub fn contacts(&self) -> &[WalletContact] {
        &self.contacts
    }

    /// Insert a contact or overwrite the one with the same name.
    ///
    /// Overwriting still applies the new address but reports
    /// [`Error::ContactExists`], so the caller can tell an update from an insert.
    pub fn upsert_contact(&mut self, contact: WalletContact) -> Result<()> {
        if contact.name.trim().is_empty() {
            return Err(Error::InvalidContact(
                "Please specify a name for your contact".to_string(),
            ));
        }
        if contact.address.trim().is_empty() {
            return Err(Error::InvalidContact(
                "Please specify an address for your contact".to_string(),
            ));
        }

        if let Some(existing) = self.contacts.iter_mut().find(|c| c.name == contact.name) {
            let name = contact.name.clone();
            *existing = contact;
            return Err(Error::ContactExists(name));
        }
        self.contacts.push(contact);
        Ok(())
    }

    /// Remove a contact by name
    pub fn delete_contact(&mut self, name: &str) -> Result<()> {
        let idx = self
            .contacts
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| Error::ContactNotFound(name.to_string()))?;
        self.contacts.remove(idx);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Transactions
    // ---------------------------------------------------------------------

    /// All transactions, ascending by index
    pub fn transactions(&self) -> &[WalletTransaction] {
        &self.transactions
    }

    /// Newest first; `limit <= 0` returns everything
    pub fn recent_transactions(&self, limit: i32) -> Vec<WalletTransaction> {
        let iter = self.transactions.iter().rev().cloned();
        if limit > 0 {
            iter.take(limit as usize).collect()
        } else {
            iter.collect()
        }
    }

    /// Index the next transaction will receive
    pub fn next_transaction_index(&self) -> Result<i64> {
        match self.transactions.iter().map(|t| t.idx).max() {
            None => Ok(0),
            Some(max) => max.checked_add(1).ok_or_else(|| {
                Error::InvalidTransaction(format!("no index left after {}", max))
            }),
        }
    }

    /// Append a transaction, assigning it the next index. Returns the index.
    pub fn push_transaction(&mut self, mut tx: WalletTransaction) -> Result<i64> {
        tx.idx = self.next_transaction_index()?;
        let idx = tx.idx;
        self.transactions.push(tx);
        Ok(idx)
    }

    /// Replace history (restored snapshot or node refresh), ordered by index.
    /// Two entries sharing an index are rejected and the old history is kept.
    pub fn replace_transactions(&mut self, mut transactions: Vec<WalletTransaction>) -> Result<()> {
        transactions.sort_by_key(|t| t.idx);
        if let Some(pair) = transactions.windows(2).find(|w| w[0].idx == w[1].idx) {
            return Err(Error::InvalidTransaction(format!(
                "index {} used twice",
                pair[0].idx
            )));
        }
        self.transactions = transactions;
        Ok(())
    }

    /// Look up a transaction by index
    pub fn transaction(&self, idx: i64) -> Option<&WalletTransaction> {
        self.transactions.iter().find(|t| t.idx == idx)
    }

    /// Look up a transaction by slate id
    pub fn transaction_by_id(&self, tx_id: &str) -> Option<&WalletTransaction> {
        self.transactions.iter().find(|t| t.tx_id == tx_id)
    }

    /// Mark every cancellable transaction with this id as cancelled.
    /// Returns false when nothing could be cancelled.
    pub fn cancel_transaction(&mut self, tx_id: &str) -> bool {
        let mut cancelled = false;
        for tx in self
            .transactions
            .iter_mut()
            .filter(|t| t.tx_id == tx_id && t.can_cancel())
        {
            tx.cancelled = true;
            cancelled = true;
        }
        cancelled
    }

    // ---------------------------------------------------------------------
    // Outputs
    // ---------------------------------------------------------------------

    /// Outputs as last reported by chain scanning
    pub fn outputs(&self) -> &[WalletOutput] {
        &self.outputs
    }

    /// Look up an output by commitment
    pub fn output(&self, commitment: &str) -> Option<&WalletOutput> {
        self.outputs.iter().find(|o| o.commitment == commitment)
    }

    /// Replace the output set
    pub fn replace_outputs(&mut self, outputs: Vec<WalletOutput>) {
        self.outputs = outputs;
    }

    /// Lock or unlock an output (needs output locking enabled)
    pub fn set_output_locked(&mut self, commitment: &str, locked: bool) -> Result<()> {
        if !self.config.output_locking_enabled {
            return Err(Error::OutputLockingDisabled);
        }
        let output = self
            .outputs
            .iter_mut()
            .find(|o| o.commitment == commitment)
            .ok_or_else(|| Error::OutputNotFound(commitment.to_string()))?;
        if output.status == OutputStatus::Spent {
            return Err(Error::Other(format!("Output {} is already spent", commitment)));
        }

        output.locked = locked;
        output.status = if locked {
            OutputStatus::Locked
        } else if output.confirmations > 0 {
            OutputStatus::Confirmed
        } else {
            OutputStatus::Unconfirmed
        };
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Configuration & addresses
    // ---------------------------------------------------------------------

    /// Current configuration
    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    /// Replace the configuration after validating it
    pub fn set_config(&mut self, config: WalletConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Receive-address rotation index
    pub fn box_address_index(&self) -> u32 {
        self.box_address_index
    }

    /// Set the rotation index; negative values clamp to zero
    pub fn set_box_address_index(&mut self, idx: i64) {
        self.box_address_index = idx.clamp(0, i64::from(u32::MAX)) as u32;
    }

    /// Move to the next receive address
    pub fn advance_box_address(&mut self) {
        self.box_address_index = self.box_address_index.wrapping_add(1);
    }
}

fn validate_account_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidAccountName(
            "account name can't be empty".to_string(),
        ));
    }
    Ok(())
}
