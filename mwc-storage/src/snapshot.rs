//! Wallet snapshot format
//!
//! A snapshot is one big-endian stream:
//!
//! ```text
//! u32     version
//! string  network name (empty = not bound yet)
//! u8      initialized
//! string  password (empty for wallets that never persist credentials)
//! u32     account count, then one string per account
//! u32     selected account index           (0x57668+)
//! record  config
//! u32     contact count, then contact records
//! u32     box address index                (0x57669+)
//! u32     transaction count, then records  (0x5766A+)
//! ```
//!
//! Fields introduced by a later version take their defaults when an older
//! snapshot is read. The encoder always writes [`SNAPSHOT_VERSION`].

use crate::codec::{
    read_bool, read_count, read_records, read_string, read_u32, write_bool, write_count,
    write_records, write_string, write_u32, Record,
};
use crate::{Error, Result};
use mwc_core::{WalletConfig, WalletState, WalletTransaction};
use mwc_params::NetworkType;
use std::fmt;
use std::io::{Cursor, Read};
use zeroize::Zeroizing;

/// First readable snapshot version
pub const SNAPSHOT_VERSION_MIN: u32 = 0x57667;

/// Version that added the selected account index
pub const SNAPSHOT_VERSION_SELECTED_ACCOUNT: u32 = 0x57668;

/// Version that added the box address index
pub const SNAPSHOT_VERSION_BOX_ADDRESS: u32 = 0x57669;

/// Version that added transaction history
pub const SNAPSHOT_VERSION_TRANSACTIONS: u32 = 0x5766A;

/// Version written by [`WalletSnapshot::encode`]
pub const SNAPSHOT_VERSION: u32 = SNAPSHOT_VERSION_TRANSACTIONS;

/// Everything a wallet persists between runs
#[derive(Clone, PartialEq)]
pub struct WalletSnapshot {
    /// Version the snapshot was read from (or will be written as)
    pub version: u32,
    /// Network the wallet was opened on
    pub network: Option<NetworkType>,
    /// Whether a seed has been committed
    pub initialized: bool,
    /// Stored password; empty when the backend keeps no credentials
    pub password: Zeroizing<String>,
    /// Accounts, contacts, config, address index and transactions
    pub state: WalletState,
}

impl fmt::Debug for WalletSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletSnapshot")
            .field("version", &self.version)
            .field("network", &self.network)
            .field("initialized", &self.initialized)
            .field("password", &"<redacted>")
            .field("state", &self.state)
            .finish()
    }
}

impl WalletSnapshot {
    /// Snapshot of a state at the current version
    pub fn new(
        network: Option<NetworkType>,
        initialized: bool,
        password: &str,
        state: WalletState,
    ) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            network,
            initialized,
            password: Zeroizing::new(password.to_string()),
            state,
        }
    }

    /// Whether transaction history came from the snapshot.
    ///
    /// Older versions carry none, so the caller keeps its own defaults.
    pub fn restored_history(&self) -> bool {
        self.version >= SNAPSHOT_VERSION_TRANSACTIONS
    }

    /// Serialize at [`SNAPSHOT_VERSION`]
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let state = &self.state;

        write_u32(&mut buf, SNAPSHOT_VERSION)?;
        write_string(&mut buf, self.network.map_or("", |n| n.name()))?;
        write_bool(&mut buf, self.initialized)?;
        write_string(&mut buf, &self.password)?;

        write_count(&mut buf, state.account_names().len())?;
        for name in state.account_names() {
            write_string(&mut buf, name)?;
        }
        write_u32(&mut buf, state.selected_index() as u32)?;

        state.config().encode(&mut buf)?;
        write_records(&mut buf, state.contacts())?;
        write_u32(&mut buf, state.box_address_index())?;
        write_records(&mut buf, state.transactions())?;

        Ok(buf)
    }

    /// Parse any supported version
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut reader = Cursor::new(bytes);

        let version = read_u32(&mut reader, "version")?;
        if !(SNAPSHOT_VERSION_MIN..=SNAPSHOT_VERSION).contains(&version) {
            return Err(Error::UnsupportedVersion(version));
        }

        let network_name = read_string(&mut reader, "network")?;
        let network = if network_name.is_empty() {
            None
        } else {
            Some(
                network_name
                    .parse::<NetworkType>()
                    .map_err(|e| Error::Corrupt(e.to_string()))?,
            )
        };
        let initialized = read_bool(&mut reader, "initialized flag")?;
        let password = Zeroizing::new(read_string(&mut reader, "password")?);

        let account_count = read_count(&mut reader, "account count")?;
        let mut accounts = Vec::with_capacity(account_count);
        for _ in 0..account_count {
            accounts.push(read_string(&mut reader, "account name")?);
        }

        let selected = if version >= SNAPSHOT_VERSION_SELECTED_ACCOUNT {
            read_u32(&mut reader, "selected account")? as usize
        } else {
            0
        };

        let config = WalletConfig::decode(&mut reader)?;
        let contacts = read_records(&mut reader, "contact count")?;

        let box_address_index = if version >= SNAPSHOT_VERSION_BOX_ADDRESS {
            read_u32(&mut reader, "box address index")?
        } else {
            0
        };

        let transactions: Vec<WalletTransaction> = if version >= SNAPSHOT_VERSION_TRANSACTIONS {
            read_records(&mut reader, "transaction count")?
        } else {
            Vec::new()
        };

        let mut rest = Vec::new();
        reader.read_to_end(&mut rest)?;
        if !rest.is_empty() {
            return Err(Error::Corrupt(format!("{} trailing bytes", rest.len())));
        }

        let mut state =
            WalletState::from_parts(accounts, selected, contacts, config, box_address_index)
                .map_err(|e| Error::Corrupt(e.to_string()))?;
        state
            .replace_transactions(transactions)
            .map_err(|e| Error::Corrupt(e.to_string()))?;

        Ok(Self {
            version,
            network,
            initialized,
            password,
            state,
        })
    }
}
