//! MWC wallet storage
//!
//! Versioned binary snapshot of the wallet state and the file that holds it.
//! Decoding is strict: anything unexpected makes the snapshot unreadable,
//! and an unreadable snapshot is treated exactly like a first run.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
pub mod error;
pub mod file;
pub mod paths;
pub mod records;
pub mod snapshot;

pub use codec::{Record, MAX_ELEMENTS, MAX_STRING_BYTES};
pub use error::{Error, Result};
pub use file::{write_atomic, SnapshotFile, SNAPSHOT_FILE_NAME};
pub use paths::{wallet_base_dir, wallet_data_dir, DATA_DIR_ENV};
pub use snapshot::{
    WalletSnapshot, SNAPSHOT_VERSION, SNAPSHOT_VERSION_BOX_ADDRESS, SNAPSHOT_VERSION_MIN,
    SNAPSHOT_VERSION_SELECTED_ACCOUNT, SNAPSHOT_VERSION_TRANSACTIONS,
};
