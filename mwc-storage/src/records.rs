//! Versioned sub-formats for the records embedded in a snapshot
//!
//! Each record starts with its own `u32` version tag so it can evolve
//! independently of the snapshot that contains it.

use crate::codec::{
    read_bool, read_i64, read_opt_string, read_string, read_u32, read_u64, read_u8, write_bool,
    write_i64, write_opt_string, write_string, write_u32, write_u64, write_u8, Record,
};
use crate::{Error, Result};
use mwc_core::{TxDirection, WalletConfig, WalletContact, WalletTransaction};
use std::io::{Read, Write};

/// Contact sub-format version
pub const CONTACT_VERSION: u32 = 1;

/// Oldest readable configuration sub-format
pub const CONFIG_VERSION_MIN: u32 = 1;

/// Configuration sub-format adding output locking, logout timeout and foreign API settings
pub const CONFIG_VERSION_FOREIGN_API: u32 = 2;

/// Current configuration sub-format
pub const CONFIG_VERSION: u32 = CONFIG_VERSION_FOREIGN_API;

/// Transaction sub-format version
pub const TRANSACTION_VERSION: u32 = 1;

const LOGOUT_NEVER: i64 = -1;

fn check_version(what: &str, version: u32, min: u32, max: u32) -> Result<()> {
    if version < min || version > max {
        return Err(Error::Corrupt(format!(
            "{} record version {} outside {}..={}",
            what, version, min, max
        )));
    }
    Ok(())
}

impl Record for WalletContact {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_u32(writer, CONTACT_VERSION)?;
        write_string(writer, &self.name)?;
        write_string(writer, &self.address)
    }

    fn decode<R: Read>(reader: &mut R) -> Result<Self> {
        let version = read_u32(reader, "contact version")?;
        check_version("contact", version, CONTACT_VERSION, CONTACT_VERSION)?;
        Ok(WalletContact {
            name: read_string(reader, "contact name")?,
            address: read_string(reader, "contact address")?,
        })
    }
}

impl Record for WalletConfig {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_u32(writer, CONFIG_VERSION)?;

        write_string(writer, &self.data_path)?;
        write_string(writer, &self.mqs_domain)?;
        write_string(writer, &self.node_url)?;
        write_u32(writer, self.input_confirmations)?;
        write_u32(writer, self.change_outputs)?;
        write_bool(writer, self.logs_enabled)?;
        write_bool(writer, self.auto_start_mqs)?;
        write_bool(writer, self.auto_start_tor)?;
        write_bool(writer, self.notifications_enabled)?;
        write_u64(writer, self.gui_scale.to_bits())?;

        write_bool(writer, self.lock_later)?;
        write_bool(writer, self.output_locking_enabled)?;
        write_i64(
            writer,
            self.logout_timeout_secs.map_or(LOGOUT_NEVER, i64::from),
        )?;
        write_string(writer, &self.foreign_api_address)?;
        write_string(writer, &self.foreign_api_secret)
    }

    fn decode<R: Read>(reader: &mut R) -> Result<Self> {
        let version = read_u32(reader, "config version")?;
        check_version("config", version, CONFIG_VERSION_MIN, CONFIG_VERSION)?;

        let mut config = WalletConfig {
            data_path: read_string(reader, "config data path")?,
            mqs_domain: read_string(reader, "config mqs domain")?,
            node_url: read_string(reader, "config node url")?,
            input_confirmations: read_u32(reader, "config input confirmations")?,
            change_outputs: read_u32(reader, "config change outputs")?,
            logs_enabled: read_bool(reader, "config logs enabled")?,
            auto_start_mqs: read_bool(reader, "config auto start mqs")?,
            auto_start_tor: read_bool(reader, "config auto start tor")?,
            notifications_enabled: read_bool(reader, "config notifications")?,
            gui_scale: f64::from_bits(read_u64(reader, "config gui scale")?),
            ..WalletConfig::default()
        };

        if version >= CONFIG_VERSION_FOREIGN_API {
            config.lock_later = read_bool(reader, "config lock later")?;
            config.output_locking_enabled = read_bool(reader, "config output locking")?;
            let timeout = read_i64(reader, "config logout timeout")?;
            config.logout_timeout_secs = match timeout {
                LOGOUT_NEVER => None,
                t => Some(u32::try_from(t).map_err(|_| {
                    Error::Corrupt(format!("logout timeout {} out of range", t))
                })?),
            };
            config.foreign_api_address = read_string(reader, "config foreign api address")?;
            config.foreign_api_secret = read_string(reader, "config foreign api secret")?;
        }

        config
            .validate()
            .map_err(|e| Error::Corrupt(format!("config: {}", e)))?;
        Ok(config)
    }
}

impl Record for WalletTransaction {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_u32(writer, TRANSACTION_VERSION)?;
        write_i64(writer, self.idx)?;
        write_u8(writer, self.direction.as_u8())?;
        write_string(writer, &self.tx_id)?;
        write_string(writer, &self.address)?;
        write_i64(writer, self.timestamp)?;
        write_bool(writer, self.confirmed)?;
        write_opt_string(writer, self.message.as_deref())?;
        write_u64(writer, self.amount)?;
        write_bool(writer, self.historical)?;
        write_bool(writer, self.cancelled)
    }

    fn decode<R: Read>(reader: &mut R) -> Result<Self> {
        let version = read_u32(reader, "transaction version")?;
        check_version("transaction", version, TRANSACTION_VERSION, TRANSACTION_VERSION)?;

        let idx = read_i64(reader, "transaction index")?;
        if idx < 0 || idx == i64::MAX {
            return Err(Error::Corrupt(format!("transaction index {} out of range", idx)));
        }
        let direction_byte = read_u8(reader, "transaction direction")?;
        let direction = TxDirection::from_u8(direction_byte).ok_or_else(|| {
            Error::Corrupt(format!("unknown transaction direction {}", direction_byte))
        })?;
        Ok(WalletTransaction {
            idx,
            direction,
            tx_id: read_string(reader, "transaction id")?,
            address: read_string(reader, "transaction address")?,
            timestamp: read_i64(reader, "transaction timestamp")?,
            confirmed: read_bool(reader, "transaction confirmed")?,
            message: read_opt_string(reader, "transaction message")?,
            amount: read_u64(reader, "transaction amount")?,
            historical: read_bool(reader, "transaction historical")?,
            cancelled: read_bool(reader, "transaction cancelled")?,
        })
    }
}
