//! Slate and proof documents written by the offline wallet
//!
//! Both are JSON files carrying a SHA-256 checksum over their fields, so a
//! hand-edited or truncated file is rejected instead of being half-applied.

use mwc_core::{Error, ProofInfo, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Slate document format version
pub const SLATE_VERSION: u32 = 1;

/// Proof document format version
pub const PROOF_VERSION: u32 = 1;

/// Step of the file-based transaction flow a slate belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlateStage {
    /// Initial slate produced by the sender
    Send,
    /// Response produced by the receiver
    Response,
}

/// Transaction slate exchanged as a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlateDocument {
    /// Format version
    pub version: u32,
    /// Slate id, shared by every stage of one transaction
    pub id: String,
    /// Stage
    pub stage: SlateStage,
    /// Amount in nano-MWC
    pub amount: u64,
    /// Sender address
    pub sender: String,
    /// Receiver address, set on the response
    pub receiver: Option<String>,
    /// Hex SHA-256 over the fields above
    pub checksum: String,
}

impl SlateDocument {
    /// New initial slate
    pub fn send(amount: u64, sender: impl Into<String>) -> Self {
        let mut slate = Self {
            version: SLATE_VERSION,
            id: uuid::Uuid::new_v4().to_string(),
            stage: SlateStage::Send,
            amount,
            sender: sender.into(),
            receiver: None,
            checksum: String::new(),
        };
        slate.checksum = slate.digest();
        slate
    }

    /// Response to this slate
    pub fn respond(&self, receiver: impl Into<String>) -> Self {
        let mut slate = Self {
            stage: SlateStage::Response,
            receiver: Some(receiver.into()),
            checksum: String::new(),
            ..self.clone()
        };
        slate.checksum = slate.digest();
        slate
    }

    fn digest(&self) -> String {
        let stage = match self.stage {
            SlateStage::Send => "send",
            SlateStage::Response => "response",
        };
        checksum(&[
            &self.version.to_string(),
            &self.id,
            stage,
            &self.amount.to_string(),
            &self.sender,
            self.receiver.as_deref().unwrap_or(""),
        ])
    }

    /// Read a slate and check it belongs to `stage`
    pub fn read(path: &Path, stage: SlateStage) -> Result<Self> {
        let bytes = fs::read(path)?;
        let slate: SlateDocument = serde_json::from_slice(&bytes).map_err(|e| {
            Error::Slate(format!("Unable to parse slate {}: {}", path.display(), e))
        })?;

        if slate.version != SLATE_VERSION {
            return Err(Error::Slate(format!(
                "Unsupported slate version {}",
                slate.version
            )));
        }
        if slate.checksum != slate.digest() {
            return Err(Error::Slate(format!(
                "Slate {} is damaged",
                path.display()
            )));
        }
        if slate.stage != stage {
            return Err(Error::Slate(format!(
                "Slate {} is at the {:?} stage, expected {:?}",
                path.display(),
                slate.stage,
                stage
            )));
        }
        Ok(slate)
    }

    /// Atomically write the slate
    pub fn write(&self, path: &Path) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(self)?;
        mwc_storage::write_atomic(path, &bytes)?;
        Ok(())
    }
}

/// Transaction proof exchanged as a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofDocument {
    /// Format version
    pub version: u32,
    /// Proven transaction id
    pub tx_id: String,
    /// Amount in nano-MWC
    pub amount: u64,
    /// Sender address
    pub from_address: String,
    /// Receiver address
    pub to_address: String,
    /// Output commitment
    pub output: String,
    /// Kernel excess
    pub kernel: String,
    /// Hex SHA-256 over the fields above
    pub checksum: String,
}

impl ProofDocument {
    /// New proof
    pub fn new(
        tx_id: impl Into<String>,
        amount: u64,
        from_address: impl Into<String>,
        to_address: impl Into<String>,
        output: impl Into<String>,
        kernel: impl Into<String>,
    ) -> Self {
        let mut proof = Self {
            version: PROOF_VERSION,
            tx_id: tx_id.into(),
            amount,
            from_address: from_address.into(),
            to_address: to_address.into(),
            output: output.into(),
            kernel: kernel.into(),
            checksum: String::new(),
        };
        proof.checksum = proof.digest();
        proof
    }

    fn digest(&self) -> String {
        checksum(&[
            &self.version.to_string(),
            &self.tx_id,
            &self.amount.to_string(),
            &self.from_address,
            &self.to_address,
            &self.output,
            &self.kernel,
        ])
    }

    /// Read and check a proof file
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let proof: ProofDocument = serde_json::from_slice(&bytes).map_err(|e| {
            Error::Proof(format!("Unable to parse proof {}: {}", path.display(), e))
        })?;
        if proof.version != PROOF_VERSION {
            return Err(Error::Proof(format!(
                "Unsupported proof version {}",
                proof.version
            )));
        }
        if proof.checksum != proof.digest() {
            return Err(Error::Proof("Proof doesn't match its content".to_string()));
        }
        Ok(proof)
    }

    /// Atomically write the proof
    pub fn write(&self, path: &Path) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(self)?;
        mwc_storage::write_atomic(path, &bytes)?;
        Ok(())
    }

    /// Proof data as returned to the caller
    pub fn info(&self) -> ProofInfo {
        ProofInfo::Verified {
            amount: self.amount,
            from_address: self.from_address.clone(),
            to_address: self.to_address.clone(),
            output: self.output.clone(),
            kernel: self.kernel.clone(),
        }
    }
}

fn checksum(fields: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for field in fields {
        hasher.update(field.as_bytes());
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}
