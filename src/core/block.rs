use crate::core::Quantity;
use crate::error::{ArtError, Result};
use crate::utils::deserialize;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A transaction as delivered by the block data provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub hash: String,
    pub gas_price: Quantity,
    pub gas_limit: Quantity,
    pub value: Quantity,
    pub nonce: Quantity,
    #[serde(default)]
    pub data: String,
}

/// A block as delivered by the block data provider. Read-only input to the
/// pipeline; every numeric field is parsed during analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub number: Quantity,
    pub hash: String,
    pub timestamp: Quantity,
    pub gas_used: Quantity,
    pub gas_limit: Quantity,
    pub difficulty: Quantity,
    pub miner: String,
    pub nonce: Quantity,
    #[serde(default = "empty_hex")]
    pub extra_data: String,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

fn empty_hex() -> String {
    String::from("0x")
}

impl Block {
    pub fn from_json(text: &str) -> Result<Block> {
        let block: Block = deserialize(text)?;
        block.validate_hash()?;
        Ok(block)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Block> {
        let path = path.as_ref();
        debug!("Loading block from {}", path.display());
        let text = fs::read_to_string(path)
            .map_err(|e| ArtError::Io(format!("Failed to read {}: {e}", path.display())))?;
        Block::from_json(&text)
    }

    pub fn get_hash(&self) -> &str {
        self.hash.as_str()
    }

    pub fn get_transactions(&self) -> &[Transaction] {
        self.transactions.as_slice()
    }

    /// The block hash must be hex; every entropy stream is keyed on it
    fn validate_hash(&self) -> Result<()> {
        let digits = self
            .hash
            .strip_prefix("0x")
            .or_else(|| self.hash.strip_prefix("0X"))
            .unwrap_or(&self.hash);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ArtError::InvalidBlock(format!(
                "Block hash is not a hex digest: {:?}",
                self.hash
            )));
        }
        Ok(())
    }
}
