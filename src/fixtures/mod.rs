//! Sample blocks for unit tests

use crate::core::{Block, Quantity, Transaction};

pub const BLOCK_HASH: &str = "0x7ab8f6eae7d5c1e3e0b6b23b1fe5b0b7cf1c02d3f5e6f9d0b3e6f3b2a1c0d9e8";

/// A block in the shape ethers.js `getBlockWithTransactions` serializes to
pub const ETHERS_BLOCK_JSON: &str = r#"{
    "hash": "0x7ab8f6eae7d5c1e3e0b6b23b1fe5b0b7cf1c02d3f5e6f9d0b3e6f3b2a1c0d9e8",
    "parentHash": "0x4d7a1f0c9b5e3a2d8c6f4e1b0a9d8c7b6a5f4e3d2c1b0a9f8e7d6c5b4a3f2e1d",
    "number": 12345678,
    "timestamp": 1620000000,
    "nonce": "0x5e2d3c4b1a0f9e8d",
    "difficulty": 7500000000000000,
    "gasLimit": { "type": "BigNumber", "hex": "0x01ca35ef" },
    "gasUsed": { "type": "BigNumber", "hex": "0x01c9c380" },
    "miner": "0xEA674fdDe714fd979de3EdF0F56AA9716B898ec8",
    "extraData": "0xd883010a01846765746888676f312e31352e36856c696e7578",
    "transactions": [
        {
            "hash": "0x9f3a6c1e5b7d2f4a8c0e6b3d1f5a7c9e2b4d6f8a0c1e3b5d7f9a2c4e6b8d0f1a",
            "gasPrice": { "type": "BigNumber", "hex": "0x0ba43b7400" },
            "gasLimit": { "type": "BigNumber", "hex": "0x5208" },
            "value": { "type": "BigNumber", "hex": "0x0de0b6b3a7640000" },
            "nonce": 42,
            "data": "0x"
        },
        {
            "hash": "0x1b2c3d4e5f60718293a4b5c6d7e8f90a1b2c3d4e5f60718293a4b5c6d7e8f90a",
            "gasPrice": { "type": "BigNumber", "hex": "0x12a05f2000" },
            "gasLimit": { "type": "BigNumber", "hex": "0x030d40" },
            "value": { "type": "BigNumber", "hex": "0x00" },
            "nonce": 7,
            "data": "0xa9059cbb"
        }
    ]
}"#;

pub fn tx_hash(index: usize) -> String {
    format!("0x{:064x}", 0x1000_0000_0000_0000u64 + (index as u64) * 0x0123_4567_89ab)
}

pub fn transaction(gas_price: u64, gas_limit: u64, value: u64, nonce: u64) -> Transaction {
    Transaction {
        hash: tx_hash(nonce as usize),
        gas_price: Quantity::from(gas_price),
        gas_limit: Quantity::from(gas_limit),
        value: Quantity::from(value),
        nonce: Quantity::from(nonce),
        data: String::from("0x"),
    }
}

pub fn block_with(transactions: Vec<Transaction>) -> Block {
    Block {
        number: Quantity::from(12_345_678u64),
        hash: BLOCK_HASH.to_string(),
        timestamp: Quantity::from(1_620_000_000u64),
        gas_used: Quantity::from("0x01c9c380"),
        gas_limit: Quantity::from("0x01ca35ef"),
        difficulty: Quantity::from(7_500_000_000_000_000u64),
        miner: "0xEA674fdDe714fd979de3EdF0F56AA9716B898ec8".to_string(),
        nonce: Quantity::from("0x5e2d3c4b1a0f9e8d"),
        extra_data: "0x".to_string(),
        transactions,
    }
}

/// One transaction per gas price; the other fields are fixed
pub fn block_with_gas_prices(gas_prices: &[u64]) -> Block {
    block_with(
        gas_prices
            .iter()
            .enumerate()
            .map(|(i, price)| transaction(*price, 21_000, 0, i as u64))
            .collect(),
    )
}

pub fn empty_block() -> Block {
    block_with(Vec::new())
}

pub fn ethers_block() -> Block {
    Block::from_json(ETHERS_BLOCK_JSON).expect("fixture block should parse")
}
