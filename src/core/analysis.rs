//! Block analysis: parsed block fields plus transaction statistics
//!
//! A [`BlockAnalysis`] is built once per block and never mutated. When a new
//! block arrives the caller builds a new analysis; nothing carries over.

use crate::core::{parse_quantity, Block};
use crate::error::{ArtError, Result};
use log::{debug, info};
use num_bigint::BigUint;
use serde::Serialize;
use std::collections::BTreeMap;

/// One figure for each of the four per-transaction numeric fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldStats {
    pub gas_limit: BigUint,
    pub gas_price: BigUint,
    pub value: BigUint,
    pub nonce: BigUint,
}

/// Transaction statistics for one block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxStats {
    pub highest: FieldStats,
    pub lowest: FieldStats,
    pub average: FieldStats,
    /// Per-field values in transaction order (not sorted)
    pub nonces: Vec<BigUint>,
    pub values: Vec<BigUint>,
    pub gas_prices: Vec<BigUint>,
    pub gas_limits: Vec<BigUint>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTransaction {
    pub hash: BigUint,
    pub gas_price: BigUint,
    pub gas_limit: BigUint,
    pub value: BigUint,
    pub nonce: BigUint,
    pub data: String,
}

/// Largest value, with the accumulator starting at zero
pub fn highest(values: &[BigUint]) -> BigUint {
    values
        .iter()
        .fold(BigUint::from(0u8), |acc, v| if acc < *v { v.clone() } else { acc })
}

/// Smallest value, with the accumulator starting at zero.
///
/// A zero accumulator means "nothing seen yet", so the next value always
/// replaces it. Otherwise the accumulator is kept only while it is strictly
/// smaller than the next value. This means a zero that follows a positive
/// value still replaces it: `[0, 5, 3]` gives 3 but `[5, 0]` gives 0.
pub fn lowest(values: &[BigUint]) -> BigUint {
    let zero = BigUint::from(0u8);
    values.iter().fold(zero.clone(), |acc, v| {
        if acc > zero && acc < *v {
            acc
        } else {
            v.clone()
        }
    })
}

/// Floor of the arithmetic mean; zero for an empty slice
pub fn average(values: &[BigUint]) -> BigUint {
    if values.is_empty() {
        return BigUint::from(0u8);
    }
    let sum: BigUint = values.iter().sum();
    sum / BigUint::from(values.len())
}

impl TxStats {
    pub fn from_transactions(txs: &[ParsedTransaction]) -> TxStats {
        let nonces: Vec<BigUint> = txs.iter().map(|t| t.nonce.clone()).collect();
        let values: Vec<BigUint> = txs.iter().map(|t| t.value.clone()).collect();
        let gas_prices: Vec<BigUint> = txs.iter().map(|t| t.gas_price.clone()).collect();
        let gas_limits: Vec<BigUint> = txs.iter().map(|t| t.gas_limit.clone()).collect();

        let reduce = |f: fn(&[BigUint]) -> BigUint| FieldStats {
            gas_limit: f(&gas_limits),
            gas_price: f(&gas_prices),
            value: f(&values),
            nonce: f(&nonces),
        };

        let (highest, lowest, average) = (reduce(highest), reduce(lowest), reduce(average));

        TxStats {
            highest,
            lowest,
            average,
            nonces,
            values,
            gas_prices,
            gas_limits,
        }
    }
}

/// Parsed block fields and derived transaction statistics
#[derive(Debug, Clone)]
pub struct BlockAnalysis {
    block: Block,
    pub number: BigUint,
    pub hash: BigUint,
    pub timestamp: BigUint,
    pub gas_used: BigUint,
    pub gas_limit: BigUint,
    pub difficulty: BigUint,
    pub miner: BigUint,
    pub nonce: BigUint,
    pub extra: BigUint,
    pub txs: Vec<ParsedTransaction>,
    pub tx_stats: TxStats,
}

impl BlockAnalysis {
    pub fn new(block: &Block) -> Result<BlockAnalysis> {
        info!(
            "Analyzing block {} with {} transactions",
            block.number,
            block.transactions.len()
        );

        let field = |name: &str, raw: &str| {
            parse_quantity(raw).map_err(|e| ArtError::Parse(format!("block.{name}: {e}")))
        };

        let mut txs = Vec::with_capacity(block.transactions.len());
        for (index, tx) in block.transactions.iter().enumerate() {
            let tx_field = |name: &str, raw: &str| {
                parse_quantity(raw)
                    .map_err(|e| ArtError::Parse(format!("transactions[{index}].{name}: {e}")))
            };
            txs.push(ParsedTransaction {
                hash: tx_field("hash", &tx.hash)?,
                gas_price: tx_field("gasPrice", &tx.gas_price.raw_text())?,
                gas_limit: tx_field("gasLimit", &tx.gas_limit.raw_text())?,
                value: tx_field("value", &tx.value.raw_text())?,
                nonce: tx_field("nonce", &tx.nonce.raw_text())?,
                data: tx.data.clone(),
            });
        }

        let tx_stats = TxStats::from_transactions(&txs);

        let analysis = BlockAnalysis {
            block: block.clone(),
            number: field("number", &block.number.raw_text())?,
            hash: field("hash", &block.hash)?,
            timestamp: field("timestamp", &block.timestamp.raw_text())?,
            gas_used: field("gasUsed", &block.gas_used.raw_text())?,
            gas_limit: field("gasLimit", &block.gas_limit.raw_text())?,
            difficulty: field("difficulty", &block.difficulty.raw_text())?,
            miner: field("miner", &block.miner)?,
            nonce: field("nonce", &block.nonce.raw_text())?,
            extra: field("extraData", &block.extra_data)?,
            txs,
            tx_stats,
        };
        analysis.log_summary();
        Ok(analysis)
    }

    pub fn get_block(&self) -> &Block {
        &self.block
    }

    pub fn tx_count(&self) -> usize {
        self.txs.len()
    }

    pub fn summary(&self) -> AnalysisSummary {
        let fields = |stats: &FieldStats| {
            BTreeMap::from([
                ("gasLimit".to_string(), stats.gas_limit.to_string()),
                ("gasPrice".to_string(), stats.gas_price.to_string()),
                ("value".to_string(), stats.value.to_string()),
                ("nonce".to_string(), stats.nonce.to_string()),
            ])
        };
        let column = |values: &[BigUint]| values.iter().map(|v| v.to_string()).collect();

        AnalysisSummary {
            block_num: self.number.to_string(),
            hash: self.block.hash.clone(),
            gas: self.gas_used.to_string(),
            gas_limit: self.gas_limit.to_string(),
            difficulty: self.difficulty.to_string(),
            miner: self.block.miner.clone(),
            nonce: self.nonce.to_string(),
            extra: self.extra.to_string(),
            timestamp: self.timestamp.to_string(),
            tx_count: self.tx_count(),
            highest: fields(&self.tx_stats.highest),
            lowest: fields(&self.tx_stats.lowest),
            average: fields(&self.tx_stats.average),
            gas_prices: column(&self.tx_stats.gas_prices),
            gas_limits: column(&self.tx_stats.gas_limits),
            values: column(&self.tx_stats.values),
            nonces: column(&self.tx_stats.nonces),
        }
    }

    fn log_summary(&self) {
        debug!(
            "Block traits: number={} gas={} gasLimit={} difficulty={} timestamp={} txCount={}",
            self.number,
            self.gas_used,
            self.gas_limit,
            self.difficulty,
            self.timestamp,
            self.tx_count()
        );
        for (label, stats) in [
            ("highest", &self.tx_stats.highest),
            ("lowest", &self.tx_stats.lowest),
            ("average", &self.tx_stats.average),
        ] {
            debug!(
                "Transaction traits ({label}): gasLimit={} gasPrice={} value={} nonce={}",
                stats.gas_limit, stats.gas_price, stats.value, stats.nonce
            );
        }
    }
}

/// Display form of an analysis with every big integer in decimal
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub block_num: String,
    pub hash: String,
    pub gas: String,
    pub gas_limit: String,
    pub difficulty: String,
    pub miner: String,
    pub nonce: String,
    pub extra: String,
    pub timestamp: String,
    pub tx_count: usize,
    pub highest: BTreeMap<String, String>,
    pub lowest: BTreeMap<String, String>,
    pub average: BTreeMap<String, String>,
    pub gas_prices: Vec<String>,
    pub gas_limits: Vec<String>,
    pub values: Vec<String>,
    pub nonces: Vec<String>,
}
