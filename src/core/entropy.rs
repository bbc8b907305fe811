//! Reproducible number streams keyed on block data
//!
//! Every stream is created fresh for one generation pass and owned by it.
//! The only input is the block itself: no clock, no OS randomness. The one
//! exception is [`PreviewSource`], which exists for interactive previews and
//! reports itself as non-deterministic so its output can never be exported.

use crate::error::{ArtError, Result};
use crate::utils::{decode_hex_digits, keccak256_hex};
use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A source of draws for the attribute mappers
pub trait EntropySource {
    /// Next value in [0, 65535]
    fn draw_u16(&mut self) -> Result<u16>;

    /// Next value in [0, 1)
    fn draw_unit(&mut self) -> Result<f64>;

    /// Next value in [0, 255]
    fn draw_u8(&mut self) -> Result<u8> {
        Ok((self.draw_u16()? >> 8) as u8)
    }

    /// `floor(unit * max)`, i.e. an integer in [0, max)
    fn random_int(&mut self, max: u32) -> Result<u32> {
        Ok((self.draw_unit()? * f64::from(max)).floor() as u32)
    }

    fn is_deterministic(&self) -> bool {
        true
    }
}

/// Which deterministic stream a style draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    /// Rolling 4-hex-character window over the block hash
    HashWalk,
    /// MT19937 seeded from the start of the block hash
    Twister,
}

/// Open a fresh stream of the given kind for a block hash
pub fn open_stream(kind: StreamKind, block_hash: &str) -> Result<Box<dyn EntropySource>> {
    Ok(match kind {
        StreamKind::HashWalk => Box::new(HashWalker::new(block_hash, WalkSchedule::BLOCK_HASH)),
        StreamKind::Twister => Box::new(Twister::from_block_hash(block_hash)?),
    })
}

/// Hands out the streams one generation pass draws from. Each call opens a
/// fresh stream; nothing is shared between calls or between passes.
pub trait StreamProvider {
    /// Stream keyed on the block hash
    fn block_stream(&self, kind: StreamKind) -> Result<Box<dyn EntropySource>>;

    /// Stream keyed on the block's gas-used field
    fn gas_stream(&self, gas_used_hex: &str) -> Result<Box<dyn EntropySource>>;

    /// Stream over one transaction hash
    fn tx_stream(&self, tx_hash: &str) -> Result<Box<dyn EntropySource>>;

    fn is_deterministic(&self) -> bool {
        true
    }
}

/// Deterministic streams for one block
#[derive(Debug, Clone, Copy)]
pub struct BlockStreams<'a> {
    block_hash: &'a str,
}

impl<'a> BlockStreams<'a> {
    pub fn new(block_hash: &'a str) -> BlockStreams<'a> {
        BlockStreams { block_hash }
    }
}

impl StreamProvider for BlockStreams<'_> {
    fn block_stream(&self, kind: StreamKind) -> Result<Box<dyn EntropySource>> {
        open_stream(kind, self.block_hash)
    }

    fn gas_stream(&self, gas_used_hex: &str) -> Result<Box<dyn EntropySource>> {
        Ok(Box::new(HashWalker::for_gas_used(gas_used_hex)?))
    }

    fn tx_stream(&self, tx_hash: &str) -> Result<Box<dyn EntropySource>> {
        Ok(Box::new(ByteWalker::new(tx_hash)))
    }
}

/// Every stream replaced by OS randomness; for live preview only
#[derive(Debug, Clone, Copy, Default)]
pub struct PreviewStreams;

impl StreamProvider for PreviewStreams {
    fn block_stream(&self, _kind: StreamKind) -> Result<Box<dyn EntropySource>> {
        Ok(Box::new(PreviewSource::new()))
    }

    fn gas_stream(&self, _gas_used_hex: &str) -> Result<Box<dyn EntropySource>> {
        Ok(Box::new(PreviewSource::new()))
    }

    fn tx_stream(&self, _tx_hash: &str) -> Result<Box<dyn EntropySource>> {
        Ok(Box::new(PreviewSource::new()))
    }

    fn is_deterministic(&self) -> bool {
        false
    }
}

/// When a [`HashWalker`] re-hashes its digest, and where its cursor goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkSchedule {
    pub start: usize,
    pub limit: usize,
    pub reset: usize,
    /// Check the limit before reading instead of after
    pub rehash_before_read: bool,
}

impl WalkSchedule {
    /// Walk over the block hash: skip the `0x`, re-hash once the cursor
    /// reaches 60 after a read.
    pub const BLOCK_HASH: WalkSchedule = WalkSchedule {
        start: 2,
        limit: 60,
        reset: 2,
        rehash_before_read: false,
    };

    /// Walk over the gas-used digest: re-hash when the cursor is at 59 or
    /// beyond before a read, restarting at the first character.
    pub const GAS_USED: WalkSchedule = WalkSchedule {
        start: 2,
        limit: 59,
        reset: 0,
        rehash_before_read: true,
    };
}

const WINDOW: usize = 4;

/// Rolling hex-digest walker. Each draw consumes four hex characters; when
/// the digest is used up it is replaced by its own keccak-256 hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashWalker {
    digest: String,
    cursor: usize,
    schedule: WalkSchedule,
}

impl HashWalker {
    pub fn new(digest: &str, schedule: WalkSchedule) -> HashWalker {
        HashWalker {
            digest: digest.to_string(),
            cursor: schedule.start,
            schedule,
        }
    }

    /// Walker over `keccak256(gasUsed)`, keyed on the raw hex of the field
    pub fn for_gas_used(gas_used_hex: &str) -> Result<HashWalker> {
        let bytes = decode_hex_digits(gas_used_hex)?;
        Ok(HashWalker::new(&keccak256_hex(&bytes), WalkSchedule::GAS_USED))
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn rehash(&mut self) -> Result<()> {
        let bytes = decode_hex_digits(&self.digest)?;
        self.digest = keccak256_hex(&bytes);
        self.cursor = self.schedule.reset;
        debug!("Entropy walker re-hashed to {}", self.digest);
        Ok(())
    }

    fn window(&self) -> Option<&str> {
        self.digest.get(self.cursor..self.cursor + WINDOW)
    }

    fn read_window(&mut self) -> Result<u16> {
        if self.window().is_none() {
            self.rehash()?;
        }
        let window = self.window().ok_or_else(|| {
            ArtError::EntropyExhausted(format!(
                "walker cannot read {WINDOW} characters at {} of {:?}",
                self.cursor, self.digest
            ))
        })?;
        if !window.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ArtError::Parse(format!(
                "Non-hex entropy window {window:?} at {}",
                self.cursor
            )));
        }
        let value = u16::from_str_radix(window, 16)
            .map_err(|e| ArtError::Parse(format!("Invalid entropy window {window:?}: {e}")))?;
        self.cursor += WINDOW;
        Ok(value)
    }
}

impl EntropySource for HashWalker {
    fn draw_u16(&mut self) -> Result<u16> {
        if self.schedule.rehash_before_read && self.cursor >= self.schedule.limit {
            self.rehash()?;
        }
        let value = self.read_window()?;
        if !self.schedule.rehash_before_read && self.cursor >= self.schedule.limit {
            self.rehash()?;
        }
        Ok(value)
    }

    fn draw_unit(&mut self) -> Result<f64> {
        Ok(f64::from(self.draw_u16()?) / 65536.0)
    }
}

/// Walks a transaction hash one byte (two hex characters) at a time.
/// Unlike [`HashWalker`] it never re-hashes; a 32-byte hash gives 32 draws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteWalker {
    hex: String,
    cursor: usize,
}

impl ByteWalker {
    pub fn new(tx_hash: &str) -> ByteWalker {
        ByteWalker {
            hex: tx_hash.to_string(),
            cursor: 2,
        }
    }
}

impl EntropySource for ByteWalker {
    fn draw_u8(&mut self) -> Result<u8> {
        let pair = self.hex.get(self.cursor..self.cursor + 2).ok_or_else(|| {
            ArtError::EntropyExhausted(format!("transaction hash {:?} has no bytes left", self.hex))
        })?;
        if !pair.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ArtError::Parse(format!("Non-hex byte {pair:?} in {:?}", self.hex)));
        }
        let value = u8::from_str_radix(pair, 16)
            .map_err(|e| ArtError::Parse(format!("Invalid byte {pair:?}: {e}")))?;
        self.cursor += 2;
        Ok(value)
    }

    fn draw_u16(&mut self) -> Result<u16> {
        let high = self.draw_u8()?;
        let low = self.draw_u8()?;
        Ok(u16::from_be_bytes([high, low]))
    }

    fn draw_unit(&mut self) -> Result<f64> {
        Ok(f64::from(self.draw_u16()?) / 65536.0)
    }
}

const N: usize = 624;
const M: usize = 397;
const MATRIX_A: u32 = 0x9908_b0df;
const UPPER_MASK: u32 = 0x8000_0000;
const LOWER_MASK: u32 = 0x7fff_ffff;

/// MT19937 Mersenne Twister with the reference `init_genrand` seeding
#[derive(Clone)]
pub struct Twister {
    mt: [u32; N],
    mti: usize,
}

impl std::fmt::Debug for Twister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Twister").field("mti", &self.mti).finish()
    }
}

impl Twister {
    pub fn new(seed: u32) -> Twister {
        let mut mt = [0u32; N];
        mt[0] = seed;
        for i in 1..N {
            let prev = mt[i - 1];
            mt[i] = 1_812_433_253u32
                .wrapping_mul(prev ^ (prev >> 30))
                .wrapping_add(i as u32);
        }
        Twister { mt, mti: N }
    }

    pub fn from_block_hash(hash: &str) -> Result<Twister> {
        Ok(Twister::new(seed_from_hash(hash)?))
    }

    fn generate(&mut self) {
        for i in 0..N {
            let y = (self.mt[i] & UPPER_MASK) | (self.mt[(i + 1) % N] & LOWER_MASK);
            let mut next = self.mt[(i + M) % N] ^ (y >> 1);
            if y & 1 == 1 {
                next ^= MATRIX_A;
            }
            self.mt[i] = next;
        }
        self.mti = 0;
    }

    pub fn next_u32(&mut self) -> u32 {
        if self.mti >= N {
            self.generate();
        }
        let mut y = self.mt[self.mti];
        self.mti += 1;

        y ^= y >> 11;
        y ^= (y << 7) & 0x9d2c_5680;
        y ^= (y << 15) & 0xefc6_0000;
        y ^= y >> 18;
        y
    }

    /// `next_u32() / 2^32`, the reference `random()` in [0, 1)
    pub fn random(&mut self) -> f64 {
        f64::from(self.next_u32()) * (1.0 / 4_294_967_296.0)
    }
}

impl EntropySource for Twister {
    fn draw_u16(&mut self) -> Result<u16> {
        Ok((self.random() * 65536.0).floor() as u16)
    }

    fn draw_unit(&mut self) -> Result<f64> {
        Ok(self.random())
    }
}

/// Seed for [`Twister`]: the first 16 characters of the hash read as a hex
/// integer, rounded to the nearest double, then reduced modulo 2^32.
///
/// A `0x`-prefixed hash therefore contributes 14 hex digits (56 bits), and
/// the double rounding drops low bits exactly as the reference platform does.
pub fn seed_from_hash(hash: &str) -> Result<u32> {
    let head: String = hash.chars().take(16).collect();
    let digits = head
        .strip_prefix("0x")
        .or_else(|| head.strip_prefix("0X"))
        .unwrap_or(&head);
    let hex: String = digits.chars().take_while(|c| c.is_ascii_hexdigit()).collect();
    if hex.is_empty() {
        return Err(ArtError::InvalidBlock(format!(
            "Block hash {hash:?} has no leading hex digits to seed from"
        )));
    }
    let value = u64::from_str_radix(&hex, 16)
        .map_err(|e| ArtError::Parse(format!("Invalid seed digits {hex:?}: {e}")))?;
    let rounded = value as f64;
    Ok((rounded % 4_294_967_296.0) as u32)
}

/// Non-deterministic stand-in for the block streams, for live preview only
pub struct PreviewSource {
    rng: rand::rngs::ThreadRng,
}

impl PreviewSource {
    pub fn new() -> PreviewSource {
        warn!("Preview entropy enabled: output is not reproducible");
        PreviewSource {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for PreviewSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EntropySource for PreviewSource {
    fn draw_u16(&mut self) -> Result<u16> {
        Ok(self.rng.gen::<u16>())
    }

    fn draw_unit(&mut self) -> Result<f64> {
        Ok(self.rng.gen::<f64>())
    }

    fn draw_u8(&mut self) -> Result<u8> {
        Ok(self.rng.gen::<u8>())
    }

    fn is_deterministic(&self) -> bool {
        false
    }
}
