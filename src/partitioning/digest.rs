//! Digest spaces: a hash function together with the value range it can produce.
//!
//! A [`DigestSpace`] hides which hash function backs a partition map. The map
//! only needs the fixed bounds `[0, 2^bits - 1]` to split, and a way to turn a
//! key into an integer inside those bounds to resolve.
//!
//! # Locking
//!
//! Streaming digests carry mutable state that has to be reset, fed and
//! finalized in sequence. [`HashSpace`] keeps that state behind a
//! `parking_lot::Mutex` and holds it only for reset -> update -> finalize ->
//! integer conversion. Spaces that can build a fresh hasher per call, like
//! [`XxHash64Space`], need no lock at all.

use crate::error::{Error, Result};
use md5::Md5;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use parking_lot::Mutex;
use sha2::digest::{Digest, FixedOutputReset, Reset};
use sha2::{Sha256, Sha512};
use std::fmt;
use std::hash::Hasher;
use std::str::FromStr;
use twox_hash::XxHash64;

/// A hash function paired with the inclusive bounds of its output.
pub trait DigestSpace: Send + Sync + fmt::Debug {
    /// Human readable algorithm name, e.g. `MD5` or `SHA256`.
    ///
    /// Serialized partition maps store only this name.
    fn name(&self) -> &str;

    /// Output width of the hash function in bits.
    fn bit_width(&self) -> u32;

    /// Smallest digest value, always zero.
    fn lower_bound(&self) -> &BigUint;

    /// Largest digest value, `2^bit_width - 1`.
    fn upper_bound(&self) -> &BigUint;

    /// Hash `key` and read the output as a big-endian unsigned integer.
    ///
    /// Fails with [`Error::EmptyKey`] for zero-length keys.
    fn digest(&self, key: &[u8]) -> Result<BigUint>;
}

/// Bounds `[0, 2^bits - 1]` for a digest of the given width.
pub fn width_bounds(bits: u32) -> (BigUint, BigUint) {
    let upper = (BigUint::one() << bits) - BigUint::one();
    (BigUint::zero(), upper)
}

/// Digest space backed by any resettable RustCrypto digest.
pub struct HashSpace<D> {
    name: String,
    bits: u32,
    lower: BigUint,
    upper: BigUint,
    state: Mutex<D>,
}

/// 128-bit MD5 digest space.
pub type Md5Space = HashSpace<Md5>;

/// 256-bit SHA-256 digest space.
pub type Sha256Space = HashSpace<Sha256>;

/// 512-bit SHA-512 digest space.
pub type Sha512Space = HashSpace<Sha512>;

impl<D> HashSpace<D>
where
    D: Digest + FixedOutputReset + Reset + Send,
{
    /// Create a digest space named `name`. Bounds follow from the digest's
    /// output size.
    pub fn new(name: impl Into<String>) -> Self {
        let bits = (<D as Digest>::output_size() * 8) as u32;
        let (lower, upper) = width_bounds(bits);
        Self {
            name: name.into(),
            bits,
            lower,
            upper,
            state: Mutex::new(<D as Digest>::new()),
        }
    }
}

impl HashSpace<Md5> {
    /// MD5 space, `[0, 2^128 - 1]`.
    pub fn md5() -> Self {
        Self::new(Algorithm::Md5.name())
    }
}

impl HashSpace<Sha256> {
    /// SHA-256 space, `[0, 2^256 - 1]`.
    pub fn sha256() -> Self {
        Self::new(Algorithm::Sha256.name())
    }
}

impl HashSpace<Sha512> {
    /// SHA-512 space, `[0, 2^512 - 1]`.
    pub fn sha512() -> Self {
        Self::new(Algorithm::Sha512.name())
    }
}

impl<D> DigestSpace for HashSpace<D>
where
    D: Digest + FixedOutputReset + Reset + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn bit_width(&self) -> u32 {
        self.bits
    }

    fn lower_bound(&self) -> &BigUint {
        &self.lower
    }

    fn upper_bound(&self) -> &BigUint {
        &self.upper
    }

    fn digest(&self, key: &[u8]) -> Result<BigUint> {
        if key.is_empty() {
            return Err(Error::EmptyKey);
        }

        let value = {
            let mut state = self.state.lock();
            Digest::reset(&mut *state);
            Digest::update(&mut *state, key);
            let output = Digest::finalize_reset(&mut *state);
            BigUint::from_bytes_be(&output)
        };
        Ok(value)
    }
}

impl<D> fmt::Debug for HashSpace<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashSpace")
            .field("name", &self.name)
            .field("bits", &self.bits)
            .finish_non_exhaustive()
    }
}

/// 64-bit xxHash digest space.
///
/// Every call hashes with a fresh seeded hasher, so concurrent resolutions
/// never contend.
#[derive(Debug, Clone)]
pub struct XxHash64Space {
    seed: u64,
    lower: BigUint,
    upper: BigUint,
}

impl XxHash64Space {
    /// Create an xxHash64 space with the given seed.
    pub fn with_seed(seed: u64) -> Self {
        let (lower, upper) = width_bounds(64);
        Self { seed, lower, upper }
    }

    /// Get the hash seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for XxHash64Space {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl DigestSpace for XxHash64Space {
    fn name(&self) -> &str {
        Algorithm::XxHash64.name()
    }

    fn bit_width(&self) -> u32 {
        64
    }

    fn lower_bound(&self) -> &BigUint {
        &self.lower
    }

    fn upper_bound(&self) -> &BigUint {
        &self.upper
    }

    fn digest(&self, key: &[u8]) -> Result<BigUint> {
        if key.is_empty() {
            return Err(Error::EmptyKey);
        }
        let mut hasher = XxHash64::with_seed(self.seed);
        hasher.write(key);
        Ok(BigUint::from(hasher.finish()))
    }
}

/// Built-in digest spaces, addressable by name.
///
/// Used where a space has to be picked from data: configuration and decoding
/// of serialized maps. Partition maps themselves only see [`DigestSpace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    /// MD5, 128 bits.
    #[default]
    Md5,
    /// SHA-256, 256 bits.
    Sha256,
    /// SHA-512, 512 bits.
    Sha512,
    /// xxHash64, 64 bits.
    XxHash64,
}

impl Algorithm {
    /// All built-in algorithms.
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Md5,
        Algorithm::Sha256,
        Algorithm::Sha512,
        Algorithm::XxHash64,
    ];

    /// Name stored in serialized maps.
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Md5 => "MD5",
            Algorithm::Sha256 => "SHA256",
            Algorithm::Sha512 => "SHA512",
            Algorithm::XxHash64 => "XXH64",
        }
    }

    /// Look up an algorithm by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Result<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownAlgorithm(name.to_string()))
    }

    /// Output width in bits.
    pub fn bit_width(&self) -> u32 {
        match self {
            Algorithm::Md5 => 128,
            Algorithm::Sha256 => 256,
            Algorithm::Sha512 => 512,
            Algorithm::XxHash64 => 64,
        }
    }

    /// Build a fresh digest space. `seed` is only used by xxHash64.
    pub fn space(&self, seed: u64) -> Box<dyn DigestSpace> {
        match self {
            Algorithm::Md5 => Box::new(Md5Space::md5()),
            Algorithm::Sha256 => Box::new(Sha256Space::sha256()),
            Algorithm::Sha512 => Box::new(Sha512Space::sha512()),
            Algorithm::XxHash64 => Box::new(XxHash64Space::with_seed(seed)),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}
