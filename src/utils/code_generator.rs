//! Short code generation.
//!
//! A code is derived from the input URL salted with a 16-byte random nonce:
//! SHA-256 over `input ++ hex(nonce)`, read as a big-endian unsigned integer,
//! encoded in base 62 and cut to its first [`MAX_CODE_LENGTH`] characters.
//! The same URL submitted twice gets two different codes.
//!
//! Collisions are not retried here. The durable store keeps the first writer
//! on conflict (see [`crate::application::services::TieredEntryStore::put`]).

use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Base-62 alphabet: digits, then lowercase, then uppercase.
pub const BASE62_ALPHABET: &[u8; 62] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Maximum length of a generated code.
pub const MAX_CODE_LENGTH: usize = 6;

/// Size of the per-call random nonce in bytes.
const NONCE_LENGTH: usize = 16;

/// Errors that can occur during code generation.
#[derive(Debug, thiserror::Error)]
pub enum CodeGenError {
    #[error("randomness unavailable: {0}")]
    RandomnessUnavailable(String),
}

/// Source of the per-call nonce.
///
/// Production uses [`OsEntropy`]. Tests inject a fixed source to make
/// generation a pure function of the input.
pub trait EntropySource: Send + Sync {
    /// Fills `buf` with random bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodeGenError::RandomnessUnavailable`] if the source fails.
    /// Implementations must never fall back to weaker randomness.
    fn fill(&self, buf: &mut [u8]) -> Result<(), CodeGenError>;
}

/// Operating system CSPRNG via `getrandom`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<(), CodeGenError> {
        getrandom::fill(buf).map_err(|e| CodeGenError::RandomnessUnavailable(e.to_string()))
    }
}

/// Generates short codes from input strings.
#[derive(Clone)]
pub struct CodeGenerator {
    entropy: Arc<dyn EntropySource>,
}

impl CodeGenerator {
    /// Creates a generator drawing nonces from `entropy`.
    pub fn new(entropy: Arc<dyn EntropySource>) -> Self {
        Self { entropy }
    }

    /// Derives a code of 1 to 6 base-62 characters from `input`.
    ///
    /// # Errors
    ///
    /// Returns [`CodeGenError::RandomnessUnavailable`] if the nonce cannot be drawn.
    pub fn generate(&self, input: &str) -> Result<String, CodeGenError> {
        let mut nonce = [0u8; NONCE_LENGTH];
        self.entropy.fill(&mut nonce)?;

        let mut hasher = Sha256::new();
        hasher.update(input.as_bytes());
        hasher.update(hex::encode(nonce).as_bytes());
        let digest = hasher.finalize();

        let mut code = encode_base62(&digest);
        code.truncate(MAX_CODE_LENGTH);

        tracing::debug!(url = input, code = %code, "Generated short code");
        Ok(code)
    }

    /// Returns the custom alias verbatim when non-empty, else a generated code.
    ///
    /// Aliases are not format-checked here; the transport validates them.
    pub fn resolve(&self, input: &str, custom_alias: Option<&str>) -> Result<String, CodeGenError> {
        match custom_alias {
            Some(alias) if !alias.is_empty() => Ok(alias.to_string()),
            _ => self.generate(input),
        }
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(Arc::new(OsEntropy))
    }
}

/// Encodes a big-endian unsigned integer in base 62, most significant digit first.
///
/// Zero (including an empty slice) encodes to `"0"`.
pub fn encode_base62(bytes: &[u8]) -> String {
    let mut number: Vec<u8> = bytes.iter().copied().skip_while(|b| *b == 0).collect();
    if number.is_empty() {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while !number.is_empty() {
        // Long division of the byte string by 62.
        let mut remainder: u32 = 0;
        let mut quotient = Vec::with_capacity(number.len());
        for &byte in &number {
            let acc = (remainder << 8) | u32::from(byte);
            let q = acc / 62;
            remainder = acc % 62;
            if !quotient.is_empty() || q != 0 {
                quotient.push(q as u8);
            }
        }
        digits.push(BASE62_ALPHABET[remainder as usize]);
        number = quotient;
    }

    digits.iter().rev().map(|&d| char::from(d)).collect()
}
