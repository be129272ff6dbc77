//! The keyed pseudo-random function and its PRF+ key-stream expansion
//!
//! Under the suite implemented here the PRF is HMAC-SHA-256, as selected by
//! `PRF_HMAC_SHA2_256` in the negotiated proposal.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Size in bytes of a single PRF output block
pub const PRF_OUTPUT_SIZE: usize = 32;

/// Failure while expanding key material
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum PrfError {
    #[error("PRF+ expansion requested {0} bytes, exceeding 255 * PRF output size")]
    ExpansionTooLong(usize),
}

/// `PRF(key, data) -> 32 bytes`, i.e. HMAC-SHA-256
pub fn prf(key: &[u8], data: &[u8]) -> [u8; PRF_OUTPUT_SIZE] {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key)
        .expect("HMAC accepts keys of any length");
    mac.update(data);
    let result = mac.finalize().into_bytes();
    let mut out = [0u8; PRF_OUTPUT_SIZE];
    out.copy_from_slice(&result);
    out
}

/// `PRF+(key, seed, length)`, RFC 7296 section 2.13
///
/// `T1 = PRF(key, seed || 0x01)`, `Ti = PRF(key, T(i-1) || seed || i)`, the
/// concatenation `T1 || T2 || ...` is truncated to `length` bytes. The
/// counter `i` is 1-based and must not exceed 255.
pub fn prf_plus(key: &[u8], seed: &[u8], length: usize) -> Result<Vec<u8>, PrfError> {
    let blocks_needed = length.div_ceil(PRF_OUTPUT_SIZE);
    if blocks_needed > 255 {
        return Err(PrfError::ExpansionTooLong(length));
    }

    let mut out = Vec::with_capacity(blocks_needed * PRF_OUTPUT_SIZE);
    let mut previous: Vec<u8> = Vec::new();
    for i in 1..=blocks_needed as u8 {
        let mut input = Vec::with_capacity(previous.len() + seed.len() + 1);
        input.extend_from_slice(&previous);
        input.extend_from_slice(seed);
        input.push(i);
        let block = prf(key, &input);
        out.extend_from_slice(&block);
        previous = block.to_vec();
    }
    out.truncate(length);
    Ok(out)
}
