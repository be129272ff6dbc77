//! The key derivation pipeline: SKEYSEED and its PRF+ expansion into the
//! seven `SK_*` keys

use ike2_proto::primitives::prf::{prf, prf_plus};
use zeroize::Zeroizing;

use crate::errors::SessionError;

/// Size in bytes of each derived key, under the suite this crate negotiates
pub const DERIVED_KEY_SIZE: usize = 32;
const DERIVED_KEY_COUNT: usize = 7;

/// The seven keys derived from SKEYSEED; each is wiped on drop
pub struct DerivedKeys {
    /// Used to derive child SA keying material (not used by this core directly)
    pub sk_d: Zeroizing<Vec<u8>>,
    /// Integrity key for packets we send
    pub sk_ai: Zeroizing<Vec<u8>>,
    /// Integrity key for packets the peer sends
    pub sk_ar: Zeroizing<Vec<u8>>,
    /// Encryption key for packets we send
    pub sk_ei: Zeroizing<Vec<u8>>,
    /// Encryption key for packets the peer sends
    pub sk_er: Zeroizing<Vec<u8>>,
    /// Key used to authenticate our own transcript in AUTH
    pub sk_pi: Zeroizing<Vec<u8>>,
    /// Key used to verify the peer's transcript in AUTH
    pub sk_pr: Zeroizing<Vec<u8>>,
}

/// Derive SKEYSEED from the two nonces and the DH shared secret, then expand
/// it into the seven `SK_*` keys via PRF+
///
/// `ni`/`nr` are raw nonce bytes (no payload header), `shared_secret` is the
/// DH shared secret (big-endian, padded to the group modulus length), and
/// `spi_i`/`spi_r` are the initiator/responder SPIs.
pub fn derive_keys(
    ni: &[u8],
    nr: &[u8],
    shared_secret: &[u8],
    spi_i: u64,
    spi_r: u64,
) -> Result<DerivedKeys, SessionError> {
    let mut nonce_concat = Zeroizing::new(Vec::with_capacity(ni.len() + nr.len()));
    nonce_concat.extend_from_slice(ni);
    nonce_concat.extend_from_slice(nr);

    let skeyseed = Zeroizing::new(prf(&nonce_concat, shared_secret).to_vec());

    let mut seed = Zeroizing::new(Vec::with_capacity(ni.len() + nr.len() + 16));
    seed.extend_from_slice(ni);
    seed.extend_from_slice(nr);
    seed.extend_from_slice(&spi_i.to_be_bytes());
    seed.extend_from_slice(&spi_r.to_be_bytes());

    let expanded = Zeroizing::new(prf_plus(
        &skeyseed,
        &seed,
        DERIVED_KEY_COUNT * DERIVED_KEY_SIZE,
    )?);

    let slice = |i: usize| Zeroizing::new(expanded[i * DERIVED_KEY_SIZE..(i + 1) * DERIVED_KEY_SIZE].to_vec());

    Ok(DerivedKeys {
        sk_d: slice(0),
        sk_ai: slice(1),
        sk_ar: slice(2),
        sk_ei: slice(3),
        sk_er: slice(4),
        sk_pi: slice(5),
        sk_pr: slice(6),
    })
}
