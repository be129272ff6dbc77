//! Truncated HMAC-SHA-256-128 integrity checking
//!
//! Matches [`crate::params::IntegrityAlgorithm::AuthHmacSha2_256_128`]: a
//! full HMAC-SHA-256 is computed and truncated to the leading 16 bytes.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::constant_time_eq;

type HmacSha256 = Hmac<Sha256>;

/// Size in bytes of the truncated MAC this suite produces
pub const MAC_SIZE: usize = 16;

/// Compute the truncated integrity MAC over `data` under `key`
pub fn compute(key: &[u8], data: &[u8]) -> [u8; MAC_SIZE] {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key)
        .expect("HMAC accepts keys of any length");
    mac.update(data);
    let full = mac.finalize().into_bytes();
    let mut out = [0u8; MAC_SIZE];
    out.copy_from_slice(&full[..MAC_SIZE]);
    out
}

/// Recompute the MAC over `data` under `key` and compare it against
/// `received` in constant time
pub fn verify(key: &[u8], data: &[u8], received: &[u8]) -> bool {
    let expected = compute(key, data);
    constant_time_eq(&expected, received)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_is_the_leading_half_of_full_hmac() {
        let key = b"integrity-key";
        let data = b"ike header and body bytes";

        let mut full_mac = <HmacSha256 as Mac>::new_from_slice(key).unwrap();
        full_mac.update(data);
        let full = full_mac.finalize().into_bytes();

        let truncated = compute(key, data);
        assert_eq!(&truncated[..], &full[..MAC_SIZE]);
    }

    #[test]
    fn verify_accepts_matching_mac_and_rejects_tampering() {
        let key = b"integrity-key";
        let data = b"some packet bytes";
        let mac = compute(key, data);

        assert!(verify(key, data, &mac));
        assert!(!verify(key, b"different packet bytes", &mac));

        let mut tampered = mac;
        tampered[0] ^= 0xFF;
        assert!(!verify(key, data, &tampered));
    }
}
