//! Modular Diffie-Hellman key agreement over a MODP group
//!
//! Only MODP group 14 (RFC 3526, 2048-bit) is implemented, matching
//! [`crate::params::KeyExchangeMethod::DhGroup14`].

use num_bigint::BigUint;
use num_traits::Num;
use rand::RngCore;
use thiserror::Error;
use zeroize::Zeroize;

/// Modulus length in bytes of MODP group 14 (2048 bits)
pub const GROUP_14_MODULUS_LEN: usize = 256;

/// Minimum number of bits to sample for the private DH exponent
const MIN_EXPONENT_BITS: usize = 256;

// RFC 3526 section 3, 2048-bit MODP Group (group 14)
const GROUP_14_PRIME_HEX: &str = concat!(
    "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD",
    "129024E088A67CC74020BBEA63B139B22514A08798E3404",
    "DDEF9519B3CD3A431B302B0A6DF25F14374FE1356D6D51C",
    "245E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B",
    "7EDEE386BFB5A899FA5AE9F24117C4B1FE649286651ECE4",
    "5B3DC2007CB8A163BF0598DA48361C55D39A69163FA8FD2",
    "4CF5F83655D23DCA3AD961C62F356208552BB9ED529077",
    "096966D670C354E4ABC9804F1746C08CA18217C32905E46",
    "2E36CE3BE39E772C180E86039B2783A2EC07A28FB5C55DF",
    "06F4C52C9DE2BCBF6955817183995497CEA956AE515D226",
    "1898FA051015728E5A8AACAA68FFFFFFFFFFFFFFFF"
);

/// Failure while performing a Diffie-Hellman operation
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum DhError {
    #[error("peer public value is larger than the group modulus")]
    PeerValueOutOfRange,
}

fn group_14_prime() -> BigUint {
    BigUint::from_str_radix(GROUP_14_PRIME_HEX, 16)
        .expect("embedded RFC 3526 group 14 prime is valid hex")
}

/// This crate's Diffie-Hellman state for one IKE SA: the group, our secret
/// exponent, our public value, and (once derived) the shared secret
pub struct DiffieHellman {
    prime: BigUint,
    generator: BigUint,
    private_exponent: BigUint,
    public_value: BigUint,
    shared_secret: Option<BigUint>,
}

impl DiffieHellman {
    /// Sample a fresh private exponent (at least 256 bits) and compute the
    /// corresponding public value `g^x mod p`
    pub fn generate() -> Self {
        let prime = group_14_prime();
        let generator = BigUint::from(2u8);

        let mut entropy = vec![0u8; MIN_EXPONENT_BITS / 8 + 8];
        rand::rng().fill_bytes(&mut entropy);
        let private_exponent = BigUint::from_bytes_be(&entropy) % &prime;

        let public_value = generator.modpow(&private_exponent, &prime);

        Self {
            prime,
            generator,
            private_exponent,
            public_value,
            shared_secret: None,
        }
    }

    /// Our public value, big-endian, left-padded to the modulus length
    pub fn public_value_bytes(&self) -> Vec<u8> {
        pad_to(&self.public_value, GROUP_14_MODULUS_LEN)
    }

    /// Compute `peer^x mod p` from the peer's big-endian public value and
    /// store it as the shared secret. Returns the shared secret bytes,
    /// big-endian, left-padded to the modulus length.
    pub fn derive(&mut self, peer_public: &[u8]) -> Result<Vec<u8>, DhError> {
        let peer_value = BigUint::from_bytes_be(peer_public);
        if peer_value >= self.prime {
            return Err(DhError::PeerValueOutOfRange);
        }
        let shared = peer_value.modpow(&self.private_exponent, &self.prime);
        let bytes = pad_to(&shared, GROUP_14_MODULUS_LEN);
        self.shared_secret = Some(shared);
        Ok(bytes)
    }

    /// The generator used for this group, exposed for testing
    pub fn generator(&self) -> &BigUint {
        &self.generator
    }
}

impl Drop for DiffieHellman {
    fn drop(&mut self) {
        self.private_exponent = BigUint::default();
        if let Some(secret) = self.shared_secret.take() {
            let mut bytes = secret.to_bytes_be();
            bytes.zeroize();
        }
    }
}

fn pad_to(value: &BigUint, len: usize) -> Vec<u8> {
    let raw = value.to_bytes_be();
    if raw.len() >= len {
        return raw[raw.len() - len..].to_vec();
    }
    let mut padded = vec![0u8; len - raw.len()];
    padded.extend_from_slice(&raw);
    padded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_value_is_padded_to_modulus_length() {
        let dh = DiffieHellman::generate();
        assert_eq!(dh.public_value_bytes().len(), GROUP_14_MODULUS_LEN);
    }

    #[test]
    fn both_sides_agree_on_shared_secret() {
        let mut alice = DiffieHellman::generate();
        let mut bob = DiffieHellman::generate();

        let alice_pub = alice.public_value_bytes();
        let bob_pub = bob.public_value_bytes();

        let alice_secret = alice.derive(&bob_pub).unwrap();
        let bob_secret = bob.derive(&alice_pub).unwrap();

        assert_eq!(alice_secret, bob_secret);
        assert_eq!(alice_secret.len(), GROUP_14_MODULUS_LEN);
    }

    #[test]
    fn rejects_peer_value_not_smaller_than_prime() {
        let mut dh = DiffieHellman::generate();
        let too_big = vec![0xFFu8; GROUP_14_MODULUS_LEN];
        assert!(dh.derive(&too_big).is_err());
    }
}
