//! Camellia-256-CBC encryption with the IKEv2 padding construction
//!
//! Matches [`crate::params::EncryptionAlgorithm::EncrCamelliaCbc`]. The block
//! size is 16 bytes for both the cipher and the padding scheme.

use camellia::Camellia256;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use thiserror::Error;

/// Camellia block size in bytes
pub const BLOCK_SIZE: usize = 16;
/// Camellia-256 key size in bytes
pub const KEY_SIZE: usize = 32;

type Encryptor = cbc::Encryptor<Camellia256>;
type Decryptor = cbc::Decryptor<Camellia256>;

/// Failure while encrypting or decrypting with Camellia-CBC
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum CipherError {
    #[error("key must be exactly {KEY_SIZE} bytes, got {0}")]
    WrongKeySize(usize),
    #[error("iv must be exactly {BLOCK_SIZE} bytes, got {0}")]
    WrongIvSize(usize),
    #[error("ciphertext is not a multiple of the block size, or is empty")]
    MalformedCiphertext,
    #[error("padding is malformed or the pad length byte is inconsistent")]
    BadPadding,
}

/// Append IKEv2-style padding (RFC 7296 section 3.14): `pad_length` arbitrary
/// bytes followed by one byte holding `pad_length`, such that the total
/// length becomes a multiple of the block size
fn pad(plaintext: &[u8]) -> Vec<u8> {
    let remainder = (plaintext.len() + 1) % BLOCK_SIZE;
    let pad_length = if remainder == 0 { 0 } else { BLOCK_SIZE - remainder };

    let mut out = Vec::with_capacity(plaintext.len() + pad_length + 1);
    out.extend_from_slice(plaintext);
    out.extend(std::iter::repeat(0u8).take(pad_length));
    out.push(pad_length as u8);
    out
}

/// Strip IKEv2-style padding, validating the trailing pad-length byte
fn unpad(padded: &[u8]) -> Result<&[u8], CipherError> {
    let pad_length = *padded.last().ok_or(CipherError::BadPadding)? as usize;
    let total = padded.len();
    if pad_length + 1 > total {
        return Err(CipherError::BadPadding);
    }
    Ok(&padded[..total - pad_length - 1])
}

/// Encrypt `plaintext` under `key` with a caller-supplied random `iv`,
/// returning the padded ciphertext (same length as the padded plaintext)
pub fn encrypt(key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
    if key.len() != KEY_SIZE {
        return Err(CipherError::WrongKeySize(key.len()));
    }
    if iv.len() != BLOCK_SIZE {
        return Err(CipherError::WrongIvSize(iv.len()));
    }

    let mut buffer = pad(plaintext);
    let padded_len = buffer.len();
    let encryptor = Encryptor::new_from_slices(key, iv)
        .map_err(|_| CipherError::WrongKeySize(key.len()))?;
    encryptor
        .encrypt_padded_mut::<cbc::cipher::block_padding::NoPadding>(&mut buffer, padded_len)
        .map_err(|_| CipherError::MalformedCiphertext)?;
    Ok(buffer)
}

/// Decrypt `ciphertext` under `key`/`iv` and strip the IKEv2 padding,
/// returning the original plaintext
pub fn decrypt(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CipherError> {
    if key.len() != KEY_SIZE {
        return Err(CipherError::WrongKeySize(key.len()));
    }
    if iv.len() != BLOCK_SIZE {
        return Err(CipherError::WrongIvSize(iv.len()));
    }
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(CipherError::MalformedCiphertext);
    }

    let mut buffer = ciphertext.to_vec();
    let decryptor = Decryptor::new_from_slices(key, iv)
        .map_err(|_| CipherError::WrongKeySize(key.len()))?;
    let len = buffer.len();
    decryptor
        .decrypt_padded_mut::<cbc::cipher::block_padding::NoPadding>(&mut buffer[..len])
        .map_err(|_| CipherError::MalformedCiphertext)?;

    let plaintext = unpad(&buffer)?;
    Ok(plaintext.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_reaches_a_block_multiple() {
        for len in 0..40 {
            let data = vec![0xABu8; len];
            let padded = pad(&data);
            assert_eq!(padded.len() % BLOCK_SIZE, 0);
            assert!(padded.len() > data.len());
        }
    }

    #[test]
    fn pad_then_unpad_roundtrips() {
        for len in 0..40 {
            let data = vec![0x11u8; len];
            let padded = pad(&data);
            let unpadded = unpad(&padded).unwrap();
            assert_eq!(unpadded, data.as_slice());
        }
    }

    #[test]
    fn encrypt_then_decrypt_roundtrips() {
        let key = [0x5Au8; KEY_SIZE];
        let iv = [0x01u8; BLOCK_SIZE];
        let plaintext = b"this is a secret child SA negotiation payload";

        let ciphertext = encrypt(&key, &iv, plaintext).unwrap();
        assert_eq!(ciphertext.len() % BLOCK_SIZE, 0);

        let decrypted = decrypt(&key, &iv, &ciphertext).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn rejects_wrong_key_size() {
        let iv = [0u8; BLOCK_SIZE];
        assert!(encrypt(&[0u8; 10], &iv, b"x").is_err());
    }

    #[test]
    fn rejects_truncated_ciphertext() {
        let key = [0u8; KEY_SIZE];
        let iv = [0u8; BLOCK_SIZE];
        assert!(decrypt(&key, &iv, &[1, 2, 3]).is_err());
    }
}
