//! Encrypted and Authenticated payload: wire-level layout only
//!
//! The payload body is opaque at this layer: `IV || ciphertext || ICV`. The
//! actual encryption, decryption and MAC computation live in
//! [`crate::primitives::cipher`] and [`crate::primitives::integrity`]; this
//! module only knows how to split and join the three fields, since their
//! sizes depend on the negotiated suite and aren't visible from the bytes
//! alone.

use crate::errors::CodecError;

/// Concatenate `iv`, `ciphertext` and `icv` into the Encrypted payload body
pub fn assemble(iv: &[u8], ciphertext: &[u8], icv: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(iv.len() + ciphertext.len() + icv.len());
    out.extend_from_slice(iv);
    out.extend_from_slice(ciphertext);
    out.extend_from_slice(icv);
    out
}

/// Split an Encrypted payload body into `(iv, ciphertext, icv)` given the
/// cipher's IV length and the integrity suite's MAC length
pub fn split<'a>(
    body: &'a [u8],
    iv_len: usize,
    mac_len: usize,
) -> Result<(&'a [u8], &'a [u8], &'a [u8]), CodecError> {
    if body.len() < iv_len + mac_len {
        return Err(CodecError::PayloadTooShort);
    }
    let (iv, rest) = body.split_at(iv_len);
    let (ciphertext, icv) = rest.split_at(rest.len() - mac_len);
    Ok((iv, ciphertext, icv))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assemble_then_split_roundtrips() {
        let iv = [1u8; 16];
        let ciphertext = vec![2u8; 48];
        let icv = [3u8; 16];

        let body = assemble(&iv, &ciphertext, &icv);
        let (got_iv, got_ct, got_icv) = split(&body, 16, 16).unwrap();

        assert_eq!(got_iv, iv);
        assert_eq!(got_ct, ciphertext.as_slice());
        assert_eq!(got_icv, icv);
    }

    #[test]
    fn split_rejects_too_short_body() {
        assert!(split(&[0u8; 10], 16, 16).is_err());
    }
}
