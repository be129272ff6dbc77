//! Transform (inside a Proposal) encode/decode

use zerocopy::{AsBytes, FromBytes};

use super::attribute::{decode_attribute, encode_attribute};
use crate::definitions::{Attribute, Transform};
use crate::errors::CodecError;
use crate::header::TransformHeader;
use crate::params::{
    EncryptionAlgorithm, IntegrityAlgorithm, KeyExchangeMethod, PseudorandomFunction,
    SequenceNumbers, TransformType,
};

fn header_len() -> usize {
    std::mem::size_of::<TransformHeader>()
}

/// Encode one transform, with `last` selecting the `last_substruct` byte (0
/// if this is the final transform in the proposal, 3 otherwise)
pub fn encode_transform(transform: &Transform, last: bool) -> Vec<u8> {
    let (transform_type, transform_id, attribute) = match transform {
        Transform::Encryption(alg, key_length) => (
            TransformType::EncryptionAlgorithm,
            *alg as u16,
            key_length.map(Attribute::KeyLength),
        ),
        Transform::PseudoRandomFunction(prf) => {
            (TransformType::PseudoRandomFunction, *prf as u16, None)
        }
        Transform::Integrity(alg) => (TransformType::IntegrityAlgorithm, *alg as u16, None),
        Transform::KeyExchange(group) => (TransformType::KeyExchangeMethod, *group as u16, None),
        Transform::SequenceNumbers(esn) => (TransformType::SequenceNumbers, *esn as u16, None),
    };

    let attribute_bytes = attribute.as_ref().map(encode_attribute).unwrap_or_default();
    let total_length = header_len() + attribute_bytes.len();

    let header = TransformHeader {
        last_substruct: if last { 0 } else { 3 },
        reserved: 0,
        transform_length: (total_length as u16).into(),
        transform_type: transform_type as u8,
        reserved2: 0,
        transform_id: transform_id.into(),
    };

    let mut out = header.as_bytes().to_vec();
    out.extend_from_slice(&attribute_bytes);
    out
}

/// Decode one transform from the front of `bytes`. Returns the transform,
/// whether it was marked as the last one, and the number of bytes consumed.
pub fn decode_transform(bytes: &[u8]) -> Result<(Transform, bool, usize), CodecError> {
    let header = TransformHeader::read_from_prefix(bytes).ok_or(CodecError::BufferTooSmall)?;
    let total_length = header.transform_length.get() as usize;
    if total_length < header_len() || bytes.len() < total_length {
        return Err(CodecError::PayloadTooShort);
    }
    let last = header.last_substruct == 0;
    let body = &bytes[header_len()..total_length];
    let transform_type = TransformType::try_from(header.transform_type)?;
    let transform_id = header.transform_id.get();

    let transform = match transform_type {
        TransformType::EncryptionAlgorithm => {
            let alg = EncryptionAlgorithm::try_from(transform_id)?;
            let key_length = if body.is_empty() {
                None
            } else {
                let (attr, _) = decode_attribute(body)?;
                let Attribute::KeyLength(bits) = attr;
                Some(bits)
            };
            Transform::Encryption(alg, key_length)
        }
        TransformType::PseudoRandomFunction => {
            Transform::PseudoRandomFunction(PseudorandomFunction::try_from(transform_id)?)
        }
        TransformType::IntegrityAlgorithm => {
            Transform::Integrity(IntegrityAlgorithm::try_from(transform_id)?)
        }
        TransformType::KeyExchangeMethod => {
            Transform::KeyExchange(KeyExchangeMethod::try_from(transform_id)?)
        }
        TransformType::SequenceNumbers => {
            Transform::SequenceNumbers(SequenceNumbers::try_from(transform_id)?)
        }
    };

    Ok((transform, last, total_length))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encryption_transform_with_key_length_roundtrips() {
        let t = Transform::Encryption(EncryptionAlgorithm::EncrCamelliaCbc, Some(256));
        let bytes = encode_transform(&t, true);
        let (decoded, last, consumed) = decode_transform(&bytes).unwrap();
        assert_eq!(decoded, t);
        assert!(last);
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn dh_transform_without_attribute_roundtrips() {
        let t = Transform::KeyExchange(KeyExchangeMethod::DhGroup14);
        let bytes = encode_transform(&t, false);
        let (decoded, last, _) = decode_transform(&bytes).unwrap();
        assert_eq!(decoded, t);
        assert!(!last);
    }
}
