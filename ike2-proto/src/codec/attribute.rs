//! Transform attribute (TV format) encode/decode
//!
//! Only the fixed-length (TV) format is used by this crate; the
//! variable-length (TLV) format exists in the registry but has no attribute
//! that needs it here.

use zerocopy::{AsBytes, FromBytes};

use crate::definitions::Attribute;
use crate::errors::CodecError;
use crate::header::AttributeHeaderTv;
use crate::params::{AttributeType, FLAG_ATTRIBUTE_FORMAT};

/// Encode a single attribute in TV format (4 bytes)
pub fn encode_attribute(attribute: &Attribute) -> Vec<u8> {
    let Attribute::KeyLength(bits) = attribute;
    let header = AttributeHeaderTv {
        attribute_type: (FLAG_ATTRIBUTE_FORMAT | AttributeType::KeyLength as u16).into(),
        attribute_value: (*bits).into(),
    };
    header.as_bytes().to_vec()
}

/// Decode one TV attribute from the front of `bytes`, returning it together
/// with the number of bytes consumed (always 4)
pub fn decode_attribute(bytes: &[u8]) -> Result<(Attribute, usize), CodecError> {
    let header =
        AttributeHeaderTv::read_from_prefix(bytes).ok_or(CodecError::BufferTooSmall)?;
    let raw_type = header.attribute_type.get() & !FLAG_ATTRIBUTE_FORMAT;
    match raw_type {
        t if t == AttributeType::KeyLength as u16 => Ok((
            Attribute::KeyLength(header.attribute_value.get()),
            std::mem::size_of::<AttributeHeaderTv>(),
        )),
        _ => Err(CodecError::ProtocolViolation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_length_roundtrips() {
        let attr = Attribute::KeyLength(256);
        let bytes = encode_attribute(&attr);
        assert_eq!(bytes.len(), 4);
        let (decoded, consumed) = decode_attribute(&bytes).unwrap();
        assert_eq!(decoded, attr);
        assert_eq!(consumed, 4);
    }
}
