//! Identification payload (IDi/IDr) encode/decode

use zerocopy::{AsBytes, FromBytes};

use crate::definitions::Identification;
use crate::errors::CodecError;
use crate::header::IdHeader;

fn header_len() -> usize {
    std::mem::size_of::<IdHeader>()
}

/// Encode an Identification body: the 4-byte header followed by the identity bytes
pub fn encode_identification(id: &Identification) -> Vec<u8> {
    let header = IdHeader {
        id_type: id.id_type,
        reserved: [0; 3],
    };
    let mut out = header.as_bytes().to_vec();
    out.extend_from_slice(&id.data);
    out
}

/// Decode an Identification body from `bytes`
pub fn decode_identification(bytes: &[u8]) -> Result<Identification, CodecError> {
    if bytes.len() < header_len() {
        return Err(CodecError::PayloadTooShort);
    }
    let header = IdHeader::read_from_prefix(bytes).ok_or(CodecError::BufferTooSmall)?;
    Ok(Identification {
        id_type: header.id_type,
        data: bytes[header_len()..].to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::IdType;

    #[test]
    fn identification_roundtrips() {
        let id = Identification {
            id_type: IdType::Rfc822Address as u8,
            data: b"initiator@example.com".to_vec(),
        };
        let bytes = encode_identification(&id);
        let decoded = decode_identification(&bytes).unwrap();
        assert_eq!(decoded, id);
    }
}
