//! Key Exchange payload encode/decode

use zerocopy::{AsBytes, FromBytes};

use crate::definitions::KeyExchange;
use crate::errors::CodecError;
use crate::header::KeyExchangeHeader;
use crate::params::KeyExchangeMethod;

/// Encode a Key Exchange body: the 4-byte header followed by the public value
pub fn encode_key_exchange(ke: &KeyExchange) -> Vec<u8> {
    let header = KeyExchangeHeader {
        dh_group_num: (ke.dh_group as u16).into(),
        reserved: 0u16.into(),
    };
    let mut out = header.as_bytes().to_vec();
    out.extend_from_slice(&ke.data);
    out
}

/// Decode a Key Exchange body from `bytes`
pub fn decode_key_exchange(bytes: &[u8]) -> Result<KeyExchange, CodecError> {
    let header_len = std::mem::size_of::<KeyExchangeHeader>();
    if bytes.len() < header_len {
        return Err(CodecError::PayloadTooShort);
    }
    let header = KeyExchangeHeader::read_from_prefix(bytes).ok_or(CodecError::BufferTooSmall)?;
    let dh_group = KeyExchangeMethod::try_from(header.dh_group_num.get())?;
    Ok(KeyExchange {
        dh_group,
        data: bytes[header_len..].to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_exchange_roundtrips() {
        let ke = KeyExchange {
            dh_group: KeyExchangeMethod::DhGroup14,
            data: vec![0xAB; 256],
        };
        let bytes = encode_key_exchange(&ke);
        let decoded = decode_key_exchange(&bytes).unwrap();
        assert_eq!(decoded, ke);
    }
}
