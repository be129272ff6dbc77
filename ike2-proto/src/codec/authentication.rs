//! Authentication payload encode/decode

use zerocopy::{AsBytes, FromBytes};

use crate::definitions::Authentication;
use crate::errors::CodecError;
use crate::header::AuthHeader;
use crate::params::AuthenticationMethod;

fn header_len() -> usize {
    std::mem::size_of::<AuthHeader>()
}

/// Encode an Authentication body: the 4-byte header followed by the MAC or signature
pub fn encode_authentication(auth: &Authentication) -> Vec<u8> {
    let header = AuthHeader {
        auth_method: auth.method as u8,
        reserved: [0; 3],
    };
    let mut out = header.as_bytes().to_vec();
    out.extend_from_slice(&auth.data);
    out
}

/// Decode an Authentication body from `bytes`
pub fn decode_authentication(bytes: &[u8]) -> Result<Authentication, CodecError> {
    if bytes.len() < header_len() {
        return Err(CodecError::PayloadTooShort);
    }
    let header = AuthHeader::read_from_prefix(bytes).ok_or(CodecError::BufferTooSmall)?;
    let method = AuthenticationMethod::try_from(header.auth_method)?;
    Ok(Authentication {
        method,
        data: bytes[header_len()..].to_vec(),
    })
}
