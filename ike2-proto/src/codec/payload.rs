//! Dispatch between the generic payload header and each payload's own codec

use zerocopy::{AsBytes, FromBytes};

use super::authentication::{decode_authentication, encode_authentication};
use super::identification::{decode_identification, encode_identification};
use super::key_exchange::{decode_key_exchange, encode_key_exchange};
use super::notify::{decode_notify, encode_notify};
use super::security_association::{decode_security_association, encode_security_association};
use super::traffic_selector::{decode_traffic_selectors, encode_traffic_selectors};
use crate::definitions::Payload;
use crate::errors::{CodecError, GeneratorError};
use crate::header::{GenericPayloadHeader, FLAG_CRITICAL};
use crate::params::PayloadType;

pub(super) fn header_len() -> usize {
    std::mem::size_of::<GenericPayloadHeader>()
}

/// Encode just the body of a payload, i.e. everything after the 4-byte
/// generic payload header
pub(super) fn encode_body(payload: &Payload) -> Result<Vec<u8>, GeneratorError> {
    Ok(match payload {
        Payload::SecurityAssociation(sa) => encode_security_association(sa)?,
        Payload::KeyExchange(ke) => encode_key_exchange(ke),
        Payload::IdentificationInitiator(id) | Payload::IdentificationResponder(id) => {
            encode_identification(id)
        }
        Payload::Authentication(auth) => encode_authentication(auth),
        Payload::Nonce(data) => {
            if data.len() < 16 || data.len() > 256 {
                return Err(GeneratorError::InvalidNonceLength);
            }
            data.clone()
        }
        Payload::Notify(notify) => encode_notify(notify)?,
        Payload::VendorID(data) => data.clone(),
        Payload::TrafficSelectorInitiator(ts) | Payload::TrafficSelectorResponder(ts) => {
            encode_traffic_selectors(ts)?
        }
        Payload::EncryptedAndAuthenticated { body, .. } => body.clone(),
        Payload::Unknown { body, .. } => body.clone(),
    })
}

/// Whether this crate sets the critical flag when it builds this payload
/// itself (it never does - only payloads read off the wire carry a critical
/// flag this crate did not choose)
pub(super) fn is_critical(payload: &Payload) -> bool {
    matches!(payload, Payload::Unknown { critical, .. } if *critical)
}

/// Decode a single payload body, given its wire payload type byte, critical
/// flag, and the generic header's `next_payload` field. For every payload
/// type except Encrypted, `header_next_payload` is unused here and instead
/// returned by the caller as the next outer-chain type; for Encrypted it is
/// the wire type of the first payload inside the (still undecrypted) body.
pub(super) fn decode_body(
    payload_type_raw: u8,
    critical: bool,
    header_next_payload: u8,
    body: &[u8],
) -> Result<Payload, CodecError> {
    let payload_type = match PayloadType::try_from(payload_type_raw) {
        Ok(t) => t,
        Err(_) => {
            if critical {
                return Err(CodecError::UnsupportedCriticalPayload(payload_type_raw));
            }
            return Ok(Payload::Unknown {
                payload_type: payload_type_raw,
                critical,
                body: body.to_vec(),
            });
        }
    };

    Ok(match payload_type {
        PayloadType::SecurityAssociation => {
            Payload::SecurityAssociation(decode_security_association(body)?)
        }
        PayloadType::KeyExchange => Payload::KeyExchange(decode_key_exchange(body)?),
        PayloadType::IdentificationInitiator => {
            Payload::IdentificationInitiator(decode_identification(body)?)
        }
        PayloadType::IdentificationResponder => {
            Payload::IdentificationResponder(decode_identification(body)?)
        }
        PayloadType::Authentication => Payload::Authentication(decode_authentication(body)?),
        PayloadType::Nonce => {
            if body.len() < 16 || body.len() > 256 {
                return Err(CodecError::ProtocolViolation);
            }
            Payload::Nonce(body.to_vec())
        }
        PayloadType::Notify => Payload::Notify(decode_notify(body)?),
        PayloadType::VendorID => Payload::VendorID(body.to_vec()),
        PayloadType::TrafficSelectorInitiator => {
            Payload::TrafficSelectorInitiator(decode_traffic_selectors(body)?)
        }
        PayloadType::TrafficSelectorResponder => {
            Payload::TrafficSelectorResponder(decode_traffic_selectors(body)?)
        }
        PayloadType::EncryptedAndAuthenticated => Payload::EncryptedAndAuthenticated {
            first_inner_payload_type: header_next_payload,
            body: body.to_vec(),
        },
        PayloadType::NoNextPayload
        | PayloadType::Certificate
        | PayloadType::CertificateRequest
        | PayloadType::Delete
        | PayloadType::Configuration
        | PayloadType::ExtensibleAuthentication => {
            if critical {
                return Err(CodecError::UnsupportedCriticalPayload(payload_type_raw));
            }
            Payload::Unknown {
                payload_type: payload_type_raw,
                critical,
                body: body.to_vec(),
            }
        }
    })
}

/// Encode one payload together with its 4-byte generic header, given the
/// wire type byte to place in `next_payload`
pub(super) fn encode_with_header(
    payload: &Payload,
    next_payload: u8,
) -> Result<Vec<u8>, GeneratorError> {
    let body = encode_body(payload)?;

    // For Encrypted payloads this field does not name the next outer
    // payload (there isn't one) but the first payload inside the plaintext.
    let next_payload = match payload {
        Payload::EncryptedAndAuthenticated {
            first_inner_payload_type,
            ..
        } => *first_inner_payload_type,
        _ => next_payload,
    };

    let flags = if is_critical(payload) { FLAG_CRITICAL } else { 0 };
    let header = GenericPayloadHeader {
        next_payload,
        flags,
        payload_length: ((header_len() + body.len()) as u16).into(),
    };

    let mut out = header.as_bytes().to_vec();
    out.extend_from_slice(&body);
    Ok(out)
}

/// Decode one payload (header + body) from the front of `bytes`. Returns the
/// payload, its wire type byte, the next payload's wire type byte, and the
/// number of bytes consumed.
pub(super) fn decode_with_header(
    wire_type: u8,
    bytes: &[u8],
) -> Result<(Payload, u8, usize), CodecError> {
    if bytes.len() < header_len() {
        return Err(CodecError::PayloadTooShort);
    }
    let header =
        GenericPayloadHeader::read_from_prefix(bytes).ok_or(CodecError::BufferTooSmall)?;
    let declared_len = header.payload_length.get() as usize;
    if declared_len < header_len() || bytes.len() < declared_len {
        return Err(CodecError::PayloadTooShort);
    }
    let critical = header.flags & FLAG_CRITICAL != 0;
    let body = &bytes[header_len()..declared_len];
    let payload = decode_body(wire_type, critical, header.next_payload, body)?;

    // An Encrypted payload's header.next_payload names the first inner
    // payload, not the next payload in this (outer) chain; this crate only
    // ever places it last, so the outer chain ends here.
    let outer_next_type = match payload {
        Payload::EncryptedAndAuthenticated { .. } => PayloadType::NoNextPayload as u8,
        _ => header.next_payload,
    };

    Ok((payload, outer_next_type, declared_len))
}
