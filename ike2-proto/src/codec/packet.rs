//! Full IKE message encode/decode: header, length, and payload chain

use zerocopy::{AsBytes, FromBytes};

use super::payload::{decode_with_header, encode_with_header};
use crate::definitions::{IkeMessage, Payload};
use crate::errors::{CodecError, GeneratorError};
use crate::header::IkeHeader;
use crate::params::{
    ExchangeType, PayloadType, FLAG_INITIATOR, FLAG_RESPONSE, IKE_VERSION,
};

fn ike_header_len() -> usize {
    std::mem::size_of::<IkeHeader>()
}

/// Encode a chain of payloads, each preceded by its 4-byte generic header
/// with `next_payload` rewritten to the following payload's wire type (or 0
/// for the last). Used both for whole messages and for the plaintext that
/// goes inside an Encrypted payload.
pub fn encode_payload_chain(payloads: &[Payload]) -> Result<Vec<u8>, GeneratorError> {
    if payloads.len() >= u8::MAX as usize {
        return Err(GeneratorError::TooManyPayloads);
    }
    let mut body = Vec::new();
    for (i, payload) in payloads.iter().enumerate() {
        let next_type = payloads
            .get(i + 1)
            .map(wire_type_of)
            .unwrap_or(PayloadType::NoNextPayload as u8);
        body.extend_from_slice(&encode_with_header(payload, next_type)?);
    }
    Ok(body)
}

fn first_payload_type(payloads: &[Payload]) -> u8 {
    payloads
        .first()
        .map(wire_type_of)
        .unwrap_or(PayloadType::NoNextPayload as u8)
}

/// Decode a chain of payloads starting at `bytes[0]` given the wire type of
/// the first payload. Used both for whole messages and for the plaintext
/// recovered from an Encrypted payload.
pub fn decode_payload_chain(
    first_type: u8,
    bytes: &[u8],
) -> Result<Vec<Payload>, CodecError> {
    let mut payloads = Vec::new();
    let mut offset = 0;
    let mut current_type = first_type;

    while current_type != PayloadType::NoNextPayload as u8 && offset < bytes.len() {
        let (payload, next_type, consumed) = decode_with_header(current_type, &bytes[offset..])?;
        payloads.push(payload);
        offset += consumed;
        current_type = next_type;
    }

    if current_type != PayloadType::NoNextPayload as u8 || offset != bytes.len() {
        return Err(CodecError::ChainInconsistent);
    }
    Ok(payloads)
}

/// Encode a complete IKE message: the 28-byte header followed by the
/// chained payload list
pub fn encode_message(message: &IkeMessage) -> Result<Vec<u8>, GeneratorError> {
    let first_payload_type = first_payload_type(&message.payloads);
    let body = encode_payload_chain(&message.payloads)?;

    let mut flags = 0u8;
    if message.initiator {
        flags |= FLAG_INITIATOR;
    }
    if message.response {
        flags |= FLAG_RESPONSE;
    }

    let total_length = ike_header_len() + body.len();
    let header = IkeHeader {
        initiator_spi: message.initiator_spi.into(),
        responder_spi: message.responder_spi.into(),
        next_payload: first_payload_type,
        version: IKE_VERSION,
        exchange_type: message.exchange_type as u8,
        flags,
        message_id: message.message_id.into(),
        length: (total_length as u32).into(),
    };

    let mut out = header.as_bytes().to_vec();
    out.extend_from_slice(&body);
    Ok(out)
}

fn wire_type_of(payload: &Payload) -> u8 {
    match payload {
        Payload::Unknown { payload_type, .. } => *payload_type,
        other => {
            let payload_type: PayloadType = other.into();
            payload_type as u8
        }
    }
}

/// Decode a complete IKE message from `bytes`
pub fn decode_message(bytes: &[u8]) -> Result<IkeMessage, CodecError> {
    if bytes.len() < ike_header_len() {
        return Err(CodecError::BufferTooSmall);
    }
    let header = IkeHeader::read_from_prefix(bytes).ok_or(CodecError::BufferTooSmall)?;
    if header.version != IKE_VERSION {
        return Err(CodecError::WrongVersion);
    }
    let declared_length = header.length.get() as usize;
    if declared_length < ike_header_len() || bytes.len() < declared_length {
        return Err(CodecError::BufferTooSmall);
    }

    let exchange_type = ExchangeType::try_from(header.exchange_type)?;
    let initiator = header.flags & FLAG_INITIATOR != 0;
    let response = header.flags & FLAG_RESPONSE != 0;

    let payloads = decode_payload_chain(
        header.next_payload,
        &bytes[ike_header_len()..declared_length],
    )?;

    Ok(IkeMessage {
        initiator_spi: header.initiator_spi.get(),
        responder_spi: header.responder_spi.get(),
        exchange_type,
        initiator,
        response,
        message_id: header.message_id.get(),
        payloads,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::SecurityAssociation;
    use crate::registry::default_ike_sa_proposal;

    fn sample_message() -> IkeMessage {
        IkeMessage {
            initiator_spi: 0x0102030405060708,
            responder_spi: 0,
            exchange_type: ExchangeType::IkeSaInit,
            initiator: true,
            response: false,
            message_id: 0,
            payloads: vec![
                Payload::SecurityAssociation(SecurityAssociation {
                    proposals: vec![default_ike_sa_proposal(vec![]).unwrap()],
                }),
                Payload::Nonce(vec![0x42; 32]),
            ],
        }
    }

    #[test]
    fn ike_sa_init_message_roundtrips() {
        let message = sample_message();
        let bytes = encode_message(&message).unwrap();
        let decoded = decode_message(&bytes).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn rejects_wrong_version() {
        let message = sample_message();
        let mut bytes = encode_message(&message).unwrap();
        bytes[17] = 0x10;
        assert!(matches!(decode_message(&bytes), Err(CodecError::WrongVersion)));
    }

    #[test]
    fn rejects_truncated_message() {
        let message = sample_message();
        let bytes = encode_message(&message).unwrap();
        assert!(decode_message(&bytes[..bytes.len() - 4]).is_err());
    }

    #[test]
    fn unknown_noncritical_payload_survives_roundtrip() {
        let mut message = sample_message();
        message.payloads.push(Payload::Unknown {
            payload_type: 200,
            critical: false,
            body: vec![1, 2, 3],
        });
        let bytes = encode_message(&message).unwrap();
        let decoded = decode_message(&bytes).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn encrypted_payload_header_carries_first_inner_type_not_chain_terminator() {
        let mut message = sample_message();
        message.payloads = vec![Payload::EncryptedAndAuthenticated {
            first_inner_payload_type: PayloadType::IdentificationInitiator as u8,
            body: vec![0u8; 48],
        }];
        let bytes = encode_message(&message).unwrap();
        assert_eq!(bytes[ike_header_len()], PayloadType::IdentificationInitiator as u8);

        let decoded = decode_message(&bytes).unwrap();
        assert_eq!(decoded.payloads.len(), 1);
        match &decoded.payloads[0] {
            Payload::EncryptedAndAuthenticated {
                first_inner_payload_type,
                body,
            } => {
                assert_eq!(*first_inner_payload_type, PayloadType::IdentificationInitiator as u8);
                assert_eq!(body.len(), 48);
            }
            other => panic!("expected EncryptedAndAuthenticated, got {other:?}"),
        }
    }

    #[test]
    fn single_empty_payload_with_terminal_next_payload_parses_with_no_remainder() {
        // An Unknown payload whose body is empty (declared length = 4,
        // the header alone) and next_payload = 0.
        let mut message = sample_message();
        message.payloads = vec![Payload::Unknown {
            payload_type: 200,
            critical: false,
            body: vec![],
        }];
        let bytes = encode_message(&message).unwrap();
        let decoded = decode_message(&bytes).unwrap();
        assert_eq!(decoded.payloads.len(), 1);
        match &decoded.payloads[0] {
            Payload::Unknown { body, .. } => assert!(body.is_empty()),
            other => panic!("expected Unknown, got {other:?}"),
        }
    }

    #[test]
    fn unknown_critical_payload_is_rejected() {
        let mut message = sample_message();
        message.payloads.push(Payload::Unknown {
            payload_type: 200,
            critical: true,
            body: vec![1, 2, 3],
        });
        let bytes = encode_message(&message).unwrap();
        assert!(matches!(
            decode_message(&bytes),
            Err(CodecError::UnsupportedCriticalPayload(200))
        ));
    }
}
