//! Notify payload encode/decode

use zerocopy::{AsBytes, FromBytes};

use crate::definitions::Notification;
use crate::errors::{CodecError, GeneratorError};
use crate::header::NotifyHeader;
use crate::params::SecurityProtocol;

fn header_len() -> usize {
    std::mem::size_of::<NotifyHeader>()
}

/// Encode a Notify body: the 4-byte header, an optional SPI, then the
/// notification data
pub fn encode_notify(notify: &Notification) -> Result<Vec<u8>, GeneratorError> {
    if notify.protocol == SecurityProtocol::InternetKeyExchange && notify.spi.is_some() {
        return Err(GeneratorError::NotifySpiMustBeAbsentForIke);
    }
    let spi = notify.spi.as_deref().unwrap_or(&[]);
    if spi.len() > u8::MAX as usize {
        return Err(GeneratorError::SpiTooLong);
    }

    let header = NotifyHeader {
        protocol_id: notify.protocol as u8,
        spi_size: spi.len() as u8,
        notify_message_type: notify.message_type.into(),
    };
    let mut out = header.as_bytes().to_vec();
    out.extend_from_slice(spi);
    out.extend_from_slice(&notify.data);
    Ok(out)
}

/// Decode a Notify body from `bytes`
pub fn decode_notify(bytes: &[u8]) -> Result<Notification, CodecError> {
    if bytes.len() < header_len() {
        return Err(CodecError::PayloadTooShort);
    }
    let header = NotifyHeader::read_from_prefix(bytes).ok_or(CodecError::BufferTooSmall)?;
    let protocol = SecurityProtocol::try_from(header.protocol_id)?;
    let spi_size = header.spi_size as usize;
    if header_len() + spi_size > bytes.len() {
        return Err(CodecError::PayloadTooShort);
    }
    if protocol == SecurityProtocol::InternetKeyExchange && spi_size != 0 {
        return Err(CodecError::ProtocolViolation);
    }

    let spi = if spi_size == 0 {
        None
    } else {
        Some(bytes[header_len()..header_len() + spi_size].to_vec())
    };
    let data = bytes[header_len() + spi_size..].to_vec();

    Ok(Notification {
        protocol,
        spi,
        message_type: header.notify_message_type.get(),
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::NotifyErrorMessageType;

    #[test]
    fn ike_protocol_notification_without_spi_roundtrips() {
        let notify = Notification {
            protocol: SecurityProtocol::InternetKeyExchange,
            spi: None,
            message_type: NotifyErrorMessageType::NoProposalChosen as u16,
            data: vec![],
        };
        let bytes = encode_notify(&notify).unwrap();
        let decoded = decode_notify(&bytes).unwrap();
        assert_eq!(decoded, notify);
        assert!(decoded.is_error());
    }

    #[test]
    fn esp_notification_with_spi_roundtrips() {
        let notify = Notification {
            protocol: SecurityProtocol::EncapsulatingSecurityPayload,
            spi: Some(vec![1, 2, 3, 4]),
            message_type: 16384,
            data: vec![9, 9],
        };
        let bytes = encode_notify(&notify).unwrap();
        let decoded = decode_notify(&bytes).unwrap();
        assert_eq!(decoded, notify);
        assert!(!decoded.is_error());
    }

    #[test]
    fn ike_protocol_with_spi_is_rejected() {
        let notify = Notification {
            protocol: SecurityProtocol::InternetKeyExchange,
            spi: Some(vec![1]),
            message_type: 1,
            data: vec![],
        };
        assert!(encode_notify(&notify).is_err());
    }
}
