//! Errors produced while building or parsing the wire format

use thiserror::Error;

use crate::params::UnparseableParameter;

/// Failure while converting a high-level packet or payload into wire bytes
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum GeneratorError {
    #[error("a packet cannot carry 255 or more payloads")]
    TooManyPayloads,
    #[error("a security association cannot carry 255 or more proposals")]
    TooManyProposals,
    #[error("a nonce must be between 16 and 256 bytes")]
    InvalidNonceLength,
    #[error("an SPI field exceeds 255 bytes")]
    SpiTooLong,
    #[error("a traffic selector list must not be empty")]
    EmptySelectorList,
    #[error("unknown transform name in registry: {0}")]
    UnknownTransformName(String),
    #[error("a notification for the IKE protocol must not carry an SPI")]
    NotifySpiMustBeAbsentForIke,
}

/// Failure while parsing wire bytes into a high-level packet or payload
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum CodecError {
    #[error("buffer too small to contain the declared structure")]
    BufferTooSmall,
    #[error("wrong protocol version, expected IKEv2")]
    WrongVersion,
    #[error("parameter could not be parsed: {0}")]
    UnparseableParameter(#[from] UnparseableParameter),
    #[error("payload length field is smaller than the minimum header size")]
    PayloadTooShort,
    #[error("next_payload chain is inconsistent with the declared payload count")]
    ChainInconsistent,
    #[error("an unknown payload with the critical bit set was encountered: type {0}")]
    UnsupportedCriticalPayload(u8),
    #[error("a notification carries an SPI together with an IKE protocol id")]
    ProtocolViolation,
}
