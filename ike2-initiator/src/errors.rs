//! The public error type surfaced by session operations

use ike2_proto::errors::{CodecError, GeneratorError};
use ike2_proto::primitives::cipher::CipherError;
use ike2_proto::primitives::dh::DhError;
use ike2_proto::primitives::prf::PrfError;
use thiserror::Error;

/// Failure while driving an IKE session
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum SessionError {
    #[error("malformed packet: {0}")]
    MalformedPacket(CodecError),
    #[error("an unknown payload with the critical bit set was encountered: type {0}")]
    UnsupportedCriticalPayload(u8),
    #[error("could not build packet: {0}")]
    Generator(#[from] GeneratorError),
    #[error("integrity check failed")]
    IntegrityCheckFailed,
    #[error("decryption failed")]
    DecryptionFailed(#[from] CipherError),
    #[error("Diffie-Hellman failure: {0}")]
    KeyAgreement(#[from] DhError),
    #[error("key expansion failure: {0}")]
    KeyExpansion(#[from] PrfError),
    #[error("protocol error: {0}")]
    ProtocolError(String),
    #[error("peer returned a notify error, message type {0}")]
    NotifyError(u16),
    #[error("authentication failed")]
    AuthenticationFailed,
    #[error("configuration error: {0}")]
    ConfigError(String),
    #[error("operation called in the wrong session state: expected {expected}, was in {actual}")]
    WrongState {
        /// State the caller needed the session to be in
        expected: &'static str,
        /// State the session was actually in
        actual: &'static str,
    },
}

impl From<CodecError> for SessionError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::UnsupportedCriticalPayload(payload_type) => {
                Self::UnsupportedCriticalPayload(payload_type)
            }
            other => Self::MalformedPacket(other),
        }
    }
}
