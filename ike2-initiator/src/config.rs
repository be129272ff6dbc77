//! Session configuration and credential material
//!
//! Credentials are always supplied explicitly by the caller; this crate
//! never falls back to a hard-coded PSK or identity.

use ike2_proto::definitions::TrafficSelector;
use ike2_proto::params::{IdType, KeyExchangeMethod};
use zeroize::Zeroize;

use crate::errors::SessionError;

/// Default nonce length in bytes
pub const DEFAULT_NONCE_LENGTH: usize = 32;
/// Minimum permitted nonce length
pub const MIN_NONCE_LENGTH: usize = 16;
/// Maximum permitted nonce length
pub const MAX_NONCE_LENGTH: usize = 256;

/// How the initiator proves its identity during `auth()`
pub enum Credentials {
    /// Pre-shared key authentication (AUTH method 2)
    Psk(Vec<u8>),
    /// Signature-based authentication (AUTH method 1): an externally supplied
    /// signing callback and an optional certificate payload body
    Signing {
        /// Signs `signed_octets` and returns the raw signature bytes
        sign: Box<dyn Fn(&[u8]) -> Result<Vec<u8>, SessionError> + Send + Sync>,
        /// Certificate payload body, if the peer should be sent one
        cert: Option<Vec<u8>>,
    },
}

impl Drop for Credentials {
    fn drop(&mut self) {
        if let Credentials::Psk(key) = self {
            key.zeroize();
        }
    }
}

/// Everything `init()`/`auth()` need besides the negotiated suite, which is
/// fixed to the proposal built by [`ike2_proto::registry`]
pub struct SessionConfig {
    /// Identification type sent in IDi, default [`IdType::Rfc822Address`]
    pub id_type: u8,
    /// Identity bytes sent in IDi
    pub identity: Vec<u8>,
    /// Explicit traffic selector pair (initiator, responder); `None` sends
    /// the wildcard IPv4 selector on both sides
    pub traffic_selectors: Option<(TrafficSelector, TrafficSelector)>,
    /// Diffie-Hellman group to use, only [`KeyExchangeMethod::DhGroup14`] is
    /// implemented
    pub dh_group: KeyExchangeMethod,
    /// Length in bytes of the nonce this side generates
    pub nonce_length: usize,
    /// How this side authenticates itself
    pub credentials: Credentials,
}

impl SessionConfig {
    /// Build a config with the RFC822-address identity type and the default
    /// nonce length, wildcard traffic selectors, and DH group 14
    pub fn new(identity: Vec<u8>, credentials: Credentials) -> Self {
        Self {
            id_type: IdType::Rfc822Address as u8,
            identity,
            traffic_selectors: None,
            dh_group: KeyExchangeMethod::DhGroup14,
            nonce_length: DEFAULT_NONCE_LENGTH,
            credentials,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), SessionError> {
        if self.nonce_length < MIN_NONCE_LENGTH || self.nonce_length > MAX_NONCE_LENGTH {
            return Err(SessionError::ConfigError(format!(
                "nonce length must be between {MIN_NONCE_LENGTH} and {MAX_NONCE_LENGTH}, got {}",
                self.nonce_length
            )));
        }
        if self.identity.is_empty() {
            return Err(SessionError::ConfigError(
                "identity must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = SessionConfig::new(b"initiator@example.com".to_vec(), Credentials::Psk(vec![1, 2, 3]));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_identity_is_rejected() {
        let config = SessionConfig::new(vec![], Credentials::Psk(vec![1]));
        assert!(config.validate().is_err());
    }

    #[test]
    fn nonce_length_out_of_range_is_rejected() {
        let mut config =
            SessionConfig::new(b"x@example.com".to_vec(), Credentials::Psk(vec![1]));
        config.nonce_length = 4;
        assert!(config.validate().is_err());
    }
}
