//! # ike2-initiator
//!
//! Initiator-side engine for the IKEv2 IKE_SA_INIT and IKE_AUTH exchanges:
//! drives the Diffie-Hellman key agreement, key derivation, transcript
//! signing and the encrypted/authenticated IKE_AUTH message, producing an
//! established child SA's keying material. No socket I/O, no responder
//! role, no rekeying.

#![warn(missing_docs, clippy::unwrap_used, clippy::expect_used)]

pub mod config;
mod derive;
pub mod errors;
mod exchange;
mod recv;
pub mod session;
#[cfg(test)]
mod tests;

pub use config::{Credentials, SessionConfig};
pub use errors::SessionError;
pub use session::{EstablishedSa, IkeSession, SessionState};

impl IkeSession {
    /// Build the IKE_SA_INIT request. Must be called once, from
    /// [`SessionState::Start`].
    pub fn init(&mut self) -> Result<Vec<u8>, SessionError> {
        exchange::init(self)
    }

    /// Process the IKE_SA_INIT response, completing the DH agreement and
    /// deriving session keys. Must be called from
    /// [`SessionState::SaInitSent`].
    pub fn receive_sa_init_response(&mut self, bytes: &[u8]) -> Result<(), SessionError> {
        exchange::receive_sa_init_response(self, bytes)
    }

    /// Build the encrypted, authenticated IKE_AUTH request. Must be called
    /// from [`SessionState::SaInitReceived`].
    pub fn auth(&mut self) -> Result<Vec<u8>, SessionError> {
        exchange::auth(self)
    }

    /// Verify and decrypt the IKE_AUTH response, returning the established
    /// child SA on success. Must be called from [`SessionState::AuthSent`].
    pub fn receive_auth_response(&mut self, bytes: &[u8]) -> Result<EstablishedSa, SessionError> {
        recv::receive_auth_response(self, bytes)
    }
}
