//! The per-SA session: lifecycle state and everything the exchange engine
//! and receive path operate on

use std::fmt;

use ike2_proto::definitions::Proposal;
use ike2_proto::primitives::dh::DiffieHellman;
use rand::RngCore;
use tracing::instrument;
use zeroize::Zeroizing;

use crate::config::SessionConfig;
use crate::derive::DerivedKeys;
use crate::errors::SessionError;

/// Lifecycle state of an [`IkeSession`], see the state machine in the design notes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Session created, nothing sent yet
    Start,
    /// `init()` has been called, awaiting the IKE_SA_INIT response
    SaInitSent,
    /// IKE_SA_INIT response processed and keys derived, ready for `auth()`
    SaInitReceived,
    /// `auth()` has been called, awaiting the IKE_AUTH response
    AuthSent,
    /// IKE_AUTH response verified, the child SA is usable
    Established,
    /// A transition failed; the session must be discarded
    Failed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "START",
            Self::SaInitSent => "SA_INIT_SENT",
            Self::SaInitReceived => "SA_INIT_RECEIVED",
            Self::AuthSent => "AUTH_SENT",
            Self::Established => "ESTABLISHED",
            Self::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// The negotiated child SA, handed to the caller once the IKE_AUTH response
/// has been verified. Carries the key material the ESP data plane needs;
/// it is never printed via `Debug` and is wiped on drop.
pub struct EstablishedSa {
    /// SPI we chose for the IKE SA
    pub initiator_spi: u64,
    /// SPI the peer chose for the IKE SA
    pub responder_spi: u64,
    /// SPI we chose for the outbound ESP child SA
    pub esp_spi_out: [u8; 4],
    /// The proposal the responder chose for the ESP child SA, as echoed in
    /// the IKE_AUTH response, not our own offer
    pub child_proposal: Proposal,
    /// Encryption key for packets we send over the child SA
    pub sk_ei: Zeroizing<Vec<u8>>,
    /// Encryption key for packets the peer sends over the child SA
    pub sk_er: Zeroizing<Vec<u8>>,
    /// Integrity key for packets we send
    pub sk_ai: Zeroizing<Vec<u8>>,
    /// Integrity key for packets the peer sends
    pub sk_ar: Zeroizing<Vec<u8>>,
    /// Key used to derive further child SA keying material
    pub sk_d: Zeroizing<Vec<u8>>,
}

impl fmt::Debug for EstablishedSa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EstablishedSa")
            .field("initiator_spi", &self.initiator_spi)
            .field("responder_spi", &self.responder_spi)
            .field("esp_spi_out", &self.esp_spi_out)
            .field("child_proposal", &self.child_proposal)
            .finish_non_exhaustive()
    }
}

/// The state an `IkeSession` owns across the two-exchange handshake
pub struct IkeSession {
    pub(crate) config: SessionConfig,
    pub(crate) state: SessionState,
    pub(crate) initiator_spi: u64,
    pub(crate) responder_spi: u64,
    pub(crate) ni: Vec<u8>,
    pub(crate) nr: Option<Vec<u8>>,
    pub(crate) dh: DiffieHellman,
    pub(crate) shared_secret: Option<Zeroizing<Vec<u8>>>,
    pub(crate) keys: Option<DerivedKeys>,
    pub(crate) esp_spi_out: Option<[u8; 4]>,
    pub(crate) message_id: u32,
    pub(crate) first_sent: Option<Vec<u8>>,
    pub(crate) first_received: Option<Vec<u8>>,
}

impl IkeSession {
    /// Create a fresh session in [`SessionState::Start`]: samples the
    /// initiator SPI, the initiator nonce, and the DH keypair
    #[instrument(skip_all)]
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;

        let mut spi_bytes = [0u8; 8];
        loop {
            rand::rng().fill_bytes(&mut spi_bytes);
            if spi_bytes != [0u8; 8] {
                break;
            }
        }

        let mut ni = vec![0u8; config.nonce_length];
        rand::rng().fill_bytes(&mut ni);

        Ok(Self {
            config,
            state: SessionState::Start,
            initiator_spi: u64::from_be_bytes(spi_bytes),
            responder_spi: 0,
            ni,
            nr: None,
            dh: DiffieHellman::generate(),
            shared_secret: None,
            keys: None,
            esp_spi_out: None,
            message_id: 0,
            first_sent: None,
            first_received: None,
        })
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// SPI this side chose for the IKE SA
    pub fn initiator_spi(&self) -> u64 {
        self.initiator_spi
    }

    pub(crate) fn require_state(&self, expected: SessionState) -> Result<(), SessionError> {
        if self.state != expected {
            return Err(SessionError::WrongState {
                expected: state_name(expected),
                actual: state_name(self.state),
            });
        }
        Ok(())
    }

    pub(crate) fn fail(&mut self) {
        self.state = SessionState::Failed;
    }
}

fn state_name(state: SessionState) -> &'static str {
    match state {
        SessionState::Start => "START",
        SessionState::SaInitSent => "SA_INIT_SENT",
        SessionState::SaInitReceived => "SA_INIT_RECEIVED",
        SessionState::AuthSent => "AUTH_SENT",
        SessionState::Established => "ESTABLISHED",
        SessionState::Failed => "FAILED",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;

    #[test]
    fn new_session_starts_with_nonzero_spi_and_start_state() {
        let config = SessionConfig::new(b"initiator@example.com".to_vec(), Credentials::Psk(vec![1, 2, 3]));
        let session = IkeSession::new(config).unwrap();
        assert_eq!(session.state(), SessionState::Start);
        assert_ne!(session.initiator_spi(), 0);
    }

    #[test]
    fn require_state_rejects_mismatch() {
        let config = SessionConfig::new(b"initiator@example.com".to_vec(), Credentials::Psk(vec![1]));
        let session = IkeSession::new(config).unwrap();
        assert!(session.require_state(SessionState::AuthSent).is_err());
        assert!(session.require_state(SessionState::Start).is_ok());
    }
}
