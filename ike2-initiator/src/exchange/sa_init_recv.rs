//! Receive path for the (unencrypted) IKE_SA_INIT response

use ike2_proto::codec::decode_message;
use ike2_proto::definitions::Payload;
use ike2_proto::params::ExchangeType;
use tracing::{debug, instrument, warn};
use zeroize::Zeroizing;

use crate::derive::derive_keys;
use crate::errors::SessionError;
use crate::session::{IkeSession, SessionState};

/// Parse the IKE_SA_INIT response, complete the DH agreement, and derive
/// the session keys
#[instrument(skip_all)]
pub fn receive_sa_init_response(
    session: &mut IkeSession,
    bytes: &[u8],
) -> Result<(), SessionError> {
    session.require_state(SessionState::SaInitSent)?;

    let message = match decode_message(bytes) {
        Ok(m) => m,
        Err(err) => {
            session.fail();
            return Err(err.into());
        }
    };

    if message.exchange_type != ExchangeType::IkeSaInit || !message.response {
        session.fail();
        return Err(SessionError::ProtocolError(
            "expected an IKE_SA_INIT response".to_string(),
        ));
    }

    for payload in &message.payloads {
        if let Payload::Notify(notify) = payload {
            if notify.is_error() {
                warn!(message_type = notify.message_type, "peer returned a notify error");
                session.fail();
                return Err(SessionError::NotifyError(notify.message_type));
            }
        }
    }

    if message.responder_spi == 0 {
        session.fail();
        return Err(SessionError::ProtocolError(
            "responder SPI must not be zero in an IKE_SA_INIT response".to_string(),
        ));
    }

    let peer_ke = message.payloads.iter().find_map(|p| match p {
        Payload::KeyExchange(ke) => Some(ke),
        _ => None,
    });
    let nr = message.payloads.iter().find_map(|p| match p {
        Payload::Nonce(n) => Some(n.clone()),
        _ => None,
    });

    let (peer_ke, nr) = match (peer_ke, nr) {
        (Some(ke), Some(nr)) => (ke, nr),
        _ => {
            session.fail();
            return Err(SessionError::ProtocolError(
                "IKE_SA_INIT response is missing KE or Nonce".to_string(),
            ));
        }
    };

    let shared_secret = Zeroizing::new(session.dh.derive(&peer_ke.data)?);
    session.responder_spi = message.responder_spi;
    session.first_received = Some(bytes.to_vec());

    let keys = derive_keys(
        &session.ni,
        &nr,
        &shared_secret,
        session.initiator_spi,
        session.responder_spi,
    )?;
    debug!(key_size = crate::derive::DERIVED_KEY_SIZE, "derived session keys");

    session.nr = Some(nr);
    session.shared_secret = Some(shared_secret);
    session.keys = Some(keys);
    session.state = SessionState::SaInitReceived;
    Ok(())
}
