//! `init()`: build the IKE_SA_INIT request

use ike2_proto::codec::encode_message;
use ike2_proto::definitions::{IkeMessage, Payload, SecurityAssociation};
use ike2_proto::params::ExchangeType;
use ike2_proto::registry::default_ike_sa_proposal;
use tracing::{debug, instrument};

use crate::errors::SessionError;
use crate::session::{IkeSession, SessionState};

/// Build and emit the IKE_SA_INIT request: SA, KE, Nonce, in that order.
/// The emitted bytes are retained verbatim for later transcript signing.
#[instrument(skip_all)]
pub fn init(session: &mut IkeSession) -> Result<Vec<u8>, SessionError> {
    session.require_state(SessionState::Start)?;

    let proposal = default_ike_sa_proposal(vec![])?;
    let sa = Payload::SecurityAssociation(SecurityAssociation {
        proposals: vec![proposal],
    });
    let ke = Payload::KeyExchange(ike2_proto::definitions::KeyExchange {
        dh_group: session.config.dh_group,
        data: session.dh.public_value_bytes(),
    });
    let nonce = Payload::Nonce(session.ni.clone());

    let message = IkeMessage {
        initiator_spi: session.initiator_spi,
        responder_spi: 0,
        exchange_type: ExchangeType::IkeSaInit,
        initiator: true,
        response: false,
        message_id: 0,
        payloads: vec![sa, ke, nonce],
    };

    let bytes = encode_message(&message)?;
    debug!(bytes = bytes.len(), "built IKE_SA_INIT request");

    session.first_sent = Some(bytes.clone());
    session.state = SessionState::SaInitSent;
    Ok(bytes)
}
