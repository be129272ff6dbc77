//! Receive path for the encrypted IKE_AUTH response

use ike2_proto::codec::{decode_message, decode_payload_chain, split_encrypted_body};
use ike2_proto::definitions::{Payload, Proposal, SecurityAssociation};
use ike2_proto::params::ExchangeType;
use ike2_proto::primitives::cipher::{self, BLOCK_SIZE};
use ike2_proto::primitives::integrity::{self, MAC_SIZE};
use tracing::{instrument, warn};

use crate::errors::SessionError;
use crate::session::{EstablishedSa, IkeSession, SessionState};

/// Parse and verify the IKE_AUTH response. On an integrity failure the
/// session is left untouched so the caller may retry or abandon it; any
/// other failure moves the session to [`SessionState::Failed`].
#[instrument(skip_all)]
pub fn receive_auth_response(
    session: &mut IkeSession,
    bytes: &[u8],
) -> Result<EstablishedSa, SessionError> {
    session.require_state(SessionState::AuthSent)?;

    let sk_ar = session
        .keys
        .as_ref()
        .map(|k| k.sk_ar.clone())
        .ok_or_else(|| SessionError::ProtocolError("keys not derived yet".to_string()))?;

    let message = decode_message(bytes).map_err(|err| {
        session.fail();
        SessionError::from(err)
    })?;

    if message.exchange_type != ExchangeType::IkeAuth || !message.response {
        session.fail();
        return Err(SessionError::ProtocolError(
            "expected an IKE_AUTH response".to_string(),
        ));
    }

    let (first_inner_payload_type, encrypted_body) = message
        .payloads
        .iter()
        .find_map(|p| match p {
            Payload::EncryptedAndAuthenticated {
                first_inner_payload_type,
                body,
            } => Some((*first_inner_payload_type, body)),
            _ => None,
        })
        .ok_or_else(|| {
            session.fail();
            SessionError::ProtocolError("IKE_AUTH response carries no Encrypted payload".to_string())
        })?;

    let mac_region_end = bytes.len().saturating_sub(MAC_SIZE);
    if mac_region_end == 0 || mac_region_end > bytes.len() {
        session.fail();
        return Err(SessionError::ProtocolError(
            "IKE_AUTH response too short for a trailing MAC".to_string(),
        ));
    }

    // Verify the integrity check before touching session state at all: a
    // forged or corrupted packet must not move a retryable session to Failed.
    if !integrity::verify(&sk_ar, &bytes[..mac_region_end], &bytes[mac_region_end..]) {
        warn!("IKE_AUTH response failed integrity check");
        return Err(SessionError::IntegrityCheckFailed);
    }

    let sk_er = session.keys.as_ref().expect("checked above").sk_er.clone();

    let (iv, ciphertext, _icv) = split_encrypted_body(encrypted_body, BLOCK_SIZE, MAC_SIZE)
        .map_err(|err| {
            session.fail();
            SessionError::from(err)
        })?;

    let plaintext = cipher::decrypt(&sk_er, iv, ciphertext).map_err(|err| {
        session.fail();
        SessionError::from(err)
    })?;

    let inner_payloads = decode_payload_chain(first_inner_payload_type, &plaintext).map_err(|err| {
        session.fail();
        SessionError::from(err)
    })?;

    for payload in &inner_payloads {
        if let Payload::Notify(notify) = payload {
            if notify.is_error() {
                warn!(message_type = notify.message_type, "peer returned a notify error");
                session.fail();
                return Err(SessionError::NotifyError(notify.message_type));
            }
        }
    }

    let peer_child_sa: Option<Proposal> = inner_payloads.iter().find_map(|p| match p {
        Payload::SecurityAssociation(SecurityAssociation { proposals }) => proposals.first().cloned(),
        _ => None,
    });
    if peer_child_sa.is_none() {
        session.fail();
        return Err(SessionError::ProtocolError(
            "IKE_AUTH response is missing the child SA proposal".to_string(),
        ));
    }
    let child_proposal = peer_child_sa.expect("checked above");

    let keys = session.keys.take().expect("checked above");
    let esp_spi_out = session
        .esp_spi_out
        .take()
        .ok_or_else(|| SessionError::ProtocolError("no outbound ESP SPI recorded".to_string()))?;

    session.state = SessionState::Established;

    Ok(EstablishedSa {
        initiator_spi: session.initiator_spi,
        responder_spi: session.responder_spi,
        esp_spi_out,
        child_proposal,
        sk_ei: keys.sk_ei,
        sk_er: keys.sk_er,
        sk_ai: keys.sk_ai,
        sk_ar: keys.sk_ar,
        sk_d: keys.sk_d,
    })
}
