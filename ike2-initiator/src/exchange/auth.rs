//! `auth()`: build the encrypted, authenticated IKE_AUTH request

use ike2_proto::codec::{assemble_encrypted_body, encode_identification, encode_message, encode_payload_chain};
use ike2_proto::definitions::{
    Authentication, Identification, IkeMessage, Payload, SecurityAssociation, TrafficSelector,
    TrafficSelectors,
};
use ike2_proto::params::{AuthenticationMethod, ExchangeType, IntegrityAlgorithm, PayloadType};
use ike2_proto::primitives::cipher;
use ike2_proto::primitives::integrity;
use ike2_proto::primitives::prf::prf;
use ike2_proto::registry::default_esp_child_proposal;
use rand::RngCore;
use tracing::{debug, instrument};

use crate::config::Credentials;
use crate::errors::SessionError;
use crate::session::{IkeSession, SessionState};

/// The fixed key-pad constant PRF+'d with the PSK, RFC 7296 section 2.15
const KEY_PAD_FOR_IKEV2: &[u8] = b"Key Pad for IKEv2";

/// Build and emit the IKE_AUTH request: IDi, AUTH, SA (child), TSi, TSr,
/// encrypted and authenticated under the keys derived after IKE_SA_INIT.
#[instrument(skip_all)]
pub fn auth(session: &mut IkeSession) -> Result<Vec<u8>, SessionError> {
    session.require_state(SessionState::SaInitReceived)?;

    let keys = session
        .keys
        .as_ref()
        .ok_or_else(|| SessionError::ProtocolError("keys not derived yet".to_string()))?;
    let first_sent = session
        .first_sent
        .as_ref()
        .ok_or_else(|| SessionError::ProtocolError("first message not retained".to_string()))?;
    let nr = session
        .nr
        .as_ref()
        .ok_or_else(|| SessionError::ProtocolError("responder nonce not known".to_string()))?;

    let idi = Identification {
        id_type: session.config.id_type,
        data: session.config.identity.clone(),
    };
    let idi_body = encode_identification(&idi);
    let idi_mac = prf(&keys.sk_pi, &idi_body);

    let mut signed_octets = Vec::with_capacity(first_sent.len() + nr.len() + idi_mac.len());
    signed_octets.extend_from_slice(first_sent);
    signed_octets.extend_from_slice(nr);
    signed_octets.extend_from_slice(&idi_mac);

    let mac_size = IntegrityAlgorithm::AuthHmacSha2_256_128.mac_size();
    let (auth_method, auth_data) = match &session.config.credentials {
        Credentials::Psk(psk) => {
            let pad_key = prf(psk, KEY_PAD_FOR_IKEV2);
            let full = prf(&pad_key, &signed_octets);
            (
                AuthenticationMethod::SharedKeyMessageIntegrityCode,
                full[..mac_size].to_vec(),
            )
        }
        Credentials::Signing { sign, .. } => (
            AuthenticationMethod::RsaDigitalSignature,
            sign(&signed_octets)?,
        ),
    };

    let mut esp_spi = [0u8; 4];
    rand::rng().fill_bytes(&mut esp_spi);
    let child_proposal = default_esp_child_proposal(esp_spi.to_vec())?;

    let (ts_i, ts_r) = match &session.config.traffic_selectors {
        Some((i, r)) => (i.clone(), r.clone()),
        None => (TrafficSelector::default(), TrafficSelector::default()),
    };

    let payloads = vec![
        Payload::IdentificationInitiator(idi),
        Payload::Authentication(Authentication {
            method: auth_method,
            data: auth_data,
        }),
        Payload::SecurityAssociation(SecurityAssociation {
            proposals: vec![child_proposal.clone()],
        }),
        Payload::TrafficSelectorInitiator(TrafficSelectors {
            selectors: vec![ts_i],
        }),
        Payload::TrafficSelectorResponder(TrafficSelectors {
            selectors: vec![ts_r],
        }),
    ];

    let plaintext = encode_payload_chain(&payloads)?;

    let mut iv = [0u8; cipher::BLOCK_SIZE];
    rand::rng().fill_bytes(&mut iv);
    let ciphertext = cipher::encrypt(&keys.sk_ei, &iv, &plaintext)?;

    let placeholder_mac = vec![0u8; mac_size];
    let encrypted_body = assemble_encrypted_body(&iv, &ciphertext, &placeholder_mac);

    let message_id = 1;
    let message = IkeMessage {
        initiator_spi: session.initiator_spi,
        responder_spi: session.responder_spi,
        exchange_type: ExchangeType::IkeAuth,
        initiator: true,
        response: false,
        message_id,
        payloads: vec![Payload::EncryptedAndAuthenticated {
            first_inner_payload_type: PayloadType::IdentificationInitiator as u8,
            body: encrypted_body,
        }],
    };

    let mut bytes = encode_message(&message)?;
    let mac_region_end = bytes.len() - mac_size;
    let mac = integrity::compute(&keys.sk_ai, &bytes[..mac_region_end]);
    bytes[mac_region_end..].copy_from_slice(&mac);

    debug!(bytes = bytes.len(), "built IKE_AUTH request");

    session.esp_spi_out = Some(esp_spi);
    session.message_id = message_id;
    session.state = SessionState::AuthSent;
    Ok(bytes)
}
