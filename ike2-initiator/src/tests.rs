//! Scenarios that need crate-internal state (the derived session keys) to
//! fabricate a self-consistent peer response, so they live here instead of
//! in `tests/end_to_end.rs`: this crate never implements a responder, and
//! there is no public accessor for `SK_er`/`SK_ar` to build one externally.

use ike2_proto::codec::{assemble_encrypted_body, decode_message, encode_message};
use ike2_proto::definitions::{IkeMessage, KeyExchange, Payload, SecurityAssociation};
use ike2_proto::params::{ExchangeType, KeyExchangeMethod, PayloadType};
use ike2_proto::primitives::cipher;
use ike2_proto::primitives::dh::DiffieHellman;
use ike2_proto::primitives::integrity;

use crate::config::{Credentials, SessionConfig};
use crate::session::{IkeSession, SessionState};

#[allow(clippy::unwrap_used)]
fn fresh_session() -> IkeSession {
    let config = SessionConfig::new(
        b"initiator@example.com".to_vec(),
        Credentials::Psk(b"foo".to_vec()),
    );
    IkeSession::new(config).unwrap()
}

/// Drive a session through `init()` and a fabricated valid SA_INIT response,
/// leaving it in `SaInitReceived` with real derived keys.
#[allow(clippy::unwrap_used)]
fn session_past_sa_init() -> IkeSession {
    let mut session = fresh_session();
    let request_bytes = session.init().unwrap();
    let request = decode_message(&request_bytes).unwrap();

    let mut peer_dh = DiffieHellman::generate();
    let my_ke = request
        .payloads
        .iter()
        .find_map(|p| match p {
            Payload::KeyExchange(ke) => Some(ke),
            _ => None,
        })
        .unwrap();
    peer_dh.derive(&my_ke.data).unwrap();

    let response = IkeMessage {
        initiator_spi: request.initiator_spi,
        responder_spi: 0xAABBCCDDEEFF0011,
        exchange_type: ExchangeType::IkeSaInit,
        initiator: false,
        response: true,
        message_id: 0,
        payloads: vec![
            Payload::SecurityAssociation(SecurityAssociation {
                proposals: vec![ike2_proto::registry::default_ike_sa_proposal(vec![]).unwrap()],
            }),
            Payload::KeyExchange(KeyExchange {
                dh_group: KeyExchangeMethod::DhGroup14,
                data: peer_dh.public_value_bytes(),
            }),
            Payload::Nonce(vec![0x55; 32]),
        ],
    };
    let response_bytes = encode_message(&response).unwrap();
    session.receive_sa_init_response(&response_bytes).unwrap();
    session
}

/// S4 — a corrupted MAC on an IKE_AUTH-shaped packet is rejected, and the
/// session is left untouched rather than moved to `Failed`.
#[test]
#[allow(clippy::unwrap_used)]
fn integrity_rejection_leaves_session_untouched() {
    let mut session = session_past_sa_init();
    session.auth().unwrap();
    assert_eq!(session.state(), SessionState::AuthSent);

    let keys = session.keys.as_ref().unwrap();
    let plaintext = b"pretend this is IDr||AUTH||SA||TSi||TSr";
    let iv = [0x07u8; cipher::BLOCK_SIZE];
    let ciphertext = cipher::encrypt(&keys.sk_er, &iv, plaintext).unwrap();
    let placeholder_mac = [0u8; integrity::MAC_SIZE];
    let body = assemble_encrypted_body(&iv, &ciphertext, &placeholder_mac);

    let message = IkeMessage {
        initiator_spi: session.initiator_spi(),
        responder_spi: session.responder_spi,
        exchange_type: ExchangeType::IkeAuth,
        initiator: false,
        response: true,
        message_id: 1,
        payloads: vec![Payload::EncryptedAndAuthenticated {
            first_inner_payload_type: PayloadType::IdentificationResponder as u8,
            body,
        }],
    };
    let mut bytes = encode_message(&message).unwrap();
    let mac_region_end = bytes.len() - integrity::MAC_SIZE;
    let mac = integrity::compute(&keys.sk_ar, &bytes[..mac_region_end]);
    bytes[mac_region_end..].copy_from_slice(&mac);

    // flip the last byte of the MAC
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;

    let result = session.receive_auth_response(&bytes);
    assert!(matches!(result, Err(crate::errors::SessionError::IntegrityCheckFailed)));
    assert_eq!(session.state(), SessionState::AuthSent, "a forged packet must not mutate the session");
}
