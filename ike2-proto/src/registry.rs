//! Fixed registry resolving transform names to numeric transform ids, and the
//! default proposals built from it
//!
//! Mirrors the proposal construction in `ike/payloads.py`'s `SA.__init__`
//! default proposals, generalized into a name-based resolver instead of
//! inlining the numeric ids at each call site.

use crate::definitions::{Proposal, Transform};
use crate::errors::GeneratorError;
use crate::params::{
    EncryptionAlgorithm, IntegrityAlgorithm, KeyExchangeMethod, PseudorandomFunction,
    SecurityProtocol, SequenceNumbers,
};

/// Resolve a transform by its IANA registry name (e.g. `"ENCR_CAMELLIA_CBC"`)
/// and an optional key length attribute, in bits
pub fn resolve(name: &str, key_length: Option<u16>) -> Result<Transform, GeneratorError> {
    Ok(match name {
        "ENCR_CAMELLIA_CBC" => {
            Transform::Encryption(EncryptionAlgorithm::EncrCamelliaCbc, key_length)
        }
        "ENCR_AES_CBC" => Transform::Encryption(EncryptionAlgorithm::EncrAesCbc, key_length),
        "PRF_HMAC_SHA2_256" => {
            Transform::PseudoRandomFunction(PseudorandomFunction::PrfHmacSha2_256)
        }
        "AUTH_HMAC_SHA2_256_128" => {
            Transform::Integrity(IntegrityAlgorithm::AuthHmacSha2_256_128)
        }
        "DH_GROUP_14" => Transform::KeyExchange(KeyExchangeMethod::DhGroup14),
        "ESN_NO" | "NO_ESN" => Transform::SequenceNumbers(SequenceNumbers::NoEsn),
        "ESN" => Transform::SequenceNumbers(SequenceNumbers::Esn),
        other => return Err(GeneratorError::UnknownTransformName(other.to_string())),
    })
}

/// Build the default IKE SA proposal offered in IKE_SA_INIT: Camellia-256-CBC,
/// PRF-HMAC-SHA2-256, AUTH-HMAC-SHA2-256-128, DH group 14
pub fn default_ike_sa_proposal(spi: Vec<u8>) -> Result<Proposal, GeneratorError> {
    let mut proposal = Proposal::new(SecurityProtocol::InternetKeyExchange, spi);
    proposal.transforms.push(resolve("ENCR_CAMELLIA_CBC", Some(256))?);
    proposal.transforms.push(resolve("PRF_HMAC_SHA2_256", None)?);
    proposal
        .transforms
        .push(resolve("AUTH_HMAC_SHA2_256_128", None)?);
    proposal.transforms.push(resolve("DH_GROUP_14", None)?);
    Ok(proposal)
}

/// Build the default ESP child SA proposal offered in IKE_AUTH: Camellia-256-CBC,
/// AUTH-HMAC-SHA2-256-128, no extended sequence numbers
pub fn default_esp_child_proposal(spi: Vec<u8>) -> Result<Proposal, GeneratorError> {
    let mut proposal = Proposal::new(SecurityProtocol::EncapsulatingSecurityPayload, spi);
    proposal.transforms.push(resolve("ENCR_CAMELLIA_CBC", Some(256))?);
    proposal
        .transforms
        .push(resolve("AUTH_HMAC_SHA2_256_128", None)?);
    proposal.transforms.push(resolve("ESN_NO", None)?);
    Ok(proposal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_names() {
        assert_eq!(
            resolve("ENCR_CAMELLIA_CBC", Some(256)).unwrap(),
            Transform::Encryption(EncryptionAlgorithm::EncrCamelliaCbc, Some(256))
        );
        assert_eq!(
            resolve("DH_GROUP_14", None).unwrap(),
            Transform::KeyExchange(KeyExchangeMethod::DhGroup14)
        );
    }

    #[test]
    fn rejects_unknown_names() {
        assert!(resolve("ENCR_MADE_UP", None).is_err());
    }

    #[test]
    fn default_ike_proposal_has_four_transforms() {
        let p = default_ike_sa_proposal(vec![]).unwrap();
        assert_eq!(p.transforms.len(), 4);
        assert_eq!(p.protocol, SecurityProtocol::InternetKeyExchange);
    }
}
