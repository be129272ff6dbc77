//! Security Association payload (the proposal list) encode/decode

use super::proposal::{decode_proposal, encode_proposal};
use crate::definitions::SecurityAssociation;
use crate::errors::{CodecError, GeneratorError};

/// Encode a Security Association body: the concatenated, numbered proposal list
pub fn encode_security_association(
    sa: &SecurityAssociation,
) -> Result<Vec<u8>, GeneratorError> {
    if sa.proposals.len() >= u8::MAX as usize {
        return Err(GeneratorError::TooManyProposals);
    }

    let mut out = Vec::new();
    let num_proposals = sa.proposals.len();
    for (i, proposal) in sa.proposals.iter().enumerate() {
        let proposal_num = (i + 1) as u8;
        let is_last = i + 1 == num_proposals;
        out.extend_from_slice(&encode_proposal(proposal, proposal_num, is_last)?);
    }
    Ok(out)
}

/// Decode a Security Association body from `bytes`
pub fn decode_security_association(bytes: &[u8]) -> Result<SecurityAssociation, CodecError> {
    let mut proposals = Vec::new();
    let mut offset = 0;
    while offset < bytes.len() {
        let (proposal, last, consumed) = decode_proposal(&bytes[offset..])?;
        proposals.push(proposal);
        offset += consumed;
        if last {
            break;
        }
    }
    if offset < bytes.len() {
        return Err(CodecError::ChainInconsistent);
    }
    Ok(SecurityAssociation { proposals })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::default_ike_sa_proposal;

    #[test]
    fn single_proposal_sa_roundtrips() {
        let sa = SecurityAssociation {
            proposals: vec![default_ike_sa_proposal(vec![]).unwrap()],
        };
        let bytes = encode_security_association(&sa).unwrap();
        let decoded = decode_security_association(&bytes).unwrap();
        assert_eq!(decoded, sa);
    }

    #[test]
    fn empty_sa_roundtrips_to_empty_proposal_list() {
        let sa = SecurityAssociation::default();
        let bytes = encode_security_association(&sa).unwrap();
        assert!(bytes.is_empty());
        let decoded = decode_security_association(&bytes).unwrap();
        assert_eq!(decoded.proposals.len(), 0);
    }
}
