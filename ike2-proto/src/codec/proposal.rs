//! Proposal (inside a Security Association) encode/decode

use zerocopy::{AsBytes, FromBytes};

use super::transform::{decode_transform, encode_transform};
use crate::definitions::Proposal;
use crate::errors::{CodecError, GeneratorError};
use crate::header::ProposalHeader;
use crate::params::SecurityProtocol;

fn header_len() -> usize {
    std::mem::size_of::<ProposalHeader>()
}

/// Encode one proposal, numbered `proposal_num` (1-based), with `last`
/// selecting the `last_substruct` byte
pub fn encode_proposal(
    proposal: &Proposal,
    proposal_num: u8,
    last: bool,
) -> Result<Vec<u8>, GeneratorError> {
    if proposal.spi.len() > u8::MAX as usize {
        return Err(GeneratorError::SpiTooLong);
    }
    if proposal.transforms.len() >= u8::MAX as usize {
        return Err(GeneratorError::TooManyProposals);
    }

    let mut transform_bytes = Vec::new();
    let num_transforms = proposal.transforms.len();
    for (i, transform) in proposal.transforms.iter().enumerate() {
        let is_last = i + 1 == num_transforms;
        transform_bytes.extend_from_slice(&encode_transform(transform, is_last));
    }

    let total_length = header_len() + proposal.spi.len() + transform_bytes.len();
    let header = ProposalHeader {
        last_substruct: if last { 0 } else { 2 },
        reserved: 0,
        proposal_length: (total_length as u16).into(),
        proposal_num,
        protocol_id: proposal.protocol as u8,
        spi_size: proposal.spi.len() as u8,
        num_transforms: num_transforms as u8,
    };

    let mut out = header.as_bytes().to_vec();
    out.extend_from_slice(&proposal.spi);
    out.extend_from_slice(&transform_bytes);
    Ok(out)
}

/// Decode one proposal from the front of `bytes`. Returns the proposal,
/// whether it was marked as the last one, and the number of bytes consumed.
pub fn decode_proposal(bytes: &[u8]) -> Result<(Proposal, bool, usize), CodecError> {
    let header = ProposalHeader::read_from_prefix(bytes).ok_or(CodecError::BufferTooSmall)?;
    let total_length = header.proposal_length.get() as usize;
    if total_length < header_len() || bytes.len() < total_length {
        return Err(CodecError::PayloadTooShort);
    }
    let last = header.last_substruct == 0;
    let spi_size = header.spi_size as usize;
    let after_header = header_len();
    if after_header + spi_size > total_length {
        return Err(CodecError::PayloadTooShort);
    }
    let spi = bytes[after_header..after_header + spi_size].to_vec();
    let protocol = SecurityProtocol::try_from(header.protocol_id)?;

    let mut transforms = Vec::with_capacity(header.num_transforms as usize);
    let mut offset = after_header + spi_size;
    if header.num_transforms > 0 {
        loop {
            let (transform, is_last, consumed) = decode_transform(&bytes[offset..total_length])?;
            transforms.push(transform);
            offset += consumed;
            if is_last || offset >= total_length {
                break;
            }
        }
    }
    if transforms.len() != header.num_transforms as usize {
        return Err(CodecError::ChainInconsistent);
    }

    Ok((
        Proposal {
            protocol,
            spi,
            transforms,
        },
        last,
        total_length,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::default_ike_sa_proposal;

    #[test]
    fn default_ike_proposal_roundtrips() {
        let proposal = default_ike_sa_proposal(vec![]).unwrap();
        let bytes = encode_proposal(&proposal, 1, true).unwrap();
        let (decoded, last, consumed) = decode_proposal(&bytes).unwrap();
        assert_eq!(decoded, proposal);
        assert!(last);
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn proposal_with_spi_roundtrips() {
        let proposal = default_ike_sa_proposal(vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let bytes = encode_proposal(&proposal, 1, false).unwrap();
        let (decoded, last, _) = decode_proposal(&bytes).unwrap();
        assert_eq!(decoded.spi, proposal.spi);
        assert!(!last);
    }

    #[test]
    fn proposal_with_zero_transforms_decodes_to_empty_list() {
        let proposal = Proposal {
            protocol: SecurityProtocol::InternetKeyExchange,
            spi: vec![],
            transforms: vec![],
        };
        let bytes = encode_proposal(&proposal, 1, true).unwrap();
        let (decoded, last, consumed) = decode_proposal(&bytes).unwrap();
        assert!(decoded.transforms.is_empty());
        assert!(last);
        assert_eq!(consumed, bytes.len());
    }
}
