//! Traffic Selector payload (TSi/TSr) encode/decode
//!
//! This crate only builds and accepts the single-selector, IPv4
//! address-range form; see the Non-goals around multi-selector negotiation.

use zerocopy::{AsBytes, FromBytes};

use crate::definitions::{TrafficSelector, TrafficSelectors};
use crate::errors::{CodecError, GeneratorError};
use crate::header::{SelectorHeader, TrafficSelectorsHeader};
use crate::params::TrafficSelectorType;

fn list_header_len() -> usize {
    std::mem::size_of::<TrafficSelectorsHeader>()
}

fn selector_len() -> usize {
    std::mem::size_of::<SelectorHeader>()
}

fn encode_selector(selector: &TrafficSelector) -> Vec<u8> {
    let header = SelectorHeader {
        ts_type: selector.ts_type as u8,
        ip_protocol: selector.ip_protocol,
        selector_length: (selector_len() as u16).into(),
        start_port: selector.start_port.into(),
        end_port: selector.end_port.into(),
        start_addr: selector.start_addr,
        end_addr: selector.end_addr,
    };
    header.as_bytes().to_vec()
}

fn decode_selector(bytes: &[u8]) -> Result<(TrafficSelector, usize), CodecError> {
    let header = SelectorHeader::read_from_prefix(bytes).ok_or(CodecError::BufferTooSmall)?;
    let declared_len = header.selector_length.get() as usize;
    if declared_len != selector_len() {
        return Err(CodecError::ProtocolViolation);
    }
    let ts_type = match header.ts_type {
        t if t == TrafficSelectorType::TsIpv4AddrRange as u8 => TrafficSelectorType::TsIpv4AddrRange,
        t if t == TrafficSelectorType::TsIpv6AddrRange as u8 => TrafficSelectorType::TsIpv6AddrRange,
        _ => return Err(CodecError::ProtocolViolation),
    };
    Ok((
        TrafficSelector {
            ts_type,
            ip_protocol: header.ip_protocol,
            start_port: header.start_port.get(),
            end_port: header.end_port.get(),
            start_addr: header.start_addr,
            end_addr: header.end_addr,
        },
        declared_len,
    ))
}

/// Encode a Traffic Selector body: the 4-byte list header followed by each selector
pub fn encode_traffic_selectors(ts: &TrafficSelectors) -> Result<Vec<u8>, GeneratorError> {
    if ts.selectors.is_empty() {
        return Err(GeneratorError::EmptySelectorList);
    }
    if ts.selectors.len() > u8::MAX as usize {
        return Err(GeneratorError::EmptySelectorList);
    }

    let header = TrafficSelectorsHeader {
        num_selectors: ts.selectors.len() as u8,
        reserved: [0; 3],
    };
    let mut out = header.as_bytes().to_vec();
    for selector in &ts.selectors {
        out.extend_from_slice(&encode_selector(selector));
    }
    Ok(out)
}

/// Decode a Traffic Selector body from `bytes`
pub fn decode_traffic_selectors(bytes: &[u8]) -> Result<TrafficSelectors, CodecError> {
    if bytes.len() < list_header_len() {
        return Err(CodecError::PayloadTooShort);
    }
    let header =
        TrafficSelectorsHeader::read_from_prefix(bytes).ok_or(CodecError::BufferTooSmall)?;
    let mut offset = list_header_len();
    let mut selectors = Vec::with_capacity(header.num_selectors as usize);
    for _ in 0..header.num_selectors {
        let (selector, consumed) = decode_selector(&bytes[offset..])?;
        selectors.push(selector);
        offset += consumed;
    }
    if offset != bytes.len() {
        return Err(CodecError::ChainInconsistent);
    }
    if selectors.is_empty() {
        return Err(CodecError::ProtocolViolation);
    }
    Ok(TrafficSelectors { selectors })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_selector_roundtrips() {
        let ts = TrafficSelectors {
            selectors: vec![TrafficSelector::default()],
        };
        let bytes = encode_traffic_selectors(&ts).unwrap();
        let decoded = decode_traffic_selectors(&bytes).unwrap();
        assert_eq!(decoded, ts);
    }

    #[test]
    fn empty_selector_list_is_rejected_on_encode() {
        assert!(encode_traffic_selectors(&TrafficSelectors::default()).is_err());
    }
}
