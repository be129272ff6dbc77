//! Network-level (zerocopy) header structs for pieces of the protocol
//!
//! Every struct here is `#[repr(C, packed)]` and maps 1:1 onto the wire;
//! higher level semantics (enum decoding, chain walking) live in
//! [`crate::codec`].

use zerocopy::network_endian::{U16, U32, U64};
use zerocopy::{AsBytes, FromBytes, FromZeroes, Unaligned};

/// The 28-byte IKE header that begins every packet
///
///                          1                   2                   3
///      0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
///     +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///     |                       IKE SA Initiator's SPI                 |
///     +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///     |                       IKE SA Responder's SPI                 |
///     +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///     |  Next Payload | MjVer | MnVer | Exchange Type |     Flags     |
///     +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///     |                          Message ID                          |
///     +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///     |                            Length                            |
///     +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
#[derive(Debug, FromBytes, FromZeroes, AsBytes, Unaligned, Copy, Clone)]
#[repr(C, packed)]
pub struct IkeHeader {
    /// SPI chosen by the initiator, nonzero outside of an outbound SA_INIT
    pub initiator_spi: U64,
    /// SPI chosen by the responder, zero until learned from the peer
    pub responder_spi: U64,
    /// Type of the first payload following this header
    pub next_payload: u8,
    /// Fixed to 0x20 (major version 2, minor version 0)
    pub version: u8,
    /// See [crate::params::ExchangeType]
    pub exchange_type: u8,
    /// Bit 0x08 marks the sender as the initiator, bit 0x20 marks a response
    pub flags: u8,
    /// Monotonically increasing per direction, starting at 0
    pub message_id: U32,
    /// Total length of the packet, including this header
    pub length: U32,
}

/// The 4-byte generic payload header prepended to every payload
///
///                          1                   2                   3
///      0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
///     +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///     | Next Payload  |C|  RESERVED   |         Payload Length        |
///     +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
#[derive(Debug, FromBytes, FromZeroes, AsBytes, Unaligned, Copy, Clone)]
#[repr(C, packed)]
pub struct GenericPayloadHeader {
    /// Type of the payload following this one, 0 terminates the chain
    pub next_payload: u8,
    /// High bit is the critical flag, low 7 bits are reserved and must be zero
    pub flags: u8,
    /// Length of this payload in octets, including this 4-byte header
    pub payload_length: U16,
}

/// Bit mask of the critical flag inside [GenericPayloadHeader::flags]
pub const FLAG_CRITICAL: u8 = 0b1000_0000;

/// Sub-header for a Proposal inside a Security Association payload
#[derive(Debug, FromBytes, FromZeroes, AsBytes, Unaligned, Copy, Clone)]
#[repr(C, packed)]
pub struct ProposalHeader {
    /// 0 for the last proposal in the SA, 2 for any other
    pub last_substruct: u8,
    /// Reserved, must be zero
    pub reserved: u8,
    /// Length in octets of this Proposal, including this header and the SPI
    pub proposal_length: U16,
    /// Must be 1 for the first proposal and increment by 1 thereafter
    pub proposal_num: u8,
    /// See [crate::params::SecurityProtocol]
    pub protocol_id: u8,
    /// Size in octets of the SPI that follows this header
    pub spi_size: u8,
    /// Number of Transforms following the SPI
    pub num_transforms: u8,
}

/// Sub-header for a Transform inside a Proposal
#[derive(Debug, FromBytes, FromZeroes, AsBytes, Unaligned, Copy, Clone)]
#[repr(C, packed)]
pub struct TransformHeader {
    /// 0 for the last transform in the proposal, 3 for any other
    pub last_substruct: u8,
    /// Reserved, must be zero
    pub reserved: u8,
    /// Length in octets of this Transform, including this header and attributes
    pub transform_length: U16,
    /// See [crate::params::TransformType]
    pub transform_type: u8,
    /// Reserved, must be zero
    pub reserved2: u8,
    /// Transform identifier, meaning depends on `transform_type`
    pub transform_id: U16,
}

/// Fixed-length (TV) attribute header, currently the only attribute format used
/// (key length)
#[derive(Debug, FromBytes, FromZeroes, AsBytes, Unaligned, Copy, Clone)]
#[repr(C, packed)]
pub struct AttributeHeaderTv {
    /// High bit set (fixed-length format) OR'd with the attribute type
    pub attribute_type: U16,
    /// The fixed-length attribute value itself (e.g. key length in bits)
    pub attribute_value: U16,
}

/// Header fields of a Key Exchange payload, following the generic payload header
#[derive(Debug, FromBytes, FromZeroes, AsBytes, Unaligned, Copy, Clone)]
#[repr(C, packed)]
pub struct KeyExchangeHeader {
    /// DH group number, see [crate::params::KeyExchangeMethod]
    pub dh_group_num: U16,
    /// Must be sent as zero and ignored on receipt
    pub reserved: U16,
}

/// Header fields of a Notify payload, following the generic payload header
#[derive(Debug, FromBytes, FromZeroes, AsBytes, Unaligned, Copy, Clone)]
#[repr(C, packed)]
pub struct NotifyHeader {
    /// See [crate::params::SecurityProtocol]; zero unless an SPI is present
    pub protocol_id: u8,
    /// Length in octets of the SPI that follows this header
    pub spi_size: u8,
    /// Type of the notification, errors are < 16384, status messages are not
    pub notify_message_type: U16,
}

impl NotifyHeader {
    /// Whether this notification falls in the error-message range (< 2^14)
    pub fn is_error(&self) -> bool {
        self.notify_message_type.get() < 16384
    }
}

/// Header fields of an Identification payload, following the generic payload header
#[derive(Debug, FromBytes, FromZeroes, AsBytes, Unaligned, Copy, Clone)]
#[repr(C, packed)]
pub struct IdHeader {
    /// See [crate::params::IdType]
    pub id_type: u8,
    /// Reserved, must be zero
    pub reserved: [u8; 3],
}

/// Header fields of an Authentication payload, following the generic payload header
#[derive(Debug, FromBytes, FromZeroes, AsBytes, Unaligned, Copy, Clone)]
#[repr(C, packed)]
pub struct AuthHeader {
    /// See [crate::params::AuthenticationMethod]
    pub auth_method: u8,
    /// Reserved, must be zero
    pub reserved: [u8; 3],
}

/// Header of a Traffic Selector payload, following the generic payload header
#[derive(Debug, FromBytes, FromZeroes, AsBytes, Unaligned, Copy, Clone)]
#[repr(C, packed)]
pub struct TrafficSelectorsHeader {
    /// Number of selectors that follow
    pub num_selectors: u8,
    /// Reserved, must be zero
    pub reserved: [u8; 3],
}

/// A single IPv4-range traffic selector, 16 bytes total including this header
#[derive(Debug, FromBytes, FromZeroes, AsBytes, Unaligned, Copy, Clone)]
#[repr(C, packed)]
pub struct SelectorHeader {
    /// See [crate::params::TrafficSelectorType]
    pub ts_type: u8,
    /// IP protocol number, 0 means "any"
    pub ip_protocol: u8,
    /// Length in octets of this selector, including this header and the
    /// addresses (16 for an IPv4 range)
    pub selector_length: U16,
    /// Lower bound of the port range
    pub start_port: U16,
    /// Upper bound of the port range
    pub end_port: U16,
    /// Lower bound of the address range
    pub start_addr: [u8; 4],
    /// Upper bound of the address range
    pub end_addr: [u8; 4],
}
