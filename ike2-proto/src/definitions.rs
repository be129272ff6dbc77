//! High-level, owned representations of IKEv2 packets and payloads
//!
//! These are the types application code builds and reads; [`crate::codec`]
//! converts between these and the wire structs in [`crate::header`].

use crate::params::{
    AuthenticationMethod, EncryptionAlgorithm, IntegrityAlgorithm, KeyExchangeMethod, PayloadType,
    PseudorandomFunction, SecurityProtocol, SequenceNumbers, TrafficSelectorType,
};

/// A fully decoded or to-be-encoded IKEv2 message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IkeMessage {
    /// SPI chosen by the initiator
    pub initiator_spi: u64,
    /// SPI chosen by the responder, 0 if not yet learned
    pub responder_spi: u64,
    /// Type of exchange this message belongs to
    pub exchange_type: crate::params::ExchangeType,
    /// Whether the sender is the exchange initiator
    pub initiator: bool,
    /// Whether this message is a response rather than a request
    pub response: bool,
    /// Message id, strictly increasing per direction
    pub message_id: u32,
    /// Payloads in wire order
    pub payloads: Vec<Payload>,
}

/// A single IKEv2 payload together with its critical flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Type 33
    SecurityAssociation(SecurityAssociation),
    /// Type 34
    KeyExchange(KeyExchange),
    /// Type 35
    IdentificationInitiator(Identification),
    /// Type 36
    IdentificationResponder(Identification),
    /// Type 39
    Authentication(Authentication),
    /// Type 40, 16-256 bytes
    Nonce(Vec<u8>),
    /// Type 41
    Notify(Notification),
    /// Type 43, opaque vendor id string
    VendorID(Vec<u8>),
    /// Type 44
    TrafficSelectorInitiator(TrafficSelectors),
    /// Type 45
    TrafficSelectorResponder(TrafficSelectors),
    /// Type 46, IV || ciphertext || MAC. The generic payload header's own
    /// `next_payload` field is overloaded to carry the wire type of the
    /// first payload inside the plaintext, since that chain isn't visible
    /// until the body is decrypted.
    EncryptedAndAuthenticated {
        /// Wire type of the first payload in the encrypted plaintext chain
        first_inner_payload_type: u8,
        /// IV || ciphertext || ICV
        body: Vec<u8>,
    },
    /// A payload type this crate does not build itself, carried through
    /// intact so the critical-flag policy still applies to it
    Unknown {
        /// Raw payload type byte
        payload_type: u8,
        /// Critical bit as read from the wire
        critical: bool,
        /// Payload body, not including the 4-byte generic header
        body: Vec<u8>,
    },
}

impl From<&Payload> for PayloadType {
    fn from(value: &Payload) -> Self {
        match value {
            Payload::SecurityAssociation(_) => PayloadType::SecurityAssociation,
            Payload::KeyExchange(_) => PayloadType::KeyExchange,
            Payload::IdentificationInitiator(_) => PayloadType::IdentificationInitiator,
            Payload::IdentificationResponder(_) => PayloadType::IdentificationResponder,
            Payload::Authentication(_) => PayloadType::Authentication,
            Payload::Nonce(_) => PayloadType::Nonce,
            Payload::Notify(_) => PayloadType::Notify,
            Payload::VendorID(_) => PayloadType::VendorID,
            Payload::TrafficSelectorInitiator(_) => PayloadType::TrafficSelectorInitiator,
            Payload::TrafficSelectorResponder(_) => PayloadType::TrafficSelectorResponder,
            Payload::EncryptedAndAuthenticated { .. } => PayloadType::EncryptedAndAuthenticated,
            Payload::Unknown { .. } => PayloadType::NoNextPayload,
        }
    }
}

/// An ordered list of proposals, RFC 7296 section 3.3
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SecurityAssociation {
    /// Proposals in preference order; proposal numbers are assigned on build
    pub proposals: Vec<Proposal>,
}

/// A single proposal: one protocol, one SPI, an ordered transform list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    /// IKE, AH or ESP
    pub protocol: SecurityProtocol,
    /// Empty for IKE during SA_INIT, 8 bytes for IKE otherwise, 4 bytes for ESP
    pub spi: Vec<u8>,
    /// Ordered list of transforms offered for this protocol
    pub transforms: Vec<Transform>,
}

impl Proposal {
    /// Construct an empty proposal for the given protocol and SPI
    pub fn new(protocol: SecurityProtocol, spi: Vec<u8>) -> Self {
        Self {
            protocol,
            spi,
            transforms: vec![],
        }
    }
}

/// A single transform, tagged by its transform type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    /// Encryption algorithm, with an optional key length attribute (bits)
    Encryption(EncryptionAlgorithm, Option<u16>),
    /// Pseudo-random function
    PseudoRandomFunction(PseudorandomFunction),
    /// Integrity (MAC) algorithm
    Integrity(IntegrityAlgorithm),
    /// Diffie-Hellman group
    KeyExchange(KeyExchangeMethod),
    /// Extended sequence numbers
    SequenceNumbers(SequenceNumbers),
}

/// A Key Exchange payload body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyExchange {
    /// DH group the public value below was computed in
    pub dh_group: KeyExchangeMethod,
    /// Public value, big-endian, padded to the group's modulus length
    pub data: Vec<u8>,
}

/// An Identification payload body (IDi or IDr)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identification {
    /// See [crate::params::IdType]
    pub id_type: u8,
    /// Identity bytes, meaning depends on `id_type`
    pub data: Vec<u8>,
}

/// An Authentication payload body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authentication {
    /// PSK or signature method
    pub method: AuthenticationMethod,
    /// MAC (PSK method) or signature (signature method) bytes
    pub data: Vec<u8>,
}

/// A Notify payload body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Protocol the SPI below concerns; `Reserved` if no SPI is present
    pub protocol: SecurityProtocol,
    /// Present only for notifications that concern an existing child SA
    pub spi: Option<Vec<u8>>,
    /// Raw message type; values below 2^14 are errors
    pub message_type: u16,
    /// Type-specific notification data
    pub data: Vec<u8>,
}

impl Notification {
    /// Whether this notification falls in the error-message range (< 2^14)
    pub fn is_error(&self) -> bool {
        self.message_type < 16384
    }
}

/// A Traffic Selector payload body (TSi or TSr)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrafficSelectors {
    /// At least one selector
    pub selectors: Vec<TrafficSelector>,
}

/// A single traffic selector, currently only the IPv4 address range form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficSelector {
    /// Selector kind, see [crate::params::TrafficSelectorType]
    pub ts_type: TrafficSelectorType,
    /// IP protocol number, 0 means "any"
    pub ip_protocol: u8,
    /// Lower bound of the port range
    pub start_port: u16,
    /// Upper bound of the port range
    pub end_port: u16,
    /// Lower bound of the address range
    pub start_addr: [u8; 4],
    /// Upper bound of the address range
    pub end_addr: [u8; 4],
}

impl Default for TrafficSelector {
    /// The wildcard selector: all protocols, all ports, the full IPv4 space
    fn default() -> Self {
        Self {
            ts_type: TrafficSelectorType::TsIpv4AddrRange,
            ip_protocol: 0,
            start_port: 0,
            end_port: 65535,
            start_addr: [0, 0, 0, 0],
            end_addr: [255, 255, 255, 255],
        }
    }
}

/// A Transform attribute; currently only the key length TV attribute is used
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Attribute {
    /// Key length in bits
    KeyLength(u16),
}
