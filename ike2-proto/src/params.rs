//! IKEv2 parameters as defined in the IANA IKEv2 parameters registry
//! (<https://www.iana.org/assignments/ikev2-parameters/ikev2-parameters.xhtml>)

/// When parsing a parameter from its wire value, several "regions" of the
/// registries aren't representable by a Rust enum. The last two regions are
/// typically unassigned and/or reserved for private use.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, thiserror::Error)]
pub enum UnparseableParameter {
    /// The value is reserved and must not be used
    #[error("parameter value is reserved")]
    Reserved,
    /// The value has no recognized meaning by any known standard
    #[error("parameter value is unassigned")]
    Unassigned,
    /// The value is reserved for private use by proprietary implementations
    #[error("parameter value is reserved for private use")]
    PrivateUse,
    /// The value cannot legally appear in the field it was read from
    #[error("parameter value is out of range for its field")]
    OutOfRange,
}

/// Flag bit (in the header's flags octet) marking the sender as the
/// exchange initiator
pub const FLAG_INITIATOR: u8 = 0b0000_1000;
/// Flag bit marking the message as a response rather than a request
pub const FLAG_RESPONSE: u8 = 0b0010_0000;
/// Fixed IKE version byte: major 2, minor 0
pub const IKE_VERSION: u8 = 0b0010_0000;
/// Flag bit on an attribute type marking it as fixed-length (TV, not TLV)
pub const FLAG_ATTRIBUTE_FORMAT: u16 = 0b1000_0000_0000_0000;

/// Type of exchange being carried out; constrains which payloads may appear
/// in a message of this exchange
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, strum::Display)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum ExchangeType {
    IkeSaInit = 34,
    IkeAuth = 35,
    CreateChildSa = 36,
    Informational = 37,
    IkeSessionResume = 38,
}

impl TryFrom<u8> for ExchangeType {
    type Error = UnparseableParameter;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0..=33 => Err(UnparseableParameter::Reserved),
            34 => Ok(Self::IkeSaInit),
            35 => Ok(Self::IkeAuth),
            36 => Ok(Self::CreateChildSa),
            37 => Ok(Self::Informational),
            38 => Ok(Self::IkeSessionResume),
            39..=239 => Err(UnparseableParameter::Unassigned),
            240..=255 => Err(UnparseableParameter::PrivateUse),
        }
    }
}

/// Type of payload, i.e. what the body of a payload represents
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, strum::Display)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum PayloadType {
    NoNextPayload = 0,
    SecurityAssociation = 33,
    KeyExchange = 34,
    IdentificationInitiator = 35,
    IdentificationResponder = 36,
    Certificate = 37,
    CertificateRequest = 38,
    Authentication = 39,
    Nonce = 40,
    Notify = 41,
    Delete = 42,
    VendorID = 43,
    TrafficSelectorInitiator = 44,
    TrafficSelectorResponder = 45,
    EncryptedAndAuthenticated = 46,
    Configuration = 47,
    ExtensibleAuthentication = 48,
}

impl TryFrom<u8> for PayloadType {
    type Error = UnparseableParameter;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::NoNextPayload),
            1..=32 => Err(UnparseableParameter::Reserved),
            33 => Ok(Self::SecurityAssociation),
            34 => Ok(Self::KeyExchange),
            35 => Ok(Self::IdentificationInitiator),
            36 => Ok(Self::IdentificationResponder),
            37 => Ok(Self::Certificate),
            38 => Ok(Self::CertificateRequest),
            39 => Ok(Self::Authentication),
            40 => Ok(Self::Nonce),
            41 => Ok(Self::Notify),
            42 => Ok(Self::Delete),
            43 => Ok(Self::VendorID),
            44 => Ok(Self::TrafficSelectorInitiator),
            45 => Ok(Self::TrafficSelectorResponder),
            46 => Ok(Self::EncryptedAndAuthenticated),
            47 => Ok(Self::Configuration),
            48 => Ok(Self::ExtensibleAuthentication),
            49..=127 => Err(UnparseableParameter::Unassigned),
            128..=255 => Err(UnparseableParameter::PrivateUse),
        }
    }
}

/// Identifier for the protocol a Proposal or Notify concerns
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, strum::Display)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum SecurityProtocol {
    Reserved = 0,
    InternetKeyExchange = 1,
    AuthenticationHeader = 2,
    EncapsulatingSecurityPayload = 3,
}

impl TryFrom<u8> for SecurityProtocol {
    type Error = UnparseableParameter;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Reserved),
            1 => Ok(Self::InternetKeyExchange),
            2 => Ok(Self::AuthenticationHeader),
            3 => Ok(Self::EncapsulatingSecurityPayload),
            4..=200 => Err(UnparseableParameter::Unassigned),
            201..=255 => Err(UnparseableParameter::PrivateUse),
        }
    }
}

/// Type of transform carried inside a Proposal
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, strum::Display)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum TransformType {
    EncryptionAlgorithm = 1,
    PseudoRandomFunction = 2,
    IntegrityAlgorithm = 3,
    KeyExchangeMethod = 4,
    SequenceNumbers = 5,
}

impl TryFrom<u8> for TransformType {
    type Error = UnparseableParameter;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Err(UnparseableParameter::Reserved),
            1 => Ok(Self::EncryptionAlgorithm),
            2 => Ok(Self::PseudoRandomFunction),
            3 => Ok(Self::IntegrityAlgorithm),
            4 => Ok(Self::KeyExchangeMethod),
            5 => Ok(Self::SequenceNumbers),
            6..=240 => Err(UnparseableParameter::Unassigned),
            241..=255 => Err(UnparseableParameter::PrivateUse),
        }
    }
}

/// Transform Type 1 (Encryption Algorithm) identifiers actually supported here
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, strum::Display)]
#[repr(u16)]
#[allow(missing_docs)]
pub enum EncryptionAlgorithm {
    EncrAesCbc = 12,
    EncrCamelliaCbc = 23,
}

impl TryFrom<u16> for EncryptionAlgorithm {
    type Error = UnparseableParameter;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            12 => Ok(Self::EncrAesCbc),
            23 => Ok(Self::EncrCamelliaCbc),
            _ => Err(UnparseableParameter::Unassigned),
        }
    }
}

/// Transform Type 2 (Pseudo-Random Function) identifiers actually supported here
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, strum::Display)]
#[repr(u16)]
#[allow(missing_docs)]
pub enum PseudorandomFunction {
    PrfHmacSha2_256 = 5,
}

impl TryFrom<u16> for PseudorandomFunction {
    type Error = UnparseableParameter;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            5 => Ok(Self::PrfHmacSha2_256),
            _ => Err(UnparseableParameter::Unassigned),
        }
    }
}

/// Transform Type 3 (Integrity Algorithm) identifiers actually supported here
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, strum::Display)]
#[repr(u16)]
#[allow(missing_docs)]
pub enum IntegrityAlgorithm {
    AuthHmacSha2_256_128 = 12,
}

impl TryFrom<u16> for IntegrityAlgorithm {
    type Error = UnparseableParameter;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            12 => Ok(Self::AuthHmacSha2_256_128),
            _ => Err(UnparseableParameter::Unassigned),
        }
    }
}

impl IntegrityAlgorithm {
    /// Size in bytes of the MAC this integrity transform produces after truncation
    pub fn mac_size(self) -> usize {
        match self {
            Self::AuthHmacSha2_256_128 => 16,
        }
    }
}

/// Transform Type 4 (Key Exchange Method / Diffie-Hellman group) identifiers
/// actually supported here
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, strum::Display)]
#[repr(u16)]
#[allow(missing_docs)]
pub enum KeyExchangeMethod {
    DhGroup14 = 14,
}

impl TryFrom<u16> for KeyExchangeMethod {
    type Error = UnparseableParameter;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            14 => Ok(Self::DhGroup14),
            _ => Err(UnparseableParameter::Unassigned),
        }
    }
}

/// Transform Type 5 (Sequence Numbers, formerly ESN) identifiers
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, strum::Display)]
#[repr(u16)]
#[allow(missing_docs)]
pub enum SequenceNumbers {
    NoEsn = 0,
    Esn = 1,
}

impl TryFrom<u16> for SequenceNumbers {
    type Error = UnparseableParameter;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::NoEsn),
            1 => Ok(Self::Esn),
            _ => Err(UnparseableParameter::Unassigned),
        }
    }
}

/// Attribute types that may appear inside a Transform
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, strum::Display)]
#[repr(u16)]
#[allow(missing_docs)]
pub enum AttributeType {
    KeyLength = 14,
}

/// Identification payload ID type, see RFC 7296 section 3.5
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, strum::Display)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum IdType {
    Rfc822Address = 3,
}

/// Authentication method carried in an AUTH payload
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, strum::Display)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum AuthenticationMethod {
    RsaDigitalSignature = 1,
    SharedKeyMessageIntegrityCode = 2,
}

impl TryFrom<u8> for AuthenticationMethod {
    type Error = UnparseableParameter;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Err(UnparseableParameter::Reserved),
            1 => Ok(Self::RsaDigitalSignature),
            2 => Ok(Self::SharedKeyMessageIntegrityCode),
            3..=200 => Err(UnparseableParameter::Unassigned),
            201..=255 => Err(UnparseableParameter::PrivateUse),
        }
    }
}

/// Traffic Selector type, see RFC 7296 section 3.13.1
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, strum::Display)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum TrafficSelectorType {
    TsIpv4AddrRange = 7,
    TsIpv6AddrRange = 8,
}

/// Error-range Notify message types (values below 2^14), see RFC 7296 section 3.10.1
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, strum::Display)]
#[repr(u16)]
#[allow(missing_docs)]
pub enum NotifyErrorMessageType {
    UnsupportedCriticalPayload = 1,
    InvalidIkeSpi = 4,
    InvalidMajorVersion = 5,
    InvalidSyntax = 7,
    InvalidMessageId = 9,
    InvalidSpi = 11,
    NoProposalChosen = 14,
    InvalidKeyExchangePayload = 17,
    AuthenticationFailed = 24,
    SinglePairRequired = 34,
    NoAdditionalSas = 35,
    InternalAddressFailure = 36,
    FailedCpRequired = 37,
    TsUnacceptable = 38,
    InvalidSelectors = 39,
    TemporaryFailure = 43,
    ChildSaNotFound = 44,
}

impl TryFrom<u16> for NotifyErrorMessageType {
    type Error = UnparseableParameter;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Err(UnparseableParameter::Reserved),
            1 => Ok(Self::UnsupportedCriticalPayload),
            2..=3 => Err(UnparseableParameter::Reserved),
            4 => Ok(Self::InvalidIkeSpi),
            5 => Ok(Self::InvalidMajorVersion),
            6 => Err(UnparseableParameter::Reserved),
            7 => Ok(Self::InvalidSyntax),
            8 => Err(UnparseableParameter::Reserved),
            9 => Ok(Self::InvalidMessageId),
            10 => Err(UnparseableParameter::Reserved),
            11 => Ok(Self::InvalidSpi),
            12..=13 => Err(UnparseableParameter::Reserved),
            14 => Ok(Self::NoProposalChosen),
            15..=16 => Err(UnparseableParameter::Reserved),
            17 => Ok(Self::InvalidKeyExchangePayload),
            18..=23 => Err(UnparseableParameter::Reserved),
            24 => Ok(Self::AuthenticationFailed),
            25..=33 => Err(UnparseableParameter::Reserved),
            34 => Ok(Self::SinglePairRequired),
            35 => Ok(Self::NoAdditionalSas),
            36 => Ok(Self::InternalAddressFailure),
            37 => Ok(Self::FailedCpRequired),
            38 => Ok(Self::TsUnacceptable),
            39 => Ok(Self::InvalidSelectors),
            40..=42 => Err(UnparseableParameter::Unassigned),
            43 => Ok(Self::TemporaryFailure),
            44 => Ok(Self::ChildSaNotFound),
            45..=8191 => Err(UnparseableParameter::Unassigned),
            8192..=16383 => Err(UnparseableParameter::PrivateUse),
            16384..=65535 => Err(UnparseableParameter::OutOfRange),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchange_type_roundtrip() {
        assert_eq!(ExchangeType::try_from(34).unwrap(), ExchangeType::IkeSaInit);
        assert_eq!(ExchangeType::try_from(35).unwrap(), ExchangeType::IkeAuth);
        assert_eq!(
            ExchangeType::try_from(10),
            Err(UnparseableParameter::Reserved)
        );
    }

    #[test]
    fn notify_error_is_below_16384() {
        assert!((NotifyErrorMessageType::NoProposalChosen as u16) < 16384);
        assert_eq!(
            NotifyErrorMessageType::try_from(16384),
            Err(UnparseableParameter::OutOfRange)
        );
    }

    #[test]
    fn mac_size_matches_spec_default() {
        assert_eq!(IntegrityAlgorithm::AuthHmacSha2_256_128.mac_size(), 16);
    }
}
