//! # ike2-proto
//!
//! The low level definitions for the wire format of IKEv2 (RFC 7296): payload
//! headers, the proposal/transform TLV encoding, and the cryptographic
//! primitives (PRF, PRF+, Diffie-Hellman, Camellia-CBC, truncated HMAC) the
//! protocol is built from.

#![warn(missing_docs, clippy::unwrap_used, clippy::expect_used)]

pub mod codec;
pub mod definitions;
pub mod errors;
pub mod header;
pub mod params;
pub mod primitives;
pub mod registry;

pub use zerocopy;
