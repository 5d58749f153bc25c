//! Voter identity type.
//!
//! A voter is identified by a fixed-width opaque 20-byte value supplied by
//! the caller with every mutating operation. The ledger never interprets the
//! bytes; it only compares them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 20-byte voter identity.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VoterId([u8; 20]);

impl VoterId {
    pub const ZERO: Self = Self([0u8; 20]);

    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Debug for VoterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VoterId(0x{})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for VoterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

// Inline hex encoding to avoid adding the `hex` crate as a dependency of types.
mod hex {
    pub fn encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_prefixed_hex() {
        let mut bytes = [0u8; 20];
        bytes[0] = 0xAB;
        bytes[19] = 0x01;
        let id = VoterId::new(bytes);
        let s = id.to_string();
        assert!(s.starts_with("0xab"));
        assert!(s.ends_with("01"));
        assert_eq!(s.len(), 2 + 40);
    }

    #[test]
    fn zero_identity() {
        assert!(VoterId::ZERO.is_zero());
        assert!(!VoterId::new([1u8; 20]).is_zero());
    }
}
