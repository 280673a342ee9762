//! Fingerprint of the loaded schema source

use sha2::{Digest, Sha256};
use std::fmt;

/// SHA256 checksum over the raw bytes of every loaded schema document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Checksum(String);

impl Checksum {
    /// Compute checksum from raw bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(format!("{:x}", Sha256::digest(data)))
    }

    /// Compute a checksum over several sources, in the order given
    pub fn from_parts<'a>(parts: impl IntoIterator<Item = &'a [u8]>) -> Self {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Get the hex string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 hex characters, for log lines
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_consistency() {
        let content = br#"{"type": "object"}"#;
        assert_eq!(Checksum::from_bytes(content), Checksum::from_bytes(content));
        assert_eq!(Checksum::from_bytes(content).as_str().len(), 64);
    }

    #[test]
    fn test_parts_match_concatenation() {
        let whole = Checksum::from_bytes(b"abcdef");
        let parts = Checksum::from_parts([&b"abc"[..], &b"def"[..]]);
        assert_eq!(whole, parts);
        assert_eq!(parts.short().len(), 12);
    }
}
