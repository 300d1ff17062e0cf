//! Content digests for cache keys.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use xxhash_rust::xxh3::xxh3_64;

/// xxh3-64 digest of an index file's raw bytes.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Digest(u64);

impl Digest {
    pub fn of(bytes: &[u8]) -> Self {
        Self(xxh3_64(bytes))
    }

    pub const fn from_u64(value: u64) -> Self {
        Self(value)
    }

    /// Returns the digest as a 16 character lowercase hexadecimal string
    pub fn as_hex(&self) -> String {
        format!("{:016x}", self.0)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_hex())
    }
}

impl FromStr for Digest {
    type Err = ParseDigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 16 {
            return Err(ParseDigestError::InvalidLength(s.len()));
        }
        u64::from_str_radix(s, 16)
            .map(Self)
            .map_err(|_| ParseDigestError::InvalidHex)
    }
}

impl Serialize for Digest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.as_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for digest parsing failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseDigestError {
    #[error("invalid hexadecimal characters in digest string")]
    InvalidHex,
    #[error("invalid digest length: expected 16 hex characters, got {0}")]
    InvalidLength(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use rstest::rstest;

    #[test]
    fn same_bytes_same_digest() {
        check!(Digest::of(b"var x = {}") == Digest::of(b"var x = {}"));
        check!(Digest::of(b"var x = {}") != Digest::of(b"var y = {}"));
    }

    #[test]
    fn hex_roundtrip() {
        let digest = Digest::from_u64(0x00ab_cdef_0123_4567);
        check!(digest.as_hex() == "00abcdef01234567");
        let_assert!(Ok(parsed) = digest.as_hex().parse::<Digest>());
        check!(parsed == digest);
    }

    #[rstest]
    #[case("abc", ParseDigestError::InvalidLength(3))]
    #[case("zzzzzzzzzzzzzzzz", ParseDigestError::InvalidHex)]
    fn invalid_digests(#[case] input: &str, #[case] expected: ParseDigestError) {
        let_assert!(Err(err) = input.parse::<Digest>());
        check!(err == expected);
    }
}
