use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    error,
    types::errors::{Error, Result},
};

pub const SHA_HEX_LEN: usize = 40;

/// A full 20 byte git commit id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommitSha([u8; 20]);

impl CommitSha {
    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// The seven character abbreviation git prints by default.
    pub fn short(&self) -> String {
        self.to_string()[..7].to_string()
    }

    /// Case-insensitive match against an abbreviated id.
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        !prefix.is_empty() && self.to_string().starts_with(&prefix.to_ascii_lowercase())
    }
}

impl FromStr for CommitSha {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() != SHA_HEX_LEN {
            return Err(error!(
                InvalidData,
                "commit sha must be {} hex characters, got {} in `{}`",
                SHA_HEX_LEN,
                s.len(),
                s
            ));
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(s, &mut bytes)?;

        Ok(Self(bytes))
    }
}

impl fmt::Display for CommitSha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl Serialize for CommitSha {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CommitSha {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    const SHA: &str = "1d2a4b6c8e0f1d2a4b6c8e0f1d2a4b6c8e0f1d2a";

    #[test]
    fn round_trips_through_display() -> Result<()> {
        let sha: CommitSha = SHA.parse()?;

        assert_eq!(sha.to_string(), SHA);
        assert_eq!(sha.short(), "1d2a4b6");

        Ok(())
    }

    #[test]
    fn uppercase_input_is_normalised() -> Result<()> {
        let sha: CommitSha = SHA.to_uppercase().parse()?;

        assert_eq!(sha.to_string(), SHA);

        Ok(())
    }

    #[test_case("1d2a4b6"; "abbreviated")]
    #[test_case("1d2a4b6c8e0f1d2a4b6c8e0f1d2a4b6c8e0f1d2a00"; "too long")]
    #[test_case("zd2a4b6c8e0f1d2a4b6c8e0f1d2a4b6c8e0f1d2a"; "not hex")]
    fn malformed_shas_are_rejected(input: &str) {
        assert!(matches!(
            input.parse::<CommitSha>(),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn prefixes_match_case_insensitively() -> Result<()> {
        let sha: CommitSha = SHA.parse()?;

        assert!(sha.matches_prefix("1D2A"));
        assert!(!sha.matches_prefix("1d2b"));
        assert!(!sha.matches_prefix(""));

        Ok(())
    }
}
