use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::types::errors::{Error, Result};

/// The semver key a release is filed under.
///
/// Tags such as `v0.20.0` are accepted, the leading `v` is dropped.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReleaseVersion(semver::Version);

impl ReleaseVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(semver::Version::new(major, minor, patch))
    }

    pub fn inner(&self) -> &semver::Version {
        &self.0
    }
}

impl FromStr for ReleaseVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
        Ok(Self(semver::Version::parse(trimmed)?))
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<semver::Version> for ReleaseVersion {
    fn from(version: semver::Version) -> Self {
        Self(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_parse_without_the_v_prefix() -> Result<()> {
        let version: ReleaseVersion = "v0.20.1".parse()?;

        assert_eq!(version, ReleaseVersion::new(0, 20, 1));
        assert_eq!(version.to_string(), "0.20.1");

        Ok(())
    }

    #[test]
    fn ordering_is_semver_not_lexical() -> Result<()> {
        let a: ReleaseVersion = "0.9.0".parse()?;
        let b: ReleaseVersion = "0.10.0".parse()?;

        assert!(a < b);

        Ok(())
    }

    #[test]
    fn garbage_is_rejected() {
        let err = "latest".parse::<ReleaseVersion>().unwrap_err();

        assert!(matches!(err, Error::InvalidData(_)));
    }
}
