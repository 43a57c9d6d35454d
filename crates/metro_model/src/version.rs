//! Component and service versions.

use crate::error::VersionError;
use serde::{Deserialize, Serialize};

/// A `major.minor.micro` version.
///
/// Parsing accepts one to three numeric components; missing components are
/// zero, so `"2"` and `"2.0.0"` are equal. The default is `1.0.0`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Version {
    major: u32,
    minor: u32,
    micro: u32,
}

impl Default for Version {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

impl Version {
    /// Creates a version.
    #[must_use]
    pub const fn new(major: u32, minor: u32, micro: u32) -> Self {
        Self {
            major,
            minor,
            micro,
        }
    }

    /// Parses a version string.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError`] if the string is empty, has more than three
    /// components, or a component is not a number.
    pub fn parse(value: &str) -> Result<Self, VersionError> {
        let trimmed = value.trim();
        let mut parts = [0_u32; 3];
        let mut count = 0;
        for segment in trimmed.split('.') {
            if count == 3 {
                return Err(VersionError {
                    value: value.to_string(),
                    source: None,
                });
            }
            parts[count] = segment.parse().map_err(|source| VersionError {
                value: value.to_string(),
                source: Some(source),
            })?;
            count += 1;
        }
        Ok(Self::new(parts[0], parts[1], parts[2]))
    }

    /// Returns the major component.
    #[must_use]
    pub const fn major(&self) -> u32 {
        self.major
    }

    /// Returns the minor component.
    #[must_use]
    pub const fn minor(&self) -> u32 {
        self.minor
    }

    /// Returns the micro component.
    #[must_use]
    pub const fn micro(&self) -> u32 {
        self.micro
    }

    /// Returns `true` if this version can stand in for `required`: same
    /// major version, and not older.
    #[must_use]
    pub fn complies(&self, required: &Version) -> bool {
        self.major == required.major && self >= required
    }
}

impl core::fmt::Display for Version {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)
    }
}

impl core::str::FromStr for Version {
    type Err = VersionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_partial_versions() {
        assert_eq!(Version::parse("2").unwrap(), Version::new(2, 0, 0));
        assert_eq!(Version::parse("2.1").unwrap(), Version::new(2, 1, 0));
        assert_eq!(Version::parse("2.1.3").unwrap(), Version::new(2, 1, 3));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Version::parse("").is_err());
        assert!(Version::parse("1.x").is_err());
        assert!(Version::parse("1.2.3.4").is_err());
    }

    #[test]
    fn default_is_one() {
        assert_eq!(Version::default().to_string(), "1.0.0");
    }

    #[test]
    fn compliance_requires_same_major() {
        let v12 = Version::new(1, 2, 0);
        assert!(v12.complies(&Version::new(1, 0, 0)));
        assert!(!v12.complies(&Version::new(1, 3, 0)));
        assert!(!Version::new(2, 0, 0).complies(&Version::new(1, 0, 0)));
    }
}
