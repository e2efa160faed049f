//! # Schema Versions
//!
//! A [`Version`] is a `(major, minor, patch)` triple identifying one
//! immutable schema document within a family. The canonical rendering is
//! `major.minor.patch`; the store's file names use `major_minor_patch`.
//!
//! Parsing is strict. `_` is never accepted as a separator and components
//! may not carry leading zeros, so every accepted string maps to exactly
//! one file name and back.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VersionError;

/// A semantic schema version.
///
/// Field order gives the derived `Ord` semantic ordering:
/// `1.2.0 < 1.10.0 < 2.0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    major: u64,
    minor: u64,
    patch: u64,
}

impl Version {
    /// Construct a version from its components.
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse `major.minor.patch`.
    ///
    /// # Errors
    ///
    /// [`VersionError::Separator`] if the input contains `_`, checked before
    /// anything else. [`VersionError::Format`] for every other deviation.
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        if input.contains('_') {
            return Err(VersionError::Separator(input.to_string()));
        }

        let parts: Vec<&str> = input.split('.').collect();
        if parts.len() != 3 {
            return Err(VersionError::Format {
                version: input.to_string(),
                reason: format!("expected 3 components, found {}", parts.len()),
            });
        }

        let component = |part: &str| {
            parse_component(part).ok_or_else(|| VersionError::Format {
                version: input.to_string(),
                reason: format!(
                    "component {part:?} is not a non-negative integer without leading zeros"
                ),
            })
        };

        Ok(Self {
            major: component(parts[0])?,
            minor: component(parts[1])?,
            patch: component(parts[2])?,
        })
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    /// The `major_minor_patch` form used inside store file names.
    pub fn file_fragment(&self) -> String {
        format!("{}_{}_{}", self.major, self.minor, self.patch)
    }
}

/// Parse one version component: ASCII digits, no sign, no leading zero
/// unless the component is exactly `0`.
pub(crate) fn parse_component(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if part.len() > 1 && part.starts_with('0') {
        return None;
    }
    part.parse().ok()
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Version {
    type Error = VersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_form() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!((v.major(), v.minor(), v.patch()), (1, 2, 3));
        assert_eq!(v.to_string(), "1.2.3");
        assert_eq!(v.file_fragment(), "1_2_3");
    }

    #[test]
    fn parses_zero_components() {
        assert_eq!(Version::parse("0.0.0").unwrap(), Version::new(0, 0, 0));
        assert_eq!(Version::parse("10.0.20").unwrap(), Version::new(10, 0, 20));
    }

    #[test]
    fn rejects_underscore_separator() {
        assert_eq!(
            Version::parse("1_0_0"),
            Err(VersionError::Separator("1_0_0".to_string()))
        );
    }

    #[test]
    fn underscore_wins_over_other_format_problems() {
        assert!(matches!(
            Version::parse("1.0_0.x"),
            Err(VersionError::Separator(_))
        ));
    }

    #[test]
    fn rejects_malformed_strings() {
        for bad in [
            "",
            "1",
            "1.0",
            "1.0.0.0",
            "not a real version",
            "1.0.x",
            "1..0",
            "01.0.0",
            "1.00.0",
            "-1.0.0",
            "+1.0.0",
            " 1.0.0",
            "1.0.0 ",
            "99999999999999999999999.0.0",
        ] {
            assert!(
                matches!(Version::parse(bad), Err(VersionError::Format { .. })),
                "expected format error for {bad:?}"
            );
        }
    }

    #[test]
    fn orders_numerically_not_lexically() {
        let mut versions: Vec<Version> = ["2.0.0", "1.10.0", "1.2.0", "1.2.10", "1.2.9"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        versions.sort();
        let rendered: Vec<String> = versions.iter().map(Version::to_string).collect();
        assert_eq!(rendered, ["1.2.0", "1.2.9", "1.2.10", "1.10.0", "2.0.0"]);
    }

    #[test]
    fn serde_uses_string_form_and_validates() {
        let v = Version::new(1, 0, 1);
        assert_eq!(serde_json::to_string(&v).unwrap(), "\"1.0.1\"");
        let back: Version = serde_json::from_str("\"1.0.1\"").unwrap();
        assert_eq!(back, v);
        assert!(serde_json::from_str::<Version>("\"1_0_1\"").is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any input containing `_` is a separator error, whatever else it holds.
        #[test]
        fn underscore_always_rejected(prefix in "[0-9.]{0,8}", suffix in "[0-9a-z._]{0,8}") {
            let input = format!("{prefix}_{suffix}");
            prop_assert!(matches!(Version::parse(&input), Err(VersionError::Separator(_))));
        }

        /// Ordering of parsed versions agrees with ordering of their tuples.
        #[test]
        fn ordering_matches_tuple_ordering(
            a in (0u64..50, 0u64..50, 0u64..50),
            b in (0u64..50, 0u64..50, 0u64..50),
        ) {
            let va = Version::parse(&format!("{}.{}.{}", a.0, a.1, a.2)).unwrap();
            let vb = Version::parse(&format!("{}.{}.{}", b.0, b.1, b.2)).unwrap();
            prop_assert_eq!(va.cmp(&vb), a.cmp(&b));
        }

        /// The rendered form always parses back to the same version.
        #[test]
        fn rendering_is_canonical(
            major in any::<u64>(),
            minor in any::<u64>(),
            patch in any::<u64>(),
        ) {
            let v = Version::new(major, minor, patch);
            prop_assert_eq!(Version::parse(&v.to_string()), Ok(v));
        }
    }
}
