//! # Protocol Version Policy
//!
//! The single source of truth for which protocol revisions exist and how they order.
//!
//! A protocol identifier is a plain number assigned per game release. Codecs branch
//! on `version >= THRESHOLD` using the named constants here, never raw numbers and
//! never by parsing release strings. The catalogue is constant data and can be shared
//! freely between threads.
//!
//! ## Field Gates
//! A field that only exists on some revisions is described once with a
//! [`VersionGate`] and read or written through
//! [`PacketReader::read_gated`](crate::core::serializer::PacketReader::read_gated) and
//! friends, instead of hand-writing the same `if` in both directions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, Result};

/// Numeric protocol revision negotiated for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProtocolVersion(pub u32);

impl ProtocolVersion {
    pub const PROTOCOL_1_12_0: Self = Self(361);
    pub const PROTOCOL_1_13_0: Self = Self(388);
    pub const PROTOCOL_1_14_0: Self = Self(389);
    pub const PROTOCOL_1_14_60: Self = Self(390);
    pub const PROTOCOL_1_16_0: Self = Self(407);
    pub const PROTOCOL_1_16_20: Self = Self(408);
    pub const PROTOCOL_1_16_100: Self = Self(419);
    pub const PROTOCOL_1_16_200: Self = Self(422);
    pub const PROTOCOL_1_16_210: Self = Self(428);
    pub const PROTOCOL_1_16_220: Self = Self(431);
    pub const PROTOCOL_1_17_0: Self = Self(440);
    pub const PROTOCOL_1_17_10: Self = Self(448);
    pub const PROTOCOL_1_17_30: Self = Self(465);
    pub const PROTOCOL_1_17_40: Self = Self(471);
    pub const PROTOCOL_1_18_0: Self = Self(475);
    pub const PROTOCOL_1_18_10: Self = Self(486);
    pub const PROTOCOL_1_18_30: Self = Self(503);
    pub const PROTOCOL_1_19_0: Self = Self(527);
    pub const PROTOCOL_1_19_10: Self = Self(534);
    pub const PROTOCOL_1_19_20: Self = Self(544);
    pub const PROTOCOL_1_19_30: Self = Self(554);
    pub const PROTOCOL_1_19_40: Self = Self(557);
    pub const PROTOCOL_1_19_50: Self = Self(560);
    pub const PROTOCOL_1_19_60: Self = Self(567);
    pub const PROTOCOL_1_19_62: Self = Self(568);
    pub const PROTOCOL_1_19_70: Self = Self(575);
    pub const PROTOCOL_1_19_80: Self = Self(582);
    pub const PROTOCOL_1_20_0: Self = Self(589);
    pub const PROTOCOL_1_20_10: Self = Self(594);
    pub const PROTOCOL_1_20_30: Self = Self(618);
    pub const PROTOCOL_1_20_40: Self = Self(622);
    pub const PROTOCOL_1_20_50: Self = Self(630);
    pub const PROTOCOL_1_20_60: Self = Self(649);
    pub const PROTOCOL_1_20_70: Self = Self(662);
    pub const PROTOCOL_1_20_80: Self = Self(671);
    pub const PROTOCOL_1_21_0: Self = Self(685);
    pub const PROTOCOL_1_21_2: Self = Self(686);
    pub const PROTOCOL_1_21_20: Self = Self(712);
    pub const PROTOCOL_1_21_30: Self = Self(729);
    pub const PROTOCOL_1_21_40: Self = Self(748);
    pub const PROTOCOL_1_21_50: Self = Self(766);

    /// Newest revision this crate speaks.
    pub const CURRENT: Self = Self::PROTOCOL_1_21_50;

    /// Oldest revision this crate speaks.
    pub const OLDEST: Self = Self::PROTOCOL_1_12_0;

    /// Every known revision with its release name, ascending.
    pub const ALL: &'static [(ProtocolVersion, &'static str)] = &[
        (Self::PROTOCOL_1_12_0, "1.12.0"),
        (Self::PROTOCOL_1_13_0, "1.13.0"),
        (Self::PROTOCOL_1_14_0, "1.14.0"),
        (Self::PROTOCOL_1_14_60, "1.14.60"),
        (Self::PROTOCOL_1_16_0, "1.16.0"),
        (Self::PROTOCOL_1_16_20, "1.16.20"),
        (Self::PROTOCOL_1_16_100, "1.16.100"),
        (Self::PROTOCOL_1_16_200, "1.16.200"),
        (Self::PROTOCOL_1_16_210, "1.16.210"),
        (Self::PROTOCOL_1_16_220, "1.16.220"),
        (Self::PROTOCOL_1_17_0, "1.17.0"),
        (Self::PROTOCOL_1_17_10, "1.17.10"),
        (Self::PROTOCOL_1_17_30, "1.17.30"),
        (Self::PROTOCOL_1_17_40, "1.17.40"),
        (Self::PROTOCOL_1_18_0, "1.18.0"),
        (Self::PROTOCOL_1_18_10, "1.18.10"),
        (Self::PROTOCOL_1_18_30, "1.18.30"),
        (Self::PROTOCOL_1_19_0, "1.19.0"),
        (Self::PROTOCOL_1_19_10, "1.19.10"),
        (Self::PROTOCOL_1_19_20, "1.19.20"),
        (Self::PROTOCOL_1_19_30, "1.19.30"),
        (Self::PROTOCOL_1_19_40, "1.19.40"),
        (Self::PROTOCOL_1_19_50, "1.19.50"),
        (Self::PROTOCOL_1_19_60, "1.19.60"),
        (Self::PROTOCOL_1_19_62, "1.19.62"),
        (Self::PROTOCOL_1_19_70, "1.19.70"),
        (Self::PROTOCOL_1_19_80, "1.19.80"),
        (Self::PROTOCOL_1_20_0, "1.20.0"),
        (Self::PROTOCOL_1_20_10, "1.20.10"),
        (Self::PROTOCOL_1_20_30, "1.20.30"),
        (Self::PROTOCOL_1_20_40, "1.20.40"),
        (Self::PROTOCOL_1_20_50, "1.20.50"),
        (Self::PROTOCOL_1_20_60, "1.20.60"),
        (Self::PROTOCOL_1_20_70, "1.20.70"),
        (Self::PROTOCOL_1_20_80, "1.20.80"),
        (Self::PROTOCOL_1_21_0, "1.21.0"),
        (Self::PROTOCOL_1_21_2, "1.21.2"),
        (Self::PROTOCOL_1_21_20, "1.21.20"),
        (Self::PROTOCOL_1_21_30, "1.21.30"),
        (Self::PROTOCOL_1_21_40, "1.21.40"),
        (Self::PROTOCOL_1_21_50, "1.21.50"),
    ];

    #[inline]
    pub const fn id(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn is_at_least(self, threshold: Self) -> bool {
        self >= threshold
    }

    #[inline]
    pub fn is_before(self, threshold: Self) -> bool {
        self < threshold
    }

    /// Whether this exact identifier is a known revision.
    pub fn is_supported(self) -> bool {
        Self::ALL.binary_search_by_key(&self, |(v, _)| *v).is_ok()
    }

    /// Release name of this revision, if known.
    pub fn game_version(self) -> Option<&'static str> {
        Self::ALL
            .binary_search_by_key(&self, |(v, _)| *v)
            .ok()
            .map(|i| Self::ALL[i].1)
    }

    /// Look a revision up by release name.
    pub fn from_game_version(name: &str) -> Option<Self> {
        Self::ALL.iter().find(|(_, n)| *n == name).map(|(v, _)| *v)
    }

    /// Iterator over every known revision, ascending.
    pub fn all() -> impl Iterator<Item = ProtocolVersion> {
        Self::ALL.iter().map(|(v, _)| *v)
    }
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.game_version() {
            Some(name) => write!(f, "{} ({})", self.0, name),
            None => write!(f, "{}", self.0),
        }
    }
}

impl From<u32> for ProtocolVersion {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Accepts a numeric identifier (`"766"`) or a known release name (`"1.21.50"`).
impl FromStr for ProtocolVersion {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(id) = s.parse::<u32>() {
            return Ok(Self(id));
        }
        Self::from_game_version(s)
            .ok_or_else(|| ProtocolError::InvalidValue(format!("unknown protocol version: {s}")))
    }
}

/// Half-open version range in which a field is on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionGate {
    /// Present from this revision on (inclusive)
    pub since: Option<ProtocolVersion>,
    /// Absent from this revision on (exclusive upper bound)
    pub until: Option<ProtocolVersion>,
}

impl VersionGate {
    /// Present on every revision.
    pub const ALWAYS: Self = Self {
        since: None,
        until: None,
    };

    pub const fn since(version: ProtocolVersion) -> Self {
        Self {
            since: Some(version),
            until: None,
        }
    }

    pub const fn until(version: ProtocolVersion) -> Self {
        Self {
            since: None,
            until: Some(version),
        }
    }

    pub const fn between(since: ProtocolVersion, until: ProtocolVersion) -> Self {
        Self {
            since: Some(since),
            until: Some(until),
        }
    }

    pub fn applies(&self, version: ProtocolVersion) -> bool {
        self.since.map_or(true, |since| version >= since)
            && self.until.map_or(true, |until| version < until)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_parse_from_id_or_release_name() {
        assert_eq!("766".parse::<ProtocolVersion>().unwrap(), ProtocolVersion::PROTOCOL_1_21_50);
        assert_eq!(" 1.20.30 ".parse::<ProtocolVersion>().unwrap(), ProtocolVersion::PROTOCOL_1_20_30);
        assert_eq!("9999".parse::<ProtocolVersion>().unwrap(), ProtocolVersion(9999));
        assert!(matches!(
            "1.99.0".parse::<ProtocolVersion>(),
            Err(ProtocolError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_catalogue_strictly_ascending() {
        for pair in ProtocolVersion::ALL.windows(2) {
            assert!(
                pair[0].0 < pair[1].0,
                "{} must precede {}",
                pair[0].1,
                pair[1].1
            );
        }
        assert_eq!(ProtocolVersion::ALL[0].0, ProtocolVersion::OLDEST);
        assert_eq!(
            ProtocolVersion::ALL[ProtocolVersion::ALL.len() - 1].0,
            ProtocolVersion::CURRENT
        );
    }

    #[test]
    fn test_numeric_ordering_not_lexical() {
        // "1.16.100" sorts before "1.16.20" as a string but not as a revision
        assert!(ProtocolVersion::PROTOCOL_1_16_100 > ProtocolVersion::PROTOCOL_1_16_20);
        assert!(ProtocolVersion(748).is_at_least(ProtocolVersion::PROTOCOL_1_21_40));
        assert!(ProtocolVersion(747).is_before(ProtocolVersion::PROTOCOL_1_21_40));
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(
            ProtocolVersion::from_game_version("1.20.30"),
            Some(ProtocolVersion::PROTOCOL_1_20_30)
        );
        assert_eq!(ProtocolVersion::PROTOCOL_1_19_62.game_version(), Some("1.19.62"));
        assert!(!ProtocolVersion(600).is_supported());
        assert_eq!(ProtocolVersion(600).to_string(), "600");
        assert_eq!(ProtocolVersion::PROTOCOL_1_21_50.to_string(), "766 (1.21.50)");
    }

    #[test]
    fn test_gate_bounds() {
        let gate = VersionGate::between(
            ProtocolVersion::PROTOCOL_1_16_200,
            ProtocolVersion::PROTOCOL_1_21_40,
        );
        assert!(!gate.applies(ProtocolVersion::PROTOCOL_1_16_100));
        assert!(gate.applies(ProtocolVersion::PROTOCOL_1_16_200));
        assert!(gate.applies(ProtocolVersion::PROTOCOL_1_21_30));
        assert!(!gate.applies(ProtocolVersion::PROTOCOL_1_21_40));
        assert!(VersionGate::ALWAYS.applies(ProtocolVersion(0)));
        assert!(VersionGate::until(ProtocolVersion::PROTOCOL_1_13_0)
            .applies(ProtocolVersion::PROTOCOL_1_12_0));
    }
}
