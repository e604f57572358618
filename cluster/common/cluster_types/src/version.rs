use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Cluster definition and lock format versions that can be hashed and verified.
///
/// Versions are matched exactly against the `version` field of a definition, there is no
/// semver range matching. Variants are ordered so that later formats compare greater.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum ClusterVersion {
    /// Introduces deposit data per distributed validator.
    V1_6,
    /// Adds builder registrations and per operator node signatures.
    V1_7,
    /// Replaces the single deposit data with a list of partial deposits.
    V1_8,
}

impl ClusterVersion {
    pub const ALL: [ClusterVersion; 3] = [Self::V1_6, Self::V1_7, Self::V1_8];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1_6 => "v1.6.0",
            Self::V1_7 => "v1.7.0",
            Self::V1_8 => "v1.8.0",
        }
    }

    /// Locks of this version carry a builder registration for every validator.
    pub fn has_builder_registration(&self) -> bool {
        *self >= Self::V1_7
    }

    /// Locks of this version carry one secp256k1 signature per operator over the lock hash.
    pub fn has_node_signatures(&self) -> bool {
        *self >= Self::V1_7
    }

    /// Locks of this version use `partial_deposit_data` instead of `deposit_data`.
    pub fn has_partial_deposits(&self) -> bool {
        *self >= Self::V1_8
    }
}

impl FromStr for ClusterVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|version| version.as_str() == s)
            .ok_or_else(|| format!("Unsupported cluster version: {:?}", s))
    }
}

impl Display for ClusterVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod version_tests {
    use super::*;

    #[test]
    fn test_exact_match_only() {
        assert_eq!("v1.6.0".parse::<ClusterVersion>(), Ok(ClusterVersion::V1_6));
        assert_eq!("v1.7.0".parse::<ClusterVersion>(), Ok(ClusterVersion::V1_7));
        assert_eq!("v1.8.0".parse::<ClusterVersion>(), Ok(ClusterVersion::V1_8));

        for unsupported in ["v1.5.0", "1.7.0", "v1.7", "v1.7.1", "V1.7.0", "v1.10.0", ""] {
            assert!(unsupported.parse::<ClusterVersion>().is_err(), "{unsupported}");
        }
    }

    #[test]
    fn test_feature_gates() {
        assert!(!ClusterVersion::V1_6.has_builder_registration());
        assert!(ClusterVersion::V1_7.has_node_signatures());
        assert!(!ClusterVersion::V1_7.has_partial_deposits());
        assert!(ClusterVersion::V1_8.has_partial_deposits());
    }
}
