use cluster_hash::HashError;
use signature_verifier::VerificationError;
use std::fmt::Display;
use strum::IntoStaticStr;

/// Reasons a cluster lock is rejected.
#[derive(Debug, Clone, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ClusterLockError {
    /// The definition declares a version without a known layout
    UnsupportedVersion(String),
    /// A field could not be decoded or has the wrong shape
    MalformedInput(String),
    /// The populated fields match no known definition flow
    UnknownFlow,
    /// The fork version is not in the configured network table
    UnknownForkVersion(String),
    /// A signature does not verify against its signer and message
    SignatureMismatch(String),
    /// A stored hash differs from the recomputed one
    HashMismatch {
        field: &'static str,
        expected: String,
        computed: String,
    },
    /// The BLS backend could not be initialised
    BackendUnavailable(String),
}

impl ClusterLockError {
    /// Short label of the error kind, used for metrics.
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

impl From<HashError> for ClusterLockError {
    fn from(error: HashError) -> Self {
        match error {
            HashError::UnsupportedVersion(version) => ClusterLockError::UnsupportedVersion(version),
            HashError::MalformedInput(reason) => ClusterLockError::MalformedInput(reason),
        }
    }
}

impl From<VerificationError> for ClusterLockError {
    fn from(error: VerificationError) -> Self {
        match error {
            VerificationError::UnknownForkVersion(fork_version) => {
                ClusterLockError::UnknownForkVersion(fork_version)
            }
            VerificationError::MalformedInput(reason) => ClusterLockError::MalformedInput(reason),
            VerificationError::SignatureMismatch(reason) => {
                ClusterLockError::SignatureMismatch(reason)
            }
            VerificationError::Hash(error) => error.into(),
            VerificationError::BlsInit(reason) => ClusterLockError::BackendUnavailable(reason),
        }
    }
}

impl std::error::Error for ClusterLockError {}

impl Display for ClusterLockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedVersion(version) => write!(f, "{}", version),
            Self::MalformedInput(reason) => write!(f, "Malformed input: {}", reason),
            Self::UnknownFlow => write!(f, "Definition matches no known creation flow"),
            Self::UnknownForkVersion(fork_version) => {
                write!(f, "Unknown fork version: {}", fork_version)
            }
            Self::SignatureMismatch(reason) => write!(f, "Invalid signature: {}", reason),
            Self::HashMismatch {
                field,
                expected,
                computed,
            } => write!(
                f,
                "Mismatched {}: lock carries {}, computed {}",
                field, expected, computed
            ),
            Self::BackendUnavailable(reason) => write!(f, "BLS backend unavailable: {}", reason),
        }
    }
}
