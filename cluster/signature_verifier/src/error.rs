use cluster_hash::HashError;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    /// The fork version of a definition is not in the network table
    UnknownForkVersion(String),
    /// A key, signature or hash could not be decoded
    MalformedInput(String),
    /// A signature decoded fine but does not match its signer or message
    SignatureMismatch(String),
    /// A signing root could not be computed
    Hash(HashError),
    /// The BLS backend failed its startup self test
    BlsInit(String),
}

impl From<HashError> for VerificationError {
    fn from(error: HashError) -> Self {
        VerificationError::Hash(error)
    }
}

impl std::error::Error for VerificationError {}

impl Display for VerificationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownForkVersion(fork_version) => {
                write!(f, "Unknown fork version: {}", fork_version)
            }
            Self::MalformedInput(reason) => write!(f, "Malformed input: {}", reason),
            Self::SignatureMismatch(reason) => write!(f, "Signature mismatch: {}", reason),
            Self::Hash(error) => write!(f, "{}", error),
            Self::BlsInit(reason) => write!(f, "BLS backend unavailable: {}", reason),
        }
    }
}
