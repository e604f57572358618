use std::fmt::Display;

/// Errors raised while building the SSZ containers of a definition or lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashError {
    /// The declared version has no container layout
    UnsupportedVersion(String),
    /// A field could not be converted into its SSZ representation
    MalformedInput(String),
}

impl std::error::Error for HashError {}

impl Display for HashError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedVersion(version) => write!(f, "{}", version),
            Self::MalformedInput(reason) => write!(f, "Malformed input: {}", reason),
        }
    }
}
