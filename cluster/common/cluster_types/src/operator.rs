use serde::{Deserialize, Serialize};

/// A node operator taking part in a cluster.
///
/// Operators are created address-only when the definition is created. Each operator then
/// accepts the definition once, attaching its ENR and the two signatures. In solo and
/// charon-command flows only the ENR is present.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Operator {
    /// Ethereum address of the operator, 0x prefixed hex. Empty when unknown.
    #[serde(default)]
    pub address: String,
    /// Ethereum Node Record of the operator's charon node, `enr:` prefixed
    #[serde(default)]
    pub enr: String,
    /// EIP-712 signature over the config hash
    #[serde(default)]
    pub config_signature: String,
    /// EIP-712 signature over the ENR
    #[serde(default)]
    pub enr_signature: String,
}

impl Operator {
    /// Creates an operator that has not yet accepted the definition.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }

    /// Attaches the ENR and signatures of an operator accepting the definition.
    pub fn accept(
        self,
        enr: impl Into<String>,
        config_signature: impl Into<String>,
        enr_signature: impl Into<String>,
    ) -> Self {
        Self {
            enr: enr.into(),
            config_signature: config_signature.into(),
            enr_signature: enr_signature.into(),
            ..self
        }
    }

    pub fn has_address(&self) -> bool {
        !self.address.is_empty()
    }

    pub fn has_enr(&self) -> bool {
        !self.enr.is_empty()
    }

    pub fn has_signatures(&self) -> bool {
        !self.config_signature.is_empty() || !self.enr_signature.is_empty()
    }

    /// Whether the operator carries everything a group flow requires.
    pub fn is_accepted(&self) -> bool {
        self.has_address()
            && self.has_enr()
            && !self.config_signature.is_empty()
            && !self.enr_signature.is_empty()
    }
}
