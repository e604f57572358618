use crate::util::null_as_default;
use crate::ClusterDefinition;
use serde::{Deserialize, Serialize};

/// Deposit data of a distributed validator, signed by the distributed key.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct DepositData {
    /// Validator public key, must equal the distributed public key
    pub pubkey: String,
    /// Eth1 withdrawal credentials, `0x01 || 0x00 * 11 || withdrawal address`
    pub withdrawal_credentials: String,
    /// Amount of ether deposited in gwei
    #[serde(with = "serde_utils::quoted_u64")]
    pub amount: u64,
    /// BLS signature over the deposit message signing root
    pub signature: String,
    /// Hash tree root of the full deposit data
    #[serde(default)]
    pub deposit_data_root: String,
}

/// Message of a validator registration for external block builders.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct BuilderRegistrationMessage {
    pub fee_recipient: String,
    #[serde(deserialize_with = "serde_utils::quoted_u64::deserialize")]
    pub gas_limit: u64,
    /// Unix timestamp in seconds
    #[serde(deserialize_with = "serde_utils::quoted_u64::deserialize")]
    pub timestamp: u64,
    pub pubkey: String,
}

/// A signed validator registration for external block builders.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct BuilderRegistration {
    pub message: BuilderRegistrationMessage,
    pub signature: String,
}

/// A validator whose key is split across the operators of the cluster.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct DistributedValidator {
    /// The group public key of the validator
    pub distributed_public_key: String,
    /// One public key share per operator, in operator order
    #[serde(default, deserialize_with = "null_as_default")]
    pub public_shares: Vec<String>,
    /// Full deposit data, v1.6.0 and v1.7.0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposit_data: Option<DepositData>,
    /// Partial deposits, v1.8.0 and later
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub partial_deposit_data: Vec<DepositData>,
    /// Pre-generated builder registration, v1.7.0 and later
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builder_registration: Option<BuilderRegistration>,
}

/// The finalised output of a distributed key generation ceremony.
///
/// A lock binds a fully populated [`ClusterDefinition`] to the generated key shares and the
/// deposit and builder data. It is created once and never modified afterwards.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ClusterLock {
    pub cluster_definition: ClusterDefinition,
    #[serde(default, deserialize_with = "null_as_default")]
    pub distributed_validators: Vec<DistributedValidator>,
    /// BLS aggregate signature over the lock hash by all public shares
    pub signature_aggregate: String,
    /// Hash tree root of the lock
    pub lock_hash: String,
    /// secp256k1 signatures over the lock hash, one per operator, v1.7.0 and later
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub node_signatures: Vec<String>,
}

impl ClusterLock {
    /// All public shares of all validators, validator by validator.
    pub fn public_shares(&self) -> impl Iterator<Item = &str> {
        self.distributed_validators
            .iter()
            .flat_map(|validator| validator.public_shares.iter().map(String::as_str))
    }
}
