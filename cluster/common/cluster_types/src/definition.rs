use crate::util::{null_as_default, quoted_u64_list};
use crate::{ClusterVersion, Operator};
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

/// The creator of a cluster definition.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Creator {
    /// Ethereum address of the creator. Empty for charon-command definitions.
    #[serde(default)]
    pub address: String,
    /// EIP-712 signature over the config hash
    #[serde(default)]
    pub config_signature: String,
}

/// Execution layer addresses of a single validator.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    pub fee_recipient_address: String,
    pub withdrawal_address: String,
}

/// How a definition was produced, inferred from which fields are populated.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum DefinitionFlow {
    /// A creator invited independent operators, every one of them signed.
    Group,
    /// A single creator runs every node. Only the creator signed.
    Solo,
    /// Generated locally by `charon create cluster`. Nothing is signed.
    CharonCommand,
}

/// The configuration of a Distributed Validator cluster agreed on before key generation.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ClusterDefinition {
    pub name: String,
    pub creator: Creator,
    #[serde(default, deserialize_with = "null_as_default")]
    pub operators: Vec<Operator>,
    pub uuid: String,
    /// Format version, e.g. `v1.8.0`
    pub version: String,
    pub timestamp: String,
    pub num_validators: u64,
    pub threshold: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub validators: Vec<ValidatorConfig>,
    pub dkg_algorithm: String,
    /// Hex encoded genesis fork version of the target network
    pub fork_version: String,
    /// Deposit amounts in gwei, only present from v1.8.0
    #[serde(
        default,
        with = "quoted_u64_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub deposit_amounts: Option<Vec<u64>>,
    /// Hash of the configuration only fields
    #[serde(default)]
    pub config_hash: String,
    /// Hash of the fully populated definition
    #[serde(default)]
    pub definition_hash: String,
}

impl ClusterDefinition {
    /// The declared format version, if supported.
    pub fn cluster_version(&self) -> Result<ClusterVersion, String> {
        self.version.parse()
    }

    /// Infers the flow that produced this definition, `None` if the populated fields do not
    /// match any known flow.
    pub fn flow(&self) -> Option<DefinitionFlow> {
        let creator_signed =
            !self.creator.address.is_empty() && !self.creator.config_signature.is_empty();
        let creator_empty =
            self.creator.address.is_empty() && self.creator.config_signature.is_empty();
        let enr_only = |operator: &Operator| {
            operator.has_enr() && !operator.has_address() && !operator.has_signatures()
        };

        if creator_signed && self.operators.iter().all(Operator::is_accepted) {
            Some(DefinitionFlow::Group)
        } else if creator_signed && self.operators.iter().all(enr_only) {
            Some(DefinitionFlow::Solo)
        } else if creator_empty && self.operators.iter().all(enr_only) {
            Some(DefinitionFlow::CharonCommand)
        } else {
            None
        }
    }
}
