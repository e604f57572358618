//! Definition and lock layout of v1.7.0.
//!
//! The definition is laid out as in v1.6.0. Distributed validators gain a pre-generated
//! builder registration; node signatures are produced over the lock hash and are therefore
//! not part of it.

use crate::containers::{
    byte_list, fixed, fork_version, list, operator_configs, operators, public_shares, validators,
    BuilderRegistrationContainer, CreatorConfigContainer, CreatorContainer,
    DepositDataContainer, MaxDkgAlgorithmLength, MaxNameLength, MaxOperators,
    MaxTimestampLength, MaxUuidLength, MaxValidators, MaxVersionLength, OperatorConfigContainer,
    OperatorContainer, PublicKeyBytes, ValidatorContainer,
};
use crate::{Hash256, HashError};
use alloy::primitives::FixedBytes;
use cluster_types::{ClusterDefinition, ClusterLock, DistributedValidator};
use ssz_types::VariableList;
use tree_hash::TreeHash;
use tree_hash_derive::TreeHash;

#[derive(Debug, TreeHash)]
struct DefinitionConfigContainer {
    uuid: VariableList<u8, MaxUuidLength>,
    name: VariableList<u8, MaxNameLength>,
    version: VariableList<u8, MaxVersionLength>,
    timestamp: VariableList<u8, MaxTimestampLength>,
    num_validators: u64,
    threshold: u64,
    dkg_algorithm: VariableList<u8, MaxDkgAlgorithmLength>,
    fork_version: FixedBytes<4>,
    operators: VariableList<OperatorConfigContainer, MaxOperators>,
    creator: CreatorConfigContainer,
    validators: VariableList<ValidatorContainer, MaxValidators>,
}

#[derive(Debug, TreeHash)]
struct DefinitionContainer {
    uuid: VariableList<u8, MaxUuidLength>,
    name: VariableList<u8, MaxNameLength>,
    version: VariableList<u8, MaxVersionLength>,
    timestamp: VariableList<u8, MaxTimestampLength>,
    num_validators: u64,
    threshold: u64,
    dkg_algorithm: VariableList<u8, MaxDkgAlgorithmLength>,
    fork_version: FixedBytes<4>,
    operators: VariableList<OperatorContainer, MaxOperators>,
    creator: CreatorContainer,
    validators: VariableList<ValidatorContainer, MaxValidators>,
    config_hash: Hash256,
}

#[derive(Debug, TreeHash)]
struct DistributedValidatorContainer {
    distributed_public_key: PublicKeyBytes,
    public_shares: VariableList<PublicKeyBytes, MaxOperators>,
    deposit_data: DepositDataContainer,
    builder_registration: BuilderRegistrationContainer,
}

#[derive(Debug, TreeHash)]
struct LockContainer {
    cluster_definition: DefinitionContainer,
    distributed_validators: VariableList<DistributedValidatorContainer, MaxValidators>,
}

impl DefinitionConfigContainer {
    fn new(definition: &ClusterDefinition) -> Result<Self, HashError> {
        Ok(Self {
            uuid: byte_list(&definition.uuid, "uuid")?,
            name: byte_list(&definition.name, "name")?,
            version: byte_list(&definition.version, "version")?,
            timestamp: byte_list(&definition.timestamp, "timestamp")?,
            num_validators: definition.num_validators,
            threshold: definition.threshold,
            dkg_algorithm: byte_list(&definition.dkg_algorithm, "dkg algorithm")?,
            fork_version: fork_version(&definition.fork_version)?,
            operators: operator_configs(definition)?,
            creator: CreatorConfigContainer::from_creator(&definition.creator)?,
            validators: validators(definition)?,
        })
    }
}

impl DefinitionContainer {
    fn new(definition: &ClusterDefinition) -> Result<Self, HashError> {
        Ok(Self {
            uuid: byte_list(&definition.uuid, "uuid")?,
            name: byte_list(&definition.name, "name")?,
            version: byte_list(&definition.version, "version")?,
            timestamp: byte_list(&definition.timestamp, "timestamp")?,
            num_validators: definition.num_validators,
            threshold: definition.threshold,
            dkg_algorithm: byte_list(&definition.dkg_algorithm, "dkg algorithm")?,
            fork_version: fork_version(&definition.fork_version)?,
            operators: operators(definition)?,
            creator: CreatorContainer::from_creator(&definition.creator)?,
            validators: validators(definition)?,
            config_hash: fixed(&definition.config_hash, "config hash")?,
        })
    }
}

impl DistributedValidatorContainer {
    fn new(validator: &DistributedValidator) -> Result<Self, HashError> {
        let missing = |what: &str| {
            HashError::MalformedInput(format!(
                "validator {} has no {}",
                validator.distributed_public_key, what
            ))
        };
        let deposit_data = validator
            .deposit_data
            .as_ref()
            .ok_or_else(|| missing("deposit data"))?;
        let builder_registration = validator
            .builder_registration
            .as_ref()
            .ok_or_else(|| missing("builder registration"))?;
        Ok(Self {
            distributed_public_key: fixed(
                &validator.distributed_public_key,
                "distributed public key",
            )?,
            public_shares: public_shares(&validator.public_shares)?,
            deposit_data: DepositDataContainer::from_deposit_data(deposit_data)?,
            builder_registration: BuilderRegistrationContainer::from_registration(
                builder_registration,
            )?,
        })
    }
}

pub fn config_hash(definition: &ClusterDefinition) -> Result<Hash256, HashError> {
    Ok(DefinitionConfigContainer::new(definition)?.tree_hash_root())
}

pub fn definition_hash(definition: &ClusterDefinition) -> Result<Hash256, HashError> {
    Ok(DefinitionContainer::new(definition)?.tree_hash_root())
}

pub fn lock_hash(lock: &ClusterLock) -> Result<Hash256, HashError> {
    let distributed_validators = lock
        .distributed_validators
        .iter()
        .map(DistributedValidatorContainer::new)
        .collect::<Result<Vec<_>, _>>()?;
    let container = LockContainer {
        cluster_definition: DefinitionContainer::new(&lock.cluster_definition)?,
        distributed_validators: list(distributed_validators, "distributed validators")?,
    };
    Ok(container.tree_hash_root())
}
