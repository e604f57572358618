//! Definition and lock layout of v1.8.0.
//!
//! Definitions gain the list of deposit amounts. Each distributed validator carries a list of
//! partial deposits in place of the single deposit data of earlier versions.

use crate::containers::{
    byte_list, fixed, fork_version, list, operator_configs, operators, public_shares, validators,
    BuilderRegistrationContainer, CreatorConfigContainer, CreatorContainer,
    DepositDataContainer, MaxDepositAmounts, MaxDkgAlgorithmLength, MaxNameLength,
    MaxOperators, MaxPartialDeposits, MaxTimestampLength, MaxUuidLength, MaxValidators,
    MaxVersionLength, OperatorConfigContainer, OperatorContainer, PublicKeyBytes,
    ValidatorContainer,
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
    deposit_amounts: VariableList<u64, MaxDepositAmounts>,
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
    deposit_amounts: VariableList<u64, MaxDepositAmounts>,
    config_hash: Hash256,
}

#[derive(Debug, TreeHash)]
struct DistributedValidatorContainer {
    distributed_public_key: PublicKeyBytes,
    public_shares: VariableList<PublicKeyBytes, MaxOperators>,
    partial_deposit_data: VariableList<DepositDataContainer, MaxPartialDeposits>,
    builder_registration: BuilderRegistrationContainer,
}

#[derive(Debug, TreeHash)]
struct LockContainer {
    cluster_definition: DefinitionContainer,
    distributed_validators: VariableList<DistributedValidatorContainer, MaxValidators>,
}

// A missing list of deposit amounts hashes as an empty list
fn deposit_amounts(
    definition: &ClusterDefinition,
) -> Result<VariableList<u64, MaxDepositAmounts>, HashError> {
    list(
        definition.deposit_amounts.clone().unwrap_or_default(),
        "deposit amounts",
    )
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
            deposit_amounts: deposit_amounts(definition)?,
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
            deposit_amounts: deposit_amounts(definition)?,
            config_hash: fixed(&definition.config_hash, "config hash")?,
        })
    }
}

impl DistributedValidatorContainer {
    fn new(validator: &DistributedValidator) -> Result<Self, HashError> {
        let builder_registration = validator.builder_registration.as_ref().ok_or_else(|| {
            HashError::MalformedInput(format!(
                "validator {} has no builder registration",
                validator.distributed_public_key
            ))
        })?;
        let partial_deposit_data = validator
            .partial_deposit_data
            .iter()
            .map(DepositDataContainer::from_deposit_data)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            distributed_public_key: fixed(
                &validator.distributed_public_key,
                "distributed public key",
            )?,
            public_shares: public_shares(&validator.public_shares)?,
            partial_deposit_data: list(partial_deposit_data, "partial deposit data")?,
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
