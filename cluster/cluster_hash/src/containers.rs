//! Leaf containers and field encoders shared by every definition and lock version.
//!
//! The versioned modules compose these into their own top level layouts. Nothing here is
//! specific to a version: operators, creators and validators have had the same shape since
//! v1.4.0, and deposit data and builder registrations are consensus layer types.

use crate::HashError;
use alloy::primitives::{Address, FixedBytes, B256};
use cluster_types::util::decode_fixed;
use cluster_types::{
    BuilderRegistration, BuilderRegistrationMessage, ClusterDefinition, Creator, DepositData,
    ForkVersion, Operator, ValidatorConfig,
};
use ssz_types::typenum::{Unsigned, U1024, U16, U256, U32, U64, U65536};
use ssz_types::VariableList;
use tree_hash_derive::TreeHash;

pub(crate) type MaxUuidLength = U64;
pub(crate) type MaxNameLength = U256;
pub(crate) type MaxVersionLength = U16;
pub(crate) type MaxTimestampLength = U32;
pub(crate) type MaxDkgAlgorithmLength = U32;
pub(crate) type MaxEnrLength = U1024;
pub(crate) type MaxOperators = U256;
pub(crate) type MaxValidators = U65536;
pub(crate) type MaxDepositAmounts = U256;
pub(crate) type MaxPartialDeposits = U256;

// secp256k1 signature with recovery id
pub(crate) const K1_SIGNATURE_LENGTH: usize = 65;
// phase0.PublicKeyLength
pub(crate) const PUBLIC_KEY_LENGTH: usize = 48;
// phase0.SignatureLength
pub(crate) const SIGNATURE_LENGTH: usize = 96;

pub(crate) type PublicKeyBytes = FixedBytes<PUBLIC_KEY_LENGTH>;
pub(crate) type SignatureBytes = FixedBytes<SIGNATURE_LENGTH>;
pub(crate) type K1SignatureBytes = FixedBytes<K1_SIGNATURE_LENGTH>;

/// Operator with its address only, used for the config hash.
#[derive(Debug, TreeHash)]
pub(crate) struct OperatorConfigContainer {
    pub address: Address,
}

#[derive(Debug, TreeHash)]
pub(crate) struct OperatorContainer {
    pub address: Address,
    pub enr: VariableList<u8, MaxEnrLength>,
    pub config_signature: K1SignatureBytes,
    pub enr_signature: K1SignatureBytes,
}

/// Creator with its address only, used for the config hash.
#[derive(Debug, TreeHash)]
pub(crate) struct CreatorConfigContainer {
    pub address: Address,
}

#[derive(Debug, TreeHash)]
pub(crate) struct CreatorContainer {
    pub address: Address,
    pub config_signature: K1SignatureBytes,
}

#[derive(Debug, TreeHash)]
pub(crate) struct ValidatorContainer {
    pub fee_recipient_address: Address,
    pub withdrawal_address: Address,
}

#[derive(Debug, TreeHash)]
pub(crate) struct DepositDataContainer {
    pub pubkey: PublicKeyBytes,
    pub withdrawal_credentials: B256,
    pub amount: u64,
    pub signature: SignatureBytes,
}

#[derive(Debug, TreeHash)]
pub(crate) struct BuilderRegistrationMessageContainer {
    pub fee_recipient: Address,
    pub gas_limit: u64,
    pub timestamp: u64,
    pub pubkey: PublicKeyBytes,
}

#[derive(Debug, TreeHash)]
pub(crate) struct BuilderRegistrationContainer {
    pub message: BuilderRegistrationMessageContainer,
    pub signature: SignatureBytes,
}

// Encode a string as an SSZ byte list, failing if it exceeds the limit
pub(crate) fn byte_list<N: Unsigned>(
    value: &str,
    field: &'static str,
) -> Result<VariableList<u8, N>, HashError> {
    VariableList::new(value.as_bytes().to_vec()).map_err(|_| {
        HashError::MalformedInput(format!(
            "{} is {} bytes long, the maximum is {}",
            field,
            value.len(),
            N::to_usize()
        ))
    })
}

// Collect items into an SSZ list, failing if there are too many
pub(crate) fn list<T, N: Unsigned>(
    items: Vec<T>,
    field: &'static str,
) -> Result<VariableList<T, N>, HashError> {
    let len = items.len();
    VariableList::new(items).map_err(|_| {
        HashError::MalformedInput(format!(
            "{} has {} entries, the maximum is {}",
            field,
            len,
            N::to_usize()
        ))
    })
}

pub(crate) fn fixed<const N: usize>(
    value: &str,
    field: &'static str,
) -> Result<FixedBytes<N>, HashError> {
    decode_fixed::<N>(value)
        .map(FixedBytes::from)
        .map_err(|e| HashError::MalformedInput(format!("{}: {}", field, e)))
}

// Fork versions have no unset form, an empty value is malformed
pub(crate) fn fork_version(value: &str) -> Result<FixedBytes<4>, HashError> {
    value
        .parse::<ForkVersion>()
        .map(|fork_version| FixedBytes::from(fork_version.0))
        .map_err(|e| HashError::MalformedInput(format!("fork version: {}", e)))
}

pub(crate) fn address(value: &str, field: &'static str) -> Result<Address, HashError> {
    fixed::<20>(value, field).map(Address::from)
}

impl OperatorConfigContainer {
    pub fn from_operator(operator: &Operator) -> Result<Self, HashError> {
        Ok(Self {
            address: address(&operator.address, "operator address")?,
        })
    }
}

impl OperatorContainer {
    pub fn from_operator(operator: &Operator) -> Result<Self, HashError> {
        Ok(Self {
            address: address(&operator.address, "operator address")?,
            enr: byte_list(&operator.enr, "operator enr")?,
            config_signature: fixed(&operator.config_signature, "operator config signature")?,
            enr_signature: fixed(&operator.enr_signature, "operator enr signature")?,
        })
    }
}

impl CreatorConfigContainer {
    pub fn from_creator(creator: &Creator) -> Result<Self, HashError> {
        Ok(Self {
            address: address(&creator.address, "creator address")?,
        })
    }
}

impl CreatorContainer {
    pub fn from_creator(creator: &Creator) -> Result<Self, HashError> {
        Ok(Self {
            address: address(&creator.address, "creator address")?,
            config_signature: fixed(&creator.config_signature, "creator config signature")?,
        })
    }
}

impl ValidatorContainer {
    pub fn from_validator(validator: &ValidatorConfig) -> Result<Self, HashError> {
        Ok(Self {
            fee_recipient_address: address(
                &validator.fee_recipient_address,
                "fee recipient address",
            )?,
            withdrawal_address: address(&validator.withdrawal_address, "withdrawal address")?,
        })
    }
}

impl DepositDataContainer {
    pub fn from_deposit_data(deposit_data: &DepositData) -> Result<Self, HashError> {
        Ok(Self {
            pubkey: fixed(&deposit_data.pubkey, "deposit pubkey")?,
            withdrawal_credentials: fixed(
                &deposit_data.withdrawal_credentials,
                "withdrawal credentials",
            )?,
            amount: deposit_data.amount,
            signature: fixed(&deposit_data.signature, "deposit signature")?,
        })
    }
}

impl BuilderRegistrationMessageContainer {
    pub fn from_message(message: &BuilderRegistrationMessage) -> Result<Self, HashError> {
        Ok(Self {
            fee_recipient: address(&message.fee_recipient, "builder fee recipient")?,
            gas_limit: message.gas_limit,
            timestamp: message.timestamp,
            pubkey: fixed(&message.pubkey, "builder registration pubkey")?,
        })
    }
}

impl BuilderRegistrationContainer {
    pub fn from_registration(registration: &BuilderRegistration) -> Result<Self, HashError> {
        Ok(Self {
            message: BuilderRegistrationMessageContainer::from_message(&registration.message)?,
            signature: fixed(&registration.signature, "builder registration signature")?,
        })
    }
}

pub(crate) fn operator_configs(
    definition: &ClusterDefinition,
) -> Result<VariableList<OperatorConfigContainer, MaxOperators>, HashError> {
    let operators = definition
        .operators
        .iter()
        .map(OperatorConfigContainer::from_operator)
        .collect::<Result<Vec<_>, _>>()?;
    list(operators, "operators")
}

pub(crate) fn operators(
    definition: &ClusterDefinition,
) -> Result<VariableList<OperatorContainer, MaxOperators>, HashError> {
    let operators = definition
        .operators
        .iter()
        .map(OperatorContainer::from_operator)
        .collect::<Result<Vec<_>, _>>()?;
    list(operators, "operators")
}

pub(crate) fn validators(
    definition: &ClusterDefinition,
) -> Result<VariableList<ValidatorContainer, MaxValidators>, HashError> {
    let validators = definition
        .validators
        .iter()
        .map(ValidatorContainer::from_validator)
        .collect::<Result<Vec<_>, _>>()?;
    list(validators, "validators")
}

pub(crate) fn public_shares(
    shares: &[String],
) -> Result<VariableList<PublicKeyBytes, MaxOperators>, HashError> {
    let shares = shares
        .iter()
        .map(|share| fixed(share, "public share"))
        .collect::<Result<Vec<_>, _>>()?;
    list(shares, "public shares")
}
