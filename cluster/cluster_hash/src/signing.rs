//! Domain separation and signing roots, per the consensus specs' `compute_domain` and
//! `compute_signing_root`.

use crate::containers::{
    self, fixed, BuilderRegistrationMessageContainer, DepositDataContainer, PublicKeyBytes,
};
use crate::{Hash256, HashError};
use alloy::primitives::FixedBytes;
use cluster_types::{BuilderRegistrationMessage, DepositData};
use tree_hash::TreeHash;
use tree_hash_derive::TreeHash;

/// Domain type of deposit messages.
pub const DOMAIN_DEPOSIT: [u8; 4] = [0x03, 0x00, 0x00, 0x00];
/// Application domain type of validator registrations for external builders.
pub const DOMAIN_APPLICATION_BUILDER: [u8; 4] = [0x00, 0x00, 0x00, 0x01];
/// Deposits and builder registrations are valid across forks, so they are signed with an
/// empty genesis validators root.
pub const ZERO_GENESIS_VALIDATORS_ROOT: Hash256 = Hash256::ZERO;

#[derive(Debug, TreeHash)]
struct ForkData {
    current_version: FixedBytes<4>,
    genesis_validators_root: Hash256,
}

#[derive(Debug, TreeHash)]
struct SigningData {
    object_root: Hash256,
    domain: Hash256,
}

#[derive(Debug, TreeHash)]
struct DepositMessage {
    pubkey: PublicKeyBytes,
    withdrawal_credentials: Hash256,
    amount: u64,
}

pub fn compute_fork_data_root(
    fork_version: &str,
    genesis_validators_root: Hash256,
) -> Result<Hash256, HashError> {
    let fork_data = ForkData {
        current_version: containers::fork_version(fork_version)?,
        genesis_validators_root,
    };
    Ok(fork_data.tree_hash_root())
}

/// Builds the 32 byte domain `domain_type || fork_data_root[..28]`.
pub fn compute_domain(
    domain_type: [u8; 4],
    fork_version: &str,
    genesis_validators_root: Hash256,
) -> Result<Hash256, HashError> {
    let fork_data_root = compute_fork_data_root(fork_version, genesis_validators_root)?;
    let mut domain = [0u8; 32];
    domain[..4].copy_from_slice(&domain_type);
    domain[4..].copy_from_slice(&fork_data_root.as_slice()[..28]);
    Ok(Hash256::from(domain))
}

pub fn compute_signing_root(object_root: Hash256, domain: Hash256) -> Hash256 {
    SigningData {
        object_root,
        domain,
    }
    .tree_hash_root()
}

/// Root of the deposit message, i.e. the deposit data without its signature.
pub fn deposit_message_root(deposit_data: &DepositData) -> Result<Hash256, HashError> {
    let message = DepositMessage {
        pubkey: fixed(&deposit_data.pubkey, "deposit pubkey")?,
        withdrawal_credentials: fixed(
            &deposit_data.withdrawal_credentials,
            "withdrawal credentials",
        )?,
        amount: deposit_data.amount,
    };
    Ok(message.tree_hash_root())
}

/// Root of the full deposit data as submitted to the deposit contract.
pub fn deposit_data_root(deposit_data: &DepositData) -> Result<Hash256, HashError> {
    Ok(DepositDataContainer::from_deposit_data(deposit_data)?.tree_hash_root())
}

pub fn builder_registration_message_root(
    message: &BuilderRegistrationMessage,
) -> Result<Hash256, HashError> {
    Ok(BuilderRegistrationMessageContainer::from_message(message)?.tree_hash_root())
}

/// The root the distributed key signs for a deposit on the network of `fork_version`.
pub fn deposit_signing_root(
    deposit_data: &DepositData,
    fork_version: &str,
) -> Result<Hash256, HashError> {
    let domain = compute_domain(DOMAIN_DEPOSIT, fork_version, ZERO_GENESIS_VALIDATORS_ROOT)?;
    Ok(compute_signing_root(
        deposit_message_root(deposit_data)?,
        domain,
    ))
}

/// The root the distributed key signs for a builder registration on the network of
/// `fork_version`.
pub fn builder_registration_signing_root(
    message: &BuilderRegistrationMessage,
    fork_version: &str,
) -> Result<Hash256, HashError> {
    let domain = compute_domain(
        DOMAIN_APPLICATION_BUILDER,
        fork_version,
        ZERO_GENESIS_VALIDATORS_ROOT,
    )?;
    Ok(compute_signing_root(
        builder_registration_message_root(message)?,
        domain,
    ))
}

#[cfg(test)]
mod signing_tests {
    use super::*;
    use cluster_types::util::to_0x_hex;

    const MAINNET_FORK_VERSION: &str = "0x00000000";

    #[test]
    // The mainnet deposit domain used by every deposit tool
    fn test_mainnet_deposit_domain() {
        let domain = compute_domain(
            DOMAIN_DEPOSIT,
            MAINNET_FORK_VERSION,
            ZERO_GENESIS_VALIDATORS_ROOT,
        )
        .unwrap();
        assert_eq!(
            to_0x_hex(domain),
            "0x03000000f5a5fd42d16a20302798ef6ed309979b43003d2320d9f0e8ea9831a9"
        );
    }

    #[test]
    fn test_builder_domain_shares_fork_data_root() {
        let deposit = compute_domain(DOMAIN_DEPOSIT, "0x01017000", Hash256::ZERO).unwrap();
        let builder =
            compute_domain(DOMAIN_APPLICATION_BUILDER, "0x01017000", Hash256::ZERO).unwrap();
        assert_eq!(&deposit[..4], &DOMAIN_DEPOSIT);
        assert_eq!(&builder[..4], &DOMAIN_APPLICATION_BUILDER);
        assert_eq!(&deposit[4..], &builder[4..]);
    }

    #[test]
    fn test_fork_version_without_prefix() {
        let with_prefix = compute_domain(DOMAIN_DEPOSIT, "0x90000069", Hash256::ZERO).unwrap();
        let without_prefix = compute_domain(DOMAIN_DEPOSIT, "90000069", Hash256::ZERO).unwrap();
        assert_eq!(with_prefix, without_prefix);
    }

    #[test]
    fn test_malformed_fork_version() {
        assert!(matches!(
            compute_domain(DOMAIN_DEPOSIT, "0x0000", Hash256::ZERO),
            Err(HashError::MalformedInput(_))
        ));
        assert!(matches!(
            compute_domain(DOMAIN_DEPOSIT, "0xnothex!", Hash256::ZERO),
            Err(HashError::MalformedInput(_))
        ));
        // An empty fork version is not the mainnet one
        for empty in ["", "0x"] {
            assert!(matches!(
                compute_domain(DOMAIN_DEPOSIT, empty, Hash256::ZERO),
                Err(HashError::MalformedInput(_))
            ));
        }
    }

    #[test]
    fn test_signing_root_depends_on_domain() {
        let object_root = Hash256::repeat_byte(0x42);
        let mainnet = compute_domain(DOMAIN_DEPOSIT, "0x00000000", Hash256::ZERO).unwrap();
        let holesky = compute_domain(DOMAIN_DEPOSIT, "0x01017000", Hash256::ZERO).unwrap();
        assert_ne!(
            compute_signing_root(object_root, mainnet),
            compute_signing_root(object_root, holesky)
        );
    }

    #[test]
    fn test_deposit_message_ignores_signature() {
        let deposit = DepositData {
            pubkey: to_0x_hex([0xaa; 48]),
            withdrawal_credentials: to_0x_hex([0x01; 32]),
            amount: 32_000_000_000,
            signature: to_0x_hex([0xbb; 96]),
            deposit_data_root: String::new(),
        };
        let mut resigned = deposit.clone();
        resigned.signature = to_0x_hex([0xcc; 96]);

        assert_eq!(
            deposit_message_root(&deposit).unwrap(),
            deposit_message_root(&resigned).unwrap()
        );
        assert_ne!(
            deposit_data_root(&deposit).unwrap(),
            deposit_data_root(&resigned).unwrap()
        );
    }
}
