//! EIP-712 signatures of creators and operators over a cluster definition.
//!
//! The creator signs the config hash. In a group flow every operator additionally signs the
//! config hash and its own ENR, binding its execution layer address to its node identity.

use crate::VerificationError;
use alloy::primitives::{Address, Signature, B256};
use alloy::sol;
use alloy::sol_types::{eip712_domain, Eip712Domain, SolStruct};
use cluster_types::util::{decode_hex, hex_eq};
use cluster_types::{ClusterDefinition, DefinitionFlow, ForkVersion, Networks};
use tracing::debug;

sol! {
    #[derive(Debug)]
    struct CreatorConfigHash {
        string creator_config_hash;
    }

    #[derive(Debug)]
    struct OperatorConfigHash {
        string operator_config_hash;
    }

    #[allow(clippy::upper_case_acronyms)]
    #[derive(Debug)]
    struct ENR {
        string enr;
    }
}

/// The domain every cluster signature is made under.
pub fn domain(chain_id: u64) -> Eip712Domain {
    eip712_domain! {
        name: "Obol",
        version: "1",
        chain_id: chain_id,
    }
}

/// Looks up the chain id a definition's signatures are bound to.
pub fn chain_id(fork_version: &str, networks: &Networks) -> Result<u64, VerificationError> {
    let parsed: ForkVersion = fork_version
        .parse()
        .map_err(VerificationError::MalformedInput)?;
    networks
        .by_fork_version(&parsed)
        .map(|network| network.chain_id)
        .ok_or_else(|| VerificationError::UnknownForkVersion(fork_version.to_string()))
}

/// The digest a wallet signs for `payload`.
pub fn signing_hash<T: SolStruct>(payload: &T, chain_id: u64) -> B256 {
    payload.eip712_signing_hash(&domain(chain_id))
}

/// Recovers the address that produced a 65 byte `r || s || v` signature over `payload`.
pub fn recover_signer<T: SolStruct>(
    payload: &T,
    chain_id: u64,
    signature: &str,
) -> Result<Address, VerificationError> {
    let bytes = decode_hex(signature).map_err(VerificationError::MalformedInput)?;
    let signature = Signature::from_raw(&bytes)
        .map_err(|e| VerificationError::MalformedInput(format!("EIP-712 signature: {}", e)))?;
    signature
        .recover_address_from_prehash(&signing_hash(payload, chain_id))
        .map_err(|e| VerificationError::SignatureMismatch(format!("Unable to recover: {}", e)))
}

fn verify_signer<T: SolStruct>(
    payload: &T,
    chain_id: u64,
    signature: &str,
    expected: &str,
    what: &str,
) -> Result<(), VerificationError> {
    let recovered = recover_signer(payload, chain_id, signature)?;
    if !hex_eq(&recovered.to_string(), expected) {
        return Err(VerificationError::SignatureMismatch(format!(
            "{} was signed by {}, expected {}",
            what, recovered, expected
        )));
    }
    Ok(())
}

/// Checks the signatures a definition of the given flow must carry.
pub fn verify_definition_signatures(
    definition: &ClusterDefinition,
    flow: DefinitionFlow,
    chain_id: u64,
) -> Result<(), VerificationError> {
    if flow == DefinitionFlow::CharonCommand {
        debug!("Definition created by charon command, no signatures to check");
        return Ok(());
    }

    let creator_payload = CreatorConfigHash {
        creator_config_hash: definition.config_hash.clone(),
    };
    verify_signer(
        &creator_payload,
        chain_id,
        &definition.creator.config_signature,
        &definition.creator.address,
        "creator config hash",
    )?;

    if flow == DefinitionFlow::Solo {
        return Ok(());
    }

    let operator_payload = OperatorConfigHash {
        operator_config_hash: definition.config_hash.clone(),
    };
    for (index, operator) in definition.operators.iter().enumerate() {
        verify_signer(
            &operator_payload,
            chain_id,
            &operator.config_signature,
            &operator.address,
            &format!("config hash of operator {}", index),
        )?;
        let enr_payload = ENR {
            enr: operator.enr.clone(),
        };
        verify_signer(
            &enr_payload,
            chain_id,
            &operator.enr_signature,
            &operator.address,
            &format!("enr of operator {}", index),
        )?;
    }
    debug!(
        operators = definition.operators.len(),
        "Operator signatures verified"
    );
    Ok(())
}
