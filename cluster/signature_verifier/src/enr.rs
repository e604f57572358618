//! Node signatures: each operator's node key, as published in its ENR, signs the lock hash.

use crate::VerificationError;
use cluster_types::util::{decode_fixed, decode_hex};
use cluster_types::ClusterLock;
use discv5::enr::EnrPublicKey;
use discv5::Enr;
use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{Signature, VerifyingKey};
use tracing::debug;

// r || s, the trailing recovery id is not needed to verify against a known key
const COMPACT_SIGNATURE_LENGTH: usize = 64;
const RECOVERABLE_SIGNATURE_LENGTH: usize = 65;

/// Decodes the secp256k1 node key of a textual `enr:` record.
pub fn enr_public_key(enr: &str) -> Result<VerifyingKey, VerificationError> {
    let enr: Enr = enr
        .parse()
        .map_err(|e: String| VerificationError::MalformedInput(format!("ENR: {}", e)))?;
    VerifyingKey::from_sec1_bytes(&enr.public_key().encode()).map_err(|_| {
        VerificationError::MalformedInput(format!(
            "ENR {} does not carry a secp256k1 key",
            enr.node_id()
        ))
    })
}

/// Verifies a 65 byte `r || s || v` (or 64 byte `r || s`) signature over a 32 byte digest.
///
/// Signatures with a high `s` value are malleated copies of a valid one and do not verify.
pub fn verify_prehashed(
    key: &VerifyingKey,
    digest: &[u8; 32],
    signature: &str,
) -> Result<bool, VerificationError> {
    let bytes = decode_hex(signature).map_err(VerificationError::MalformedInput)?;
    if bytes.len() != COMPACT_SIGNATURE_LENGTH && bytes.len() != RECOVERABLE_SIGNATURE_LENGTH {
        return Err(VerificationError::MalformedInput(format!(
            "secp256k1 signature has {} bytes",
            bytes.len()
        )));
    }
    let signature = Signature::from_slice(&bytes[..COMPACT_SIGNATURE_LENGTH])
        .map_err(|e| VerificationError::MalformedInput(format!("secp256k1 signature: {}", e)))?;
    if signature.normalize_s().is_some() {
        return Ok(false);
    }
    Ok(key.verify_prehash(digest, &signature).is_ok())
}

/// Verifies that operator `i` signed the lock hash with the key in its ENR, for every operator.
pub fn verify_node_signatures(lock: &ClusterLock) -> Result<(), VerificationError> {
    let operators = &lock.cluster_definition.operators;
    if lock.node_signatures.len() != operators.len() {
        return Err(VerificationError::MalformedInput(format!(
            "Lock has {} node signatures for {} operators",
            lock.node_signatures.len(),
            operators.len()
        )));
    }

    let lock_hash =
        decode_fixed::<32>(&lock.lock_hash).map_err(VerificationError::MalformedInput)?;
    for (index, (operator, signature)) in operators.iter().zip(&lock.node_signatures).enumerate()
    {
        let key = enr_public_key(&operator.enr)?;
        if !verify_prehashed(&key, &lock_hash, signature)? {
            return Err(VerificationError::SignatureMismatch(format!(
                "Node signature of operator {} does not verify",
                index
            )));
        }
    }
    debug!(operators = operators.len(), "Node signatures verified");
    Ok(())
}
