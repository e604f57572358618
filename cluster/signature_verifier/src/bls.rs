//! BLS verification of the data a distributed key signed during key generation.
//!
//! Every deposit message and builder registration of a lock is signed by the distributed
//! validator key, and the lock hash is signed by every key share. Both are checked with a
//! single aggregate verification each.

use crate::VerificationError;
use cluster_hash::signing;
use cluster_types::util::{decode_fixed, decode_hex, hex_eq, to_0x_hex};
use cluster_types::{
    ClusterLock, ClusterVersion, DepositData, DistributedValidator, ValidatorConfig,
};
use tokio::sync::OnceCell;
use tracing::{debug, trace};
use types::{AggregateSignature, Hash256, PublicKey, SecretKey, Signature};

// Prefix of execution layer withdrawal credentials
const ETH1_ADDRESS_WITHDRAWAL_PREFIX: u8 = 0x01;

static BACKEND: OnceCell<BlsBackend> = OnceCell::const_new();

/// Handle to an initialised BLS backend.
///
/// Obtained through [`ensure_initialized`], which makes sure the backend works before anything
/// is verified with it.
#[derive(Debug)]
pub struct BlsBackend {
    _private: (),
}

/// Initialises the process wide BLS backend once. Concurrent callers wait for the same
/// initialisation.
pub async fn ensure_initialized() -> Result<&'static BlsBackend, VerificationError> {
    BACKEND
        .get_or_try_init(|| async { BlsBackend::self_test() })
        .await
}

// Converts a root of the hashing engine into the hash type of the BLS library
fn to_message(root: cluster_hash::Hash256) -> Hash256 {
    Hash256::from_slice(root.as_slice())
}

fn public_key(value: &str, what: &str) -> Result<PublicKey, VerificationError> {
    let bytes = decode_hex(value).map_err(VerificationError::MalformedInput)?;
    PublicKey::deserialize(&bytes)
        .map_err(|e| VerificationError::MalformedInput(format!("{} {}: {:?}", what, value, e)))
}

fn signature(value: &str, what: &str) -> Result<Signature, VerificationError> {
    let bytes = decode_hex(value).map_err(VerificationError::MalformedInput)?;
    Signature::deserialize(&bytes)
        .map_err(|e| VerificationError::MalformedInput(format!("{}: {:?}", what, e)))
}

/// Withdrawal credentials paying out to an execution layer address,
/// `0x01 || 0x00 * 11 || address`.
pub fn eth1_withdrawal_credentials(address: &str) -> Result<[u8; 32], VerificationError> {
    let address = decode_fixed::<20>(address).map_err(VerificationError::MalformedInput)?;
    let mut credentials = [0u8; 32];
    credentials[0] = ETH1_ADDRESS_WITHDRAWAL_PREFIX;
    credentials[12..].copy_from_slice(&address);
    Ok(credentials)
}

// Messages, keys and signatures of one aggregate verification, index aligned
#[derive(Default)]
struct SignedMessages {
    pubkeys: Vec<PublicKey>,
    messages: Vec<Hash256>,
    signatures: Vec<Signature>,
}

impl SignedMessages {
    fn push(&mut self, pubkey: PublicKey, message: Hash256, signature: Signature) {
        self.pubkeys.push(pubkey);
        self.messages.push(message);
        self.signatures.push(signature);
    }

    fn verify(self) -> Result<(), VerificationError> {
        if self.pubkeys.is_empty() {
            return Ok(());
        }
        if self.pubkeys.len() != self.messages.len()
            || self.messages.len() != self.signatures.len()
        {
            return Err(VerificationError::MalformedInput(format!(
                "Mismatched aggregate inputs: {} keys, {} messages, {} signatures",
                self.pubkeys.len(),
                self.messages.len(),
                self.signatures.len()
            )));
        }

        let mut aggregate = AggregateSignature::infinity();
        for signature in &self.signatures {
            aggregate.add_assign(signature);
        }
        let pubkeys: Vec<&PublicKey> = self.pubkeys.iter().collect();
        trace!(messages = self.messages.len(), "Verifying aggregate signature");
        if !aggregate.aggregate_verify(&self.messages, &pubkeys) {
            return Err(VerificationError::SignatureMismatch(
                "Deposit and builder registration signatures do not verify".to_string(),
            ));
        }
        Ok(())
    }
}

impl BlsBackend {
    // Sign and verify with a fixed key so a broken backend is caught before use
    fn self_test() -> Result<Self, VerificationError> {
        let mut secret = [0u8; 32];
        secret[31] = 1;
        let secret_key = SecretKey::deserialize(&secret)
            .map_err(|e| VerificationError::BlsInit(format!("{:?}", e)))?;
        let message = Hash256::repeat_byte(0x42);
        if !secret_key
            .sign(message)
            .verify(&secret_key.public_key(), message)
        {
            return Err(VerificationError::BlsInit(
                "Self test signature did not verify".to_string(),
            ));
        }
        debug!("BLS backend initialised");
        Ok(Self { _private: () })
    }

    fn check_deposit_data(
        deposit_data: &DepositData,
        validator: &DistributedValidator,
        config: &ValidatorConfig,
    ) -> Result<(), VerificationError> {
        let credentials = eth1_withdrawal_credentials(&config.withdrawal_address)?;
        if !hex_eq(&deposit_data.withdrawal_credentials, &to_0x_hex(credentials)) {
            return Err(VerificationError::SignatureMismatch(format!(
                "Withdrawal credentials {} do not pay to {}",
                deposit_data.withdrawal_credentials, config.withdrawal_address
            )));
        }
        if !hex_eq(&deposit_data.pubkey, &validator.distributed_public_key) {
            return Err(VerificationError::SignatureMismatch(format!(
                "Deposit pubkey {} is not the distributed public key {}",
                deposit_data.pubkey, validator.distributed_public_key
            )));
        }
        if !deposit_data.deposit_data_root.is_empty() {
            let root = signing::deposit_data_root(deposit_data)?;
            if !hex_eq(&deposit_data.deposit_data_root, &to_0x_hex(root)) {
                return Err(VerificationError::SignatureMismatch(format!(
                    "Deposit data root {} does not match the deposit data",
                    deposit_data.deposit_data_root
                )));
            }
        }
        Ok(())
    }

    /// Verifies the deposit and builder registration signatures of every validator.
    ///
    /// Admission checks on the signed messages run first. All signatures are then checked in
    /// one aggregate multi-message verification.
    pub fn verify_message_signatures(
        &self,
        lock: &ClusterLock,
        version: ClusterVersion,
    ) -> Result<(), VerificationError> {
        let definition = &lock.cluster_definition;
        if lock.distributed_validators.len() != definition.validators.len() {
            return Err(VerificationError::MalformedInput(format!(
                "Lock has {} distributed validators, the definition configures {}",
                lock.distributed_validators.len(),
                definition.validators.len()
            )));
        }

        let mut signed = SignedMessages::default();
        for (validator, config) in lock
            .distributed_validators
            .iter()
            .zip(&definition.validators)
        {
            let pubkey = public_key(&validator.distributed_public_key, "distributed public key")?;

            let deposits = if version.has_partial_deposits() {
                validator.partial_deposit_data.as_slice()
            } else {
                validator.deposit_data.as_slice()
            };
            if deposits.is_empty() {
                return Err(VerificationError::MalformedInput(format!(
                    "Validator {} has no deposit data",
                    validator.distributed_public_key
                )));
            }
            for deposit_data in deposits {
                Self::check_deposit_data(deposit_data, validator, config)?;
                let root = signing::deposit_signing_root(deposit_data, &definition.fork_version)?;
                signed.push(
                    pubkey.clone(),
                    to_message(root),
                    signature(&deposit_data.signature, "deposit signature")?,
                );
            }

            if version.has_builder_registration() {
                let registration = validator.builder_registration.as_ref().ok_or_else(|| {
                    VerificationError::MalformedInput(format!(
                        "Validator {} has no builder registration",
                        validator.distributed_public_key
                    ))
                })?;
                let message = &registration.message;
                if !hex_eq(&message.pubkey, &validator.distributed_public_key) {
                    return Err(VerificationError::SignatureMismatch(format!(
                        "Builder registration pubkey {} is not the distributed public key",
                        message.pubkey
                    )));
                }
                if !hex_eq(&message.fee_recipient, &config.fee_recipient_address) {
                    return Err(VerificationError::SignatureMismatch(format!(
                        "Builder registration fee recipient {} is not {}",
                        message.fee_recipient, config.fee_recipient_address
                    )));
                }
                let root =
                    signing::builder_registration_signing_root(message, &definition.fork_version)?;
                signed.push(
                    pubkey,
                    to_message(root),
                    signature(&registration.signature, "builder registration signature")?,
                );
            }
        }
        signed.verify()
    }

    /// Verifies the aggregate signature of all key shares over the lock hash.
    pub fn verify_signature_aggregate(&self, lock: &ClusterLock) -> Result<(), VerificationError> {
        let lock_hash =
            decode_fixed::<32>(&lock.lock_hash).map_err(VerificationError::MalformedInput)?;
        let aggregate = decode_hex(&lock.signature_aggregate)
            .map_err(VerificationError::MalformedInput)
            .and_then(|bytes| {
                AggregateSignature::deserialize(&bytes).map_err(|e| {
                    VerificationError::MalformedInput(format!("Signature aggregate: {:?}", e))
                })
            })?;
        let shares = lock
            .public_shares()
            .map(|share| public_key(share, "public share"))
            .collect::<Result<Vec<_>, _>>()?;
        if shares.is_empty() {
            return Err(VerificationError::MalformedInput(
                "Lock has no public shares".to_string(),
            ));
        }

        let shares: Vec<&PublicKey> = shares.iter().collect();
        if !aggregate.fast_aggregate_verify(Hash256::from(lock_hash), &shares) {
            return Err(VerificationError::SignatureMismatch(
                "Signature aggregate does not verify over the lock hash".to_string(),
            ));
        }
        Ok(())
    }
}
