#![allow(dead_code)]

use alloy::primitives::{keccak256, Address};
use alloy::sol_types::SolStruct;
use cluster_types::util::to_0x_hex;
use cluster_types::{
    BuilderRegistration, BuilderRegistrationMessage, ClusterDefinition, ClusterLock,
    ClusterVersion, Creator, DefinitionFlow, DepositData, DistributedValidator, Operator,
    ValidatorConfig,
};
use k256::ecdsa::SigningKey;
use lock_validator::{cluster_config_or_definition_hash, cluster_lock_hash};
use signature_verifier::bls::eth1_withdrawal_credentials;
use signature_verifier::eip712::{signing_hash, CreatorConfigHash, OperatorConfigHash, ENR};
use tracing_subscriber::filter::EnvFilter;
use types::{AggregateSignature, Hash256, SecretKey};

const DEFAULT_NUM_OPERATORS: u8 = 4;
const DEFAULT_NUM_VALIDATORS: u8 = 2;
const CREATOR_SEED: u8 = 100;
const GAS_LIMIT: u64 = 30_000_000;
const REGISTRATION_TIMESTAMP: u64 = 1_696_000_000;
const GWEI_PER_ETH: u64 = 1_000_000_000;

pub const HOLESKY_FORK_VERSION: &str = "0x01017000";
pub const HOLESKY_CHAIN_ID: u64 = 17000;

/// Enable debug logging for tests
const ENABLE_TEST_LOGGING: bool = true;

pub fn init_logging() {
    if ENABLE_TEST_LOGGING {
        let env_filter = EnvFilter::new("debug");
        // Every test calls this, only the first one installs the subscriber
        let _ = tracing_subscriber::fmt()
            .compact()
            .with_env_filter(env_filter)
            .with_test_writer()
            .try_init();
    }
}

// Test fixture holding a correctly signed lock and every key used to produce it
pub struct TestFixture {
    pub lock: ClusterLock,
    pub version: ClusterVersion,
    pub flow: DefinitionFlow,
    pub chain_id: u64,
    pub creator_key: SigningKey,
    pub operator_keys: Vec<SigningKey>,
    pub validator_keys: Vec<SecretKey>,
    pub share_keys: Vec<Vec<SecretKey>>,
}

impl TestFixture {
    // A group flow lock on holesky
    pub fn new(version: ClusterVersion) -> Self {
        Self::with_flow(version, DefinitionFlow::Group)
    }

    pub fn with_flow(version: ClusterVersion, flow: DefinitionFlow) -> Self {
        Self::on_network(version, flow, HOLESKY_FORK_VERSION, HOLESKY_CHAIN_ID)
    }

    pub fn on_network(
        version: ClusterVersion,
        flow: DefinitionFlow,
        fork_version: &str,
        chain_id: u64,
    ) -> Self {
        let creator_key = generators::keys::secp256k1(CREATOR_SEED);
        let operator_keys: Vec<SigningKey> = (1..=DEFAULT_NUM_OPERATORS)
            .map(generators::keys::secp256k1)
            .collect();
        let validator_keys: Vec<SecretKey> = (0..DEFAULT_NUM_VALIDATORS)
            .map(|validator| generators::keys::bls(1000 + u64::from(validator)))
            .collect();
        let share_keys: Vec<Vec<SecretKey>> = (0..DEFAULT_NUM_VALIDATORS)
            .map(|validator| {
                (0..DEFAULT_NUM_OPERATORS)
                    .map(|share| {
                        generators::keys::bls(u64::from(validator) * 100 + u64::from(share) + 1)
                    })
                    .collect()
            })
            .collect();

        let definition = generators::definition::unsigned(
            version,
            &operator_keys,
            &creator_key,
            fork_version,
        );
        let distributed_validators = validator_keys
            .iter()
            .zip(&share_keys)
            .map(|(validator_key, shares)| {
                generators::validator::unsigned(validator_key, shares)
            })
            .collect();

        let mut fixture = Self {
            lock: ClusterLock {
                cluster_definition: definition,
                distributed_validators,
                ..Default::default()
            },
            version,
            flow,
            chain_id,
            creator_key,
            operator_keys,
            validator_keys,
            share_keys,
        };
        fixture.seal_definition();
        fixture.sign_validators();
        fixture.seal_lock();
        fixture
    }

    // Recompute the config hash, the signatures the flow requires and the definition hash
    pub fn seal_definition(&mut self) {
        let definition = &mut self.lock.cluster_definition;
        for (operator, key) in definition.operators.iter_mut().zip(&self.operator_keys) {
            *operator = Operator::new(generators::keys::address(key))
                .accept(generators::enr::from_key(key), "", "");
        }
        definition.creator = Creator {
            address: generators::keys::address(&self.creator_key),
            config_signature: String::new(),
        };
        if self.flow != DefinitionFlow::Group {
            for operator in &mut definition.operators {
                operator.address = String::new();
            }
        }
        if self.flow == DefinitionFlow::CharonCommand {
            definition.creator = Creator::default();
        }

        definition.config_hash = cluster_config_or_definition_hash(definition, true).unwrap();
        let config_hash = definition.config_hash.clone();

        if self.flow != DefinitionFlow::CharonCommand {
            definition.creator.config_signature = generators::eip712::sign(
                &self.creator_key,
                &CreatorConfigHash {
                    creator_config_hash: config_hash.clone(),
                },
                self.chain_id,
            );
        }
        if self.flow == DefinitionFlow::Group {
            for (operator, key) in definition.operators.iter_mut().zip(&self.operator_keys) {
                operator.config_signature = generators::eip712::sign(
                    key,
                    &OperatorConfigHash {
                        operator_config_hash: config_hash.clone(),
                    },
                    self.chain_id,
                );
                operator.enr_signature = generators::eip712::sign(
                    key,
                    &ENR {
                        enr: operator.enr.clone(),
                    },
                    self.chain_id,
                );
            }
        }
        definition.definition_hash =
            cluster_config_or_definition_hash(definition, false).unwrap();
    }

    // Sign every deposit and builder registration with the distributed keys
    pub fn sign_validators(&mut self) {
        let definition = &self.lock.cluster_definition;
        let amounts = definition
            .deposit_amounts
            .clone()
            .unwrap_or_else(|| vec![32 * GWEI_PER_ETH]);
        for ((validator, config), key) in self
            .lock
            .distributed_validators
            .iter_mut()
            .zip(&definition.validators)
            .zip(&self.validator_keys)
        {
            let deposits: Vec<DepositData> = amounts
                .iter()
                .map(|amount| {
                    generators::deposit::signed(key, config, *amount, &definition.fork_version)
                })
                .collect();
            if self.version.has_partial_deposits() {
                validator.partial_deposit_data = deposits;
            } else {
                validator.deposit_data = deposits.into_iter().next();
            }
            if self.version.has_builder_registration() {
                validator.builder_registration = Some(generators::registration::signed(
                    key,
                    config,
                    &definition.fork_version,
                ));
            }
        }
    }

    // Recompute the lock hash and every signature over it
    pub fn seal_lock(&mut self) {
        self.lock.lock_hash = cluster_lock_hash(&self.lock).unwrap();
        let lock_hash = Hash256::from_slice(
            &cluster_types::util::decode_fixed::<32>(&self.lock.lock_hash).unwrap(),
        );

        let mut aggregate = AggregateSignature::infinity();
        for share in self.share_keys.iter().flatten() {
            aggregate.add_assign(&share.sign(lock_hash));
        }
        self.lock.signature_aggregate = to_0x_hex(aggregate.serialize());

        self.lock.node_signatures = if self.version.has_node_signatures() {
            self.operator_keys
                .iter()
                .map(|key| generators::node::sign(key, lock_hash.as_slice()))
                .collect()
        } else {
            vec![]
        };
    }
}

// Generator functions for test data
pub mod generators {
    use super::*;

    pub mod keys {
        use super::*;

        // Deterministic secp256k1 key, used for wallets and node identities alike
        pub fn secp256k1(seed: u8) -> SigningKey {
            SigningKey::from_slice(&[seed; 32]).unwrap()
        }

        // Checksummed execution layer address of a key
        pub fn address(key: &SigningKey) -> String {
            let point = key.verifying_key().to_encoded_point(false);
            Address::from_slice(&keccak256(&point.as_bytes()[1..])[12..]).to_string()
        }

        // Deterministic BLS secret key, `index` must be non zero
        pub fn bls(index: u64) -> SecretKey {
            let mut bytes = [0u8; 32];
            bytes[24..].copy_from_slice(&index.to_be_bytes());
            SecretKey::deserialize(&bytes).unwrap()
        }
    }

    pub mod enr {
        use super::*;
        use discv5::enr::CombinedKey;
        use discv5::Enr;

        // The ENR of the node whose identity key is `key`
        pub fn from_key(key: &SigningKey) -> String {
            let mut bytes = key.to_bytes().to_vec();
            let key = CombinedKey::secp256k1_from_bytes(&mut bytes).unwrap();
            Enr::builder().build(&key).unwrap().to_base64()
        }
    }

    pub mod eip712 {
        use super::*;

        // r || s || v with v in {27, 28}, as produced by wallets
        pub fn sign<T: SolStruct>(key: &SigningKey, payload: &T, chain_id: u64) -> String {
            let hash = signing_hash(payload, chain_id);
            let (signature, recovery_id) = key.sign_prehash_recoverable(hash.as_slice()).unwrap();
            let mut bytes = signature.to_bytes().to_vec();
            bytes.push(27 + recovery_id.to_byte());
            to_0x_hex(bytes)
        }
    }

    pub mod node {
        use super::*;

        pub fn sign(key: &SigningKey, digest: &[u8]) -> String {
            let (signature, recovery_id) = key.sign_prehash_recoverable(digest).unwrap();
            let mut bytes = signature.to_bytes().to_vec();
            bytes.push(recovery_id.to_byte());
            to_0x_hex(bytes)
        }
    }

    pub mod definition {
        use super::*;

        // A definition with every operator and validator, hashes and signatures unset
        pub fn unsigned(
            version: ClusterVersion,
            operator_keys: &[SigningKey],
            creator_key: &SigningKey,
            fork_version: &str,
        ) -> ClusterDefinition {
            let creator = keys::address(creator_key);
            let validators = (0..DEFAULT_NUM_VALIDATORS)
                .map(|validator| ValidatorConfig {
                    fee_recipient_address: creator.clone(),
                    withdrawal_address: keys::address(&keys::secp256k1(200 + validator)),
                })
                .collect();
            ClusterDefinition {
                name: "test cluster".to_string(),
                creator: Creator::default(),
                operators: vec![Operator::default(); operator_keys.len()],
                uuid: "0194FDC2-FA2F-FCC0-41D3-FF12045B73C8".to_string(),
                version: version.as_str().to_string(),
                timestamp: "2024-05-02T10:00:00.000Z".to_string(),
                num_validators: u64::from(DEFAULT_NUM_VALIDATORS),
                threshold: 3,
                validators,
                dkg_algorithm: "default".to_string(),
                fork_version: fork_version.to_string(),
                deposit_amounts: version
                    .has_partial_deposits()
                    .then(|| vec![GWEI_PER_ETH, 31 * GWEI_PER_ETH]),
                config_hash: String::new(),
                definition_hash: String::new(),
            }
        }
    }

    pub mod validator {
        use super::*;

        pub fn unsigned(validator_key: &SecretKey, shares: &[SecretKey]) -> DistributedValidator {
            DistributedValidator {
                distributed_public_key: to_0x_hex(validator_key.public_key().serialize()),
                public_shares: shares
                    .iter()
                    .map(|share| to_0x_hex(share.public_key().serialize()))
                    .collect(),
                ..Default::default()
            }
        }
    }

    pub mod deposit {
        use super::*;
        use cluster_hash::signing::{deposit_data_root, deposit_signing_root};

        pub fn signed(
            key: &SecretKey,
            config: &ValidatorConfig,
            amount: u64,
            fork_version: &str,
        ) -> DepositData {
            let mut deposit_data = DepositData {
                pubkey: to_0x_hex(key.public_key().serialize()),
                withdrawal_credentials: to_0x_hex(
                    eth1_withdrawal_credentials(&config.withdrawal_address).unwrap(),
                ),
                amount,
                ..Default::default()
            };
            let root = deposit_signing_root(&deposit_data, fork_version).unwrap();
            deposit_data.signature =
                to_0x_hex(key.sign(Hash256::from_slice(root.as_slice())).serialize());
            deposit_data.deposit_data_root = to_0x_hex(deposit_data_root(&deposit_data).unwrap());
            deposit_data
        }
    }

    pub mod registration {
        use super::*;
        use cluster_hash::signing::builder_registration_signing_root;

        pub fn signed(
            key: &SecretKey,
            config: &ValidatorConfig,
            fork_version: &str,
        ) -> BuilderRegistration {
            let message = BuilderRegistrationMessage {
                fee_recipient: config.fee_recipient_address.clone(),
                gas_limit: GAS_LIMIT,
                timestamp: REGISTRATION_TIMESTAMP,
                pubkey: to_0x_hex(key.public_key().serialize()),
            };
            let root = builder_registration_signing_root(&message, fork_version).unwrap();
            BuilderRegistration {
                signature: to_0x_hex(key.sign(Hash256::from_slice(root.as_slice())).serialize()),
                message,
            }
        }
    }
}
