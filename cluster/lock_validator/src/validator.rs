use crate::{metrics, ClusterLockError, Config};
use cluster_hash::{cluster_config_or_definition_hash, cluster_lock_hash};
use cluster_types::util::stored_hash_eq;
use cluster_types::ClusterLock;
use signature_verifier::{eip712, ensure_initialized, verify_definition_signatures};
use strum::IntoStaticStr;
use tracing::{debug, trace, warn};

/// Stages of a lock validation, in the order they are passed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ValidationState {
    Start,
    DefinitionSignaturesChecked,
    DefinitionHashChecked,
    LockHashChecked,
    LockDataChecked,
    Valid,
    Invalid,
}

/// Result of validating a lock, along with the last stage that passed.
#[derive(Debug)]
pub struct ValidationOutcome {
    /// `Valid` on success, otherwise the last stage passed before the failure
    pub reached: ValidationState,
    pub result: Result<(), ClusterLockError>,
}

impl ValidationOutcome {
    /// The terminal state, `Valid` or `Invalid`.
    pub fn state(&self) -> ValidationState {
        match self.result {
            Ok(()) => ValidationState::Valid,
            Err(_) => ValidationState::Invalid,
        }
    }
}

fn check_hash(
    field: &'static str,
    expected: &str,
    computed: String,
) -> Result<(), ClusterLockError> {
    if !stored_hash_eq(expected, &computed) {
        return Err(ClusterLockError::HashMismatch {
            field,
            expected: expected.to_string(),
            computed,
        });
    }
    Ok(())
}

/// Checks cluster locks end to end, stopping at the first failing stage.
#[derive(Clone, Debug, Default)]
pub struct LockValidator {
    config: Config,
}

impl LockValidator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Validates a lock, surfacing the reason it is rejected.
    pub async fn validate(&self, lock: &ClusterLock) -> Result<(), ClusterLockError> {
        self.check(lock).await.result
    }

    /// Validates a lock and reports how far validation got.
    pub async fn check(&self, lock: &ClusterLock) -> ValidationOutcome {
        let _timer = metrics::start_timer(&metrics::CLUSTER_LOCK_VALIDATION_SECONDS);
        let mut reached = ValidationState::Start;
        let result = self.run(lock, &mut reached).await;

        match &result {
            Ok(()) => {
                debug!(lock_hash = %lock.lock_hash, "Cluster lock is valid");
                metrics::inc_counter_vec(&metrics::CLUSTER_LOCK_VALIDATIONS_TOTAL, &["valid"]);
            }
            Err(error) => {
                let state: &'static str = reached.into();
                warn!(
                    lock_hash = %lock.lock_hash,
                    passed = state,
                    %error,
                    "Cluster lock is invalid"
                );
                metrics::inc_counter_vec(
                    &metrics::CLUSTER_LOCK_VALIDATIONS_TOTAL,
                    &[error.kind()],
                );
                metrics::inc_counter_vec(
                    &metrics::CLUSTER_LOCK_VALIDATION_FAILURES_BY_STATE,
                    &[state],
                );
            }
        }
        ValidationOutcome { reached, result }
    }

    async fn run(
        &self,
        lock: &ClusterLock,
        reached: &mut ValidationState,
    ) -> Result<(), ClusterLockError> {
        let mut advance = |state: ValidationState| {
            trace!(state = <&'static str>::from(state), "Validation stage passed");
            *reached = state;
        };
        let definition = &lock.cluster_definition;
        let version = definition
            .cluster_version()
            .map_err(ClusterLockError::UnsupportedVersion)?;

        let flow = definition.flow().ok_or(ClusterLockError::UnknownFlow)?;
        debug!(
            %version,
            flow = <&'static str>::from(flow),
            operators = definition.operators.len(),
            validators = lock.distributed_validators.len(),
            "Validating cluster lock"
        );
        let chain_id = eip712::chain_id(&definition.fork_version, &self.config.networks)?;
        verify_definition_signatures(definition, flow, chain_id)?;
        advance(ValidationState::DefinitionSignaturesChecked);

        check_hash(
            "config_hash",
            &definition.config_hash,
            cluster_config_or_definition_hash(definition, true)?,
        )?;
        check_hash(
            "definition_hash",
            &definition.definition_hash,
            cluster_config_or_definition_hash(definition, false)?,
        )?;
        advance(ValidationState::DefinitionHashChecked);

        check_hash("lock_hash", &lock.lock_hash, cluster_lock_hash(lock)?)?;
        advance(ValidationState::LockHashChecked);

        let bls = ensure_initialized().await?;
        bls.verify_message_signatures(lock, version)?;
        if version.has_node_signatures() {
            signature_verifier::verify_node_signatures(lock)?;
        }
        bls.verify_signature_aggregate(lock)?;
        advance(ValidationState::LockDataChecked);

        advance(ValidationState::Valid);
        Ok(())
    }
}
