//! Validation of Distributed Validator cluster locks.
//!
//! A lock is valid when, in this order:
//!
//! 1. the definition matches a known creation flow and carries the signatures that flow
//!    requires,
//! 2. the config hash and definition hash match the definition,
//! 3. the lock hash matches the lock,
//! 4. the deposits and builder registrations are signed by the distributed keys, every
//!    operator's node key signed the lock hash (v1.7.0 and later), and the key shares signed
//!    the lock hash in aggregate.
//!
//! [`is_valid_cluster_lock`] collapses every failure into `false`, while
//! [`validate_cluster_lock`] reports why a lock was rejected.

mod config;
mod error;
mod metrics;
mod validator;

pub use config::Config;
pub use error::ClusterLockError;
pub use validator::{LockValidator, ValidationOutcome, ValidationState};

pub use cluster_hash::{cluster_config_or_definition_hash, cluster_lock_hash};
pub use cluster_types::{ClusterDefinition, ClusterLock};

/// Whether the lock is valid on one of the well known networks. Never fails.
pub async fn is_valid_cluster_lock(lock: &ClusterLock) -> bool {
    validate_cluster_lock(lock, &Config::default())
        .await
        .is_ok()
}

/// Validates the lock against the networks of `config`.
pub async fn validate_cluster_lock(
    lock: &ClusterLock,
    config: &Config,
) -> Result<(), ClusterLockError> {
    LockValidator::new(config.clone()).validate(lock).await
}
