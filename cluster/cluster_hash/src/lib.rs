//! Canonical hashing of cluster definitions and locks.
//!
//! Every supported format version has its own module with the SSZ container layout of that
//! version. The functions at the top level dispatch on the exact `version` string of the
//! definition and render roots as `0x` prefixed hex, the way they appear in lock files.

mod containers;
mod error;
pub mod signing;
pub mod v1_6;
pub mod v1_7;
pub mod v1_8;

pub use error::HashError;
pub use tree_hash::Hash256;

use cluster_types::util::to_0x_hex;
use cluster_types::{ClusterDefinition, ClusterLock, ClusterVersion};
use tracing::trace;

fn cluster_version(definition: &ClusterDefinition) -> Result<ClusterVersion, HashError> {
    definition
        .cluster_version()
        .map_err(HashError::UnsupportedVersion)
}

/// Root of the definition, either of the configuration fields only or of the fully populated
/// definition including operator and creator signatures.
pub fn definition_root(
    definition: &ClusterDefinition,
    config_only: bool,
) -> Result<Hash256, HashError> {
    let version = cluster_version(definition)?;
    trace!(%version, config_only, "Hashing cluster definition");
    match (version, config_only) {
        (ClusterVersion::V1_6, true) => v1_6::config_hash(definition),
        (ClusterVersion::V1_6, false) => v1_6::definition_hash(definition),
        (ClusterVersion::V1_7, true) => v1_7::config_hash(definition),
        (ClusterVersion::V1_7, false) => v1_7::definition_hash(definition),
        (ClusterVersion::V1_8, true) => v1_8::config_hash(definition),
        (ClusterVersion::V1_8, false) => v1_8::definition_hash(definition),
    }
}

/// Root of the lock, using the layout of its definition's version.
pub fn lock_root(lock: &ClusterLock) -> Result<Hash256, HashError> {
    let version = cluster_version(&lock.cluster_definition)?;
    trace!(
        %version,
        validators = lock.distributed_validators.len(),
        "Hashing cluster lock"
    );
    match version {
        ClusterVersion::V1_6 => v1_6::lock_hash(lock),
        ClusterVersion::V1_7 => v1_7::lock_hash(lock),
        ClusterVersion::V1_8 => v1_8::lock_hash(lock),
    }
}

/// The config hash (`config_only`) or definition hash of a definition as a hex string.
pub fn cluster_config_or_definition_hash(
    definition: &ClusterDefinition,
    config_only: bool,
) -> Result<String, HashError> {
    definition_root(definition, config_only).map(to_0x_hex)
}

/// The lock hash of a lock as a hex string.
pub fn cluster_lock_hash(lock: &ClusterLock) -> Result<String, HashError> {
    lock_root(lock).map(to_0x_hex)
}
