//! Signature checks over cluster definitions and locks.
//!
//! * [`eip712`]: creator and operator wallet signatures over the definition.
//! * [`bls`]: distributed key signatures over deposits, builder registrations and the lock hash.
//! * [`enr`]: node key signatures over the lock hash.

pub mod bls;
pub mod eip712;
pub mod enr;
mod error;

pub use bls::{ensure_initialized, BlsBackend};
pub use eip712::verify_definition_signatures;
pub use enr::verify_node_signatures;
pub use error::VerificationError;
