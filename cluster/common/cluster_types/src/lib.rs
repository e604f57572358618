pub use definition::{ClusterDefinition, Creator, DefinitionFlow, ValidatorConfig};
pub use lock::{
    BuilderRegistration, BuilderRegistrationMessage, ClusterLock, DepositData,
    DistributedValidator,
};
pub use network::{ForkVersion, Network, Networks};
pub use operator::Operator;
pub use version::ClusterVersion;
mod definition;
mod lock;
mod network;
mod operator;
pub mod util;
mod version;
