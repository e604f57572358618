use cluster_types::Networks;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Configuration for a [`crate::LockValidator`].
pub struct Config {
    /// Networks a definition may target. Signatures of a definition are bound to the chain id
    /// of the network matching its fork version. Defaults to the well known public networks.
    #[serde(default)]
    pub networks: Networks,
}
