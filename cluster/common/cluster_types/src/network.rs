use crate::util::{decode_exact, to_0x_hex};
use derive_more::{Deref, From};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The genesis fork version of a network, as carried by a cluster definition.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, From, Deref)]
pub struct ForkVersion(pub [u8; 4]);

impl FromStr for ForkVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_exact::<4>(s).map(ForkVersion)
    }
}

impl Display for ForkVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&to_0x_hex(self.0))
    }
}

impl Serialize for ForkVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ForkVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// A network a cluster can be created for.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Network {
    /// Canonical name of the network, e.g. `mainnet`
    pub name: String,
    /// Genesis fork version, used for deposit and builder domains
    pub fork_version: ForkVersion,
    /// Execution layer chain id, used for EIP-712 domain separation
    pub chain_id: u64,
}

impl Network {
    fn new(name: &str, fork_version: [u8; 4], chain_id: u64) -> Self {
        Self {
            name: name.to_string(),
            fork_version: ForkVersion(fork_version),
            chain_id,
        }
    }
}

/// Lookup table from fork version to network.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, Deref, From)]
#[serde(transparent)]
pub struct Networks(Vec<Network>);

impl Default for Networks {
    fn default() -> Self {
        Self(vec![
            Network::new("mainnet", [0x00, 0x00, 0x00, 0x00], 1),
            Network::new("goerli", [0x00, 0x00, 0x10, 0x20], 5),
            Network::new("gnosis", [0x00, 0x00, 0x00, 0x64], 100),
            Network::new("sepolia", [0x90, 0x00, 0x00, 0x69], 11155111),
            Network::new("holesky", [0x01, 0x01, 0x70, 0x00], 17000),
            Network::new("hoodi", [0x10, 0x00, 0x09, 0x10], 560048),
        ])
    }
}

impl Networks {
    pub fn by_fork_version(&self, fork_version: &ForkVersion) -> Option<&Network> {
        self.0
            .iter()
            .find(|network| &network.fork_version == fork_version)
    }

    pub fn by_name(&self, name: &str) -> Option<&Network> {
        self.0.iter().find(|network| network.name == name)
    }
}
