use {
  crate::{Height, Suffrage},
  currency_primitives::KeysConfig,
  ed25519_dalek::PublicKey,
  serde::{Deserialize, Serialize},
};

/// Node level settings the processors run with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
  /// Mixed into every signed message so that signatures from one
  /// network are never valid on another.
  pub network_id: Vec<u8>,

  pub keys: KeysConfig,

  /// Governance quorum for currency policy changes.
  pub suffrage: Suffrage,

  /// Nodes trusted to sign the genesis bootstrap.
  pub genesis_nodes: Vec<PublicKey>,

  /// The only height at which genesis currencies are accepted.
  pub genesis_height: Height,
}

impl Config {
  pub fn new(network_id: impl Into<Vec<u8>>) -> Self {
    Self {
      network_id: network_id.into(),
      ..Self::default()
    }
  }

  pub fn with_keys(self, keys: KeysConfig) -> Self {
    Self { keys, ..self }
  }

  pub fn with_suffrage(self, suffrage: Suffrage) -> Self {
    Self { suffrage, ..self }
  }

  pub fn with_genesis(
    self,
    genesis_nodes: Vec<PublicKey>,
    genesis_height: Height,
  ) -> Self {
    Self {
      genesis_nodes,
      genesis_height,
      ..self
    }
  }
}
