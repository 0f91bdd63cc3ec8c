use {
  crate::{b58::ToBase58String, sha256, Address, Error},
  ed25519_dalek::PublicKey,
  multihash::Multihash,
  serde::{Deserialize, Serialize},
  std::{collections::HashSet, fmt::Debug, str::FromStr},
};

pub const MIN_WEIGHT: u64 = 1;
pub const MAX_WEIGHT: u64 = 100;
pub const MIN_THRESHOLD: u64 = 1;
pub const MAX_THRESHOLD: u64 = 100;

/// Limits applied when validating a set of keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeysConfig {
  /// Maximum number of keys a single account may hold.
  pub max_keys: usize,
}

impl Default for KeysConfig {
  fn default() -> Self {
    Self { max_keys: 10 }
  }
}

/// Decodes a base58 encoded ed25519 public key.
pub fn parse_public_key(s: &str) -> Result<PublicKey, Error> {
  let bytes = bs58::decode(s)
    .into_vec()
    .map_err(|e| Error::InvalidKey(e.to_string()))?;
  PublicKey::from_bytes(&bytes).map_err(|e| Error::InvalidKey(e.to_string()))
}

/// A public key together with the weight its signature carries
/// towards the threshold of the key set it belongs to.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
  key: PublicKey,
  weight: u64,
}

impl Key {
  pub fn new(key: PublicKey, weight: u64) -> Result<Self, Error> {
    let key = Self { key, weight };
    key.is_valid()?;
    Ok(key)
  }

  pub fn is_valid(&self) -> Result<(), Error> {
    if !(MIN_WEIGHT..=MAX_WEIGHT).contains(&self.weight) {
      return Err(Error::InvalidWeight(self.weight));
    }
    Ok(())
  }

  pub fn key(&self) -> &PublicKey {
    &self.key
  }

  pub fn weight(&self) -> u64 {
    self.weight
  }

  /// base58 string of the public key followed by the big-endian weight.
  pub fn bytes(&self) -> Vec<u8> {
    let mut bytes = self.key.to_b58().into_bytes();
    bytes.extend_from_slice(&self.weight.to_be_bytes());
    bytes
  }
}

impl Debug for Key {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "key({}, {})", self.key.to_b58(), self.weight)
  }
}

/// Parses keys in the `<base58 public key>,<weight>` format.
impl FromStr for Key {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (key, weight) = s.rsplit_once(',').ok_or_else(|| {
      Error::InvalidKey(format!("{s:?}, expected <public key>,<weight>"))
    })?;
    let weight: u64 = weight
      .trim()
      .parse()
      .map_err(|_| Error::InvalidKey(format!("invalid weight in {s:?}")))?;
    Self::new(parse_public_key(key.trim())?, weight)
  }
}

/// An immutable weighted set of keys with a threshold.
///
/// A group of signatures authorizes an action on behalf of this set
/// when the sum of weights of their signers reaches the threshold.
///
/// The stored order of keys is the order they were given in. Hashing
/// and equality work on a canonical view sorted by raw public key bytes
/// that is computed on demand and never written back.
#[derive(Clone, Serialize, Deserialize)]
pub struct Keys {
  keys: Vec<Key>,
  threshold: u64,
  hash: Multihash,
}

impl Keys {
  pub fn new(keys: Vec<Key>, threshold: u64) -> Result<Self, Error> {
    Self::with_config(keys, threshold, &KeysConfig::default())
  }

  pub fn with_config(
    keys: Vec<Key>,
    threshold: u64,
    config: &KeysConfig,
  ) -> Result<Self, Error> {
    let mut ks = Self {
      keys,
      threshold,
      hash: Multihash::default(),
    };
    ks.hash = ks.generate_hash();
    ks.is_valid_with(config)?;
    Ok(ks)
  }

  pub fn is_valid(&self) -> Result<(), Error> {
    self.is_valid_with(&KeysConfig::default())
  }

  pub fn is_valid_with(&self, config: &KeysConfig) -> Result<(), Error> {
    if self.keys.len() > config.max_keys {
      return Err(Error::TooManyKeys {
        max: config.max_keys,
        count: self.keys.len(),
      });
    }

    self.is_well_formed()
  }

  /// Every rule except the limit on the number of keys, which is node
  /// configuration and is checked by `is_valid_with`.
  pub fn is_well_formed(&self) -> Result<(), Error> {
    if self.keys.is_empty() {
      return Err(Error::EmptyKeys);
    }

    let mut seen = HashSet::with_capacity(self.keys.len());
    for key in &self.keys {
      key.is_valid()?;
      if !seen.insert(key.key().as_bytes()) {
        return Err(Error::DuplicateKey(key.key().to_b58()));
      }
    }

    if !(MIN_THRESHOLD..=MAX_THRESHOLD).contains(&self.threshold) {
      return Err(Error::ThresholdOutOfRange(self.threshold));
    }

    let sum: u64 = self.keys.iter().map(Key::weight).sum();
    if sum < self.threshold {
      return Err(Error::InsufficientTotalWeight {
        sum,
        threshold: self.threshold,
      });
    }

    self.verify_hash()
  }

  /// Recomputes the content hash and compares it with the stored one.
  ///
  /// Values that were decoded from storage or the wire carry their
  /// hash with them, so this is the check that detects tampering.
  pub fn verify_hash(&self) -> Result<(), Error> {
    if self.generate_hash() != self.hash {
      return Err(Error::CorruptKeys);
    }
    Ok(())
  }

  pub fn hash(&self) -> &Multihash {
    &self.hash
  }

  pub fn threshold(&self) -> u64 {
    self.threshold
  }

  pub fn keys(&self) -> &[Key] {
    &self.keys
  }

  pub fn key(&self, key: &PublicKey) -> Option<&Key> {
    self.keys.iter().find(|k| k.key() == key)
  }

  pub fn address(&self) -> Address {
    Address::from_keys(self)
  }

  /// Keys ordered ascending by their raw public key bytes.
  pub fn canonical(&self) -> Vec<&Key> {
    let mut sorted: Vec<&Key> = self.keys.iter().collect();
    sorted.sort_by(|a, b| a.key().as_bytes().cmp(b.key().as_bytes()));
    sorted
  }

  pub fn bytes(&self) -> Vec<u8> {
    let mut bytes = Vec::new();
    for key in self.canonical() {
      bytes.extend(key.bytes());
    }
    bytes.extend_from_slice(&self.threshold.to_be_bytes());
    bytes
  }

  fn generate_hash(&self) -> Multihash {
    sha256(&self.bytes())
  }
}

impl PartialEq for Keys {
  fn eq(&self, other: &Self) -> bool {
    self.threshold == other.threshold
      && self.keys.len() == other.keys.len()
      && self
        .canonical()
        .into_iter()
        .zip(other.canonical())
        .all(|(a, b)| a == b)
  }
}

impl Eq for Keys {}

impl Debug for Keys {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Keys")
      .field("keys", &self.keys)
      .field("threshold", &self.threshold)
      .field("hash", &self.hash.to_b58())
      .finish()
  }
}
