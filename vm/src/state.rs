use {
  crate::Error,
  multihash::Multihash,
  serde::{Deserialize, Serialize},
  std::collections::{BTreeMap, BTreeSet, HashMap, HashSet},
};

/// Block height at which a state was last written.
pub type Height = u64;

/// A versioned value stored under a string key in the ledger.
///
/// States are never edited in place. Every mutation reads the current
/// state for a key and produces a new state with the same key and a
/// new value, the pool stamps it with the height it is recorded at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
  key: String,
  value: Vec<u8>,
  height: Height,
}

impl State {
  pub fn new(key: impl Into<String>, value: Vec<u8>, height: Height) -> Self {
    Self {
      key: key.into(),
      value,
      height,
    }
  }

  /// A placeholder for a key that holds no value yet.
  pub fn empty(key: impl Into<String>) -> Self {
    Self::new(key, vec![], 0)
  }

  pub fn key(&self) -> &str {
    &self.key
  }

  pub fn value(&self) -> &[u8] {
    &self.value
  }

  pub fn height(&self) -> Height {
    self.height
  }

  pub fn is_empty(&self) -> bool {
    self.value.is_empty()
  }

  /// Same key, new value.
  pub fn with_value(&self, value: Vec<u8>) -> Self {
    Self::new(self.key.clone(), value, self.height)
  }

  pub(crate) fn at_height(self, height: Height) -> Self {
    Self { height, ..self }
  }
}

/// Represents a change in the ledger state.
///
/// State diffs are meant to be accumulated and logically the entire
/// state of the ledger is the result of cumulative application of
/// consecutive state diffs. A processing pool produces one diff per
/// block, it carries the written states and the fact hashes of the
/// operations that wrote them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateDiff {
  upserts: BTreeMap<String, State>,
  operations: BTreeSet<Multihash>,
}

impl StateDiff {
  /// Inserts or updates a state under its key.
  ///
  /// If the diff had a state stored under this key then the old
  /// value is returned, otherwise `None` is returned.
  pub fn set(&mut self, state: State) -> Option<State> {
    self.upserts.insert(state.key().to_owned(), state)
  }

  /// Marks an operation as applied by this diff.
  pub fn record_operation(&mut self, fact_hash: Multihash) {
    self.operations.insert(fact_hash);
  }

  /// Merges a state diff with a newer diff.
  ///
  /// Applying the resulting diff is equivalent to applying the two
  /// merged diffs consecutively on any state store.
  pub fn merge(self, newer: StateDiff) -> StateDiff {
    let mut upserts = self.upserts;
    let mut operations = self.operations;
    upserts.extend(newer.upserts);
    operations.extend(newer.operations);
    StateDiff {
      upserts,
      operations,
    }
  }

  pub fn iter(&self) -> impl Iterator<Item = &State> {
    self.upserts.values()
  }

  pub fn operations(&self) -> impl Iterator<Item = &Multihash> {
    self.operations.iter()
  }

  pub fn len(&self) -> usize {
    self.upserts.len()
  }

  pub fn is_empty(&self) -> bool {
    self.upserts.is_empty()
  }
}

/// Point lookups over committed ledger state.
///
/// Backing storage engines implement this trait, the in-memory store
/// below is the reference implementation.
pub trait StateStore {
  fn get(&self, key: &str) -> Result<Option<State>, Error>;

  /// Whether an operation with this fact hash was already applied.
  fn contains_operation(&self, fact_hash: &Multihash) -> bool;

  fn apply(&mut self, diff: StateDiff);
}

impl StateStore for StateDiff {
  fn get(&self, key: &str) -> Result<Option<State>, Error> {
    Ok(self.upserts.get(key).cloned())
  }

  fn contains_operation(&self, fact_hash: &Multihash) -> bool {
    self.operations.contains(fact_hash)
  }

  fn apply(&mut self, diff: StateDiff) {
    *self = std::mem::take(self).merge(diff);
  }
}

#[derive(Debug, Default)]
pub struct InMemoryStateStore {
  data: HashMap<String, State>,
  operations: HashSet<Multihash>,
}

impl InMemoryStateStore {
  pub fn iter(&self) -> impl Iterator<Item = &State> {
    self.data.values()
  }
}

impl StateStore for InMemoryStateStore {
  fn get(&self, key: &str) -> Result<Option<State>, Error> {
    Ok(self.data.get(key).cloned())
  }

  fn contains_operation(&self, fact_hash: &Multihash) -> bool {
    self.operations.contains(fact_hash)
  }

  fn apply(&mut self, diff: StateDiff) {
    for (k, v) in diff.upserts {
      self.data.insert(k, v);
    }
    self.operations.extend(diff.operations);
  }
}
