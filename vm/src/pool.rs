use {
  crate::{Error, Height, PreconditionError, State, StateDiff, StateStore},
  currency_primitives::ToBase58String,
  multihash::Multihash,
  std::collections::{BTreeMap, HashSet},
};

/// Read view over committed state plus an accumulator of writes made
/// by operations processed at one height.
///
/// Reads observe every write recorded earlier in the same pool. A pool
/// is meant to be driven by one caller at a time, independent pools over
/// the same store may be used concurrently.
pub struct StatePool<'s> {
  store: &'s dyn StateStore,
  height: Height,
  updates: BTreeMap<String, State>,
  operations: Vec<Multihash>,
  processed: HashSet<Multihash>,
}

impl<'s> StatePool<'s> {
  pub fn new(store: &'s dyn StateStore, height: Height) -> Self {
    Self {
      store,
      height,
      updates: BTreeMap::new(),
      operations: vec![],
      processed: HashSet::new(),
    }
  }

  /// Height that new states are recorded at.
  pub fn height(&self) -> Height {
    self.height
  }

  /// Current state under `key`, pending writes first.
  pub fn get_state(&self, key: &str) -> Result<Option<State>, Error> {
    match self.updates.get(key) {
      Some(state) => Ok(Some(state.clone())),
      None => self.store.get(key),
    }
  }

  pub fn contains_operation(&self, fact_hash: &Multihash) -> bool {
    self.processed.contains(fact_hash)
      || self.store.contains_operation(fact_hash)
  }

  /// Records all states written by the operation identified by
  /// `fact_hash`.
  ///
  /// The batch is checked as a whole before anything is recorded, so
  /// either every state lands in the pool or none does.
  pub fn set_state(
    &mut self,
    fact_hash: &Multihash,
    states: Vec<State>,
  ) -> Result<(), Error> {
    if self.contains_operation(fact_hash) {
      return Err(
        PreconditionError::AlreadyProcessed(fact_hash.to_b58()).into(),
      );
    }

    if states.is_empty() {
      return Err(Error::Internal(format!(
        "empty states for operation {}",
        fact_hash.to_b58()
      )));
    }

    {
      let mut keys = HashSet::with_capacity(states.len());
      for state in &states {
        if state.key().is_empty() {
          return Err(Error::Internal("empty state key".into()));
        }
        if !keys.insert(state.key()) {
          return Err(Error::Internal(format!(
            "state {} is set twice by operation {}",
            state.key(),
            fact_hash.to_b58()
          )));
        }
      }
    }

    for state in states {
      let state = state.at_height(self.height);
      self.updates.insert(state.key().to_owned(), state);
    }
    self.processed.insert(*fact_hash);
    self.operations.push(*fact_hash);

    Ok(())
  }

  /// States written so far, ordered by key.
  pub fn updates(&self) -> impl Iterator<Item = &State> {
    self.updates.values()
  }

  /// Fact hashes of recorded operations in processing order.
  pub fn operations(&self) -> &[Multihash] {
    &self.operations
  }

  /// Everything recorded in this pool, ready to be applied to a store.
  pub fn into_diff(self) -> StateDiff {
    let mut diff = StateDiff::default();
    for (_, state) in self.updates {
      diff.set(state);
    }
    for hash in self.operations {
      diff.record_operation(hash);
    }
    diff
  }
}
