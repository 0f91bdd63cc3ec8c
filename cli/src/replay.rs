use {
  currency_primitives::{Operation, ToBase58String},
  currency_vm::{
    Height,
    InMemoryStateStore,
    ProcessorRegistry,
    StateDiff,
    StatePool,
    StateStore,
  },
  rmp_serde::from_slice,
  std::path::Path,
  tracing::{info, warn},
};

/// Reads base58 encoded operations, one per line. Blank lines and
/// lines starting with `#` are skipped.
pub fn read_operations(path: &Path) -> anyhow::Result<Vec<Operation>> {
  let content = std::fs::read_to_string(path)?;
  content
    .lines()
    .map(str::trim)
    .filter(|line| !line.is_empty() && !line.starts_with('#'))
    .map(|line| -> anyhow::Result<Operation> {
      Ok(from_slice(&bs58::decode(line).into_vec()?)?)
    })
    .collect()
}

/// Processes all operations in order into one pool and returns the
/// accumulated changes.
///
/// Rejected operations are skipped, a fatal error aborts the whole
/// batch.
pub fn produce(
  registry: &ProcessorRegistry,
  store: &dyn StateStore,
  height: Height,
  ops: &[Operation],
) -> anyhow::Result<StateDiff> {
  let mut processor = registry.new_processor(StatePool::new(store, height));

  let mut accepted = 0;
  for op in ops {
    match processor.process(op) {
      Ok(()) => accepted += 1,
      Err(e) if e.is_fatal() => return Err(e.into()),
      Err(e) if e.is_configuration() => {
        warn!("node configuration rejects {}: {e}", op.hash().to_b58());
      }
      Err(_) => {} // logged by the processor
    }
  }

  let diff = processor.into_pool().into_diff();
  info!(
    "produced height {height} with {accepted} of {} operations and {} state \
     mutations",
    ops.len(),
    diff.len()
  );
  Ok(diff)
}

/// Replays operations against an empty ledger.
pub fn replay(
  registry: &ProcessorRegistry,
  height: Height,
  ops: &[Operation],
) -> anyhow::Result<InMemoryStateStore> {
  let mut store = InMemoryStateStore::default();
  let diff = produce(registry, &store, height, ops)?;
  store.apply(diff);
  Ok(store)
}

#[cfg(test)]
mod tests {
  use {
    super::*,
    currency_primitives::{
      Big,
      CreateAccountFact,
      CurrencyPolicy,
      Feeer,
      GenesisCurrenciesFact,
      Key,
      Keys,
      SignedOperation,
    },
    currency_vm::{state_balance_value, state_key_balance, Config},
    ed25519_dalek::Keypair,
  };

  #[test]
  fn replay_skips_rejected_operations() -> anyhow::Result<()> {
    let node = Keypair::generate(&mut rand::thread_rng());
    let owner = Keypair::generate(&mut rand::thread_rng());
    let alice = Keypair::generate(&mut rand::thread_rng());
    let owner_keys = Keys::new(vec![Key::new(owner.public, 100)?], 100)?;
    let alice_keys = Keys::new(vec![Key::new(alice.public, 100)?], 100)?;

    let genesis = GenesisCurrenciesFact::new(
      b"genesis".to_vec(),
      node.public,
      owner_keys.clone(),
      vec![(
        "1000,MCC".parse()?,
        CurrencyPolicy::new(Big::zero(), Feeer::Nil),
      )],
    );
    let create = CreateAccountFact::new(
      b"alice".to_vec(),
      owner_keys.address(),
      alice_keys.clone(),
      "10,MCC".parse()?,
    );
    // signed by alice who does not control the owner account
    let forged = CreateAccountFact::new(
      b"forged".to_vec(),
      owner_keys.address(),
      alice_keys.clone(),
      "20,MCC".parse()?,
    );

    let ops: Vec<Operation> = vec![
      SignedOperation::sign(genesis, &[&node], b"net").into(),
      SignedOperation::sign(forged, &[&alice], b"net").into(),
      SignedOperation::sign(create, &[&owner], b"net").into(),
    ];

    let config = Config::new("net").with_genesis(vec![node.public], 1);
    let registry = ProcessorRegistry::with_defaults(config)?;
    let store = replay(&registry, 1, &ops)?;

    let balance = store
      .get(&state_key_balance(&alice_keys.address(), &"MCC".parse()?))?
      .expect("alice balance");
    assert_eq!(state_balance_value(&balance)?.big(), &Big::from(10));
    assert_eq!(balance.height(), 1);
    Ok(())
  }
}
