use {
  crate::{
    processor::{
      new_create_account_processor,
      new_currency_policy_updater_processor,
      new_genesis_currencies_processor,
      new_key_updater_processor,
      ProcessorFactory,
    },
    Config,
    Error,
    PreconditionError,
    StatePool,
  },
  currency_primitives::{Operation, OperationKind, ToBase58String},
  std::collections::{BTreeMap, HashSet},
  tracing::{debug, info, warn},
};

/// Maps every operation kind to the factory of its processor.
pub struct ProcessorRegistry {
  config: Config,
  factories: BTreeMap<OperationKind, ProcessorFactory>,
}

impl ProcessorRegistry {
  /// A registry with no processors.
  pub fn new(config: Config) -> Self {
    Self {
      config,
      factories: BTreeMap::new(),
    }
  }

  /// A registry with the processors of all built-in operation kinds.
  pub fn with_defaults(config: Config) -> Result<Self, Error> {
    let mut registry = Self::new(config);
    registry.set_processor(
      OperationKind::CreateAccount,
      new_create_account_processor,
    )?;
    registry
      .set_processor(OperationKind::KeyUpdater, new_key_updater_processor)?;
    registry.set_processor(
      OperationKind::CurrencyPolicyUpdater,
      new_currency_policy_updater_processor,
    )?;
    registry.set_processor(
      OperationKind::GenesisCurrencies,
      new_genesis_currencies_processor,
    )?;
    Ok(registry)
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn set_processor(
    &mut self,
    kind: OperationKind,
    factory: ProcessorFactory,
  ) -> Result<(), Error> {
    if self.factories.contains_key(&kind) {
      return Err(Error::Internal(format!(
        "processor for {kind} is already registered"
      )));
    }
    self.factories.insert(kind, factory);
    Ok(())
  }

  pub fn is_registered(&self, kind: OperationKind) -> bool {
    self.factories.contains_key(&kind)
  }

  /// Starts processing operations against `pool`.
  pub fn new_processor<'r, 's>(
    &'r self,
    pool: StatePool<'s>,
  ) -> OperationProcessor<'r, 's> {
    OperationProcessor {
      registry: self,
      pool,
      duplicated: HashSet::new(),
    }
  }
}

/// Processes operations one at a time into a single pool.
pub struct OperationProcessor<'r, 's> {
  registry: &'r ProcessorRegistry,
  pool: StatePool<'s>,
  duplicated: HashSet<String>,
}

impl<'r, 's> OperationProcessor<'r, 's> {
  /// Validates, authorizes and applies one operation.
  ///
  /// On error nothing is recorded and the pool stays usable for the
  /// next operation, unless the error is fatal.
  pub fn process(&mut self, op: &Operation) -> Result<(), Error> {
    match self.try_process(op) {
      Ok(count) => {
        debug!(
          "accepted {} operation {}, {count} states written",
          op.kind(),
          op.fact_hash().to_b58()
        );
        if op.kind() == OperationKind::GenesisCurrencies {
          info!(
            "genesis currencies bootstrapped at height {}",
            self.pool.height()
          );
        }
        Ok(())
      }
      Err(e) => {
        warn!(
          "rejected {} operation {}: {} ({e})",
          op.kind(),
          op.fact_hash().to_b58(),
          e.reason()
        );
        Err(e)
      }
    }
  }

  fn try_process(&mut self, op: &Operation) -> Result<usize, Error> {
    op.is_valid(&self.registry.config.network_id)?;

    if self.pool.contains_operation(op.fact_hash()) {
      return Err(
        PreconditionError::AlreadyProcessed(op.fact_hash().to_b58()).into(),
      );
    }

    let keys = duplication_keys(op);
    if let Some(key) = keys.iter().find(|k| self.duplicated.contains(*k)) {
      return Err(PreconditionError::Duplicated(key.clone()).into());
    }

    let factory = self
      .registry
      .factories
      .get(&op.kind())
      .ok_or_else(|| {
        Error::Internal(format!("no processor registered for {}", op.kind()))
      })?;

    let count = factory(op, &self.registry.config)?.process(&mut self.pool)?;
    self.duplicated.extend(keys);
    Ok(count)
  }

  pub fn pool(&self) -> &StatePool<'s> {
    &self.pool
  }

  pub fn into_pool(self) -> StatePool<'s> {
    self.pool
  }
}

/// Resources an operation claims for the rest of the pool. Two
/// operations claiming the same key can't both be processed.
fn duplication_keys(op: &Operation) -> Vec<String> {
  match op {
    Operation::CreateAccount(op) => vec![
      format!("sender:{}", op.fact().sender()),
      format!("new-address:{}", op.fact().target()),
    ],
    Operation::KeyUpdater(op) => vec![format!("sender:{}", op.fact().target())],
    Operation::CurrencyPolicyUpdater(op) => {
      vec![format!("currency:{}", op.fact().currency())]
    }
    Operation::GenesisCurrencies(_) => vec!["genesis".to_owned()],
  }
}

#[cfg(test)]
mod tests {
  use {
    super::*,
    crate::{InMemoryStateStore, Processor, State},
    currency_primitives::{
      Big,
      CurrencyId,
      CurrencyPolicy,
      CurrencyPolicyUpdaterFact,
      Feeer,
      SignedOperation,
    },
    ed25519_dalek::Keypair,
    multihash::Multihash,
  };

  struct Noop(Multihash);

  impl Processor for Noop {
    fn fact_hash(&self) -> &Multihash {
      &self.0
    }

    fn prepare(&self, _: &StatePool) -> Result<Vec<State>, Error> {
      Ok(vec![State::empty("noop").with_value(vec![1])])
    }
  }

  fn noop_factory(
    op: &Operation,
    _: &Config,
  ) -> Result<Box<dyn Processor>, Error> {
    Ok(Box::new(Noop(*op.fact_hash())))
  }

  fn policy_update(kp: &Keypair) -> anyhow::Result<Operation> {
    let fact = CurrencyPolicyUpdaterFact::new(
      b"token".to_vec(),
      CurrencyId::new("MCC")?,
      CurrencyPolicy::new(Big::zero(), Feeer::Nil),
    );
    Ok(SignedOperation::sign(fact, &[kp], b"net").into())
  }

  #[test]
  fn processors_register_once() -> anyhow::Result<()> {
    let mut registry = ProcessorRegistry::with_defaults(Config::new("net"))?;
    for kind in OperationKind::ALL {
      assert!(registry.is_registered(kind));
    }

    assert!(matches!(
      registry.set_processor(OperationKind::KeyUpdater, noop_factory),
      Err(Error::Internal(_))
    ));
    Ok(())
  }

  #[test]
  fn unregistered_kind_is_internal() -> anyhow::Result<()> {
    let store = InMemoryStateStore::default();
    let registry = ProcessorRegistry::new(Config::new("net"));
    let mut processor = registry.new_processor(StatePool::new(&store, 1));

    let kp = Keypair::generate(&mut rand::thread_rng());
    let result = processor.process(&policy_update(&kp)?);
    assert!(matches!(result, Err(Error::Internal(_))));
    assert!(result.unwrap_err().is_fatal());
    Ok(())
  }

  #[test]
  fn factories_reject_foreign_kinds() -> anyhow::Result<()> {
    let kp = Keypair::generate(&mut rand::thread_rng());
    let op = policy_update(&kp)?;
    let config = Config::new("net");

    assert!(matches!(
      new_create_account_processor(&op, &config),
      Err(Error::Internal(_))
    ));
    assert!(matches!(
      new_key_updater_processor(&op, &config),
      Err(Error::Internal(_))
    ));
    assert!(matches!(
      new_genesis_currencies_processor(&op, &config),
      Err(Error::Internal(_))
    ));
    assert!(new_currency_policy_updater_processor(&op, &config).is_ok());
    Ok(())
  }

  #[test]
  fn custom_processor_replaces_default() -> anyhow::Result<()> {
    let store = InMemoryStateStore::default();
    let mut registry = ProcessorRegistry::new(Config::new("net"));
    registry.set_processor(OperationKind::CurrencyPolicyUpdater, noop_factory)?;

    let kp = Keypair::generate(&mut rand::thread_rng());
    let op = policy_update(&kp)?;
    let mut processor = registry.new_processor(StatePool::new(&store, 1));
    processor.process(&op)?;

    assert_eq!(processor.pool().updates().count(), 1);
    assert_eq!(processor.pool().operations(), &[*op.fact_hash()]);

    // same fact again
    assert!(matches!(
      processor.process(&op),
      Err(Error::Precondition(PreconditionError::AlreadyProcessed(_)))
    ));

    // different fact, same currency
    let other = CurrencyPolicyUpdaterFact::new(
      b"token2".to_vec(),
      CurrencyId::new("MCC")?,
      CurrencyPolicy::new(Big::zero(), Feeer::Nil),
    );
    assert!(matches!(
      processor.process(&SignedOperation::sign(other, &[&kp], b"net").into()),
      Err(Error::Precondition(PreconditionError::Duplicated(_)))
    ));
    Ok(())
  }
}
