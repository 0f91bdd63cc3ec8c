use {
  super::{
    existing_account,
    existing_currency_design,
    unexpected_kind,
    BalanceSheet,
    Processor,
  },
  crate::{
    auth::check_threshold,
    codec::set_state_account_value,
    Config,
    Error,
    PreconditionError,
    State,
    StatePool,
  },
  currency_primitives::{
    Amount,
    Fact,
    KeyUpdaterFact,
    KeysConfig,
    Operation,
    OperationKind,
    SignedOperation,
  },
  multihash::Multihash,
};

/// Swaps the keys of an existing account. The change must be
/// authorized by the keys being replaced.
pub struct KeyUpdaterProcessor {
  op: SignedOperation<KeyUpdaterFact>,
  keys_config: KeysConfig,
}

impl KeyUpdaterProcessor {
  pub fn new(
    op: SignedOperation<KeyUpdaterFact>,
    keys_config: KeysConfig,
  ) -> Self {
    Self { op, keys_config }
  }
}

impl Processor for KeyUpdaterProcessor {
  fn fact_hash(&self) -> &Multihash {
    self.op.fact().hash()
  }

  fn prepare(&self, pool: &StatePool) -> Result<Vec<State>, Error> {
    let fact = self.op.fact();
    fact.keys().is_valid_with(&self.keys_config)?;

    let (state, account) = existing_account(pool, fact.target())?;
    check_threshold(self.op.signs(), account.keys())?;

    if account.keys() == fact.keys() {
      return Err(PreconditionError::SameKeys(state.key().to_owned()).into());
    }

    let (_, design) = existing_currency_design(pool, fact.currency())?;

    let mut sheet = BalanceSheet::default();
    sheet.charge(
      pool,
      fact.target(),
      &Amount::zero(fact.currency().clone()),
      design.policy().feeer(),
    )?;

    let mut states = vec![set_state_account_value(
      &state,
      &account.with_keys(fact.keys().clone()),
    )?];
    states.extend(sheet.into_states()?);
    Ok(states)
  }
}

pub fn new_key_updater_processor(
  op: &Operation,
  config: &Config,
) -> Result<Box<dyn Processor>, Error> {
  match op {
    Operation::KeyUpdater(op) => {
      Ok(Box::new(KeyUpdaterProcessor::new(op.clone(), config.keys)))
    }
    other => Err(unexpected_kind(OperationKind::KeyUpdater, other)),
  }
}
