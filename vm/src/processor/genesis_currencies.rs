use {
  super::{not_exists_state, unexpected_kind, Processor},
  crate::{
    auth::check_threshold,
    codec::{
      set_state_account_value,
      set_state_balance_value,
      set_state_currency_design_value,
      state_key_account,
      state_key_balance,
      state_key_currency_design,
    },
    AuthError,
    Config,
    Error,
    Height,
    PreconditionError,
    State,
    StatePool,
  },
  currency_primitives::{
    Account,
    Fact,
    GenesisCurrenciesFact,
    Key,
    Keys,
    KeysConfig,
    Operation,
    OperationKind,
    SignedOperation,
    ToBase58String,
    MAX_THRESHOLD,
    MAX_WEIGHT,
  },
  ed25519_dalek::PublicKey,
  multihash::Multihash,
};

/// Creates the genesis account and issues the full supply of every
/// currency to it.
///
/// Only a node listed in the configuration may sign it and only at the
/// configured genesis height. Every precondition is checked before any
/// state is produced, so a single existing account, balance or design
/// aborts the whole bootstrap.
pub struct GenesisCurrenciesProcessor {
  op: SignedOperation<GenesisCurrenciesFact>,
  keys_config: KeysConfig,
  genesis_nodes: Vec<PublicKey>,
  genesis_height: Height,
}

impl GenesisCurrenciesProcessor {
  pub fn new(
    op: SignedOperation<GenesisCurrenciesFact>,
    config: &Config,
  ) -> Self {
    Self {
      op,
      keys_config: config.keys,
      genesis_nodes: config.genesis_nodes.clone(),
      genesis_height: config.genesis_height,
    }
  }

  /// The trusted node named by the fact, alone carrying full weight.
  fn node_keys(&self) -> Result<Keys, Error> {
    if self.genesis_nodes.is_empty() {
      return Err(AuthError::EmptyPublickeys.into());
    }

    let node = self.op.fact().genesis_node_key();
    if !self.genesis_nodes.contains(node) {
      return Err(AuthError::UnknownSigner(node.to_b58()).into());
    }

    let key = Key::new(*node, MAX_WEIGHT)?;
    Ok(Keys::new(vec![key], MAX_THRESHOLD)?)
  }
}

impl Processor for GenesisCurrenciesProcessor {
  fn fact_hash(&self) -> &Multihash {
    self.op.fact().hash()
  }

  fn prepare(&self, pool: &StatePool) -> Result<Vec<State>, Error> {
    let fact = self.op.fact();
    fact.keys().is_valid_with(&self.keys_config)?;
    check_threshold(self.op.signs(), &self.node_keys()?)?;

    if pool.height() != self.genesis_height {
      return Err(
        PreconditionError::NotGenesisHeight {
          height: pool.height(),
          genesis: self.genesis_height,
        }
        .into(),
      );
    }

    let address = fact.address();
    let account_state =
      not_exists_state(pool, &state_key_account(&address), "key of genesis")?;

    let mut pending = Vec::with_capacity(fact.currencies().len());
    for design in fact.currencies() {
      let currency = design.currency();
      let design_state = not_exists_state(
        pool,
        &state_key_currency_design(currency),
        "currency design",
      )?;
      let balance_state = not_exists_state(
        pool,
        &state_key_balance(&address, currency),
        "balance",
      )?;
      pending.push((design, design_state, balance_state));
    }

    let mut states = vec![set_state_account_value(
      &account_state,
      &Account::from_keys(fact.keys().clone()),
    )?];
    for (design, design_state, balance_state) in pending {
      states.push(set_state_balance_value(&balance_state, design.amount())?);
      states.push(set_state_currency_design_value(&design_state, design)?);
    }
    Ok(states)
  }
}

pub fn new_genesis_currencies_processor(
  op: &Operation,
  config: &Config,
) -> Result<Box<dyn Processor>, Error> {
  match op {
    Operation::GenesisCurrencies(op) => Ok(Box::new(
      GenesisCurrenciesProcessor::new(op.clone(), config),
    )),
    other => Err(unexpected_kind(OperationKind::GenesisCurrencies, other)),
  }
}
