use {
  super::{
    exists_state,
    existing_currency_design,
    unexpected_kind,
    Processor,
  },
  crate::{
    codec::{
      set_state_currency_design_value,
      state_key_account,
      state_key_balance,
    },
    Config,
    Error,
    State,
    StatePool,
    Suffrage,
  },
  currency_primitives::{
    CurrencyPolicyUpdaterFact,
    Fact,
    Operation,
    OperationKind,
    SignedOperation,
  },
  multihash::Multihash,
};

/// Replaces the policy of a currency. Authorized by the network
/// suffrage rather than by any account.
pub struct CurrencyPolicyUpdaterProcessor {
  op: SignedOperation<CurrencyPolicyUpdaterFact>,
  suffrage: Suffrage,
}

impl CurrencyPolicyUpdaterProcessor {
  pub fn new(
    op: SignedOperation<CurrencyPolicyUpdaterFact>,
    suffrage: Suffrage,
  ) -> Self {
    Self { op, suffrage }
  }
}

impl Processor for CurrencyPolicyUpdaterProcessor {
  fn fact_hash(&self) -> &Multihash {
    self.op.fact().hash()
  }

  fn prepare(&self, pool: &StatePool) -> Result<Vec<State>, Error> {
    let fact = self.op.fact();
    self.suffrage.check(self.op.signs())?;

    let (state, design) = existing_currency_design(pool, fact.currency())?;

    // fees are only credited to an existing balance
    if let Some(receiver) = fact.policy().feeer().receiver() {
      exists_state(pool, &state_key_account(receiver), "fee receiver")?;
      exists_state(
        pool,
        &state_key_balance(receiver, fact.currency()),
        "fee receiver balance",
      )?;
    }

    Ok(vec![set_state_currency_design_value(
      &state,
      &design.with_policy(fact.policy().clone()),
    )?])
  }
}

pub fn new_currency_policy_updater_processor(
  op: &Operation,
  config: &Config,
) -> Result<Box<dyn Processor>, Error> {
  match op {
    Operation::CurrencyPolicyUpdater(op) => {
      Ok(Box::new(CurrencyPolicyUpdaterProcessor::new(
        op.clone(),
        config.suffrage.clone(),
      )))
    }
    other => Err(unexpected_kind(OperationKind::CurrencyPolicyUpdater, other)),
  }
}
