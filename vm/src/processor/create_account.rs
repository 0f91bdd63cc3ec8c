use {
  super::{
    existing_account,
    existing_currency_design,
    not_exists_state,
    unexpected_kind,
    BalanceSheet,
    Processor,
  },
  crate::{
    auth::check_threshold,
    codec::{
      set_state_account_value,
      set_state_balance_value,
      state_key_account,
      state_key_balance,
    },
    Config,
    Error,
    PreconditionError,
    State,
    StatePool,
  },
  currency_primitives::{
    Account,
    CreateAccountFact,
    Fact,
    KeysConfig,
    Operation,
    OperationKind,
    SignedOperation,
  },
  multihash::Multihash,
};

/// Opens a new account and moves the initial funds into it from the
/// sender, who also pays the fee.
pub struct CreateAccountProcessor {
  op: SignedOperation<CreateAccountFact>,
  keys_config: KeysConfig,
}

impl CreateAccountProcessor {
  pub fn new(
    op: SignedOperation<CreateAccountFact>,
    keys_config: KeysConfig,
  ) -> Self {
    Self { op, keys_config }
  }
}

impl Processor for CreateAccountProcessor {
  fn fact_hash(&self) -> &Multihash {
    self.op.fact().hash()
  }

  fn prepare(&self, pool: &StatePool) -> Result<Vec<State>, Error> {
    let fact = self.op.fact();
    fact.keys().is_valid_with(&self.keys_config)?;

    let (_, sender) = existing_account(pool, fact.sender())?;
    check_threshold(self.op.signs(), sender.keys())?;

    let target = fact.target();
    let currency = fact.amount().currency();

    let account_state =
      not_exists_state(pool, &state_key_account(&target), "account")?;
    let balance_state = not_exists_state(
      pool,
      &state_key_balance(&target, currency),
      "balance",
    )?;

    let (_, design) = existing_currency_design(pool, currency)?;
    let policy = design.policy();
    if fact.amount().big() < policy.new_account_min_balance() {
      return Err(
        PreconditionError::UnderMinimumBalance {
          amount: *fact.amount().big(),
          minimum: *policy.new_account_min_balance(),
        }
        .into(),
      );
    }

    let mut sheet = BalanceSheet::default();
    sheet.charge(pool, fact.sender(), fact.amount(), policy.feeer())?;

    let mut states = vec![
      set_state_account_value(
        &account_state,
        &Account::from_keys(fact.keys().clone()),
      )?,
      set_state_balance_value(&balance_state, fact.amount())?,
    ];
    states.extend(sheet.into_states()?);
    Ok(states)
  }
}

pub fn new_create_account_processor(
  op: &Operation,
  config: &Config,
) -> Result<Box<dyn Processor>, Error> {
  match op {
    Operation::CreateAccount(op) => {
      Ok(Box::new(CreateAccountProcessor::new(op.clone(), config.keys)))
    }
    other => Err(unexpected_kind(OperationKind::CreateAccount, other)),
  }
}
