mod create_account;
mod currency_policy_updater;
mod genesis_currencies;
mod key_updater;

pub use {
  create_account::{new_create_account_processor, CreateAccountProcessor},
  currency_policy_updater::{
    new_currency_policy_updater_processor,
    CurrencyPolicyUpdaterProcessor,
  },
  genesis_currencies::{
    new_genesis_currencies_processor,
    GenesisCurrenciesProcessor,
  },
  key_updater::{new_key_updater_processor, KeyUpdaterProcessor},
};
use {
  crate::{
    codec::{
      set_state_balance_value,
      state_account_value,
      state_balance_value,
      state_currency_design_value,
      state_key_account,
      state_key_balance,
      state_key_currency_design,
    },
    Config,
    Error,
    PreconditionError,
    State,
    StatePool,
  },
  currency_primitives::{
    Account,
    Address,
    Amount,
    Big,
    CurrencyDesign,
    CurrencyId,
    Feeer,
    Operation,
    OperationKind,
  },
  multihash::Multihash,
  std::collections::BTreeMap,
};

/// Turns one signed operation into the set of states it writes.
///
/// `prepare` only reads from the pool. It authorizes the operation,
/// checks its preconditions against current state and computes the new
/// states. Nothing reaches the pool unless every check passed.
pub trait Processor {
  /// Identity under which the written states are recorded.
  fn fact_hash(&self) -> &Multihash;

  fn prepare(&self, pool: &StatePool) -> Result<Vec<State>, Error>;

  /// Records the prepared states as one batch. Returns the number of
  /// states written.
  fn process(&self, pool: &mut StatePool) -> Result<usize, Error> {
    let states = self.prepare(pool)?;
    let count = states.len();
    pool.set_state(self.fact_hash(), states)?;
    Ok(count)
  }
}

/// Builds the processor of one operation kind.
pub type ProcessorFactory =
  fn(&Operation, &Config) -> Result<Box<dyn Processor>, Error>;

pub(crate) fn unexpected_kind(
  expected: OperationKind,
  op: &Operation,
) -> Error {
  Error::Internal(format!(
    "expected {expected} operation, got {}",
    op.kind()
  ))
}

/// The state stored under `key`, or `NotFound`.
pub(crate) fn exists_state(
  pool: &StatePool,
  key: &str,
  what: &'static str,
) -> Result<State, Error> {
  match pool.get_state(key)? {
    Some(state) if !state.is_empty() => Ok(state),
    _ => Err(
      PreconditionError::NotFound {
        what,
        key: key.to_owned(),
      }
      .into(),
    ),
  }
}

/// A placeholder for `key`, or `AlreadyExists` if it holds a value.
pub(crate) fn not_exists_state(
  pool: &StatePool,
  key: &str,
  what: &'static str,
) -> Result<State, Error> {
  match pool.get_state(key)? {
    Some(state) if !state.is_empty() => Err(
      PreconditionError::AlreadyExists {
        what,
        key: key.to_owned(),
      }
      .into(),
    ),
    _ => Ok(State::empty(key)),
  }
}

pub(crate) fn existing_account(
  pool: &StatePool,
  address: &Address,
) -> Result<(State, Account), Error> {
  let state = exists_state(pool, &state_key_account(address), "account")?;
  let account = state_account_value(&state)?;
  Ok((state, account))
}

pub(crate) fn existing_currency_design(
  pool: &StatePool,
  currency: &CurrencyId,
) -> Result<(State, CurrencyDesign), Error> {
  let state = exists_state(
    pool,
    &state_key_currency_design(currency),
    "currency design",
  )?;
  let design = state_currency_design_value(&state)?;
  Ok((state, design))
}

/// Pending balance changes of one operation.
///
/// Each balance is loaded once, so when the payer and the fee receiver
/// are the same account their changes land in a single state.
#[derive(Default)]
pub(crate) struct BalanceSheet {
  entries: BTreeMap<String, (State, Amount)>,
}

impl BalanceSheet {
  /// Loads an existing balance and returns its state key.
  pub fn load(
    &mut self,
    pool: &StatePool,
    address: &Address,
    currency: &CurrencyId,
  ) -> Result<String, Error> {
    let key = state_key_balance(address, currency);
    if !self.entries.contains_key(&key) {
      let state = exists_state(pool, &key, "balance")?;
      let amount = state_balance_value(&state)?;
      self.entries.insert(key.clone(), (state, amount));
    }
    Ok(key)
  }

  pub fn debit(&mut self, key: &str, big: &Big) -> Result<(), Error> {
    let (_, amount) = self.entry(key)?;
    let remaining =
      amount
        .big()
        .checked_sub(big)
        .ok_or_else(|| Error::InsufficientFunds {
          key: key.to_owned(),
          balance: *amount.big(),
          required: *big,
        })?;
    *amount = amount.with_big(remaining);
    Ok(())
  }

  pub fn credit(&mut self, key: &str, big: &Big) -> Result<(), Error> {
    let (_, amount) = self.entry(key)?;
    let total = amount
      .big()
      .checked_add(big)
      .ok_or(currency_primitives::Error::Overflow)?;
    *amount = amount.with_big(total);
    Ok(())
  }

  /// Charges `required` plus the fee of `feeer` to `payer` and credits
  /// the fee to its receiver.
  pub fn charge(
    &mut self,
    pool: &StatePool,
    payer: &Address,
    required: &Amount,
    feeer: &Feeer,
  ) -> Result<(), Error> {
    let currency = required.currency();
    let payer = self.load(pool, payer, currency)?;
    let fee = feeer.fee(required);

    let receiver = match feeer.receiver() {
      Some(receiver) if fee.big().is_positive() => {
        Some(self.load(pool, receiver, currency)?)
      }
      _ => None,
    };

    let total = required
      .big()
      .checked_add(fee.big())
      .ok_or(currency_primitives::Error::Overflow)?;
    self.debit(&payer, &total)?;

    if let Some(receiver) = receiver {
      self.credit(&receiver, fee.big())?;
    }

    Ok(())
  }

  pub fn into_states(self) -> Result<Vec<State>, Error> {
    self
      .entries
      .into_values()
      .map(|(state, amount)| set_state_balance_value(&state, &amount))
      .collect()
  }

  fn entry(&mut self, key: &str) -> Result<&mut (State, Amount), Error> {
    self
      .entries
      .get_mut(key)
      .ok_or_else(|| Error::Internal(format!("balance {key} is not loaded")))
  }
}
