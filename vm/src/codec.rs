use {
  crate::{Error, State},
  currency_primitives::{Account, Address, Amount, CurrencyDesign, CurrencyId},
  serde::{Deserialize, Serialize},
};

pub fn state_key_account(address: &Address) -> String {
  format!("account:{address}")
}

pub fn state_key_balance(address: &Address, currency: &CurrencyId) -> String {
  format!("balance:{address}:{currency}")
}

pub fn state_key_currency_design(currency: &CurrencyId) -> String {
  format!("currency-design:{currency}")
}

/// Typed payload of a state. The variant tag is the type hint that
/// tells a decoder what kind of value a state holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateValue {
  Account(Account),
  Balance(Amount),
  CurrencyDesign(CurrencyDesign),
}

impl StateValue {
  pub fn encode(&self) -> Result<Vec<u8>, Error> {
    rmp_serde::to_vec(self)
      .map_err(|e| Error::Internal(format!("failed to encode state: {e}")))
  }

  pub fn decode(bytes: &[u8]) -> Result<Self, Error> {
    rmp_serde::from_slice(bytes)
      .map_err(|e| Error::Internal(format!("failed to decode state: {e}")))
  }

  pub fn of(state: &State) -> Result<Self, Error> {
    if state.is_empty() {
      return Err(Error::Internal(format!("empty state {}", state.key())));
    }
    Self::decode(state.value())
  }
}

pub fn set_state_account_value(
  state: &State,
  account: &Account,
) -> Result<State, Error> {
  Ok(state.with_value(StateValue::Account(account.clone()).encode()?))
}

/// Decodes the account stored in a state. The keys hash is verified,
/// a mismatch means the stored value was tampered with.
pub fn state_account_value(state: &State) -> Result<Account, Error> {
  match StateValue::of(state)? {
    StateValue::Account(account) => {
      account
        .keys()
        .verify_hash()
        .map_err(|_| Error::CorruptKeys(state.key().to_owned()))?;
      Ok(account)
    }
    other => Err(unexpected(state, "account", &other)),
  }
}

pub fn set_state_balance_value(
  state: &State,
  amount: &Amount,
) -> Result<State, Error> {
  Ok(state.with_value(StateValue::Balance(amount.clone()).encode()?))
}

pub fn state_balance_value(state: &State) -> Result<Amount, Error> {
  match StateValue::of(state)? {
    StateValue::Balance(amount) => Ok(amount),
    other => Err(unexpected(state, "balance", &other)),
  }
}

pub fn set_state_currency_design_value(
  state: &State,
  design: &CurrencyDesign,
) -> Result<State, Error> {
  Ok(state.with_value(StateValue::CurrencyDesign(design.clone()).encode()?))
}

pub fn state_currency_design_value(
  state: &State,
) -> Result<CurrencyDesign, Error> {
  match StateValue::of(state)? {
    StateValue::CurrencyDesign(design) => Ok(design),
    other => Err(unexpected(state, "currency design", &other)),
  }
}

fn unexpected(state: &State, expected: &str, found: &StateValue) -> Error {
  let found = match found {
    StateValue::Account(_) => "account",
    StateValue::Balance(_) => "balance",
    StateValue::CurrencyDesign(_) => "currency design",
  };
  Error::Internal(format!(
    "state {} holds {found}, expected {expected}",
    state.key()
  ))
}
