use {
  crate::{Address, Keys},
  serde::{Deserialize, Serialize},
};

/// Represents an account on the ledger.
///
/// An account is identified by its address and guarded by its keys.
/// Any state-changing request on behalf of the account must carry
/// signatures whose weights, as defined by these keys, reach the
/// keys threshold.
///
/// Balances are not stored in the account itself, each currency held
/// by an account lives in its own balance state.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Account {
  /// Derived from the keys the account was opened with and never
  /// changes afterwards.
  address: Address,

  /// The signing policy currently in force. Key updates replace
  /// this value as a whole.
  keys: Keys,
}

impl Account {
  /// Opens a new account, its address is derived from the keys.
  pub fn from_keys(keys: Keys) -> Self {
    Self {
      address: keys.address(),
      keys,
    }
  }

  pub fn address(&self) -> &Address {
    &self.address
  }

  pub fn keys(&self) -> &Keys {
    &self.keys
  }

  /// The same account guarded by a different set of keys.
  pub fn with_keys(&self, keys: Keys) -> Self {
    Self {
      address: self.address,
      keys,
    }
  }
}
