use {
  crate::{Address, Amount, Big, CurrencyId, Error},
  serde::{Deserialize, Serialize},
};

/// Describes how the fee of an operation is computed and who
/// receives it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feeer {
  /// No fee is charged.
  Nil,

  /// A constant fee credited to the receiver account.
  Fixed { receiver: Address, amount: Big },
}

impl Feeer {
  /// Fee due for an operation moving `amount`, in the same currency.
  pub fn fee(&self, amount: &Amount) -> Amount {
    match self {
      Feeer::Nil => amount.with_big(Big::zero()),
      Feeer::Fixed { amount: fee, .. } => amount.with_big(*fee),
    }
  }

  pub fn receiver(&self) -> Option<&Address> {
    match self {
      Feeer::Nil => None,
      Feeer::Fixed { receiver, .. } => Some(receiver),
    }
  }

  pub fn bytes(&self) -> Vec<u8> {
    match self {
      Feeer::Nil => b"nil".to_vec(),
      Feeer::Fixed { receiver, amount } => {
        let mut bytes = b"fixed".to_vec();
        bytes.extend_from_slice(receiver.bytes());
        bytes.extend_from_slice(&amount.bytes());
        bytes
      }
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyPolicy {
  new_account_min_balance: Big,
  feeer: Feeer,
}

impl CurrencyPolicy {
  pub fn new(new_account_min_balance: Big, feeer: Feeer) -> Self {
    Self {
      new_account_min_balance,
      feeer,
    }
  }

  /// The least amount a newly created account must be funded with.
  pub fn new_account_min_balance(&self) -> &Big {
    &self.new_account_min_balance
  }

  pub fn feeer(&self) -> &Feeer {
    &self.feeer
  }

  pub fn bytes(&self) -> Vec<u8> {
    let mut bytes = self.new_account_min_balance.bytes().to_vec();
    bytes.extend(self.feeer.bytes());
    bytes
  }
}

/// Everything the ledger knows about one currency: its total supply,
/// the account that received the supply at genesis and the policy
/// applied to operations that move it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyDesign {
  amount: Amount,
  genesis_account: Address,
  policy: CurrencyPolicy,
}

impl CurrencyDesign {
  pub fn new(
    amount: Amount,
    genesis_account: Address,
    policy: CurrencyPolicy,
  ) -> Self {
    Self {
      amount,
      genesis_account,
      policy,
    }
  }

  pub fn currency(&self) -> &CurrencyId {
    self.amount.currency()
  }

  /// Total supply.
  pub fn amount(&self) -> &Amount {
    &self.amount
  }

  pub fn genesis_account(&self) -> &Address {
    &self.genesis_account
  }

  pub fn policy(&self) -> &CurrencyPolicy {
    &self.policy
  }

  /// Copy of this design with only the policy replaced.
  pub fn with_policy(&self, policy: CurrencyPolicy) -> Self {
    Self {
      amount: self.amount.clone(),
      genesis_account: self.genesis_account,
      policy,
    }
  }

  pub fn is_valid(&self) -> Result<(), Error> {
    self.amount.is_valid()?;
    if !self.amount.big().is_positive() {
      return Err(Error::InvalidAmount(
        *self.amount.big(),
        "total supply must be over zero",
      ));
    }
    Ok(())
  }

  pub fn bytes(&self) -> Vec<u8> {
    let mut bytes = self.amount.bytes();
    bytes.extend_from_slice(self.genesis_account.bytes());
    bytes.extend(self.policy.bytes());
    bytes
  }
}
