use {
  crate::{
    b58::ToBase58String,
    sha256,
    CreateAccountFact,
    CurrencyPolicyUpdaterFact,
    Error,
    Fact,
    FactSign,
    GenesisCurrenciesFact,
    KeyUpdaterFact,
  },
  ed25519_dalek::Keypair,
  multihash::Multihash,
  once_cell::sync::OnceCell,
  serde::{Deserialize, Serialize},
  std::{collections::HashSet, fmt::Debug},
};

/// Discriminant of every operation the ledger knows how to process.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
)]
pub enum OperationKind {
  CreateAccount,
  KeyUpdater,
  CurrencyPolicyUpdater,
  GenesisCurrencies,
}

impl OperationKind {
  pub const ALL: [OperationKind; 4] = [
    OperationKind::CreateAccount,
    OperationKind::KeyUpdater,
    OperationKind::CurrencyPolicyUpdater,
    OperationKind::GenesisCurrencies,
  ];

  /// Stable name, also mixed into fact hashes.
  pub fn tag(&self) -> &'static str {
    match self {
      OperationKind::CreateAccount => "create-account",
      OperationKind::KeyUpdater => "key-updater",
      OperationKind::CurrencyPolicyUpdater => "currency-policy-updater",
      OperationKind::GenesisCurrencies => "genesis-currencies",
    }
  }
}

impl std::fmt::Display for OperationKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.tag())
  }
}

/// A fact together with the signatures that authorize it.
#[derive(Clone, Serialize, Deserialize)]
pub struct SignedOperation<F> {
  fact: F,
  signs: Vec<FactSign>,
  memo: String,

  #[serde(skip)]
  hash_cache: OnceCell<Multihash>,
}

impl<F: Fact> SignedOperation<F> {
  pub fn new(fact: F, signs: Vec<FactSign>, memo: impl Into<String>) -> Self {
    Self {
      fact,
      signs,
      memo: memo.into(),
      hash_cache: OnceCell::new(),
    }
  }

  /// Signs the fact with every keypair for the given network.
  pub fn sign(fact: F, keypairs: &[&Keypair], network_id: &[u8]) -> Self {
    let signs = keypairs
      .iter()
      .map(|kp| FactSign::new(kp, fact.hash(), network_id))
      .collect();
    Self::new(fact, signs, "")
  }

  /// Adds one more signature to the operation.
  pub fn with_sign(self, keypair: &Keypair, network_id: &[u8]) -> Self {
    let mut signs = self.signs;
    signs.push(FactSign::new(keypair, self.fact.hash(), network_id));
    Self::new(self.fact, signs, self.memo)
  }

  pub fn fact(&self) -> &F {
    &self.fact
  }

  pub fn signs(&self) -> &[FactSign] {
    &self.signs
  }

  pub fn memo(&self) -> &str {
    &self.memo
  }

  /// Hash of the whole envelope. Unlike the fact hash it changes
  /// when signatures are added.
  pub fn hash(&self) -> &Multihash {
    self.hash_cache.get_or_init(|| {
      let mut bytes = self.fact.hash().digest().to_vec();
      for sign in &self.signs {
        bytes.extend_from_slice(sign.signer().as_bytes());
        bytes.extend_from_slice(&sign.signature().to_bytes());
      }
      bytes.extend_from_slice(self.memo.as_bytes());
      sha256(&bytes)
    })
  }

  /// Checks the fact, then that every signature is unique and valid
  /// for `network_id`. Whether the signers are allowed to authorize
  /// the fact is decided later against ledger state.
  pub fn is_valid(&self, network_id: &[u8]) -> Result<(), Error> {
    self.fact.is_valid()?;

    if self.signs.is_empty() {
      return Err(Error::EmptySigns);
    }

    let mut signers = HashSet::with_capacity(self.signs.len());
    for sign in &self.signs {
      if !signers.insert(sign.signer().as_bytes()) {
        return Err(Error::DuplicatedSigner(sign.signer().to_b58()));
      }
      sign.verify(self.fact.hash(), network_id)?;
    }

    Ok(())
  }
}

impl<F: Fact + PartialEq> PartialEq for SignedOperation<F> {
  fn eq(&self, other: &Self) -> bool {
    self.fact == other.fact
      && self.signs == other.signs
      && self.memo == other.memo
  }
}

impl<F: Fact + Debug> Debug for SignedOperation<F> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SignedOperation")
      .field("fact", &self.fact)
      .field("signs", &self.signs)
      .field("memo", &self.memo)
      .field("hash", &self.hash().to_b58())
      .finish()
  }
}

/// Every signed operation the ledger accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operation {
  CreateAccount(SignedOperation<CreateAccountFact>),
  KeyUpdater(SignedOperation<KeyUpdaterFact>),
  CurrencyPolicyUpdater(SignedOperation<CurrencyPolicyUpdaterFact>),
  GenesisCurrencies(SignedOperation<GenesisCurrenciesFact>),
}

impl Operation {
  pub fn kind(&self) -> OperationKind {
    match self {
      Operation::CreateAccount(_) => OperationKind::CreateAccount,
      Operation::KeyUpdater(_) => OperationKind::KeyUpdater,
      Operation::CurrencyPolicyUpdater(_) => {
        OperationKind::CurrencyPolicyUpdater
      }
      Operation::GenesisCurrencies(_) => OperationKind::GenesisCurrencies,
    }
  }

  pub fn fact_hash(&self) -> &Multihash {
    match self {
      Operation::CreateAccount(op) => op.fact().hash(),
      Operation::KeyUpdater(op) => op.fact().hash(),
      Operation::CurrencyPolicyUpdater(op) => op.fact().hash(),
      Operation::GenesisCurrencies(op) => op.fact().hash(),
    }
  }

  pub fn hash(&self) -> &Multihash {
    match self {
      Operation::CreateAccount(op) => op.hash(),
      Operation::KeyUpdater(op) => op.hash(),
      Operation::CurrencyPolicyUpdater(op) => op.hash(),
      Operation::GenesisCurrencies(op) => op.hash(),
    }
  }

  pub fn signs(&self) -> &[FactSign] {
    match self {
      Operation::CreateAccount(op) => op.signs(),
      Operation::KeyUpdater(op) => op.signs(),
      Operation::CurrencyPolicyUpdater(op) => op.signs(),
      Operation::GenesisCurrencies(op) => op.signs(),
    }
  }

  pub fn is_valid(&self, network_id: &[u8]) -> Result<(), Error> {
    match self {
      Operation::CreateAccount(op) => op.is_valid(network_id),
      Operation::KeyUpdater(op) => op.is_valid(network_id),
      Operation::CurrencyPolicyUpdater(op) => op.is_valid(network_id),
      Operation::GenesisCurrencies(op) => op.is_valid(network_id),
    }
  }
}

impl From<SignedOperation<CreateAccountFact>> for Operation {
  fn from(op: SignedOperation<CreateAccountFact>) -> Self {
    Operation::CreateAccount(op)
  }
}

impl From<SignedOperation<KeyUpdaterFact>> for Operation {
  fn from(op: SignedOperation<KeyUpdaterFact>) -> Self {
    Operation::KeyUpdater(op)
  }
}

impl From<SignedOperation<CurrencyPolicyUpdaterFact>> for Operation {
  fn from(op: SignedOperation<CurrencyPolicyUpdaterFact>) -> Self {
    Operation::CurrencyPolicyUpdater(op)
  }
}

impl From<SignedOperation<GenesisCurrenciesFact>> for Operation {
  fn from(op: SignedOperation<GenesisCurrenciesFact>) -> Self {
    Operation::GenesisCurrencies(op)
  }
}
