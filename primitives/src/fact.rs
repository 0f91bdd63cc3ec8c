use {
  crate::{
    b58::ToBase58String,
    sha256,
    Address,
    Amount,
    CurrencyDesign,
    CurrencyId,
    CurrencyPolicy,
    Error,
    Keys,
    OperationKind,
  },
  ed25519_dalek::{Keypair, PublicKey, Signature, Signer, Verifier},
  multihash::Multihash,
  serde::{Deserialize, Serialize},
  std::collections::BTreeSet,
};

/// The signed intent of an operation, independent of its signatures.
///
/// A fact is immutable once constructed. Its hash covers the kind of
/// the operation, the token and the payload, and it is the message
/// that signers sign and the identity under which the resulting state
/// changes are recorded.
pub trait Fact {
  fn kind(&self) -> OperationKind;

  /// Caller supplied salt that makes otherwise identical
  /// requests distinct.
  fn token(&self) -> &[u8];

  /// The hash that was computed when the fact was constructed.
  fn hash(&self) -> &Multihash;

  /// Canonical bytes of the operation specific payload.
  fn payload(&self) -> Vec<u8>;

  fn is_valid_payload(&self) -> Result<(), Error>;

  fn generate_hash(&self) -> Multihash {
    let mut bytes = self.kind().tag().as_bytes().to_vec();
    bytes.extend_from_slice(&(self.token().len() as u64).to_be_bytes());
    bytes.extend_from_slice(self.token());
    bytes.extend(self.payload());
    sha256(&bytes)
  }

  fn is_valid(&self) -> Result<(), Error> {
    if self.token().is_empty() {
      return Err(Error::InvalidFact("empty token".into()));
    }

    self.is_valid_payload()?;

    if &self.generate_hash() != self.hash() {
      return Err(Error::FactHashMismatch);
    }

    Ok(())
  }
}

/// The message signers sign for a fact on a given network.
pub fn signing_message(fact_hash: &Multihash, network_id: &[u8]) -> Vec<u8> {
  let mut message = fact_hash.digest().to_vec();
  message.extend_from_slice(network_id);
  message
}

/// A signature over a fact hash together with its signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactSign {
  signer: PublicKey,
  signature: Signature,
}

impl FactSign {
  pub fn new(
    keypair: &Keypair,
    fact_hash: &Multihash,
    network_id: &[u8],
  ) -> Self {
    Self {
      signer: keypair.public,
      signature: keypair.sign(&signing_message(fact_hash, network_id)),
    }
  }

  pub fn signer(&self) -> &PublicKey {
    &self.signer
  }

  pub fn signature(&self) -> &Signature {
    &self.signature
  }

  pub fn verify(
    &self,
    fact_hash: &Multihash,
    network_id: &[u8],
  ) -> Result<(), Error> {
    self
      .signer
      .verify(&signing_message(fact_hash, network_id), &self.signature)
      .map_err(|_| Error::SignatureVerificationFailed(self.signer.to_b58()))
  }
}

/// Opens a new account guarded by `keys` and funds it from the
/// sender's balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAccountFact {
  token: Vec<u8>,
  sender: Address,
  keys: Keys,
  amount: Amount,
  hash: Multihash,
}

impl CreateAccountFact {
  pub fn new(
    token: impl Into<Vec<u8>>,
    sender: Address,
    keys: Keys,
    amount: Amount,
  ) -> Self {
    let mut fact = Self {
      token: token.into(),
      sender,
      keys,
      amount,
      hash: Multihash::default(),
    };
    fact.hash = fact.generate_hash();
    fact
  }

  pub fn sender(&self) -> &Address {
    &self.sender
  }

  pub fn keys(&self) -> &Keys {
    &self.keys
  }

  pub fn amount(&self) -> &Amount {
    &self.amount
  }

  /// Address of the account this fact creates.
  pub fn target(&self) -> Address {
    self.keys.address()
  }
}

impl Fact for CreateAccountFact {
  fn kind(&self) -> OperationKind {
    OperationKind::CreateAccount
  }

  fn token(&self) -> &[u8] {
    &self.token
  }

  fn hash(&self) -> &Multihash {
    &self.hash
  }

  fn payload(&self) -> Vec<u8> {
    let mut bytes = self.sender.bytes().to_vec();
    bytes.extend(self.keys.bytes());
    bytes.extend(self.amount.bytes());
    bytes
  }

  fn is_valid_payload(&self) -> Result<(), Error> {
    self.keys.is_well_formed()?;
    self.amount.is_valid()?;

    if !self.amount.big().is_positive() {
      return Err(Error::InvalidAmount(
        *self.amount.big(),
        "amount must be over zero",
      ));
    }

    if self.target() == self.sender {
      return Err(Error::InvalidFact(format!(
        "target address is same with sender, {}",
        self.sender
      )));
    }

    Ok(())
  }
}

/// Replaces the keys of an existing account. The fee is paid by the
/// target account in the given currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyUpdaterFact {
  token: Vec<u8>,
  target: Address,
  keys: Keys,
  currency: CurrencyId,
  hash: Multihash,
}

impl KeyUpdaterFact {
  pub fn new(
    token: impl Into<Vec<u8>>,
    target: Address,
    keys: Keys,
    currency: CurrencyId,
  ) -> Self {
    let mut fact = Self {
      token: token.into(),
      target,
      keys,
      currency,
      hash: Multihash::default(),
    };
    fact.hash = fact.generate_hash();
    fact
  }

  pub fn target(&self) -> &Address {
    &self.target
  }

  pub fn keys(&self) -> &Keys {
    &self.keys
  }

  pub fn currency(&self) -> &CurrencyId {
    &self.currency
  }
}

impl Fact for KeyUpdaterFact {
  fn kind(&self) -> OperationKind {
    OperationKind::KeyUpdater
  }

  fn token(&self) -> &[u8] {
    &self.token
  }

  fn hash(&self) -> &Multihash {
    &self.hash
  }

  fn payload(&self) -> Vec<u8> {
    let mut bytes = self.target.bytes().to_vec();
    bytes.extend(self.keys.bytes());
    bytes.extend(self.currency.bytes());
    bytes
  }

  fn is_valid_payload(&self) -> Result<(), Error> {
    self.keys.is_well_formed()?;
    self.currency.is_valid()
  }
}

/// Replaces the policy of an existing currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyPolicyUpdaterFact {
  token: Vec<u8>,
  currency: CurrencyId,
  policy: CurrencyPolicy,
  hash: Multihash,
}

impl CurrencyPolicyUpdaterFact {
  pub fn new(
    token: impl Into<Vec<u8>>,
    currency: CurrencyId,
    policy: CurrencyPolicy,
  ) -> Self {
    let mut fact = Self {
      token: token.into(),
      currency,
      policy,
      hash: Multihash::default(),
    };
    fact.hash = fact.generate_hash();
    fact
  }

  pub fn currency(&self) -> &CurrencyId {
    &self.currency
  }

  pub fn policy(&self) -> &CurrencyPolicy {
    &self.policy
  }
}

impl Fact for CurrencyPolicyUpdaterFact {
  fn kind(&self) -> OperationKind {
    OperationKind::CurrencyPolicyUpdater
  }

  fn token(&self) -> &[u8] {
    &self.token
  }

  fn hash(&self) -> &Multihash {
    &self.hash
  }

  fn payload(&self) -> Vec<u8> {
    let mut bytes = self.currency.bytes();
    bytes.extend(self.policy.bytes());
    bytes
  }

  fn is_valid_payload(&self) -> Result<(), Error> {
    self.currency.is_valid()
  }
}

/// Bootstraps the ledger: opens the genesis account and issues the
/// whole supply of every listed currency to it.
///
/// This fact is signed by the genesis node key it carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisCurrenciesFact {
  token: Vec<u8>,
  genesis_node_key: PublicKey,
  keys: Keys,
  currencies: Vec<CurrencyDesign>,
  hash: Multihash,
}

impl GenesisCurrenciesFact {
  /// Every `(supply, policy)` pair becomes a currency design owned by
  /// the account derived from `keys`.
  pub fn new(
    token: impl Into<Vec<u8>>,
    genesis_node_key: PublicKey,
    keys: Keys,
    currencies: Vec<(Amount, CurrencyPolicy)>,
  ) -> Self {
    let address = keys.address();
    let currencies = currencies
      .into_iter()
      .map(|(amount, policy)| CurrencyDesign::new(amount, address, policy))
      .collect();

    let mut fact = Self {
      token: token.into(),
      genesis_node_key,
      keys,
      currencies,
      hash: Multihash::default(),
    };
    fact.hash = fact.generate_hash();
    fact
  }

  pub fn genesis_node_key(&self) -> &PublicKey {
    &self.genesis_node_key
  }

  pub fn keys(&self) -> &Keys {
    &self.keys
  }

  pub fn currencies(&self) -> &[CurrencyDesign] {
    &self.currencies
  }

  /// Address of the genesis account.
  pub fn address(&self) -> Address {
    self.keys.address()
  }
}

impl Fact for GenesisCurrenciesFact {
  fn kind(&self) -> OperationKind {
    OperationKind::GenesisCurrencies
  }

  fn token(&self) -> &[u8] {
    &self.token
  }

  fn hash(&self) -> &Multihash {
    &self.hash
  }

  fn payload(&self) -> Vec<u8> {
    let mut bytes = self.genesis_node_key.as_bytes().to_vec();
    bytes.extend(self.keys.bytes());
    for design in &self.currencies {
      bytes.extend(design.bytes());
    }
    bytes
  }

  fn is_valid_payload(&self) -> Result<(), Error> {
    self.keys.is_well_formed()?;

    if self.currencies.is_empty() {
      return Err(Error::InvalidFact("empty currency designs".into()));
    }

    let address = self.address();
    let mut seen = BTreeSet::new();
    for design in &self.currencies {
      design.is_valid()?;

      if !seen.insert(design.currency()) {
        return Err(Error::InvalidFact(format!(
          "duplicated currency id found, {}",
          design.currency()
        )));
      }

      if design.genesis_account() != &address {
        return Err(Error::InvalidFact(format!(
          "genesis account of {} does not match the genesis keys",
          design.currency()
        )));
      }
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use {
    super::*,
    crate::{Big, Feeer, Key},
  };

  fn keys_of(kp: &Keypair) -> anyhow::Result<Keys> {
    Ok(Keys::new(vec![Key::new(kp.public, 100)?], 100)?)
  }

  #[test]
  fn fact_hash_is_self_consistent() -> anyhow::Result<()> {
    let sender = Keypair::generate(&mut rand::thread_rng());
    let target = Keypair::generate(&mut rand::thread_rng());

    let fact = CreateAccountFact::new(
      b"token".to_vec(),
      keys_of(&sender)?.address(),
      keys_of(&target)?,
      "10,MCC".parse()?,
    );
    assert!(fact.is_valid().is_ok());

    // same payload, different token
    let other = CreateAccountFact::new(
      b"token2".to_vec(),
      *fact.sender(),
      fact.keys().clone(),
      fact.amount().clone(),
    );
    assert_ne!(fact.hash(), other.hash());

    let mut tampered = fact.clone();
    tampered.amount = "11,MCC".parse()?;
    assert!(matches!(tampered.is_valid(), Err(Error::FactHashMismatch)));

    let empty = KeyUpdaterFact::new(
      vec![],
      keys_of(&sender)?.address(),
      keys_of(&target)?,
      CurrencyId::new("MCC")?,
    );
    assert!(matches!(empty.is_valid(), Err(Error::InvalidFact(_))));
    Ok(())
  }

  #[test]
  fn fact_hash_separates_token_and_fields() -> anyhow::Result<()> {
    let policy = CurrencyPolicy::new(Big::zero(), Feeer::Nil);
    let a = CurrencyPolicyUpdaterFact::new(
      b"tokenA".to_vec(),
      CurrencyId::new("BCD")?,
      policy.clone(),
    );
    let b = CurrencyPolicyUpdaterFact::new(
      b"token".to_vec(),
      CurrencyId::new("ABCD")?,
      policy,
    );
    assert_ne!(a.hash(), b.hash());

    // a currency id followed by a minimum balance starting with '1'
    let c = CurrencyPolicyUpdaterFact::new(
      b"token".to_vec(),
      CurrencyId::new("MCC")?,
      CurrencyPolicy::new(Big::from(0x31), Feeer::Nil),
    );
    let d = CurrencyPolicyUpdaterFact::new(
      b"token".to_vec(),
      CurrencyId::new("MCC1")?,
      CurrencyPolicy::new(Big::zero(), Feeer::Nil),
    );
    assert_ne!(c.hash(), d.hash());
    Ok(())
  }

  #[test]
  fn fact_sign_is_scoped_to_network() -> anyhow::Result<()> {
    let kp = Keypair::generate(&mut rand::thread_rng());
    let fact = CurrencyPolicyUpdaterFact::new(
      b"token".to_vec(),
      CurrencyId::new("MCC")?,
      CurrencyPolicy::new(Big::zero(), Feeer::Nil),
    );

    let sign = FactSign::new(&kp, fact.hash(), b"mainnet");
    assert!(sign.verify(fact.hash(), b"mainnet").is_ok());
    assert!(matches!(
      sign.verify(fact.hash(), b"testnet"),
      Err(Error::SignatureVerificationFailed(_))
    ));
    Ok(())
  }

  #[test]
  fn genesis_fact_rules() -> anyhow::Result<()> {
    let node = Keypair::generate(&mut rand::thread_rng());
    let genesis = Keypair::generate(&mut rand::thread_rng());
    let policy = CurrencyPolicy::new(Big::zero(), Feeer::Nil);

    let fact = GenesisCurrenciesFact::new(
      b"genesis".to_vec(),
      node.public,
      keys_of(&genesis)?,
      vec![
        ("1000,MCC".parse()?, policy.clone()),
        ("2000,XYZ".parse()?, policy.clone()),
      ],
    );
    assert!(fact.is_valid().is_ok());
    assert!(fact
      .currencies()
      .iter()
      .all(|d| d.genesis_account() == &fact.address()));

    let dup = GenesisCurrenciesFact::new(
      b"genesis".to_vec(),
      node.public,
      keys_of(&genesis)?,
      vec![
        ("1000,MCC".parse()?, policy.clone()),
        ("2000,MCC".parse()?, policy.clone()),
      ],
    );
    assert!(matches!(dup.is_valid(), Err(Error::InvalidFact(_))));

    let empty = GenesisCurrenciesFact::new(
      b"genesis".to_vec(),
      node.public,
      keys_of(&genesis)?,
      vec![],
    );
    assert!(matches!(empty.is_valid(), Err(Error::InvalidFact(_))));
    Ok(())
  }
}
