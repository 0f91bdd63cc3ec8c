#![allow(dead_code)]

use {
  currency_primitives::{
    Account,
    Address,
    Amount,
    Big,
    CreateAccountFact,
    CurrencyId,
    CurrencyPolicy,
    Feeer,
    GenesisCurrenciesFact,
    Key,
    Keys,
    Operation,
    SignedOperation,
  },
  currency_vm::{
    state_account_value,
    state_balance_value,
    state_currency_design_value,
    state_key_account,
    state_key_balance,
    state_key_currency_design,
    Config,
    Error,
    Height,
    InMemoryStateStore,
    ProcessorRegistry,
    StatePool,
    StateStore,
  },
  ed25519_dalek::{Keypair, PublicKey, SecretKey},
};

pub const NETWORK: &[u8] = b"currency-test";

pub fn keypair() -> Keypair {
  Keypair::generate(&mut rand::thread_rng())
}

/// The node every test network trusts to sign genesis.
pub fn genesis_node() -> Keypair {
  let secret = SecretKey::from_bytes(&[7; 32]).expect("valid secret key");
  let public = PublicKey::from(&secret);
  Keypair { secret, public }
}

/// Test network configuration with genesis at height 0.
pub fn config() -> Config {
  Config::new(NETWORK).with_genesis(vec![genesis_node().public], 0)
}

/// A single key account, the key alone meets the threshold.
pub struct Wallet {
  pub keypair: Keypair,
  pub keys: Keys,
}

impl Wallet {
  pub fn new() -> anyhow::Result<Self> {
    let keypair = keypair();
    let keys = Keys::new(vec![Key::new(keypair.public, 100)?], 100)?;
    Ok(Self { keypair, keys })
  }

  pub fn address(&self) -> Address {
    self.keys.address()
  }
}

/// `n` keys of equal `weight` under one threshold.
pub fn multisig(
  n: usize,
  weight: u64,
  threshold: u64,
) -> anyhow::Result<(Vec<Keypair>, Keys)> {
  let keypairs: Vec<_> = (0..n).map(|_| keypair()).collect();
  let keys = Keys::new(
    keypairs
      .iter()
      .map(|kp| Key::new(kp.public, weight))
      .collect::<Result<_, _>>()?,
    threshold,
  )?;
  Ok((keypairs, keys))
}

pub fn mcc() -> CurrencyId {
  CurrencyId::new("MCC").expect("valid currency id")
}

pub fn amount(big: u64, currency: &CurrencyId) -> Amount {
  Amount::new(Big::from(big), currency.clone())
}

pub fn nil_policy(min_balance: u64) -> CurrencyPolicy {
  CurrencyPolicy::new(Big::from(min_balance), Feeer::Nil)
}

pub fn fixed_policy(
  min_balance: u64,
  receiver: Address,
  fee: u64,
) -> CurrencyPolicy {
  CurrencyPolicy::new(Big::from(min_balance), Feeer::Fixed {
    receiver,
    amount: Big::from(fee),
  })
}

pub fn registry(config: Config) -> ProcessorRegistry {
  ProcessorRegistry::with_defaults(config).expect("default processors")
}

pub fn default_registry() -> ProcessorRegistry {
  registry(config())
}

/// Processes one operation in its own pool and commits the result.
pub fn process(
  store: &mut InMemoryStateStore,
  registry: &ProcessorRegistry,
  height: Height,
  op: &Operation,
) -> Result<(), Error> {
  let diff = {
    let mut processor =
      registry.new_processor(StatePool::new(&*store, height));
    processor.process(op)?;
    processor.into_pool().into_diff()
  };
  store.apply(diff);
  Ok(())
}

pub fn genesis_op(
  node: &Keypair,
  owner: &Keys,
  currencies: Vec<(Amount, CurrencyPolicy)>,
) -> Operation {
  let fact = GenesisCurrenciesFact::new(
    b"genesis".to_vec(),
    node.public,
    owner.clone(),
    currencies,
  );
  SignedOperation::sign(fact, &[node], NETWORK).into()
}

/// A store bootstrapped with the given currencies owned by `owner`.
pub fn genesis(
  owner: &Wallet,
  currencies: Vec<(Amount, CurrencyPolicy)>,
) -> anyhow::Result<InMemoryStateStore> {
  let mut store = InMemoryStateStore::default();
  let op = genesis_op(&genesis_node(), &owner.keys, currencies);
  process(&mut store, &default_registry(), 0, &op)?;
  Ok(store)
}

pub fn create_account_op(
  token: &str,
  sender: &Address,
  signers: &[&Keypair],
  keys: &Keys,
  amount: Amount,
) -> Operation {
  let fact = CreateAccountFact::new(token, *sender, keys.clone(), amount);
  SignedOperation::sign(fact, signers, NETWORK).into()
}

pub fn account(
  store: &impl StateStore,
  address: &Address,
) -> anyhow::Result<Option<Account>> {
  Ok(match store.get(&state_key_account(address))? {
    Some(state) => Some(state_account_value(&state)?),
    None => None,
  })
}

pub fn balance(
  store: &impl StateStore,
  address: &Address,
  currency: &CurrencyId,
) -> anyhow::Result<Option<Big>> {
  Ok(match store.get(&state_key_balance(address, currency))? {
    Some(state) => Some(*state_balance_value(&state)?.big()),
    None => None,
  })
}

pub fn currency_design(
  store: &impl StateStore,
  currency: &CurrencyId,
) -> anyhow::Result<Option<currency_primitives::CurrencyDesign>> {
  Ok(match store.get(&state_key_currency_design(currency))? {
    Some(state) => Some(state_currency_design_value(&state)?),
    None => None,
  })
}
