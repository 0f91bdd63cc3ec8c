use {
  crate::settings::SystemSettings,
  currency_primitives::{
    Address,
    Amount,
    Big,
    CreateAccountFact,
    CurrencyId,
    CurrencyPolicy,
    CurrencyPolicyUpdaterFact,
    Feeer,
    GenesisCurrenciesFact,
    Key,
    KeyUpdaterFact,
    Keys,
    Operation,
    SignedOperation,
    ToBase58String,
  },
  ed25519_dalek::{Keypair, PublicKey, SecretKey},
  rmp_serde::to_vec,
};

/// Rebuilds a keypair from its base58 encoded secret key.
pub fn parse_keypair(secret: &str) -> anyhow::Result<Keypair> {
  let bytes = bs58::decode(secret).into_vec()?;
  let secret = SecretKey::from_bytes(&bytes)?;
  let public = PublicKey::from(&secret);
  Ok(Keypair { secret, public })
}

fn parse_keypairs(secrets: &[String]) -> anyhow::Result<Vec<Keypair>> {
  secrets.iter().map(|s| parse_keypair(s)).collect()
}

/// The given token, or the current time in nanoseconds.
fn token_bytes(token: &Option<String>) -> Vec<u8> {
  match token {
    Some(token) => token.as_bytes().to_vec(),
    None => time::OffsetDateTime::now_utc()
      .unix_timestamp_nanos()
      .to_be_bytes()
      .to_vec(),
  }
}

fn keys(
  settings: &SystemSettings,
  keys: &[Key],
  threshold: u64,
) -> anyhow::Result<Keys> {
  Ok(Keys::with_config(
    keys.to_vec(),
    threshold,
    &settings.config()?.keys,
  )?)
}

fn sign<F>(
  settings: &SystemSettings,
  fact: F,
  keypairs: &[Keypair],
) -> Operation
where
  F: currency_primitives::Fact,
  SignedOperation<F>: Into<Operation>,
{
  let keypairs: Vec<_> = keypairs.iter().collect();
  SignedOperation::sign(fact, &keypairs, settings.network_id().as_bytes())
    .into()
}

/// Base58 of the MessagePack encoding, the format `process` reads.
pub fn encode(op: &Operation) -> anyhow::Result<String> {
  Ok(to_vec(op)?.to_b58())
}

pub fn keygen() -> (String, String) {
  let keypair = Keypair::generate(&mut rand::thread_rng());
  (keypair.secret.as_bytes().to_b58(), keypair.public.to_b58())
}

#[allow(clippy::too_many_arguments)]
pub fn genesis(
  settings: &SystemSettings,
  secret: &str,
  genesis_keys: &[Key],
  threshold: u64,
  currencies: &[Amount],
  min_balance: &Big,
  fee: &Option<Big>,
  token: &Option<String>,
) -> anyhow::Result<Operation> {
  let node = parse_keypair(secret)?;
  let keys = keys(settings, genesis_keys, threshold)?;

  let feeer = match fee {
    Some(fee) => Feeer::Fixed {
      receiver: keys.address(),
      amount: *fee,
    },
    None => Feeer::Nil,
  };
  let currencies = currencies
    .iter()
    .map(|amount| {
      (
        amount.clone(),
        CurrencyPolicy::new(*min_balance, feeer.clone()),
      )
    })
    .collect();

  let fact = GenesisCurrenciesFact::new(
    token_bytes(token),
    node.public,
    keys,
    currencies,
  );
  Ok(sign(settings, fact, &[node]))
}

pub fn create_account(
  settings: &SystemSettings,
  secrets: &[String],
  sender: &Address,
  new_keys: &[Key],
  threshold: u64,
  amount: &Amount,
  token: &Option<String>,
) -> anyhow::Result<Operation> {
  let fact = CreateAccountFact::new(
    token_bytes(token),
    *sender,
    keys(settings, new_keys, threshold)?,
    amount.clone(),
  );
  Ok(sign(settings, fact, &parse_keypairs(secrets)?))
}

pub fn key_updater(
  settings: &SystemSettings,
  secrets: &[String],
  target: &Address,
  new_keys: &[Key],
  threshold: u64,
  currency: &CurrencyId,
  token: &Option<String>,
) -> anyhow::Result<Operation> {
  let fact = KeyUpdaterFact::new(
    token_bytes(token),
    *target,
    keys(settings, new_keys, threshold)?,
    currency.clone(),
  );
  Ok(sign(settings, fact, &parse_keypairs(secrets)?))
}

pub fn currency_policy_updater(
  settings: &SystemSettings,
  secrets: &[String],
  currency: &CurrencyId,
  min_balance: &Big,
  fee: &Option<Big>,
  receiver: &Option<Address>,
  token: &Option<String>,
) -> anyhow::Result<Operation> {
  let feeer = match (fee, receiver) {
    (Some(fee), Some(receiver)) => Feeer::Fixed {
      receiver: *receiver,
      amount: *fee,
    },
    _ => Feeer::Nil,
  };

  let fact = CurrencyPolicyUpdaterFact::new(
    token_bytes(token),
    currency.clone(),
    CurrencyPolicy::new(*min_balance, feeer),
  );
  Ok(sign(settings, fact, &parse_keypairs(secrets)?))
}
