use {
  common::{
    account,
    amount,
    balance,
    create_account_op,
    default_registry,
    fixed_policy,
    genesis,
    mcc,
    multisig,
    process,
    Wallet,
    NETWORK,
  },
  currency_primitives::{
    Address,
    Big,
    CurrencyId,
    KeyUpdaterFact,
    Keys,
    Operation,
    SignedOperation,
  },
  currency_vm::{AuthError, Error, PreconditionError},
  ed25519_dalek::Keypair,
};

mod common;

fn key_updater_op(
  token: &str,
  target: &Address,
  signers: &[&Keypair],
  keys: &Keys,
  currency: &CurrencyId,
) -> Operation {
  let fact =
    KeyUpdaterFact::new(token, *target, keys.clone(), currency.clone());
  SignedOperation::sign(fact, signers, NETWORK).into()
}

#[test]
fn current_keys_must_authorize_the_update() -> anyhow::Result<()> {
  let owner = Wallet::new()?;
  let mut store = genesis(&owner, vec![(
    amount(1000, &mcc()),
    fixed_policy(0, owner.address(), 3),
  )])?;
  let registry = default_registry();

  // all three signatures are needed
  let (signers, keys) = multisig(3, 33, 99)?;
  let address = keys.address();
  process(
    &mut store,
    &registry,
    1,
    &create_account_op(
      "multisig",
      &owner.address(),
      &[&owner.keypair],
      &keys,
      amount(100, &mcc()),
    ),
  )?;

  let replacement = Wallet::new()?;
  let partial = process(
    &mut store,
    &registry,
    2,
    &key_updater_op(
      "rotate",
      &address,
      &[&signers[0], &signers[1]],
      &replacement.keys,
      &mcc(),
    ),
  );
  assert_eq!(
    partial,
    Err(Error::Authorization(AuthError::ThresholdNotMet {
      sum: 66,
      threshold: 99
    }))
  );
  assert_eq!(account(&store, &address)?.expect("exists").keys(), &keys);

  process(
    &mut store,
    &registry,
    2,
    &key_updater_op(
      "rotate",
      &address,
      &[&signers[0], &signers[1], &signers[2]],
      &replacement.keys,
      &mcc(),
    ),
  )?;

  // address stays, keys are swapped and the fee is paid
  let updated = account(&store, &address)?.expect("exists");
  assert_eq!(updated.address(), &address);
  assert_eq!(updated.keys(), &replacement.keys);
  assert_eq!(balance(&store, &address, &mcc())?, Some(Big::from(97)));

  // the old keys no longer speak for the account
  let stale = process(
    &mut store,
    &registry,
    3,
    &key_updater_op(
      "rotate-back",
      &address,
      &[&signers[0], &signers[1], &signers[2]],
      &keys,
      &mcc(),
    ),
  );
  assert!(matches!(
    stale,
    Err(Error::Authorization(AuthError::UnknownSigner(_)))
  ));

  process(
    &mut store,
    &registry,
    3,
    &key_updater_op(
      "rotate-back",
      &address,
      &[&replacement.keypair],
      &keys,
      &mcc(),
    ),
  )?;
  assert_eq!(account(&store, &address)?.expect("exists").keys(), &keys);
  Ok(())
}

#[test]
fn key_updater_rejections() -> anyhow::Result<()> {
  let owner = Wallet::new()?;
  let mut store = genesis(&owner, vec![(
    amount(1000, &mcc()),
    fixed_policy(0, owner.address(), 3),
  )])?;
  let registry = default_registry();
  let other = Wallet::new()?;

  let missing = process(
    &mut store,
    &registry,
    1,
    &key_updater_op(
      "missing",
      &other.address(),
      &[&other.keypair],
      &owner.keys,
      &mcc(),
    ),
  );
  assert!(matches!(
    missing,
    Err(Error::Precondition(PreconditionError::NotFound {
      what: "account",
      ..
    }))
  ));

  let same = process(
    &mut store,
    &registry,
    1,
    &key_updater_op(
      "same",
      &owner.address(),
      &[&owner.keypair],
      &owner.keys,
      &mcc(),
    ),
  );
  assert!(matches!(
    same,
    Err(Error::Precondition(PreconditionError::SameKeys(_)))
  ));

  // the fee currency must exist and be held by the target
  let no_currency = process(
    &mut store,
    &registry,
    1,
    &key_updater_op(
      "xyz",
      &owner.address(),
      &[&owner.keypair],
      &other.keys,
      &CurrencyId::new("XYZ")?,
    ),
  );
  assert!(matches!(
    no_currency,
    Err(Error::Precondition(PreconditionError::NotFound {
      what: "currency design",
      ..
    }))
  ));

  assert_eq!(
    account(&store, &owner.address())?.expect("exists").keys(),
    &owner.keys
  );
  Ok(())
}

#[test]
fn key_updater_fee_must_be_payable() -> anyhow::Result<()> {
  let owner = Wallet::new()?;
  let xyz = CurrencyId::new("XYZ")?;
  let mut store = genesis(&owner, vec![
    (amount(1000, &mcc()), fixed_policy(0, owner.address(), 3)),
    (amount(1000, &xyz), fixed_policy(0, owner.address(), 5)),
  ])?;
  let registry = default_registry();

  // alice holds two MCC and no XYZ
  let alice = Wallet::new()?;
  process(
    &mut store,
    &registry,
    1,
    &create_account_op(
      "alice",
      &owner.address(),
      &[&owner.keypair],
      &alice.keys,
      amount(2, &mcc()),
    ),
  )?;
  let replacement = Wallet::new()?;

  let no_balance = process(
    &mut store,
    &registry,
    2,
    &key_updater_op(
      "in-xyz",
      &alice.address(),
      &[&alice.keypair],
      &replacement.keys,
      &xyz,
    ),
  );
  assert!(matches!(
    no_balance,
    Err(Error::Precondition(PreconditionError::NotFound {
      what: "balance",
      ..
    }))
  ));

  let too_poor = process(
    &mut store,
    &registry,
    2,
    &key_updater_op(
      "in-mcc",
      &alice.address(),
      &[&alice.keypair],
      &replacement.keys,
      &mcc(),
    ),
  );
  assert!(matches!(
    too_poor,
    Err(Error::InsufficientFunds { balance, required, .. })
      if balance == Big::from(2) && required == Big::from(3)
  ));

  assert_eq!(
    account(&store, &alice.address())?.expect("exists").keys(),
    &alice.keys
  );
  assert_eq!(balance(&store, &alice.address(), &mcc())?, Some(Big::from(2)));
  assert_eq!(balance(&store, &owner.address(), &mcc())?, Some(Big::from(998)));
  Ok(())
}
