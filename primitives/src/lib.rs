mod account;
mod address;
mod amount;
mod b58;
mod currency;
mod error;
mod fact;
mod key;
mod operation;

pub use {
  account::Account,
  address::Address,
  amount::{Amount, Big, CurrencyId},
  b58::ToBase58String,
  currency::{CurrencyDesign, CurrencyPolicy, Feeer},
  error::Error,
  fact::{
    signing_message,
    CreateAccountFact,
    CurrencyPolicyUpdaterFact,
    Fact,
    FactSign,
    GenesisCurrenciesFact,
    KeyUpdaterFact,
  },
  key::{
    parse_public_key,
    Key,
    Keys,
    KeysConfig,
    MAX_THRESHOLD,
    MAX_WEIGHT,
    MIN_THRESHOLD,
    MIN_WEIGHT,
  },
  operation::{Operation, OperationKind, SignedOperation},
};
use multihash::{Multihash, MultihashDigest};

/// sha256 digest wrapped as a multihash.
pub fn sha256(bytes: &[u8]) -> Multihash {
  multihash::Code::Sha2_256.digest(bytes)
}
