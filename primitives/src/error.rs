use {crate::Big, thiserror::Error};

/// Reasons a value, fact or signed operation is malformed.
///
/// All of those are detected without looking at any ledger state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("invalid key weight {0}, 1 <= weight <= 100")]
  InvalidWeight(u64),

  #[error("invalid public key: {0}")]
  InvalidKey(String),

  #[error("empty keys")]
  EmptyKeys,

  #[error("keys over {max}, {count}")]
  TooManyKeys { max: usize, count: usize },

  #[error("duplicated keys found, {0}")]
  DuplicateKey(String),

  #[error("invalid threshold, {0}, should be 1 <= threshold <= 100")]
  ThresholdOutOfRange(u64),

  #[error("sum of weight under threshold, {sum} < {threshold}")]
  InsufficientTotalWeight { sum: u64, threshold: u64 },

  #[error("keys hash not matched")]
  CorruptKeys,

  #[error("invalid address: {0}")]
  InvalidAddress(String),

  #[error("invalid currency id {0:?}, expected 3 to 10 of A-Z and 0-9")]
  InvalidCurrencyId(String),

  #[error("invalid big number {0:?}")]
  InvalidBig(String),

  #[error("invalid amount {0}: {1}")]
  InvalidAmount(Big, &'static str),

  #[error("big number overflow")]
  Overflow,

  #[error("invalid fact: {0}")]
  InvalidFact(String),

  #[error("fact hash not matched")]
  FactHashMismatch,

  #[error("empty fact signs")]
  EmptySigns,

  #[error("duplicated signer found, {0}")]
  DuplicatedSigner(String),

  #[error("signature verification failed for signer {0}")]
  SignatureVerificationFailed(String),
}
