use {crate::Height, currency_primitives::Big, thiserror::Error};

/// Reasons a set of signatures does not authorize an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
  #[error("unknown key found, {0}")]
  UnknownSigner(String),

  #[error("not passed threshold, sum={sum} < threshold={threshold}")]
  ThresholdNotMet { sum: u64, threshold: u64 },

  /// The node was configured without any suffrage or genesis keys,
  /// so the operation can never be authorized.
  #[error("empty publickeys for operation signs")]
  EmptyPublickeys,

  #[error("not enough suffrage signs, {signed} < {required}")]
  NotEnoughSuffrageSigns { signed: usize, required: usize },
}

/// Reasons an operation does not apply to the current ledger state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
  #[error("{what} already exists, {key}")]
  AlreadyExists { what: &'static str, key: String },

  #[error("{what} does not exist, {key}")]
  NotFound { what: &'static str, key: String },

  #[error("operation already processed, {0}")]
  AlreadyProcessed(String),

  #[error("{0} is already used by another operation in the same pool")]
  Duplicated(String),

  #[error("same keys with the existing account, {0}")]
  SameKeys(String),

  #[error("amount under new account minimum balance, {amount} < {minimum}")]
  UnderMinimumBalance { amount: Big, minimum: Big },

  #[error("genesis is only accepted at height {genesis}, not at {height}")]
  NotGenesisHeight { height: Height, genesis: Height },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("invalid operation: {0}")]
  Validation(#[from] currency_primitives::Error),

  #[error("unauthorized: {0}")]
  Authorization(#[from] AuthError),

  #[error(transparent)]
  Precondition(#[from] PreconditionError),

  #[error("insufficient funds in {key}, {balance} < {required}")]
  InsufficientFunds {
    key: String,
    balance: Big,
    required: Big,
  },

  #[error("corrupted keys found in state {0}")]
  CorruptKeys(String),

  #[error("internal error: {0}")]
  Internal(String),
}

impl Error {
  /// Fatal errors point at a defect in the node itself rather than
  /// at the operation, the whole batch should be aborted.
  pub fn is_fatal(&self) -> bool {
    matches!(self, Error::Internal(_))
  }

  /// True when the rejection is caused by node configuration and not
  /// by the operation or its signers.
  pub fn is_configuration(&self) -> bool {
    matches!(self, Error::Authorization(AuthError::EmptyPublickeys))
  }

  /// Short stable identifier of the rejection reason.
  pub fn reason(&self) -> &'static str {
    match self {
      Error::Validation(_) => "invalid_operation",
      Error::Authorization(e) => match e {
        AuthError::UnknownSigner(_) => "unknown_signer",
        AuthError::ThresholdNotMet { .. } => "threshold_not_met",
        AuthError::EmptyPublickeys => "empty_publickeys",
        AuthError::NotEnoughSuffrageSigns { .. } => "not_enough_suffrage_signs",
      },
      Error::Precondition(e) => match e {
        PreconditionError::AlreadyExists { .. } => "already_exists",
        PreconditionError::NotFound { .. } => "not_found",
        PreconditionError::AlreadyProcessed(_) => "already_processed",
        PreconditionError::Duplicated(_) => "duplicated",
        PreconditionError::SameKeys(_) => "same_keys",
        PreconditionError::UnderMinimumBalance { .. } => {
          "under_minimum_balance"
        }
        PreconditionError::NotGenesisHeight { .. } => "not_genesis_height",
      },
      Error::InsufficientFunds { .. } => "insufficient_funds",
      Error::CorruptKeys(_) => "corrupt_keys",
      Error::Internal(_) => "internal",
    }
  }
}
