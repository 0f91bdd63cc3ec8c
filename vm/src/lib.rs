mod auth;
mod codec;
mod config;
mod error;
mod pool;
mod processor;
mod registry;
mod state;

pub use {
  auth::{check_threshold, Suffrage, SuffrageThreshold},
  codec::{
    set_state_account_value,
    set_state_balance_value,
    set_state_currency_design_value,
    state_account_value,
    state_balance_value,
    state_currency_design_value,
    state_key_account,
    state_key_balance,
    state_key_currency_design,
    StateValue,
  },
  config::Config,
  error::{AuthError, Error, PreconditionError},
  pool::StatePool,
  processor::{
    new_create_account_processor,
    new_currency_policy_updater_processor,
    new_genesis_currencies_processor,
    new_key_updater_processor,
    CreateAccountProcessor,
    CurrencyPolicyUpdaterProcessor,
    GenesisCurrenciesProcessor,
    KeyUpdaterProcessor,
    Processor,
    ProcessorFactory,
  },
  registry::{OperationProcessor, ProcessorRegistry},
  state::{Height, InMemoryStateStore, State, StateDiff, StateStore},
};
