use {
  clap::{Parser, Subcommand},
  currency_primitives::{
    parse_public_key,
    Address,
    Amount,
    Big,
    CurrencyId,
    Key,
    KeysConfig,
  },
  currency_vm::{Config, Suffrage, SuffrageThreshold},
  std::path::PathBuf,
};

/// Currency ledger tool
///
/// Builds and signs currency operations and replays them against
/// an ephemeral in-memory ledger.
#[derive(Debug, Parser)]
pub struct SystemSettings {
  /// Network identifier mixed into every signature
  #[clap(short, long, global = true,
    default_value = "localnet",
    value_name = "IDENTIFIER")]
  network_id: String,

  /// Maximum number of keys a single account may hold
  #[clap(long, global = true,
    default_value = "10",
    value_name = "COUNT")]
  max_keys: usize,

  /// Base58 public key of a suffrage node, may be repeated
  #[clap(long = "suffrage", global = true, value_name = "PUBLIC KEY")]
  suffrage: Vec<String>,

  /// Share of the suffrage that must sign policy updates
  #[clap(long, global = true,
    default_value = "67",
    value_name = "PERCENT")]
  suffrage_threshold: u8,

  /// Base58 public key of a node trusted to sign genesis, may be
  /// repeated
  #[clap(long = "genesis-node", global = true, value_name = "PUBLIC KEY")]
  genesis_nodes: Vec<String>,

  /// Height at which genesis currencies are accepted
  #[clap(long, global = true,
    default_value = "0",
    value_name = "HEIGHT")]
  genesis_height: u64,

  #[clap(subcommand)]
  command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
  /// Generates a new ed25519 keypair
  Keygen,

  /// Bootstraps the ledger with the supply of every currency
  Genesis {
    /// Base58 secret key of the genesis node
    #[clap(long, value_name = "SECRET")]
    secret: String,

    /// Key of the genesis account as <public key>,<weight>
    #[clap(long = "key", required = true, value_name = "KEY")]
    keys: Vec<Key>,

    #[clap(long, default_value = "100")]
    threshold: u64,

    /// Total supply as <amount>,<currency id>, may be repeated
    #[clap(long = "currency", required = true, value_name = "AMOUNT")]
    currencies: Vec<Amount>,

    /// Minimum funding of new accounts, for every currency
    #[clap(long, default_value = "0", value_name = "AMOUNT")]
    min_balance: Big,

    /// Fixed fee paid to the genesis account, for every currency
    #[clap(long, value_name = "AMOUNT")]
    fee: Option<Big>,

    #[clap(long)]
    token: Option<String>,
  },

  /// Opens a new account funded by the sender
  CreateAccount {
    /// Base58 secret key of a sender key, may be repeated
    #[clap(long = "secret", required = true, value_name = "SECRET")]
    secrets: Vec<String>,

    #[clap(long, value_name = "ADDRESS")]
    sender: Address,

    /// Key of the new account as <public key>,<weight>
    #[clap(long = "key", required = true, value_name = "KEY")]
    keys: Vec<Key>,

    #[clap(long, default_value = "100")]
    threshold: u64,

    /// Initial balance as <amount>,<currency id>
    #[clap(long, value_name = "AMOUNT")]
    amount: Amount,

    #[clap(long)]
    token: Option<String>,
  },

  /// Replaces the keys of an existing account
  KeyUpdater {
    /// Base58 secret key of a current account key, may be repeated
    #[clap(long = "secret", required = true, value_name = "SECRET")]
    secrets: Vec<String>,

    #[clap(long, value_name = "ADDRESS")]
    target: Address,

    /// New key as <public key>,<weight>
    #[clap(long = "key", required = true, value_name = "KEY")]
    keys: Vec<Key>,

    #[clap(long, default_value = "100")]
    threshold: u64,

    /// Currency the fee is paid in
    #[clap(long, value_name = "CURRENCY")]
    currency: CurrencyId,

    #[clap(long)]
    token: Option<String>,
  },

  /// Replaces the policy of a currency
  CurrencyPolicyUpdater {
    /// Base58 secret key of a suffrage node, may be repeated
    #[clap(long = "secret", required = true, value_name = "SECRET")]
    secrets: Vec<String>,

    #[clap(long, value_name = "CURRENCY")]
    currency: CurrencyId,

    #[clap(long, default_value = "0", value_name = "AMOUNT")]
    min_balance: Big,

    /// Fixed fee, requires --receiver
    #[clap(long, value_name = "AMOUNT", requires = "receiver")]
    fee: Option<Big>,

    #[clap(long, value_name = "ADDRESS")]
    receiver: Option<Address>,

    #[clap(long)]
    token: Option<String>,
  },

  /// Processes a file of base58 operations, one per line
  Process {
    file: PathBuf,

    /// Height the resulting states are recorded at
    #[clap(long, default_value = "0")]
    height: u64,
  },
}

impl SystemSettings {
  pub fn network_id(&self) -> &str {
    &self.network_id
  }

  pub fn command(&self) -> &Command {
    &self.command
  }

  pub fn config(&self) -> anyhow::Result<Config> {
    let publickeys = self
      .suffrage
      .iter()
      .map(|pk| parse_public_key(pk))
      .collect::<Result<_, _>>()?;
    let genesis_nodes = self
      .genesis_nodes
      .iter()
      .map(|pk| parse_public_key(pk))
      .collect::<Result<_, _>>()?;

    Ok(
      Config::new(self.network_id.as_bytes())
        .with_keys(KeysConfig {
          max_keys: self.max_keys,
        })
        .with_suffrage(Suffrage::new(
          publickeys,
          SuffrageThreshold::new(self.suffrage_threshold)?,
        ))
        .with_genesis(genesis_nodes, self.genesis_height),
    )
  }
}
