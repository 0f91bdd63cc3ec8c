use {
  crate::settings::{Command, SystemSettings},
  clap::Parser,
  currency_primitives::ToBase58String,
  currency_vm::{ProcessorRegistry, StateValue},
  tracing::{debug, subscriber::set_global_default},
  tracing_subscriber::{EnvFilter, FmtSubscriber},
};

mod commands;
mod replay;
mod settings;

fn main() -> anyhow::Result<()> {
  // configure logging, RUST_LOG overrides the default level
  set_global_default(
    FmtSubscriber::builder()
      .with_env_filter(
        EnvFilter::try_from_default_env()
          .unwrap_or_else(|_| EnvFilter::new("info")),
      )
      .with_writer(std::io::stderr)
      .finish(),
  )?;

  let settings = SystemSettings::parse();
  debug!("startup settings: {settings:#?}");

  let op = match settings.command() {
    Command::Keygen => {
      let (secret, public) = commands::keygen();
      println!("secret: {secret}");
      println!("public: {public}");
      return Ok(());
    }
    Command::Genesis {
      secret,
      keys,
      threshold,
      currencies,
      min_balance,
      fee,
      token,
    } => commands::genesis(
      &settings,
      secret,
      keys,
      *threshold,
      currencies,
      min_balance,
      fee,
      token,
    )?,
    Command::CreateAccount {
      secrets,
      sender,
      keys,
      threshold,
      amount,
      token,
    } => commands::create_account(
      &settings, secrets, sender, keys, *threshold, amount, token,
    )?,
    Command::KeyUpdater {
      secrets,
      target,
      keys,
      threshold,
      currency,
      token,
    } => commands::key_updater(
      &settings, secrets, target, keys, *threshold, currency, token,
    )?,
    Command::CurrencyPolicyUpdater {
      secrets,
      currency,
      min_balance,
      fee,
      receiver,
      token,
    } => commands::currency_policy_updater(
      &settings,
      secrets,
      currency,
      min_balance,
      fee,
      receiver,
      token,
    )?,
    Command::Process { file, height } => {
      let registry = ProcessorRegistry::with_defaults(settings.config()?)?;
      let ops = replay::read_operations(file)?;
      let store = replay::replay(&registry, *height, &ops)?;

      let mut states: Vec<_> = store.iter().collect();
      states.sort_by(|a, b| a.key().cmp(b.key()));
      for state in states {
        println!("{} = {:?}", state.key(), StateValue::of(state)?);
      }
      return Ok(());
    }
  };

  debug!("built operation {}", op.hash().to_b58());
  println!("{}", commands::encode(&op)?);
  Ok(())
}
