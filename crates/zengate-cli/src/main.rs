mod cli;
mod compose;
mod config;
mod passwords;
mod storage;

use clap::{CommandFactory, Parser};
use color_eyre::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use zengate_crypto::key::EncryptionKey;

use crate::cli::{Cli, Command, ConfigCommand, NewCommand};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let mut cfg = config::load()?;
    match command {
        Command::Set { key, value } => set_config(&mut cfg, &key, value)?,
        Command::New(NewCommand::Password {
            site,
            username,
            password,
        }) => passwords::add(site, username, password, &cfg).await?,
        Command::New(NewCommand::Key) => print_generated_key(),
        Command::List => passwords::list(&cfg).await?,
        Command::Remove { id } => passwords::remove(id, &cfg).await?,
        Command::Compose => compose::run()?,
        Command::Config(ConfigCommand::Init) => init_config(&cfg)?,
        Command::Version => print_version(),
    }

    Ok(())
}

fn init_tracing() {
    // Respect user-provided filters, default to info to avoid noisy stdout.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn set_config(cfg: &mut config::Config, key: &str, value: String) -> Result<()> {
    config::set_value(cfg, key, value)?;
    let path = config::save(cfg)?;
    println!("Config saved to {}", path.display());
    Ok(())
}

fn print_generated_key() {
    let key = EncryptionKey::generate();
    println!("{}", key.to_base64());
    println!("Store it with `zengate set encrypt_key <key>`.");
}

fn init_config(cfg: &config::Config) -> Result<()> {
    let path = config::write_default_if_missing(cfg)?;
    println!("Config initialized at {}", path.display());
    Ok(())
}

fn print_version() {
    println!("zengate {}", env!("CARGO_PKG_VERSION"));
}
