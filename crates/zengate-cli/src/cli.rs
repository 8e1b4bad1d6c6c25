use clap::{Parser, Subcommand};

/// CLI surface definition. One store operation per invocation; the
/// process exits after each command.
#[derive(Parser, Debug)]
#[command(
    name = "zengate",
    about = "Local encrypted password vault and stack launcher",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Optional subcommand; prints help when absent.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Set a config value (tunnel_url, api_url, encrypt_key).
    Set { key: String, value: String },
    /// Create a new vault item.
    #[command(subcommand)]
    New(NewCommand),
    /// List saved passwords, decrypted.
    List,
    /// Remove a saved password by id.
    Remove { id: u64 },
    /// Clone the zengate repo and run its container stack.
    Compose,
    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version and exit.
    Version,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum NewCommand {
    /// Store a new password entry; prompts for any missing field.
    Password {
        site: Option<String>,
        username: Option<String>,
        password: Option<String>,
    },
    /// Generate a fresh 32-byte encryption key, base64 encoded.
    Key,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Create a default config file if one does not exist.
    Init,
}
