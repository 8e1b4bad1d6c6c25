use std::io::{self, Write};

use color_eyre::Result;

use crate::{config, storage};

/// Store a new entry. Fields not supplied on the command line are
/// prompted for, with the historical defaults.
pub async fn add(
    site: Option<String>,
    username: Option<String>,
    password: Option<String>,
    config: &config::Config,
) -> Result<()> {
    let site = resolve(site, "Site?", "github.com")?;
    let username = resolve(username, "Username?", "johndoe")?;
    let password = resolve(password, "Password?", "password123")?;

    let vault = storage::vault_from_config(config)?;
    let record = vault.add_password(&site, &username, &password).await?;
    println!(
        "Password created with id {}. View with `zengate list`.",
        record.id
    );
    Ok(())
}

/// Print all entries as a table, passwords decrypted.
pub async fn list(config: &config::Config) -> Result<()> {
    let vault = storage::vault_from_config(config)?;
    let records = vault.list_decrypted().await?;
    if records.is_empty() {
        println!("No passwords yet. Add one with `zengate new password`.");
        return Ok(());
    }

    println!(
        "{:<4} {:<24} {:<16} {:<20} CREATED",
        "ID", "SITE", "USERNAME", "PASSWORD"
    );
    println!("{}", "-".repeat(86));
    for record in records {
        println!(
            "{:<4} {:<24} {:<16} {:<20} {}",
            record.id,
            record.site,
            record.username,
            record.password,
            record.created.format("%Y-%m-%d %H:%M:%S")
        );
    }
    Ok(())
}

pub async fn remove(id: u64, config: &config::Config) -> Result<()> {
    let vault = storage::vault_from_config(config)?;
    vault.remove(id).await?;
    println!("Password {id} removed.");
    Ok(())
}

fn resolve(value: Option<String>, label: &str, default: &str) -> Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }
    print!("{label} ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let trimmed = line.trim();
    Ok(if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    })
}
