use std::path::PathBuf;

use color_eyre::Result;
use dirs::data_dir;
use tracing::debug;
use zengate_storage::json_file_store::JsonFileStore;
use zengate_vault::PasswordVault;

use crate::config::Config;

/// Resolve the default password store path.
pub fn default_data_file() -> Result<PathBuf> {
    let base = data_dir().ok_or_else(|| color_eyre::eyre::eyre!("no data dir available"))?;
    Ok(base.join("zengate").join("passwords.json"))
}

/// Build the file store, honoring the config override.
pub fn store_from_config(config: &Config) -> Result<JsonFileStore> {
    let path = match &config.data_file {
        Some(path) => path.clone(),
        None => default_data_file()?,
    };
    debug!(?path, "opening password store");
    Ok(JsonFileStore::new(path))
}

/// Build the vault service over the file store. The key stays optional
/// here; operations that need it fail with a descriptive error.
pub fn vault_from_config(config: &Config) -> Result<PasswordVault<JsonFileStore>> {
    Ok(PasswordVault::new(
        store_from_config(config)?,
        config.encrypt_key.clone(),
    ))
}
